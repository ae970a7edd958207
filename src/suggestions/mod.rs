mod board;
pub use board::*;
mod search;
pub use search::*;
mod song;
pub use song::*;
