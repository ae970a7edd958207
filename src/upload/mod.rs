mod error;
pub use error::*;
mod storage;
pub use storage::*;
