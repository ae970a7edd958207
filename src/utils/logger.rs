use std::io;
use std::sync::Mutex;

use slog::{Drain, Logger, error, o};

/// Root logger writing one JSON object per line to stdout.
pub fn get_logger() -> Logger {
    let drain = slog_json::Json::new(io::stdout())
        .add_default_keys()
        .build()
        .fuse();
    let drain = Mutex::new(drain).fuse();
    Logger::root(drain, o!("app" => "fotky-board"))
}

pub fn error_context<E: std::error::Error>(logger: &Logger, context: &str, err: E) {
    error!(logger, "{}: {}", context, err; "error" => err.to_string());
}
