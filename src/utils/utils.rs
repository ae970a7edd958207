use std::env;
use std::io;
use std::path::Path;

use chrono::Utc;
use rand::Rng;

/// Upper bound (exclusive) of the random suffix in stored upload names.
const NAME_SUFFIX_RANGE: u32 = 1_000_000_000;

/// Creates a folder (and any necessary parent directories) at `folder_path`.
pub fn create_folder(folder_path: impl AsRef<Path>) -> io::Result<()> {
    std::fs::create_dir_all(folder_path)
}

/// Returns the value of the environment variable `key`.
/// If the variable is not set, returns the provided fallback value or an empty string if no fallback is provided.
pub fn get_env(key: &str, fallback: Option<&str>) -> String {
    env::var(key).unwrap_or_else(|_| fallback.unwrap_or("").to_string())
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Extension of a client supplied filename including the leading dot,
/// or an empty string. Only the final path component is looked at, so
/// directory parts in the client name never reach the stored name.
pub fn original_extension(original_name: &str) -> String {
    let file_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Generates the on-disk name of an upload: `{millis}-{random}{ext}`.
pub fn generate_stored_name(original_name: &str) -> String {
    let suffix = rand::rng().random_range(0..NAME_SUFFIX_RANGE);
    format!(
        "{}-{}{}",
        now_millis(),
        suffix,
        original_extension(original_name)
    )
}
