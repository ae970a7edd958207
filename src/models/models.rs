use serde::{Deserialize, Serialize};

/// Public URL prefix under which stored uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub path: String,
}

impl UploadedFile {
    pub fn new(filename: String) -> Self {
        let path = format!("{}{}", UPLOADS_URL_PREFIX, filename);
        UploadedFile { filename, path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub timestamp: String,
    pub environment: String,
}
