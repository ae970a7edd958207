use std::path::PathBuf;

use thiserror::Error;

use crate::utils;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const UPLOAD_DIR_ENV: &str = "UPLOAD_DIR";
pub const STATIC_DIR_ENV: &str = "STATIC_DIR";
pub const MAX_UPLOAD_SIZE_ENV: &str = "MAX_UPLOAD_SIZE";
pub const APP_ENV_ENV: &str = "APP_ENV";

const HOST_DEFAULT: &str = "0.0.0.0";
const PORT_DEFAULT: &str = "3000";
const UPLOAD_DIR_DEFAULT: &str = "uploads";
const STATIC_DIR_DEFAULT: &str = "dist";
const MAX_UPLOAD_SIZE_DEFAULT: &str = "10MB";
const APP_ENV_DEFAULT: &str = "development";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Server settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Per-file limit in bytes.
    pub max_upload_size: u64,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST_DEFAULT.to_string(),
            port: 3000,
            upload_dir: PathBuf::from(UPLOAD_DIR_DEFAULT),
            static_dir: PathBuf::from(STATIC_DIR_DEFAULT),
            max_upload_size: 10 * 1024 * 1024,
            environment: APP_ENV_DEFAULT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = utils::get_env(PORT_ENV, Some(PORT_DEFAULT));
        let max_upload_size = utils::get_env(MAX_UPLOAD_SIZE_ENV, Some(MAX_UPLOAD_SIZE_DEFAULT));

        Ok(Self {
            host: utils::get_env(HOST_ENV, Some(HOST_DEFAULT)),
            port: parse_port(&port)?,
            upload_dir: PathBuf::from(utils::get_env(UPLOAD_DIR_ENV, Some(UPLOAD_DIR_DEFAULT))),
            static_dir: PathBuf::from(utils::get_env(STATIC_DIR_ENV, Some(STATIC_DIR_DEFAULT))),
            max_upload_size: parse_size(&max_upload_size).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: MAX_UPLOAD_SIZE_ENV,
                    value: max_upload_size.clone(),
                }
            })?,
            environment: utils::get_env(APP_ENV_ENV, Some(APP_ENV_DEFAULT)),
        })
    }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: PORT_ENV,
        value: value.to_string(),
    })
}

/// Parses sizes like `1048576`, `512kb`, `10MB` or `1gb` (binary multiples).
pub fn parse_size(value: &str) -> Option<u64> {
    let value = value.trim().to_ascii_lowercase();
    let (digits, multiplier) = if let Some(n) = value.strip_suffix("gb") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("mb") {
        (n, 1024 * 1024)
    } else if let Some(n) = value.strip_suffix("kb") {
        (n, 1024)
    } else if let Some(n) = value.strip_suffix('b') {
        (n, 1)
    } else {
        (value.as_str(), 1)
    };
    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}
