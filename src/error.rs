// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single submission. The `Display` text is what the user sees
/// after the localized error prefix.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Server(String),

    #[error("unexpected status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("no data directory available; set HR_CHAT_STORE")]
    NoDataDir,
}
