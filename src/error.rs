//! Error types for drive trees, documents, and collaborators.

use thiserror::Error;

/// Errors raised while navigating or mutating a file tree.
///
/// Every variant carries the formatted path that failed to resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Name conflict at {0}")]
    NameConflict(String),

    /// The root, or a folder moved underneath itself.
    #[error("Illegal target: {0}")]
    IllegalTarget(String),
}

/// Drive-level errors
#[derive(Error, Debug)]
pub enum DriveError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("No servers available for drive")]
    NoServers,

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Signing failed: {0}")]
    Signer(String),

    #[error("Publishing failed: {0}")]
    Publisher(String),

    #[error("Blob request failed: {0}")]
    Blob(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for DriveError {
    fn from(err: config::ConfigError) -> Self {
        DriveError::Config(err.to_string())
    }
}

impl From<url::ParseError> for DriveError {
    fn from(err: url::ParseError) -> Self {
        DriveError::InvalidUrl(err.to_string())
    }
}
