use crate::platform::Platform;
use thiserror::Error;

/// Failures an open request can end in.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Path does not exist: {0}")]
    NotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No file manager found (tried xdg-open, nautilus, dolphin)")]
    NoFileManager,

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(Platform),

    #[error("Failed to open: {0}")]
    OpenFailed(String),

    #[error("Missing required parameter: {0}")]
    MissingArgument(String),
}

pub type OpenResult<T> = Result<T, OpenError>;
