use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Local precondition failures. No request is made when one of these occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a file.")]
    NoFileSelected,
    #[error("An upload is already in progress.")]
    AlreadySubmitting,
}

/// Anything that went wrong between reading the selected file and holding the
/// spooled response. Only ever shown to the user through [`UploadError`].
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to read {name}: {source}")]
    Read { name: String, source: io::Error },
    #[error("failed to start the upload runtime: {0}")]
    Runtime(io::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("failed to store the response: {0}")]
    Spool(io::Error),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    // The cause is logged where the failure happens; the user only gets this.
    #[error("Upload failed. Please try again.")]
    Transfer(#[from] TransferError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("invalid accept pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("at least one accept pattern is required")]
    NoPatterns,
    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,
}
