use thiserror::Error;

/// Errors raised by image store backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested image was not found.
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The image exceeds the configured size limit.
    #[error("image exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },

    /// A folder or public id contains characters that cannot be stored.
    #[error("invalid image key: {0}")]
    InvalidKey(String),

    /// The remote image host could not be reached or timed out.
    #[error("image host request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote image host answered with a non-success status.
    #[error("image host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("storage misconfigured: {0}")]
    Config(String),
}
