use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The remote store throttled the request. Callers are expected to back
    /// off and retry the whole operation.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The remote store has no resource matching the request.
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether this error is the remote throttling signal
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, BridgeError::RateLimited(_))
    }

    /// Whether this error is the remote missing-resource signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, BridgeError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
