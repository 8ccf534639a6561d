//! Error types for the JW Platform provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// JW Platform provider errors
#[derive(Error, Debug)]
pub enum JwPlatformError {
    /// The API answered with an error document
    #[error("JW Platform API error (status {status_code}, code {code}): {message}")]
    ApiError {
        status_code: u16,
        code: String,
        message: String,
    },

    /// The API throttled the request
    #[error("{0}")]
    RateLimitExceeded(String),

    /// The named resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The thumbnail source image could not be fetched
    #[error("Image download failed (status {status_code}): {url}")]
    ImageDownload { status_code: u16, url: String },

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for JW Platform operations
pub type Result<T> = std::result::Result<T, JwPlatformError>;

impl From<JwPlatformError> for BridgeError {
    fn from(error: JwPlatformError) -> Self {
        match error {
            JwPlatformError::RateLimitExceeded(message) => BridgeError::RateLimited(message),
            JwPlatformError::NotFound(message) => BridgeError::NotFound(message),
            JwPlatformError::ImageDownload {
                status_code: 404,
                url,
            } => BridgeError::NotFound(format!("image {}", url)),
            JwPlatformError::BridgeError(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = JwPlatformError::ApiError {
            status_code: 400,
            code: "ParameterInvalid".to_string(),
            message: "title too long".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "JW Platform API error (status 400, code ParameterInvalid): title too long"
        );
    }

    #[test]
    fn test_signals_survive_conversion() {
        let throttled: BridgeError = JwPlatformError::RateLimitExceeded("busy".to_string()).into();
        assert!(throttled.is_rate_limited());

        let missing: BridgeError = JwPlatformError::NotFound("video abc".to_string()).into();
        assert!(missing.is_not_found());

        let parse: BridgeError = JwPlatformError::ParseError("eof".to_string()).into();
        assert!(matches!(parse, BridgeError::OperationFailed(_)));
    }
}
