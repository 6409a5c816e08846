//! Error types and Result alias for the PortfolioX client

use thiserror::Error;

/// Main error type for the PortfolioX client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Network unreachable, timeout, or the client could not be built
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP {status}: {reason}")]
    HttpError { status: u16, reason: String },

    /// Payload does not match the expected contract
    #[error("Unexpected payload: {0}")]
    DataShapeError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("No portfolio selected")]
    NoSelection,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Encryption error: {0}")]
    EncryptionError(String),
}

impl Error {
    /// True when the backend answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::HttpError { status: 404, .. })
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Error::HttpError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
        }
        if err.is_decode() {
            return Error::DataShapeError(err.to_string());
        }
        Error::TransportError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DataShapeError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_carries_status_and_reason() {
        let err = Error::HttpError {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_detection() {
        let err = Error::HttpError {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!Error::TransportError("refused".into()).is_not_found());
    }

    #[test]
    fn test_json_error_is_data_shape() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::DataShapeError(_)));
    }
}
