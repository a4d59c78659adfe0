//! Error types for cache operations

use thiserror::Error;

/// Main error type for all cache operations
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Upstream answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Request could not be sent or its body could not be read
    #[error("transport error: {0}")]
    Transport(String),

    /// Request path could not be turned into a URL
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Durable storage operation failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// True for failures that came from the network side of a fetch
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            CacheError::Http { .. } | CacheError::Transport(_) | CacheError::InvalidUrl(_)
        )
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Storage(err.to_string())
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::Http {
            status: 503,
            url: "http://localhost/api/sirenes/".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 for http://localhost/api/sirenes/");

        let err = CacheError::Deserialization("expected value".to_string());
        assert_eq!(err.to_string(), "deserialization error: expected value");

        let err = CacheError::Storage("quota exceeded".to_string());
        assert_eq!(err.to_string(), "storage error: quota exceeded");
    }

    #[test]
    fn test_fetch_failure_classification() {
        assert!(CacheError::Transport("reset".into()).is_fetch_failure());
        assert!(
            CacheError::Http {
                status: 404,
                url: "/x".into()
            }
            .is_fetch_failure()
        );
        assert!(!CacheError::Deserialization("eof".into()).is_fetch_failure());
        assert!(!CacheError::Storage("full".into()).is_fetch_failure());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Storage(_)));
    }
}
