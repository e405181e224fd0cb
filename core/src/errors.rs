use thiserror::Error;

/// Errors raised while talking to the generative-language API or loading configuration
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl CoreError {
    /// Authentication and quota failures come back as 401/403/429.
    pub fn is_auth_or_quota(&self) -> bool {
        matches!(
            self,
            CoreError::HttpError {
                status_code: 401 | 403 | 429,
                ..
            }
        )
    }
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_and_quota_statuses() {
        for status_code in [401, 403, 429] {
            let err = CoreError::HttpError {
                status_code,
                message: "denied".to_string(),
            };
            assert!(err.is_auth_or_quota());
        }

        let server = CoreError::HttpError {
            status_code: 500,
            message: "boom".to_string(),
        };
        assert!(!server.is_auth_or_quota());
        assert!(!CoreError::Timeout(10).is_auth_or_quota());
    }

    #[test]
    fn test_error_messages() {
        let err = CoreError::HttpError {
            status_code: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP Error: 429 - quota exceeded");
        assert_eq!(
            CoreError::Timeout(10).to_string(),
            "Request timed out after 10 seconds"
        );
    }
}
