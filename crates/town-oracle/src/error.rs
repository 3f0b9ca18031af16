//! Oracle error type.

use thiserror::Error;

/// Errors that can occur while asking an oracle for text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("API key not configured: set {env}")]
    MissingApiKey { env: String },

    #[error("client build failed: {0}")]
    BuildClient(String),

    #[error("http request failed: {0}")]
    Http(String),

    #[error("http status {code}: {message}")]
    HttpStatus { code: u16, message: String },

    #[error("decode response failed: {0}")]
    Decode(String),

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("scripted oracle has no reply for prompt: {0}")]
    Exhausted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OracleError::HttpStatus {
            code: 429,
            message: "slow down".to_string(),
        };
        assert_eq!(err.to_string(), "http status 429: slow down");

        let err = OracleError::MissingApiKey {
            env: "OPENAI_API_KEY".to_string(),
        };
        assert_eq!(err.to_string(), "API key not configured: set OPENAI_API_KEY");
    }
}
