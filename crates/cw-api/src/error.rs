//! Error types (cw-api)

use thiserror::Error;

/// cw-api error type
#[derive(Error, Debug)]
pub enum ChatworkError {
    #[error("ChatWork API error (status {status}): {payload}")]
    ApiError {
        status: u16,
        payload: serde_json::Value,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("ChatWork token not configured")]
    TokenNotConfigured,
}

impl From<ChatworkError> for cw_core::Error {
    fn from(err: ChatworkError) -> Self {
        match err {
            ChatworkError::ApiError { status, payload } => Self::Api { status, payload },
            ChatworkError::HttpError(e) => Self::Transport(e.to_string()),
            ChatworkError::ParseError(e) => Self::Decode(e),
            ChatworkError::TokenNotConfigured => Self::MissingToken,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ChatworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_status_and_payload() {
        let err: cw_core::Error = ChatworkError::ApiError {
            status: 429,
            payload: serde_json::json!({"errors": ["Too many requests"]}),
        }
        .into();

        match err {
            cw_core::Error::Api { status, payload } => {
                assert_eq!(status, 429);
                assert_eq!(payload["errors"][0], "Too many requests");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_token_not_configured_maps_to_missing_token() {
        let err: cw_core::Error = ChatworkError::TokenNotConfigured.into();
        assert!(matches!(err, cw_core::Error::MissingToken));
    }
}
