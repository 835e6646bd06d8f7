//! Error types for cw-core

use thiserror::Error;

/// Main error type for cw-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("room id is required")]
    MissingRoomId,

    #[error("--reply-account and --reply-message must be supplied together")]
    IncompleteReply,

    #[error("invalid time expression for {option}: {value:?}")]
    InvalidTime { option: String, value: String },

    #[error("no API token found (use --token, CHATWORK_API_TOKEN, CHATWORK_TOKEN or the env file)")]
    MissingToken,

    #[error("message body is empty (use --message, --file or --stdin)")]
    EmptyBody,

    #[error("ChatWork API error (status {status}): {payload}")]
    Api {
        status: u16,
        payload: serde_json::Value,
    },

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Errors raised before any network call because the caller's input is
    /// unusable.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingRoomId
                | Self::IncompleteReply
                | Self::InvalidTime { .. }
                | Self::MissingToken
                | Self::EmptyBody
        )
    }

    pub(crate) fn invalid_time(option: &str, value: &str) -> Self {
        Self::InvalidTime {
            option: option.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type alias for cw-core
pub type Result<T> = std::result::Result<T, Error>;
