//! ChatWork REST API v2 client

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use cw_core::{Account, ApiConfig, PostedMessage, RawMessage, RemoteAccess, Room};

use crate::error::{ChatworkError, Result};

const TOKEN_HEADER: &str = "X-ChatWorkToken";

/// ChatWork REST API client
#[derive(Clone)]
pub struct ChatworkClient {
    client: Client,
    token: String,
    base_url: String,
}

impl std::fmt::Debug for ChatworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatworkClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ChatworkClient {
    /// Create a new client for the given token
    pub fn new(token: &str, config: &ApiConfig) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ChatworkError::TokenNotConfigured);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cw-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ChatworkError::HttpError)?;

        Ok(Self {
            client,
            token: token.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn add_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(TOKEN_HEADER, &self.token)
    }

    /// Send a request and turn non-success responses into `ApiError`
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = self
            .add_auth(request)
            .send()
            .await
            .map_err(ChatworkError::HttpError)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        error!("{} failed: {} - {}", what, status, text);
        Err(ChatworkError::ApiError {
            status: status.as_u16(),
            payload: error_payload(&text),
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response.text().await.map_err(ChatworkError::HttpError)?;
        serde_json::from_str(&text).map_err(|e| ChatworkError::ParseError(e.to_string()))
    }

    /// `GET /me`
    pub async fn me(&self) -> Result<Account> {
        let url = format!("{}/me", self.base_url);

        debug!("Fetching current account");
        let response = self.send(self.client.get(&url), "Fetch account").await?;
        let account: Account = Self::decode(response).await?;

        info!("Authenticated as account {}", account.account_id);
        Ok(account)
    }

    /// `GET /rooms`
    pub async fn rooms(&self) -> Result<Vec<Room>> {
        let url = format!("{}/rooms", self.base_url);

        debug!("Fetching room list");
        let response = self.send(self.client.get(&url), "Fetch rooms").await?;
        let rooms: Vec<Room> = Self::decode(response).await?;

        debug!("Fetched {} rooms", rooms.len());
        Ok(rooms)
    }

    /// `GET /rooms/{room_id}/messages`
    ///
    /// The API answers 204 with no body when there is nothing to return.
    pub async fn room_messages(&self, room_id: &str, force: bool) -> Result<Vec<RawMessage>> {
        let url = format!("{}/rooms/{}/messages", self.base_url, room_id);
        let force = if force { "1" } else { "0" };

        debug!("Fetching messages for room {} (force={})", room_id, force);
        let request = self.client.get(&url).query(&[("force", force)]);
        let response = self.send(request, "Fetch messages").await?;

        if response.status() == StatusCode::NO_CONTENT {
            debug!("No messages for room {}", room_id);
            return Ok(Vec::new());
        }

        let text = response.text().await.map_err(ChatworkError::HttpError)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let messages: Vec<RawMessage> =
            serde_json::from_str(&text).map_err(|e| ChatworkError::ParseError(e.to_string()))?;

        debug!("Fetched {} messages for room {}", messages.len(), room_id);
        Ok(messages)
    }

    /// `POST /rooms/{room_id}/messages`
    pub async fn post_message(
        &self,
        room_id: &str,
        body: &str,
        self_unread: bool,
    ) -> Result<PostedMessage> {
        let url = format!("{}/rooms/{}/messages", self.base_url, room_id);
        let self_unread = if self_unread { "1" } else { "0" };

        debug!("Posting message to room {}", room_id);
        let request = self
            .client
            .post(&url)
            .form(&[("body", body), ("self_unread", self_unread)]);
        let response = self.send(request, "Post message").await?;
        let posted: PostedMessage = Self::decode(response).await?;

        info!("Posted message {} to room {}", posted.message_id, room_id);
        Ok(posted)
    }
}

/// Error bodies are usually `{"errors": [...]}` but proxies may answer with
/// plain text.
fn error_payload(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

#[async_trait]
impl RemoteAccess for ChatworkClient {
    async fn fetch_current_account(&self) -> cw_core::Result<Account> {
        Ok(self.me().await?)
    }

    async fn fetch_rooms(&self) -> cw_core::Result<Vec<Room>> {
        Ok(self.rooms().await?)
    }

    async fn fetch_room_messages(
        &self,
        room_id: &str,
        force: bool,
    ) -> cw_core::Result<Vec<RawMessage>> {
        Ok(self.room_messages(room_id, force).await?)
    }

    async fn post_room_message(
        &self,
        room_id: &str,
        body: &str,
        self_unread: bool,
    ) -> cw_core::Result<PostedMessage> {
        Ok(self.post_message(room_id, body, self_unread).await?)
    }
}
