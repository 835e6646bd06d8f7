//! Remote access boundary
//!
//! The pipelines only talk to the chat service through this trait; the HTTP
//! client lives in `cw-api`.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Account, PostedMessage, RawMessage, Room};

#[async_trait]
pub trait RemoteAccess: Send + Sync {
    /// Account that owns the token
    async fn fetch_current_account(&self) -> Result<Account>;

    /// Rooms the account belongs to
    async fn fetch_rooms(&self) -> Result<Vec<Room>>;

    /// Message history of a room; `force` is passed through to the API as-is
    async fn fetch_room_messages(&self, room_id: &str, force: bool) -> Result<Vec<RawMessage>>;

    /// Post a composed body to a room
    async fn post_room_message(
        &self,
        room_id: &str,
        body: &str,
        self_unread: bool,
    ) -> Result<PostedMessage>;
}
