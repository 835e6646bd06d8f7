//! Message read pipeline
//!
//! fetch → time window → substring → sort ascending → keep last `limit` →
//! normalize

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::port::RemoteAccess;
use crate::types::{CanonicalMessage, RawMessage};

pub const DEFAULT_LIMIT: usize = 30;
pub const MAX_LIMIT: usize = 100;

/// Options of the `read` command
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub limit: usize,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub contains: Option<String>,
    pub force: bool,
    pub strip_tags: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            since: None,
            until: None,
            contains: None,
            force: false,
            strip_tags: false,
        }
    }
}

impl ReadOptions {
    /// `limit` clamped to `[1, MAX_LIMIT]`
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

/// Fetch and filter the history of one room.
pub async fn read_messages<R>(
    remote: &R,
    room_id: &str,
    options: &ReadOptions,
) -> Result<Vec<CanonicalMessage>>
where
    R: RemoteAccess + ?Sized,
{
    let room_id = room_id.trim();
    if room_id.is_empty() {
        return Err(Error::MissingRoomId);
    }

    debug!("Fetching messages for room {} (force={})", room_id, options.force);
    let raw = remote.fetch_room_messages(room_id, options.force).await?;
    let fetched = raw.len();

    let messages: Vec<CanonicalMessage> = select_messages(raw, options)
        .iter()
        .map(|record| normalize(room_id, record, options.strip_tags))
        .collect();

    info!(
        "Room {}: {} fetched, {} returned",
        room_id,
        fetched,
        messages.len()
    );
    Ok(messages)
}

/// Window, substring, sort and tail-slice steps over raw records.
pub fn select_messages(raw: Vec<RawMessage>, options: &ReadOptions) -> Vec<RawMessage> {
    let mut kept: Vec<RawMessage> = raw
        .into_iter()
        .filter(|m| options.since.is_none_or(|since| m.send_time >= since))
        .filter(|m| options.until.is_none_or(|until| m.send_time <= until))
        .filter(|m| {
            options
                .contains
                .as_deref()
                .is_none_or(|needle| m.body.contains(needle))
        })
        .collect();

    kept.sort_by_key(|m| m.send_time);

    let skip = kept.len().saturating_sub(options.effective_limit());
    kept.split_off(skip)
}
