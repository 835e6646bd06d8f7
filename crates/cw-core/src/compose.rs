//! Outbound message body construction

use crate::error::{Error, Result};

/// Options of the `send` command
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Comma-separated addressee account ids
    pub to: Option<String>,
    pub reply_account: Option<String>,
    pub reply_message: Option<String>,
    pub dry_run: bool,
}

/// Build the body posted to the room.
///
/// Line order: `[To:<id>]` per addressee, one reply directive, then the text.
pub fn compose_body(room_id: &str, text: &str, options: &WriteOptions) -> Result<String> {
    if room_id.trim().is_empty() {
        return Err(Error::MissingRoomId);
    }

    let reply = match (
        non_empty(options.reply_account.as_deref()),
        non_empty(options.reply_message.as_deref()),
    ) {
        (Some(account), Some(message)) => Some(format!("[rp aid={account} to={room_id}-{message}]")),
        (None, None) => None,
        _ => return Err(Error::IncompleteReply),
    };

    if text.trim().is_empty() {
        return Err(Error::EmptyBody);
    }

    let mut lines: Vec<String> = options
        .to
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| format!("[To:{id}]"))
        .collect();

    lines.extend(reply);
    lines.push(text.to_string());

    Ok(lines.join("\n"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
