//! Console output
//!
//! JSON is the default so the output can be piped into other tools; `text`
//! is for humans reading a room.

use clap::ValueEnum;
use serde::Serialize;

use cw_core::{CanonicalMessage, PostedMessage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Result of the `send` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutput<'a> {
    pub room_id: &'a str,
    pub body: &'a str,
    pub dry_run: bool,
    pub result: Option<PostedMessage>,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn messages(messages: &[CanonicalMessage], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(messages),
        OutputFormat::Text => Ok(messages
            .iter()
            .map(message_text)
            .collect::<Vec<_>>()
            .join("\n\n")),
    }
}

fn message_text(message: &CanonicalMessage) -> String {
    let time = message.send_time_iso.as_deref().unwrap_or("-");
    let name = message.account_name.as_deref().unwrap_or("?");
    let id = message
        .account_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());

    format!(
        "[{}] {}({}) #{}\n{}",
        time, name, id, message.message_id, message.body
    )
}
