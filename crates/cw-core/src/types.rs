//! ChatWork API types

use serde::{Deserialize, Deserializer, Serialize};

/// Message as returned by `GET /rooms/{room_id}/messages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(deserialize_with = "string_or_number")]
    pub message_id: String,
    #[serde(default)]
    pub account: Option<RawAccount>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub send_time: i64,
    #[serde(default)]
    pub update_time: i64,
}

/// Sender embedded in a raw message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAccount {
    #[serde(default)]
    pub account_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_image_url: Option<String>,
}

/// Normalized message handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMessage {
    pub room_id: String,
    pub message_id: String,
    pub send_time_unix: i64,
    pub send_time_iso: Option<String>,
    pub account_id: Option<u64>,
    pub account_name: Option<String>,
    pub body: String,
    pub raw_body: String,
}

/// Room info from `GET /rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub sticky: Option<bool>,
    #[serde(default)]
    pub unread_num: Option<u64>,
    #[serde(default)]
    pub mention_num: Option<u64>,
    #[serde(default)]
    pub mytask_num: Option<u64>,
    #[serde(default)]
    pub message_num: Option<u64>,
    #[serde(default)]
    pub file_num: Option<u64>,
    #[serde(default)]
    pub task_num: Option<u64>,
    #[serde(default)]
    pub icon_path: Option<String>,
    #[serde(default)]
    pub last_update_time: Option<i64>,
}

/// Authenticated account from `GET /me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: u64,
    pub name: String,
    #[serde(default)]
    pub room_id: Option<u64>,
    #[serde(default)]
    pub chatwork_id: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
}

/// Response of `POST /rooms/{room_id}/messages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedMessage {
    #[serde(deserialize_with = "string_or_number")]
    pub message_id: String,
}

/// Message ids are documented as strings but older responses carry numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_message_parsing() {
        let json = r#"{
            "message_id": "5",
            "account": {"account_id": 123, "name": "Bob", "avatar_image_url": "https://example.com/ico.png"},
            "body": "[To:1] hello",
            "send_time": 1384242850,
            "update_time": 0
        }"#;

        let msg: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.message_id, "5");
        assert_eq!(msg.body, "[To:1] hello");
        assert_eq!(msg.send_time, 1384242850);
        let account = msg.account.unwrap();
        assert_eq!(account.account_id, Some(123));
        assert_eq!(account.name.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_raw_message_defaults() {
        let msg: RawMessage = serde_json::from_str(r#"{"message_id": 42}"#).unwrap();
        assert_eq!(msg.message_id, "42");
        assert!(msg.account.is_none());
        assert_eq!(msg.body, "");
        assert_eq!(msg.send_time, 0);
    }

    #[test]
    fn test_canonical_message_camel_case() {
        let msg = CanonicalMessage {
            room_id: "10".to_string(),
            message_id: "5".to_string(),
            send_time_unix: 0,
            send_time_iso: None,
            account_id: None,
            account_name: None,
            body: String::new(),
            raw_body: String::new(),
        };

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["roomId"], "10");
        assert_eq!(value["sendTimeUnix"], 0);
        assert!(value["sendTimeIso"].is_null());
        assert!(value.get("rawBody").is_some());
    }

    #[test]
    fn test_room_parsing() {
        let json = r#"{
            "room_id": 123,
            "name": "Group Chat Name",
            "type": "group",
            "role": "admin",
            "sticky": false,
            "unread_num": 10,
            "icon_path": "https://example.com/ico_group.png",
            "last_update_time": 1298905200
        }"#;

        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.room_id, 123);
        assert_eq!(room.room_type.as_deref(), Some("group"));
        assert_eq!(room.unread_num, Some(10));
        assert!(room.task_num.is_none());
    }

    #[test]
    fn test_posted_message_parsing() {
        let posted: PostedMessage = serde_json::from_str(r#"{"message_id": "1234"}"#).unwrap();
        assert_eq!(posted.message_id, "1234");
    }
}
