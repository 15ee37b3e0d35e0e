//! Inbound group message event.
//!
//! The gateway posts one JSON object per event. Only group messages are
//! modelled; every field except `group_id` and `raw_message` is optional
//! and unknown fields are ignored, so other event kinds either fail to
//! decode or decode with `group_id == 0` and are discarded by
//! [`GroupMessageEvent::is_actionable`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::Sender;

/// Group message event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMessageEvent {
    /// Event timestamp (unix seconds).
    #[serde(default)]
    pub time: i64,
    /// The bot's own QQ number as reported by the gateway.
    #[serde(default)]
    pub self_id: i64,
    /// Event kind ("message", "notice", ...).
    #[serde(default)]
    pub post_type: String,
    /// Message kind ("group", "private").
    #[serde(default)]
    pub message_type: String,
    /// Sub-type ("normal", "anonymous", "notice").
    #[serde(default)]
    pub sub_type: String,
    /// Message ID.
    #[serde(default)]
    pub message_id: i64,
    /// Group ID. Zero when absent.
    #[serde(default)]
    pub group_id: i64,
    /// Group name, if the gateway provides it.
    #[serde(default)]
    pub group_name: Option<String>,
    /// Sender's user ID.
    #[serde(default)]
    pub user_id: i64,
    /// Message content (array of segments, kept raw).
    #[serde(default)]
    pub message: Value,
    /// Raw message string with CQ codes. Empty when absent.
    #[serde(default)]
    pub raw_message: String,
    /// Font (usually 0).
    #[serde(default)]
    pub font: i32,
    /// Sender information.
    #[serde(default)]
    pub sender: Sender,
}

impl GroupMessageEvent {
    /// Decodes an event from a webhook body.
    pub fn parse(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    /// Returns `false` for events that must be dropped before routing:
    /// no group ID or no message text.
    pub fn is_actionable(&self) -> bool {
        self.group_id != 0 && !self.raw_message.is_empty()
    }
}
