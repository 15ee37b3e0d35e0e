//! Common OneBot v11 types.

use serde::{Deserialize, Serialize};

/// Message sender information.
///
/// Informational only; nothing in vvbot routes on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    /// User ID.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Group card (group nickname).
    #[serde(default)]
    pub card: Option<String>,
    /// Group role ("owner", "admin", "member").
    #[serde(default)]
    pub role: Option<String>,
}

impl Sender {
    /// Returns the name to show for this sender: card, then nickname.
    pub fn display_name(&self) -> &str {
        self.card
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.nickname.as_deref())
            .unwrap_or("Unknown")
    }
}
