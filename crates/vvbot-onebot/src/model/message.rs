//! OneBot v11 outbound message type.
//!
//! A [`OneBotMessage`] is an ordered list of [`Segment`]s, always serialized
//! in the array format:
//!
//! ```json
//! [{"type": "text", "data": {"text": "hi"}}]
//! ```

use serde::{Deserialize, Serialize};

use super::segment::Segment;

/// A OneBot v11 message composed of multiple segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OneBotMessage {
    segments: Vec<Segment>,
}

impl OneBotMessage {
    /// Creates a message containing only plain text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::text(text)],
        }
    }

    /// Converts the message to a CQ code string, for logging.
    pub fn to_cq_string(&self) -> String {
        self.segments.iter().map(Segment::to_cq_code).collect()
    }
}

impl From<Vec<Segment>> for OneBotMessage {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl From<Segment> for OneBotMessage {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl From<&str> for OneBotMessage {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
