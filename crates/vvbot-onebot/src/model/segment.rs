//! OneBot v11 message segment types.
//!
//! A message segment represents a single unit of outbound content. vvbot
//! only ever sends plain text and images, so the segment type is closed over
//! exactly those two variants; any other `type` fails to deserialize.
//!
//! # CQ Code Mapping
//!
//! - `text` → plain text (no CQ code)
//! - `image` → `[CQ:image,file=xxx,summary=yyy]`
//! - mentions arrive inbound as `[CQ:at,qq=123]`, see [`mention_code`]
//!
//! # Example
//!
//! ```rust,ignore
//! use vvbot_onebot::Segment;
//!
//! let text = Segment::text("Hello, ");
//! let image = Segment::image("https://example.com/a.png", "a.png");
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Segment Enum
// ============================================================================

/// A OneBot v11 message segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text content.
    Text(TextData),
    /// Image.
    Image(ImageData),
}

impl Segment {
    /// Creates a plain text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(TextData { text: text.into() })
    }

    /// Creates an image segment.
    ///
    /// `file` is handed to the gateway as-is, so a URL makes the gateway
    /// fetch the image itself. `summary` is the caption shown in previews.
    pub fn image(file: impl Into<String>, summary: impl Into<String>) -> Self {
        Segment::Image(ImageData {
            file: file.into(),
            summary: summary.into(),
        })
    }

    /// Converts the segment to its CQ code string.
    pub fn to_cq_code(&self) -> String {
        match self {
            Segment::Text(data) => escape_cq_text(&data.text),
            Segment::Image(data) => format!(
                "[CQ:image,file={},summary={}]",
                escape_cq_value(&data.file),
                escape_cq_value(&data.summary)
            ),
        }
    }
}

// ============================================================================
// Segment Data Types
// ============================================================================

/// Plain text segment data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextData {
    /// The text content.
    pub text: String,
}

/// Image segment data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// Image file reference: URL, path or base64.
    pub file: String,
    /// Caption shown by clients in place of the image.
    #[serde(default)]
    pub summary: String,
}

// ============================================================================
// CQ Code Utilities
// ============================================================================

/// Returns the CQ code the gateway puts into `raw_message` when `qq` is
/// mentioned, e.g. `[CQ:at,qq=10001000]`.
pub fn mention_code(qq: &str) -> String {
    format!("[CQ:at,qq={}]", escape_cq_value(qq))
}

/// Escapes special characters in plain text for CQ code format.
///
/// Escapes: `&` → `&amp;`, `[` → `&#91;`, `]` → `&#93;`
fn escape_cq_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('[', "&#91;")
        .replace(']', "&#93;")
}

/// Escapes special characters in CQ code parameter values.
///
/// Escapes: `&` → `&amp;`, `[` → `&#91;`, `]` → `&#93;`, `,` → `&#44;`
fn escape_cq_value(value: &str) -> String {
    escape_cq_text(value).replace(',', "&#44;")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_serialize() {
        let text = Segment::text("Hello");
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"type":"text","data":{"text":"Hello"}}"#);

        let image = Segment::image("https://x/y/img.png", "img.png");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(
            json,
            r#"{"type":"image","data":{"file":"https://x/y/img.png","summary":"img.png"}}"#
        );
    }

    #[test]
    fn test_segment_deserialize() {
        let json = r#"{"type":"text","data":{"text":"Hello World"}}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert!(matches!(segment, Segment::Text(TextData { text }) if text == "Hello World"));

        let json = r#"{"type":"image","data":{"file":"123.jpg"}}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert!(
            matches!(segment, Segment::Image(ImageData { file, summary }) if file == "123.jpg" && summary.is_empty())
        );
    }

    #[test]
    fn test_unknown_segment_rejected() {
        let json = r#"{"type":"at","data":{"qq":"10001000"}}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());

        let json = r#"{"type":"face","data":{"id":"178"}}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[test]
    fn test_cq_code_conversion() {
        assert_eq!(Segment::text("Hello").to_cq_code(), "Hello");
        assert_eq!(Segment::text("[x]").to_cq_code(), "&#91;x&#93;");
        assert_eq!(
            Segment::image("http://example.com/1.jpg", "1.jpg").to_cq_code(),
            "[CQ:image,file=http://example.com/1.jpg,summary=1.jpg]"
        );
    }

    #[test]
    fn test_mention_code() {
        assert_eq!(mention_code("10001000"), "[CQ:at,qq=10001000]");
        assert_eq!(mention_code("a,b"), "[CQ:at,qq=a&#44;b]");
    }

    #[test]
    fn test_cq_escaping() {
        assert_eq!(escape_cq_text("Hello [World]"), "Hello &#91;World&#93;");
        assert_eq!(escape_cq_text("A & B"), "A &amp; B");
        assert_eq!(escape_cq_value("a,b,c"), "a&#44;b&#44;c");
    }
}
