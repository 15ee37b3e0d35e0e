//! Decides what, if anything, to reply to a group message.
//!
//! ```text
//! raw_message
//! ├── no [CQ:at,qq=<bot>]           → ignore
//! ├── mention, no "vv "             → help
//! └── mention, "vv <keyword>"
//!     ├── search hit                → image
//!     └── empty keyword or no hit   → help
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use vvbot_onebot::{GroupMessageEvent, OneBotBot, mention_code};

use crate::help::HELP_MESSAGE;
use crate::search::{ImageSearch, SearchOutcome};

/// Marker that introduces the search keyword.
pub const TRIGGER: &str = "vv ";

/// Outbound side of the router.
///
/// Sends are fire-and-forget: implementations log failures themselves.
#[async_trait]
pub trait GroupSender: Send + Sync {
    async fn send_text(&self, group_id: i64, text: &str);
    async fn send_image(&self, group_id: i64, url: &str);
}

#[async_trait]
impl GroupSender for OneBotBot {
    async fn send_text(&self, group_id: i64, text: &str) {
        OneBotBot::send_text(self, group_id, text).await;
    }

    async fn send_image(&self, group_id: i64, url: &str) {
        OneBotBot::send_image(self, group_id, url).await;
    }
}

/// Returns the trimmed text after the first [`TRIGGER`], if there is one.
pub fn extract_keyword(raw_message: &str) -> Option<&str> {
    raw_message
        .find(TRIGGER)
        .map(|i| raw_message[i + TRIGGER.len()..].trim())
}

/// Message router.
pub struct Router {
    mention: String,
    search: Arc<dyn ImageSearch>,
    sender: Arc<dyn GroupSender>,
}

impl Router {
    /// Creates a router answering mentions of `bot_qq`.
    pub fn new(bot_qq: &str, search: Arc<dyn ImageSearch>, sender: Arc<dyn GroupSender>) -> Self {
        Self {
            mention: mention_code(bot_qq),
            search,
            sender,
        }
    }

    /// The literal mention token this router reacts to.
    pub fn mention(&self) -> &str {
        &self.mention
    }

    /// Handles one event. Sends at most one reply.
    #[instrument(
        name = "route",
        skip_all,
        fields(group_id = event.group_id, user_id = event.user_id)
    )]
    pub async fn route(&self, event: &GroupMessageEvent) {
        if !event.is_actionable() {
            return;
        }

        let raw = event.raw_message.as_str();
        if !raw.contains(&self.mention) {
            return;
        }

        let Some(keyword) = extract_keyword(raw) else {
            debug!("Mentioned without a query, sending help");
            self.sender.send_text(event.group_id, HELP_MESSAGE).await;
            return;
        };

        let outcome = if keyword.is_empty() {
            SearchOutcome::NotFound
        } else {
            self.search.search(keyword).await
        };

        match outcome {
            SearchOutcome::Found(url) => {
                debug!(keyword = %keyword, url = %url, "Replying with image");
                self.sender.send_image(event.group_id, &url).await;
            }
            SearchOutcome::NotFound if raw.contains(TRIGGER) => {
                debug!(keyword = %keyword, "Nothing found, sending help");
                self.sender.send_text(event.group_id, HELP_MESSAGE).await;
            }
            SearchOutcome::NotFound => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const BOT: &str = "10000";

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Text(i64, String),
        Image(i64, String),
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Sent>>);

    impl Recorder {
        fn sent(&self) -> Vec<Sent> {
            self.0.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GroupSender for Recorder {
        async fn send_text(&self, group_id: i64, text: &str) {
            self.0.lock().unwrap().push(Sent::Text(group_id, text.to_string()));
        }

        async fn send_image(&self, group_id: i64, url: &str) {
            self.0.lock().unwrap().push(Sent::Image(group_id, url.to_string()));
        }
    }

    struct StubSearch {
        outcome: SearchOutcome,
        queries: Mutex<Vec<String>>,
    }

    impl StubSearch {
        fn new(outcome: SearchOutcome) -> Self {
            Self {
                outcome,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageSearch for StubSearch {
        async fn search(&self, keyword: &str) -> SearchOutcome {
            self.queries.lock().unwrap().push(keyword.to_string());
            self.outcome.clone()
        }
    }

    fn setup(outcome: SearchOutcome) -> (Router, Arc<StubSearch>, Arc<Recorder>) {
        let search = Arc::new(StubSearch::new(outcome));
        let sender = Arc::new(Recorder::default());
        let router = Router::new(BOT, search.clone(), sender.clone());
        (router, search, sender)
    }

    fn found() -> SearchOutcome {
        SearchOutcome::Found("https://x/y/img.png".to_string())
    }

    fn event(group_id: i64, raw: &str) -> GroupMessageEvent {
        serde_json::from_value(serde_json::json!({
            "group_id": group_id,
            "user_id": 42,
            "raw_message": raw,
        }))
        .unwrap()
    }

    #[test]
    fn test_extract_keyword() {
        assert_eq!(extract_keyword("vv cute cat"), Some("cute cat"));
        assert_eq!(extract_keyword("[CQ:at,qq=1] vv  cat  "), Some("cat"));
        assert_eq!(extract_keyword("a vv b vv c"), Some("b vv c"));
        assert_eq!(extract_keyword("vv "), Some(""));
        assert_eq!(extract_keyword("vv"), None);
        assert_eq!(extract_keyword("hello"), None);
    }

    #[test]
    fn test_mention_token() {
        let (router, _, _) = setup(found());
        assert_eq!(router.mention(), "[CQ:at,qq=10000]");
    }

    #[tokio::test]
    async fn test_zero_group_is_ignored() {
        let (router, search, sender) = setup(found());
        router.route(&event(0, "[CQ:at,qq=10000] vv cat")).await;
        assert!(sender.sent().is_empty());
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_is_ignored() {
        let (router, search, sender) = setup(found());
        router.route(&event(123, "")).await;
        assert!(sender.sent().is_empty());
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_without_mention_is_ignored() {
        let (router, search, sender) = setup(found());
        router.route(&event(123, "vv cat")).await;
        router.route(&event(123, "[CQ:at,qq=99999] vv cat")).await;
        assert!(sender.sent().is_empty());
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_mention_without_trigger_sends_help() {
        let (router, search, sender) = setup(found());
        router.route(&event(123, "[CQ:at,qq=10000] hello")).await;
        assert_eq!(sender.sent(), vec![Sent::Text(123, HELP_MESSAGE.to_string())]);
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_without_space_sends_help() {
        let (router, search, sender) = setup(found());
        router.route(&event(123, "[CQ:at,qq=10000] vv")).await;
        assert_eq!(sender.sent(), vec![Sent::Text(123, HELP_MESSAGE.to_string())]);
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_hit_sends_image() {
        let (router, search, sender) = setup(found());
        router.route(&event(123, "[CQ:at,qq=10000] vv cute cat")).await;
        assert_eq!(search.queries(), vec!["cute cat".to_string()]);
        assert_eq!(
            sender.sent(),
            vec![Sent::Image(123, "https://x/y/img.png".to_string())]
        );
    }

    #[tokio::test]
    async fn test_miss_sends_help() {
        let (router, search, sender) = setup(SearchOutcome::NotFound);
        router.route(&event(123, "[CQ:at,qq=10000] vv nothing")).await;
        assert_eq!(search.queries(), vec!["nothing".to_string()]);
        assert_eq!(sender.sent(), vec![Sent::Text(123, HELP_MESSAGE.to_string())]);
    }

    #[tokio::test]
    async fn test_empty_keyword_skips_search() {
        let (router, search, sender) = setup(found());
        router.route(&event(123, "[CQ:at,qq=10000] vv   ")).await;
        assert!(search.queries().is_empty());
        assert_eq!(sender.sent(), vec![Sent::Text(123, HELP_MESSAGE.to_string())]);
    }

    #[tokio::test]
    async fn test_only_first_trigger_matters() {
        let (router, search, _) = setup(found());
        router
            .route(&event(123, "prefix vv first vv second [CQ:at,qq=10000]"))
            .await;
        assert_eq!(
            search.queries(),
            vec!["first vv second [CQ:at,qq=10000]".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mention_may_follow_trigger() {
        let (router, search, sender) = setup(found());
        router.route(&event(7, "vv cat [CQ:at,qq=10000]")).await;
        assert_eq!(search.queries(), vec!["cat [CQ:at,qq=10000]".to_string()]);
        assert_eq!(sender.sent().len(), 1);
    }
}
