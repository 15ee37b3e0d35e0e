//! Webhook entry point: decodes gateway posts and hands them to the router.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use vvbot_onebot::{GroupMessageEvent, OneBotBot};
use vvbot_runtime::VvConfig;
use vvbot_transport::TransportResult;
use vvbot_transport::http::WebhookHandler;

use crate::router::Router;
use crate::search::SearchClient;

/// Decodes each webhook body and routes it on a detached task.
pub struct EventHandler {
    router: Arc<Router>,
}

impl EventHandler {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }

    /// Wires the router to the real search API and gateway.
    pub fn from_config(config: &VvConfig) -> TransportResult<Self> {
        let search = Arc::new(SearchClient::from_config(&config.search)?);
        let bot = Arc::new(OneBotBot::from_http(config.napcat.to_client_config())?);
        Ok(Self::new(Arc::new(Router::new(&config.bot.qq, search, bot))))
    }
}

#[async_trait]
impl WebhookHandler for EventHandler {
    async fn on_message(&self, data: &[u8]) {
        let event = match GroupMessageEvent::parse(data) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    error = %e,
                    body = %String::from_utf8_lossy(data),
                    "Failed to decode gateway event"
                );
                return;
            }
        };

        if !event.is_actionable() {
            debug!(
                post_type = %event.post_type,
                group_id = event.group_id,
                "Dropping event without group or text"
            );
            return;
        }

        info!(
            group_id = event.group_id,
            user_id = event.user_id,
            sender = %event.sender.display_name(),
            message = %event.raw_message,
            "Group message received"
        );

        let router = Arc::clone(&self.router);
        tokio::spawn(async move {
            router.route(&event).await;
        });
    }
}
