//! OneBot v11 bot handle.
//!
//! [`OneBotBot`] is the outbound side of the gateway: it turns typed calls
//! into OneBot HTTP API requests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vvbot_onebot::OneBotBot;
//! use vvbot_transport::http::HttpClientConfig;
//!
//! let bot = OneBotBot::from_http(
//!     HttpClientConfig::new("http://127.0.0.1:3000").with_access_token("token"),
//! )?;
//! bot.send_text(123456, "Hello!").await;
//! ```

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use vvbot_transport::TransportResult;
use vvbot_transport::http::{HttpClientConfig, http_post_json};

use crate::api_caller::{ApiCaller, HttpApiCaller};
use crate::caption::image_summary;
use crate::error::ApiResult;
use crate::model::api::{ApiResponse, SendGroupMsgParams, SendMsgResponse};
use crate::model::message::OneBotMessage;
use crate::model::segment::Segment;

/// A OneBot v11 bot connected through an [`ApiCaller`].
#[derive(Clone)]
pub struct OneBotBot {
    caller: Arc<dyn ApiCaller>,
}

impl OneBotBot {
    /// Creates a bot over an existing caller.
    pub fn new(caller: Arc<dyn ApiCaller>) -> Self {
        Self { caller }
    }

    /// Creates a bot that talks to the gateway's HTTP API.
    pub fn from_http(config: HttpClientConfig) -> TransportResult<Self> {
        let post_json = http_post_json(config)?;
        Ok(Self::new(Arc::new(HttpApiCaller::new(post_json))))
    }

    /// Makes a raw API call.
    ///
    /// If the gateway answers with a OneBot envelope, a `failed` status is
    /// turned into an error and the `data` payload is returned.
    pub async fn call_api(&self, action: &str, params: Value) -> ApiResult<Value> {
        let response = self.caller.call(action, params).await?;
        if response.get("status").is_none() {
            return Ok(response);
        }
        let envelope: ApiResponse<Value> = serde_json::from_value(response)?;
        Ok(envelope.into_result()?.unwrap_or(Value::Null))
    }

    /// Sends a message to a group and returns the gateway's message ID
    /// (0 when the gateway does not report one).
    pub async fn send_group_msg(
        &self,
        group_id: i64,
        message: impl Into<OneBotMessage>,
    ) -> ApiResult<i64> {
        let message = message.into();
        debug!(group_id = group_id, message = %message.to_cq_string(), "Sending group message");

        let params = serde_json::to_value(SendGroupMsgParams { group_id, message })?;
        let data = self.call_api("send_group_msg", params).await?;

        let message_id = serde_json::from_value::<SendMsgResponse>(data)
            .map(|r| r.message_id)
            .unwrap_or_default();
        Ok(message_id)
    }

    /// Sends a message and logs the outcome instead of returning it.
    pub async fn send_group_msg_logged(&self, group_id: i64, message: impl Into<OneBotMessage>) {
        match self.send_group_msg(group_id, message).await {
            Ok(message_id) => {
                info!(group_id = group_id, message_id = message_id, "Successfully sent message to group");
            }
            Err(e) => {
                warn!(group_id = group_id, error = %e, "Failed to send message to group");
            }
        }
    }

    /// Sends a plain text message. Failures are logged and swallowed.
    pub async fn send_text(&self, group_id: i64, text: &str) {
        self.send_group_msg_logged(group_id, Segment::text(text))
            .await;
    }

    /// Sends an image by URL. Failures are logged and swallowed.
    ///
    /// The gateway fetches the image itself; the caption is derived from the
    /// URL with [`image_summary`].
    pub async fn send_image(&self, group_id: i64, url: &str) {
        self.send_group_msg_logged(group_id, Segment::image(url, image_summary(url)))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bot_for(server: &MockServer, token: &str) -> OneBotBot {
        OneBotBot::from_http(HttpClientConfig::new(server.uri()).with_access_token(token)).unwrap()
    }

    #[tokio::test]
    async fn test_send_group_msg() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send_group_msg"))
            .and(header("authorization", "Bearer tok"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "group_id": 42,
                "message": [{"type": "text", "data": {"text": "hi"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok", "retcode": 0, "data": {"message_id": 1234}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let bot = bot_for(&server, "tok");
        let id = bot.send_group_msg(42, "hi").await.unwrap();
        assert_eq!(id, 1234);
    }

    #[tokio::test]
    async fn test_send_image_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send_group_msg"))
            .and(body_json(json!({
                "group_id": 7,
                "message": [{
                    "type": "image",
                    "data": {"file": "https://x/y/img.png", "summary": "img.png"}
                }]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        bot_for(&server, "tok").send_image(7, "https://x/y/img.png").await;
    }

    #[tokio::test]
    async fn test_failed_envelope_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "failed", "retcode": 100, "data": null, "message": "bad group"
            })))
            .mount(&server)
            .await;

        let err = bot_for(&server, "tok")
            .send_group_msg(1, "hi")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("bad group"));
    }

    #[tokio::test]
    async fn test_send_text_swallows_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        // Must not panic or surface anything.
        bot_for(&server, "tok").send_text(1, "hi").await;
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_swallowed() {
        let bot = OneBotBot::from_http(HttpClientConfig::new("http://127.0.0.1:1")).unwrap();
        bot.send_text(1, "hi").await;
        assert!(bot.send_group_msg(1, "hi").await.is_err());
    }
}
