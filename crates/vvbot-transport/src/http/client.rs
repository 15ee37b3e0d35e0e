//! HTTP API client.
//!
//! OneBot v11 HTTP API calls are `POST {api_url}/{action}` with the action
//! parameters as the JSON body. [`http_post_json`] captures the base URL and
//! token once and hands back a closure that the protocol layer calls per
//! action.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{TransportError, TransportResult};

/// Transport-supplied closure: captures URL + auth, accepts an action name
/// and its JSON body, resolves to the decoded JSON response.
pub type PostJsonFn =
    Arc<dyn Fn(&str, Value) -> BoxFuture<'static, TransportResult<Value>> + Send + Sync>;

/// HTTP client configuration (for API calls).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the HTTP API, e.g. `http://127.0.0.1:3000`.
    pub api_url: String,
    /// Bearer token; `None` omits the `Authorization` header. An empty token
    /// is still sent as `Bearer `.
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpClientConfig {
    /// Creates a config with the default 30 second timeout and no token.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bearer token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builds a pooled [`Client`] with the given timeout.
pub fn http_client(timeout: Duration) -> TransportResult<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .build()
        .map_err(|e| TransportError::InvalidConfig(e.to_string()))
}

/// Creates the [`PostJsonFn`] for an HTTP API endpoint.
pub fn http_post_json(config: HttpClientConfig) -> TransportResult<PostJsonFn> {
    info!(url = %config.api_url, "Registering HTTP API client");

    let client = http_client(config.timeout)?;
    let base_url = config.api_url.trim_end_matches('/').to_string();
    let access_token = config.access_token;

    let post_json: PostJsonFn = Arc::new(move |action: &str, body: Value| {
        let client = client.clone();
        let url = format!("{}/{}", base_url, action.trim_start_matches('/'));
        let token = access_token.clone();
        async move {
            let mut req = client.post(&url).json(&body);
            if let Some(t) = &token {
                req = req.bearer_auth(t);
            }
            let resp = req.send().await.map_err(|e| TransportError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;

            let status = resp.status();
            if status != StatusCode::OK {
                let text = resp.text().await.unwrap_or_default();
                return Err(TransportError::Status {
                    url,
                    status: status.as_u16(),
                    body: text,
                });
            }

            let bytes = resp.bytes().await.map_err(|e| TransportError::RequestFailed {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            debug!(url = %url, len = bytes.len(), "HTTP API response received");

            // Some gateways answer 200 with an empty body.
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
                url,
                reason: e.to_string(),
            })
        }
        .boxed()
    });

    Ok(post_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_json_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send_group_msg"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({"group_id": 1})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "retcode": 0, "data": {"message_id": 7}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let post = http_post_json(HttpClientConfig::new(server.uri()).with_access_token("secret"))
            .unwrap();
        let resp = post("send_group_msg", json!({"group_id": 1})).await.unwrap();
        assert_eq!(resp["data"]["message_id"], 7);
    }

    #[tokio::test]
    async fn test_empty_token_still_sends_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let post =
            http_post_json(HttpClientConfig::new(format!("{}/", server.uri())).with_access_token(""))
                .unwrap();
        let resp = post("/ping", json!({})).await.unwrap();
        assert!(resp.is_null());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/ping");
        let auth = requests[0].headers.get("authorization").unwrap();
        assert_eq!(auth.to_str().unwrap().trim_end(), "Bearer");
    }

    #[tokio::test]
    async fn test_no_token_omits_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let post = http_post_json(HttpClientConfig::new(server.uri())).unwrap();
        post("ping", json!({})).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_non_200_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let post = http_post_json(HttpClientConfig::new(server.uri())).unwrap();
        let err = post("send_group_msg", json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 202, .. }));
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let post = http_post_json(HttpClientConfig::new(server.uri())).unwrap();
        let err = post("send_group_msg", json!({})).await.unwrap_err();
        match err {
            TransportError::Status { status, body, .. } => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let post = http_post_json(HttpClientConfig::new(server.uri())).unwrap();
        let err = post("send_group_msg", json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }
}
