//! Transport-specific [`ApiCaller`] implementations for OneBot v11.
//!
//! [`OneBotBot`](crate::bot::OneBotBot) holds an `Arc<dyn ApiCaller>` and is
//! unaware of which transport carries the call. Only the HTTP API is wired
//! up: each call is `POST {api_url}/{action}` with the params as body.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use vvbot_transport::http::PostJsonFn;

use crate::error::ApiResult;

/// Transport-specific API call mechanism.
#[async_trait]
pub trait ApiCaller: Send + Sync {
    /// Makes an API call and returns the raw response body.
    ///
    /// # Arguments
    /// * `action` – Protocol action name (e.g. `"send_group_msg"`).
    /// * `params` – JSON parameters for the action.
    async fn call(&self, action: &str, params: Value) -> ApiResult<Value>;
}

/// [`ApiCaller`] for the HTTP client transport.
///
/// Delegates every call to the `post_json` closure supplied by the transport
/// layer. The closure already encapsulates the target URL and any
/// authentication, so `HttpApiCaller` itself is stateless apart from the fn.
pub struct HttpApiCaller {
    post_json: PostJsonFn,
}

impl HttpApiCaller {
    /// Creates a new `HttpApiCaller`.
    pub fn new(post_json: PostJsonFn) -> Self {
        Self { post_json }
    }
}

#[async_trait]
impl ApiCaller for HttpApiCaller {
    async fn call(&self, action: &str, params: Value) -> ApiResult<Value> {
        debug!(action = %action, "Calling OneBot API via HTTP");
        Ok((self.post_json)(action, params).await?)
    }
}
