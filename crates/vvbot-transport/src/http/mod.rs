//! HTTP transport.
//!
//! This module provides the webhook server and the JSON API client.

#[cfg(feature = "http-client")]
mod client;
#[cfg(feature = "http-client")]
pub use client::{HttpClientConfig, PostJsonFn, http_client, http_post_json};

#[cfg(feature = "http-server")]
mod server;
#[cfg(feature = "http-server")]
pub use server::{WebhookHandler, http_listen};
