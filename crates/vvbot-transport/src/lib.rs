//! # vvbot Transport
//!
//! Network transport layer for vvbot.
//!
//! ## Features
//!
//! - `http-server` (default): webhook listener that receives gateway events
//! - `http-client` (default): JSON API client for outbound gateway calls
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  OneBot layer       │  (event decode, send_group_msg)
//! ├─────────────────────┤
//! │  vvbot-transport    │  <- This crate
//! ├─────────────────────┤
//! │  Network (TCP/HTTP) │
//! └─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vvbot_transport::http::{WebhookHandler, http_listen};
//!
//! let handle = http_listen("0.0.0.0:8080", "/", handler).await?;
//! // ... later
//! handle.stop();
//! ```

pub mod error;
pub mod handle;

#[cfg(any(feature = "http-client", feature = "http-server"))]
pub mod http;

pub use error::{TransportError, TransportResult};
pub use handle::ListenerHandle;
