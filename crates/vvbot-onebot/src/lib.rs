//! OneBot v11 protocol support for vvbot.
//!
//! This crate covers the small slice of OneBot v11 that the relay needs:
//!
//! - **Inbound**: [`GroupMessageEvent`] decoded from webhook bodies.
//! - **Outbound**: [`OneBotBot::send_group_msg`] over the gateway's HTTP API.
//! - **Messages**: [`Segment`] (text and image) and [`OneBotMessage`].

pub mod api_caller;
pub mod bot;
pub mod caption;
pub mod error;
pub mod model;

pub use api_caller::{ApiCaller, HttpApiCaller};
pub use bot::OneBotBot;
pub use caption::{DEFAULT_IMAGE_SUMMARY, image_summary};
pub use error::{ApiError, ApiResult};
pub use model::api::{ApiResponse, SendGroupMsgParams, SendMsgResponse};
pub use model::event::GroupMessageEvent;
pub use model::message::OneBotMessage;
pub use model::segment::{ImageData, Segment, TextData, mention_code};
pub use model::types::Sender;
