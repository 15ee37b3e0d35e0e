//! OneBot v11 data model.

pub mod api;
pub mod event;
pub mod message;
pub mod segment;
pub mod types;
