//! vvbot: answers `@bot vv <keywords>` in QQ groups with a matching
//! 张维为 quote picture.
//!
//! The gateway (NapCat) posts every group message to the webhook served by
//! [`vvbot_runtime::VvRuntime`]. [`EventHandler`] decodes it and spawns the
//! [`Router`], which queries the [`SearchClient`] and replies through
//! [`vvbot_onebot::OneBotBot`].

pub mod handler;
pub mod help;
pub mod router;
pub mod search;

pub use handler::EventHandler;
pub use help::HELP_MESSAGE;
pub use router::{GroupSender, Router, TRIGGER, extract_keyword};
pub use search::{ImageSearch, SearchClient, SearchOutcome, SearchResponse};
