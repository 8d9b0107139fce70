//! Feed module

mod api;
mod commands;
mod models;

pub use commands::run_feed_command;
pub use models::{Feed, GITHUB_FEED_TYPE};
