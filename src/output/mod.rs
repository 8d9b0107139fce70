//! Output formatting module
//!
//! Handles the table, CSV, JSON and YAML renderings of API entities.

mod common;
mod feeds;
mod processes;

pub use common::{escape_csv, format_timestamp, print_json, print_yaml};
pub use feeds::output_feeds;
pub use processes::output_processes;
