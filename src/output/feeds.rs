//! Feed output formatter

use comfy_table::{presets::NOTHING, Table};
use serde::Serialize;

use super::common::{escape_csv, print_json, print_yaml};
use crate::cli::OutputFormat;
use crate::octopus::Feed;

/// Serializable feed for structured output (JSON/YAML)
///
/// Credentials are left out.
#[derive(Serialize)]
struct SerializableFeed {
    id: String,
    name: String,
    feed_type: String,
    feed_uri: String,
    download_attempts: i64,
    download_retry_backoff_seconds: i64,
    username: Option<String>,
    has_password: bool,
}

impl From<&Feed> for SerializableFeed {
    fn from(feed: &Feed) -> Self {
        Self {
            id: feed.id.clone(),
            name: feed.name.clone(),
            feed_type: feed.feed_type.clone(),
            feed_uri: feed.feed_uri().to_string(),
            download_attempts: feed.download_attempts,
            download_retry_backoff_seconds: feed.download_retry_backoff_seconds,
            username: feed.username.clone(),
            has_password: feed.password.as_ref().is_some_and(|p| p.has_value),
        }
    }
}

/// Output feeds in the specified format
pub fn output_feeds(feeds: &[Feed], format: OutputFormat, no_header: bool) {
    match format {
        OutputFormat::Table => output_table(feeds, no_header),
        OutputFormat::Csv => output_csv(feeds, no_header),
        OutputFormat::Json => print_json(&serializable(feeds)),
        OutputFormat::Yaml => print_yaml(&serializable(feeds)),
    }
}

fn serializable(feeds: &[Feed]) -> Vec<SerializableFeed> {
    feeds.iter().map(SerializableFeed::from).collect()
}

fn output_table(feeds: &[Feed], no_header: bool) {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    if !no_header {
        table.set_header(vec!["ID", "NAME", "TYPE", "URI", "ATTEMPTS", "BACKOFF"]);
    }

    for feed in feeds {
        table.add_row(vec![
            feed.id.as_str(),
            feed.name.as_str(),
            feed.feed_type.as_str(),
            feed.feed_uri(),
            &feed.download_attempts.to_string(),
            &format!("{}s", feed.download_retry_backoff_seconds),
        ]);
    }

    println!("{table}");
}

fn output_csv(feeds: &[Feed], no_header: bool) {
    if !no_header {
        println!("ID,NAME,TYPE,URI,ATTEMPTS,BACKOFF_SECONDS");
    }
    for feed in feeds {
        println!(
            "{},{},{},{},{},{}",
            escape_csv(&feed.id),
            escape_csv(&feed.name),
            escape_csv(&feed.feed_type),
            escape_csv(feed.feed_uri()),
            feed.download_attempts,
            feed.download_retry_backoff_seconds
        );
    }
}
