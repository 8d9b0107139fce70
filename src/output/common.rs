//! Common utilities for output formatters

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Escape a value for CSV output
/// Handles commas, quotes, and newlines according to RFC 4180
pub fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render an Octopus timestamp as `YYYY-MM-DD HH:MM` in UTC
///
/// Values that do not parse are shown as they came.
pub fn format_timestamp(raw: Option<&str>) -> String {
    match raw {
        None => String::new(),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| {
                dt.with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|_| value.to_string()),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

pub fn print_yaml<T: Serialize + ?Sized>(value: &T) {
    match serde_yml::to_string(value) {
        Ok(yaml) => print!("{}", yaml),
        Err(e) => eprintln!("Failed to render YAML: {}", e),
    }
}
