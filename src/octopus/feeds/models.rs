//! Feed data models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::octopus::models::SensitiveValue;
use crate::octopus::traits::OctopusResource;

/// Feed type for GitHub repository feeds
pub const GITHUB_FEED_TYPE: &str = "GitHub";

/// Package feed data from the Octopus API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Feed {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub feed_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_uri: Option<String>,
    #[serde(default)]
    pub download_attempts: i64,
    #[serde(default)]
    pub download_retry_backoff_seconds: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SensitiveValue>,
    #[serde(default)]
    pub package_acquisition_location_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: HashMap<String, String>,
}

impl Feed {
    /// New GitHub repository feed pointing at `feed_uri`
    pub fn new_github(name: &str, feed_uri: &str) -> Self {
        Self {
            name: name.to_string(),
            feed_type: GITHUB_FEED_TYPE.to_string(),
            feed_uri: Some(feed_uri.to_string()),
            download_attempts: 5,
            download_retry_backoff_seconds: 10,
            ..Default::default()
        }
    }

    pub fn feed_uri(&self) -> &str {
        self.feed_uri.as_deref().unwrap_or("")
    }
}

impl OctopusResource for Feed {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_github_feed() {
        let feed = Feed::new_github("github", "https://api.github.com");
        assert_eq!(feed.feed_type, "GitHub");
        assert_eq!(feed.feed_uri(), "https://api.github.com");
        assert_eq!(feed.download_attempts, 5);
        assert_eq!(feed.download_retry_backoff_seconds, 10);
    }

    #[test]
    fn test_feed_deserialization() {
        let json = r#"{
            "Id": "Feeds-3",
            "Name": "github",
            "FeedType": "GitHub",
            "FeedUri": "https://api.github.com",
            "DownloadAttempts": 3,
            "DownloadRetryBackoffSeconds": 20,
            "Username": "octocat",
            "Password": {"HasValue": true, "NewValue": null},
            "PackageAcquisitionLocationOptions": ["Server", "ExecutionTarget"]
        }"#;

        let feed: Feed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.id(), "Feeds-3");
        assert_eq!(feed.username.as_deref(), Some("octocat"));
        assert_eq!(feed.package_acquisition_location_options.len(), 2);
        assert!(feed.password.unwrap().has_value);
    }

    #[test]
    fn test_builtin_feed_without_uri() {
        let feed: Feed = serde_json::from_str(
            r#"{"Id": "feeds-builtin", "Name": "Octopus Server (built-in)", "FeedType": "BuiltIn"}"#,
        )
        .unwrap();
        assert_eq!(feed.feed_uri(), "");
        assert!(feed.matches("feeds-builtin"));
    }
}
