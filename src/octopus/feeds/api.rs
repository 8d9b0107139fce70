//! Feed API operations

use log::debug;

use crate::config::api;
use crate::error::{OctopusError, Result};
use crate::octopus::client::{require_id, resource_path};
use crate::octopus::traits::{OctopusResource, PagedResults};
use crate::octopus::OctopusClient;

use super::models::Feed;

impl OctopusClient {
    /// Get a feed by ID
    pub async fn get_feed(&self, feed_id: &str) -> Result<Feed> {
        require_id("get_feed", "feed_id", feed_id)?;
        let path = resource_path(api::FEEDS, feed_id);
        self.get_resource(&path).await
    }

    /// Get all feeds (with pagination)
    pub async fn get_feeds(&self) -> Result<Vec<Feed>> {
        self.fetch_all_pages::<Feed, PagedResults<Feed>>(api::FEEDS, "feeds")
            .await
    }

    /// Find a feed by ID or exact name
    ///
    /// Names are matched against the full feed list, so this costs one
    /// request per page.
    pub async fn find_feed(&self, id_or_name: &str) -> Result<Option<Feed>> {
        debug!("Looking up feed '{}'", id_or_name);
        let feeds = self.get_feeds().await?;
        Ok(feeds.into_iter().find(|f| f.matches(id_or_name)))
    }

    /// Create a feed; the server assigns the ID
    pub async fn add_feed(&self, feed: &Feed) -> Result<Feed> {
        if !feed.id.is_empty() {
            return Err(OctopusError::invalid_parameter("add_feed", "feed.id"));
        }
        debug!("Creating {} feed '{}'", feed.feed_type, feed.name);
        self.create_resource(api::FEEDS, feed).await
    }

    /// Replace an existing feed
    pub async fn update_feed(&self, feed: &Feed) -> Result<Feed> {
        require_id("update_feed", "feed.id", &feed.id)?;
        let path = resource_path(api::FEEDS, &feed.id);
        self.update_resource(&path, feed).await
    }

    /// Delete a feed by ID
    pub async fn delete_feed(&self, feed_id: &str) -> Result<()> {
        require_id("delete_feed", "feed_id", feed_id)?;
        let path = resource_path(api::FEEDS, feed_id);
        self.delete_resource(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_json(id: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "Id": id,
            "Name": name,
            "FeedType": "GitHub",
            "FeedUri": "https://api.github.com",
            "DownloadAttempts": 5,
            "DownloadRetryBackoffSeconds": 10
        })
    }

    #[tokio::test]
    async fn test_get_feed_returns_requested_id() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/feeds/Feeds-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(feed_json("Feeds-1", "github")))
            .mount(&mock_server)
            .await;

        let feed = client.get_feed("Feeds-1").await.unwrap();
        assert_eq!(feed.id, "Feeds-1");
    }

    #[tokio::test]
    async fn test_get_feeds_and_find_by_name() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/feeds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Items": [feed_json("Feeds-1", "github"), feed_json("Feeds-2", "mirror")],
                "Links": {}
            })))
            .mount(&mock_server)
            .await;

        let feeds = client.get_feeds().await.unwrap();
        assert_eq!(feeds.len(), 2);

        let found = client.find_feed("mirror").await.unwrap().unwrap();
        assert_eq!(found.id, "Feeds-2");
        assert!(client.find_feed("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_feed() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("POST"))
            .and(path("/api/feeds"))
            .and(body_partial_json(serde_json::json!({
                "Name": "github",
                "FeedType": "GitHub"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(feed_json("Feeds-9", "github")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let created = client
            .add_feed(&Feed::new_github("github", "https://api.github.com"))
            .await
            .unwrap();
        assert_eq!(created.id, "Feeds-9");
    }

    #[tokio::test]
    async fn test_update_and_delete_feed() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("PUT"))
            .and(path("/api/feeds/Feeds-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(feed_json("Feeds-1", "renamed")))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/feeds/Feeds-1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut feed = Feed::new_github("renamed", "https://api.github.com");
        feed.id = "Feeds-1".to_string();
        let updated = client.update_feed(&feed).await.unwrap();
        assert_eq!(updated.name, "renamed");

        client.delete_feed("Feeds-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_feed_without_id() {
        let client = OctopusClient::test_client("http://127.0.0.1:1");
        let feed = Feed::new_github("github", "https://api.github.com");
        let err = client.update_feed(&feed).await.unwrap_err();
        assert!(matches!(err, OctopusError::InvalidParameter { .. }));
    }
}
