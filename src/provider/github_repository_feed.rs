//! `octopusdeploy_github_repository_feed` resource

use log::info;

use crate::error::{OctopusError, Result};
use crate::octopus::feeds::GITHUB_FEED_TYPE;
use crate::octopus::{Feed, OctopusClient, SensitiveValue};

use super::attributes::ResourceData;

pub const TYPE_NAME: &str = "octopusdeploy_github_repository_feed";

pub fn expand_github_repository_feed(data: &ResourceData) -> Result<Feed> {
    let attrs = data.reader();

    let mut feed = Feed::new_github(
        &attrs.required_string("name")?,
        &attrs.required_string("feed_uri")?,
    );
    feed.id = data.id().to_string();
    if let Some(attempts) = attrs.int("download_attempts")? {
        feed.download_attempts = attempts;
    }
    if let Some(backoff) = attrs.int("download_retry_backoff_seconds")? {
        feed.download_retry_backoff_seconds = backoff;
    }
    feed.username = attrs.string("username")?;
    feed.password = attrs
        .string("password")?
        .map(|p| SensitiveValue::new(&p));

    Ok(feed)
}

/// `password` is write-only and keeps whatever the state already holds
pub fn flatten_github_repository_feed(feed: &Feed, data: &mut ResourceData) {
    data.set("name", feed.name.as_str());
    data.set("feed_uri", feed.feed_uri());
    data.set("download_attempts", feed.download_attempts);
    data.set(
        "download_retry_backoff_seconds",
        feed.download_retry_backoff_seconds,
    );
    data.set("username", feed.username.clone());
    data.set_id(feed.id.as_str());
}

pub async fn create(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let mut feed = expand_github_repository_feed(data)?;
    feed.id.clear();
    info!("Creating GitHub repository feed '{}'", feed.name);

    let created = client.add_feed(&feed).await?;
    flatten_github_repository_feed(&created, data);
    info!("GitHub repository feed created ({})", data.id());
    Ok(())
}

pub async fn read(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    match client.get_feed(data.id()).await {
        Ok(feed) if feed.feed_type != GITHUB_FEED_TYPE => Err(OctopusError::Validation(format!(
            "feed {} is a {} feed, not {}",
            feed.id, feed.feed_type, GITHUB_FEED_TYPE
        ))),
        Ok(feed) => {
            flatten_github_repository_feed(&feed, data);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            info!("GitHub repository feed ({}) not found; removing from state", data.id());
            data.clear_id();
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub async fn update(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    let feed = expand_github_repository_feed(data)?;
    info!("Updating GitHub repository feed ({})", feed.id);

    let updated = client.update_feed(&feed).await?;
    flatten_github_repository_feed(&updated, data);
    Ok(())
}

pub async fn delete(client: &OctopusClient, data: &mut ResourceData) -> Result<()> {
    info!("Deleting GitHub repository feed ({})", data.id());
    match client.delete_feed(data.id()).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }
    data.clear_id();
    Ok(())
}
