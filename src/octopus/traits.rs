//! Common traits for Octopus resources

use serde::Deserialize;
use std::collections::HashMap;

use crate::config::api;

/// Common trait for named Octopus resources (accounts, feeds, tenants, projects)
///
/// This trait provides a unified interface for resource identification
/// and matching, which is useful for lookups by either ID or name.
pub trait OctopusResource {
    /// Get the resource ID
    fn id(&self) -> &str;

    /// Get the human-readable name
    fn name(&self) -> &str;

    /// Check if the resource matches by name or ID
    ///
    /// Default implementation checks for exact match on either field.
    fn matches(&self, input: &str) -> bool {
        self.id() == input || self.name() == input
    }
}

/// Trait for API responses that carry one page of a collection
///
/// Implement this trait for any envelope type to enable use with
/// `OctopusClient::fetch_all_pages()`.
pub trait PaginatedResponse<T> {
    /// Consume self and return the page items
    fn into_items(self) -> Vec<T>;
    /// Link to the next page, if the server returned a non-empty one
    fn next_link(&self) -> Option<&str>;
}

/// Generic page envelope for Octopus collection endpoints
///
/// Octopus wraps every collection in the same shape: `Items` plus paging
/// counters and a `Links` map whose `Page.Next` entry names the next page.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct PagedResults<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub items_per_page: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u32>,
    #[serde(default)]
    pub number_of_pages: Option<u32>,
    #[serde(default)]
    pub last_page_number: Option<u32>,
    #[serde(default)]
    pub links: HashMap<String, String>,
}

impl<T> PaginatedResponse<T> for PagedResults<T> {
    fn into_items(self) -> Vec<T> {
        self.items
    }

    fn next_link(&self) -> Option<&str> {
        self.links
            .get(api::PAGE_NEXT_LINK)
            .map(String::as_str)
            .filter(|link| !link.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        id: String,
        name: String,
    }

    impl OctopusResource for TestResource {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn resource() -> TestResource {
        TestResource {
            id: "Feeds-1".to_string(),
            name: "github".to_string(),
        }
    }

    #[test]
    fn test_matches_by_id() {
        assert!(resource().matches("Feeds-1"));
    }

    #[test]
    fn test_matches_by_name() {
        assert!(resource().matches("github"));
    }

    #[test]
    fn test_no_match() {
        assert!(!resource().matches("other"));
    }

    #[test]
    fn test_paged_results_next_link() {
        let page: PagedResults<serde_json::Value> = serde_json::from_value(serde_json::json!({
            "ItemType": "DeploymentProcess",
            "TotalResults": 5,
            "ItemsPerPage": 2,
            "NumberOfPages": 3,
            "LastPageNumber": 2,
            "Items": [{"Id": "a"}, {"Id": "b"}],
            "Links": {
                "Self": "/api/deploymentprocesses?skip=0&take=2",
                "Page.Next": "/api/deploymentprocesses?skip=2&take=2"
            }
        }))
        .unwrap();

        assert_eq!(
            page.next_link(),
            Some("/api/deploymentprocesses?skip=2&take=2")
        );
        assert_eq!(page.total_results, Some(5));
        assert_eq!(page.into_items().len(), 2);
    }

    #[test]
    fn test_paged_results_empty_next_link_is_last_page() {
        let page: PagedResults<serde_json::Value> = serde_json::from_value(serde_json::json!({
            "Items": [],
            "Links": {"Page.Next": ""}
        }))
        .unwrap();
        assert!(page.next_link().is_none());
    }

    #[test]
    fn test_paged_results_without_links() {
        let page: PagedResults<serde_json::Value> =
            serde_json::from_value(serde_json::json!({"Items": [{"Id": "a"}]})).unwrap();
        assert!(page.next_link().is_none());
        assert!(page.item_type.is_none());
        assert_eq!(page.into_items().len(), 1);
    }
}
