//! Octopus HTTP client for API interactions

use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::config::api;
use crate::error::{OctopusError, Result};
use crate::octopus::traits::PaginatedResponse;

/// Error body returned by Octopus on a failed request
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

/// Octopus Deploy API client
///
/// Configuration is fixed at construction; every call borrows the client
/// immutably, so one instance can be shared by reference.
pub struct OctopusClient {
    client: Client,
    api_key: String,
    server: String,
    space_id: Option<String>,
    base_url: Url,
}

impl OctopusClient {
    /// Create a new client for the given server, optionally scoped to a space
    pub fn new(server: &str, api_key: String, space_id: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        let base_url = Self::build_base_url(server, space_id.as_deref())?;
        debug!("Octopus API base URL: {}", base_url);

        Ok(Self {
            client,
            api_key,
            server: server.trim_end_matches('/').to_string(),
            space_id,
            base_url,
        })
    }

    fn build_base_url(server: &str, space_id: Option<&str>) -> Result<Url> {
        let server = server.trim().trim_end_matches('/');
        if server.is_empty() {
            return Err(OctopusError::Config("Server URL is empty".to_string()));
        }

        let mut base = if server.contains("://") {
            server.to_string()
        } else {
            format!("https://{}", server)
        };
        base.push_str(api::BASE_PATH);
        if let Some(space) = space_id.filter(|s| !s.is_empty()) {
            base.push_str(space);
            base.push('/');
        }

        Url::parse(&base)
            .map_err(|e| OctopusError::Config(format!("Invalid server URL '{}': {}", server, e)))
    }

    /// Server this client talks to
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Space the client is scoped to, if any
    pub fn space_id(&self) -> Option<&str> {
        self.space_id.as_deref()
    }

    /// Base URL every relative path is resolved against
    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path or link to a full URL
    ///
    /// Relative paths land under the API base, rooted links (`/api/...`) under
    /// the server origin, and absolute URLs are kept as they are.
    pub(crate) fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| OctopusError::Config(format!("Invalid API path '{}': {}", path, e)))
    }

    /// Add standard headers to a request builder
    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(api::API_KEY_HEADER, &self.api_key)
            .header("Accept", "application/json")
    }

    /// Create a GET request builder with standard headers
    pub(crate) fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.with_headers(self.client.get(url))
    }

    /// Create a POST request builder with standard headers
    pub(crate) fn post(&self, url: Url) -> reqwest::RequestBuilder {
        self.with_headers(self.client.post(url))
    }

    /// Create a PUT request builder with standard headers
    pub(crate) fn put(&self, url: Url) -> reqwest::RequestBuilder {
        self.with_headers(self.client.put(url))
    }

    /// Create a DELETE request builder with standard headers
    pub(crate) fn delete(&self, url: Url) -> reqwest::RequestBuilder {
        self.with_headers(self.client.delete(url))
    }

    /// Decode a response whose status must equal `expected`
    ///
    /// Any other status is turned into `OctopusError::Api`, using the
    /// server's error body when it decodes.
    pub(crate) async fn receive<T>(
        &self,
        response: reqwest::Response,
        path: &str,
        expected: StatusCode,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if response.status() != expected {
            return Err(Self::api_error(response, path, expected).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            OctopusError::Json(format!("Failed to parse response from '{}': {}", path, e))
        })
    }

    async fn api_error(
        response: reqwest::Response,
        path: &str,
        expected: StatusCode,
    ) -> OctopusError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();

        let message = parsed.error_message.unwrap_or_else(|| {
            format!(
                "expected status {}, server responded {}",
                expected.as_u16(),
                status
            )
        });

        debug!("API error on '{}': {} ({})", path, status, message);

        OctopusError::Api {
            status: status.as_u16(),
            path: path.to_string(),
            message,
            errors: parsed.errors,
        }
    }

    /// GET a single resource; the server must answer 200
    pub(crate) async fn get_resource<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        debug!("GET {}", url);
        let response = self.get(url).send().await?;
        self.receive(response, path, StatusCode::OK).await
    }

    /// POST a new resource; the server must answer 201
    pub(crate) async fn create_resource<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        debug!("POST {}", url);
        let response = self.post(url).json(body).send().await?;
        self.receive(response, path, StatusCode::CREATED).await
    }

    /// PUT a full replacement of a resource; the server must answer 200
    pub(crate) async fn update_resource<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        debug!("PUT {}", url);
        let response = self.put(url).json(body).send().await?;
        self.receive(response, path, StatusCode::OK).await
    }

    /// DELETE a resource; the server must answer 200 and the body is ignored
    pub(crate) async fn delete_resource(&self, path: &str) -> Result<()> {
        let url = self.resolve(path)?;
        debug!("DELETE {}", url);
        let response = self.delete(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(Self::api_error(response, path, StatusCode::OK).await);
        }
        Ok(())
    }

    /// Fetch every page of a collection by following `Page.Next` links
    ///
    /// Pages are requested one after another because each page names its
    /// successor. Items keep page order and within-page order. Any failing
    /// page aborts the loop and the partial result is dropped. A link that
    /// was already fetched in this loop is reported as a pagination error.
    ///
    /// # Type Parameters
    /// * `T` - The item type (e.g., DeploymentProcess, Feed)
    /// * `R` - The page envelope type that implements PaginatedResponse<T>
    pub async fn fetch_all_pages<T, R>(&self, path: &str, error_context: &str) -> Result<Vec<T>>
    where
        R: DeserializeOwned + PaginatedResponse<T>,
    {
        let mut all_items: Vec<T> = Vec::new();
        let mut visited: HashSet<Url> = HashSet::new();
        let mut current = path.to_string();
        let mut page_num: u32 = 1;

        loop {
            let url = self.resolve(&current)?;
            if !visited.insert(url.clone()) {
                return Err(OctopusError::Pagination(format!(
                    "{}: page link '{}' was already fetched",
                    error_context, current
                )));
            }

            debug!("Fetching page {} of {} from: {}", page_num, error_context, url);

            let response = self.get(url).send().await?;
            let page: R = self.receive(response, &current, StatusCode::OK).await?;

            let next = page.next_link().map(str::to_string);
            let items = page.into_items();
            debug!("Page {} returned {} items", page_num, items.len());
            all_items.extend(items);

            match next {
                Some(link) => {
                    current = link;
                    page_num += 1;
                }
                None => break,
            }
        }

        debug!(
            "Fetched {} total items for {} across {} page(s)",
            all_items.len(),
            error_context,
            page_num
        );
        Ok(all_items)
    }
}

/// Reject empty identifiers before they reach the wire
pub(crate) fn require_id(operation: &str, parameter: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(OctopusError::invalid_parameter(operation, parameter));
    }
    Ok(())
}

/// Build `<collection>/<id>` with the ID escaped as a single path segment
pub(crate) fn resource_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, urlencoding::encode(id))
}

#[cfg(test)]
impl OctopusClient {
    /// Create a test client pointing at a mock server
    pub fn test_client(base_url: &str) -> Self {
        Self::new(base_url, "API-TESTKEY".to_string(), None)
            .expect("mock server URL should be valid")
    }
}


#[cfg(test)]
mod pagination_tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::octopus::traits::PagedResults;

    #[derive(Deserialize, Debug, Clone)]
    #[serde(rename_all = "PascalCase")]
    struct TestItem {
        id: String,
        name: String,
    }

    fn test_item_json(id: &str, name: &str) -> serde_json::Value {
        serde_json::json!({ "Id": id, "Name": name })
    }

    fn page_json(items: Vec<serde_json::Value>, next: &str) -> serde_json::Value {
        serde_json::json!({
            "ItemType": "TestItem",
            "Items": items,
            "Links": { "Page.Next": next }
        })
    }

    #[tokio::test]
    async fn test_fetch_all_pages_single_page() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/test-items"))
            .and(header("X-Octopus-ApiKey", "API-TESTKEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![
                    test_item_json("item-1", "Item 1"),
                    test_item_json("item-2", "Item 2"),
                ],
                "",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>("test-items", "test items")
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Item 1");
        assert_eq!(items[1].name, "Item 2");
    }

    #[tokio::test]
    async fn test_fetch_all_pages_follows_next_link_in_order() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/test-items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![
                    test_item_json("item-1", "Item 1"),
                    test_item_json("item-2", "Item 2"),
                ],
                "p2",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/p2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_json(vec![test_item_json("item-3", "Item 3")], "")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>("test-items", "test items")
            .await
            .unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item-1", "item-2", "item-3"]);
    }

    #[tokio::test]
    async fn test_fetch_all_pages_rooted_next_links() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        for (skip, next, id) in [
            ("0", "/api/test-items?skip=1&take=1", "item-1"),
            ("1", "/api/test-items?skip=2&take=1", "item-2"),
            ("2", "", "item-3"),
        ] {
            Mock::given(method("GET"))
                .and(path("/api/test-items"))
                .and(query_param("skip", skip))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(page_json(vec![test_item_json(id, id)], next)),
                )
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let items = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>(
                "test-items?skip=0&take=1",
                "test items",
            )
            .await
            .unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item-1", "item-2", "item-3"]);
    }

    #[tokio::test]
    async fn test_fetch_all_pages_error_on_subsequent_page_discards_partial() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/test-items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![test_item_json("item-1", "Item 1")],
                "/api/test-items-page-2",
            )))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/test-items-page-2"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "ErrorMessage": "Something went wrong",
                "Errors": ["boom"]
            })))
            .mount(&mock_server)
            .await;

        let result = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>("test-items", "test items")
            .await;

        match result {
            Err(OctopusError::Api {
                status,
                path,
                message,
                errors,
            }) => {
                assert_eq!(status, 500);
                assert_eq!(path, "/api/test-items-page-2");
                assert_eq!(message, "Something went wrong");
                assert_eq!(errors, vec!["boom".to_string()]);
            }
            other => panic!("Expected OctopusError::Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_pages_error_on_first_page() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/test-items"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let result = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>("test-items", "test items")
            .await;

        match result.unwrap_err() {
            OctopusError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 403);
                assert!(message.contains("expected status 200"));
            }
            other => panic!("Expected OctopusError::Api, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_pages_detects_revisited_link() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/test-items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
                vec![test_item_json("item-1", "Item 1")],
                "/api/test-items",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>("test-items", "test items")
            .await;

        assert!(matches!(result, Err(OctopusError::Pagination(_))));
    }

    #[tokio::test]
    async fn test_fetch_all_pages_empty_result() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/test-items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], "")))
            .mount(&mock_server)
            .await;

        let items = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>("test-items", "test items")
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_pages_malformed_body() {
        let mock_server = MockServer::start().await;
        let client = OctopusClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/test-items"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result = client
            .fetch_all_pages::<TestItem, PagedResults<TestItem>>("test-items", "test items")
            .await;
        assert!(matches!(result, Err(OctopusError::Json(_))));
    }
}
