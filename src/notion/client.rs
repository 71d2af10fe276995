//! Minimal client for the Notion database query API.
//!
//! One request per build, no pagination and no retries. The integration
//! token is attached as a bearer header and never logged.

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use super::types::{ApiErrorBody, DatabaseQuery, QueryResponse, QueryResult};
use super::{NotionError, PageSource};
use crate::config::NotionConfig;

const SNIPPET_LEN: usize = 200;

/// Client bound to one database
#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    base: Url,
    token: String,
    database_id: String,
    version: String,
    published_property: String,
}

impl NotionClient {
    /// Build a client from configuration. Fails before any request when the
    /// token or database id is missing.
    pub fn new(config: &NotionConfig) -> Result<Self, NotionError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| NotionError::Config(format!("http client: {}", e)))?;

        Self::with_http(config, http)
    }

    /// Build a client around an existing `reqwest::Client`
    pub fn with_http(config: &NotionConfig, http: Client) -> Result<Self, NotionError> {
        if config.token.trim().is_empty() {
            return Err(NotionError::Config(format!(
                "missing integration token (set notion.token or {})",
                crate::config::TOKEN_ENV
            )));
        }
        if config.database_id.trim().is_empty() {
            return Err(NotionError::Config(format!(
                "missing database id (set notion.database_id or {})",
                crate::config::DATABASE_ID_ENV
            )));
        }

        // A trailing slash keeps any path prefix of the base URL on join.
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base = Url::parse(&base)
            .map_err(|e| NotionError::Config(format!("invalid base_url: {}", e)))?;

        Ok(Self {
            http,
            base,
            token: config.token.trim().to_string(),
            database_id: config.database_id.trim().to_string(),
            version: config.version.clone(),
            published_property: config.properties.published.clone(),
        })
    }

    /// Endpoint of the database query
    pub fn query_url(&self) -> Result<Url, NotionError> {
        self.base
            .join(&format!("v1/databases/{}/query", self.database_id))
            .map_err(|e| NotionError::Config(format!("invalid database id: {}", e)))
    }

    /// Run one query and return the first page of results
    pub async fn query_database(&self, query: &DatabaseQuery) -> Result<QueryResponse, NotionError> {
        let url = self.query_url()?;
        tracing::debug!(target: "notion", url = %url, "querying database");

        let started = std::time::Instant::now();
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .json(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            target: "notion",
            status = %status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query finished"
        );

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(err) => (err.code, err.message),
                Err(_) => (String::new(), snippet(&body)),
            };
            return Err(NotionError::Api {
                status,
                code,
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| NotionError::Decode(e.to_string(), snippet(&body)))
    }
}

#[async_trait]
impl PageSource for NotionClient {
    async fn fetch_published(&self) -> Result<Vec<QueryResult>, NotionError> {
        let query = DatabaseQuery::published(&self.published_property);
        let response = self.query_database(&query).await?;

        if response.has_more {
            tracing::warn!(
                target: "notion",
                next_cursor = response.next_cursor.as_deref().unwrap_or(""),
                "more entries are available; only the first page is used"
            );
        }
        tracing::info!("Fetched {} records from Notion", response.results.len());

        Ok(response.results)
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> NotionConfig {
        let mut config = NotionConfig::default();
        config.token = "secret_abc".to_string();
        config.database_id = "db123".to_string();
        config
    }

    #[test]
    fn test_query_url() {
        let client = NotionClient::new(&config()).unwrap();
        assert_eq!(
            client.query_url().unwrap().as_str(),
            "https://api.notion.com/v1/databases/db123/query"
        );
    }

    #[test]
    fn test_query_url_keeps_base_path() {
        let mut config = config();
        config.base_url = "http://127.0.0.1:8080/proxy".to_string();
        let client = NotionClient::new(&config).unwrap();
        assert_eq!(
            client.query_url().unwrap().as_str(),
            "http://127.0.0.1:8080/proxy/v1/databases/db123/query"
        );
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let mut config = config();
        config.token = String::new();
        let err = NotionClient::new(&config).err().unwrap();
        assert!(matches!(err, NotionError::Config(_)));
        assert!(err.to_string().contains("NOTION_TOKEN"));
    }

    #[test]
    fn test_missing_database_id_is_config_error() {
        let mut config = config();
        config.database_id = "  ".to_string();
        let err = NotionClient::new(&config).err().unwrap();
        assert!(err.to_string().contains("NOTION_DATABASE_ID"));
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let body = "あ".repeat(300);
        assert_eq!(snippet(&body).chars().count(), SNIPPET_LEN);
    }

    fn mock_client(server: &MockServer) -> NotionClient {
        let mut config = config();
        config.base_url = server.uri();
        let http = Client::builder().no_proxy().build().unwrap();
        NotionClient::with_http(&config, http).unwrap()
    }

    fn query_mock() -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path("/v1/databases/db123/query"))
            .and(header("authorization", "Bearer secret_abc"))
            .and(header("notion-version", "2022-06-28"))
            .and(body_json(json!({
                "filter": { "property": "Published", "checkbox": { "equals": true } },
                "sorts": [{ "timestamp": "created_time", "direction": "descending" }]
            })))
    }

    #[tokio::test]
    async fn test_fetch_published_sends_query() {
        let server = MockServer::start().await;
        query_mock()
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "results": [
                    {
                        "object": "page",
                        "id": "p1",
                        "created_time": "2024-01-01T00:00:00.000Z",
                        "last_edited_time": "2024-01-02T00:00:00.000Z",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Hello" }] }
                        }
                    },
                    { "object": "database", "id": "d1" }
                ],
                "has_more": false,
                "next_cursor": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = mock_client(&server).fetch_published().await.unwrap();

        assert_eq!(results.len(), 2);
        let QueryResult::Page(page) = &results[0] else {
            panic!("expected a page");
        };
        assert_eq!(page.id, "p1");
        assert_eq!(results[1], QueryResult::Other);
    }

    #[tokio::test]
    async fn test_fetch_published_keeps_first_page_only() {
        let server = MockServer::start().await;
        query_mock()
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "object": "page", "id": "p1" }],
                "has_more": true,
                "next_cursor": "cursor-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = mock_client(&server).fetch_published().await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let server = MockServer::start().await;
        query_mock()
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "object": "error",
                "status": 401,
                "code": "unauthorized",
                "message": "API token is invalid."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = mock_client(&server).fetch_published().await.unwrap_err();
        match err {
            NotionError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(code, "unauthorized");
                assert_eq!(message, "API token is invalid.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = mock_client(&server).fetch_published().await.unwrap_err();
        match err {
            NotionError::Api { status, message, .. } => {
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"results\": [oops"))
            .mount(&server)
            .await;

        let err = mock_client(&server).fetch_published().await.unwrap_err();
        match err {
            NotionError::Decode(_, body) => assert!(body.contains("oops")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_body_without_results_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = mock_client(&server).fetch_published().await.unwrap_err();
        assert!(matches!(err, NotionError::Decode(..)));
    }
}
