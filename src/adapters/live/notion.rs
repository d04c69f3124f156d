//! Live adapter for the `NotionApi` port over the Notion REST API.

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ports::{NotionApi, NotionFuture};
use crate::record::{PageRequest, RecordId};

/// Default API root.
pub const NOTION_API_URL: &str = "https://api.notion.com/v1";
/// Pinned `Notion-Version` header value.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion client authenticated with an integration token.
///
/// The token is checked on every call so a client can be built before
/// settings are complete; calls without one fail before any I/O.
pub struct LiveNotionClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl LiveNotionClient {
    /// Creates a client against [`NOTION_API_URL`].
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { client: Client::new(), token, base_url: NOTION_API_URL.to_string() }
    }

    /// Points the client at another API root (a proxy or a test server).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(Error::Configuration { setting: "notion_token" })?;
        Ok(builder.bearer_auth(token).header("Notion-Version", NOTION_VERSION))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value> {
        let response = self
            .authorized(builder)?
            .send()
            .await
            .map_err(|e| Error::Remote { status: None, message: format!("Notion request failed: {e}") })?;
        decode(response).await
    }
}

/// Error body returned by Notion on non-success statuses.
#[derive(Deserialize)]
struct NotionError {
    message: Option<String>,
}

/// One page of `POST /databases/{id}/query` results.
#[derive(Deserialize)]
struct QueryPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

async fn decode(response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await.map_err(|e| Error::Remote {
        status: Some(status.as_u16()),
        message: format!("Failed to read Notion response: {e}"),
    })?;

    if !status.is_success() {
        let message = serde_json::from_str::<NotionError>(&text).ok().and_then(|e| e.message);
        return Err(Error::remote(status.as_u16(), message));
    }

    serde_json::from_str(&text)
        .map_err(|e| Error::Decode { what: "Notion response", message: e.to_string() })
}

impl NotionApi for LiveNotionClient {
    fn query_database<'a>(
        &'a self,
        database_id: &'a str,
        query: &'a Value,
    ) -> NotionFuture<'a, Vec<Value>> {
        Box::pin(async move {
            let url = format!("{}/databases/{database_id}/query", self.base_url);
            let mut results = Vec::new();
            let mut cursor: Option<String> = None;

            loop {
                let mut body = query.clone();
                if let (Some(cursor), Some(map)) = (&cursor, body.as_object_mut()) {
                    map.insert("start_cursor".to_string(), Value::String(cursor.clone()));
                }
                let page: QueryPage =
                    serde_json::from_value(self.send(self.client.post(&url).json(&body)).await?)
                        .map_err(|e| Error::Decode { what: "query result", message: e.to_string() })?;
                results.extend(page.results);

                match page.next_cursor {
                    Some(next) if page.has_more => cursor = Some(next),
                    _ => break,
                }
            }

            debug!(database = database_id, count = results.len(), "Queried database");
            Ok(results)
        })
    }

    fn retrieve_database<'a>(&'a self, database_id: &'a str) -> NotionFuture<'a, Value> {
        Box::pin(async move {
            let url = format!("{}/databases/{database_id}", self.base_url);
            self.send(self.client.get(&url)).await
        })
    }

    fn create_page<'a>(&'a self, request: &'a PageRequest) -> NotionFuture<'a, RecordId> {
        Box::pin(async move {
            let url = format!("{}/pages", self.base_url);
            let page = self.send(self.client.post(&url).json(&request.to_json())).await?;
            page["id"].as_str().map(RecordId::from).ok_or_else(|| Error::Decode {
                what: "created page",
                message: "response has no id".to_string(),
            })
        })
    }
}
