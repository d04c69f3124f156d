//! In-memory stand-in for the Notion API.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Value};

use crate::error::Error;
use crate::ports::{NotionApi, NotionFuture};
use crate::record::{PageRequest, RecordId};

/// A result page titled `title` under the `title_property` column.
#[must_use]
pub fn page(id: &str, title_property: &str, title: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            title_property: { "title": [{ "plain_text": title }] },
        },
    })
}

/// A database schema declaring select properties with the given option names.
#[must_use]
pub fn select_schema(properties: &[(&str, &[&str])]) -> Value {
    let properties: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, options)| {
            let options: Vec<Value> = options.iter().map(|o| json!({ "name": o })).collect();
            ((*name).to_string(), json!({ "type": "select", "select": { "options": options } }))
        })
        .collect();
    json!({ "object": "database", "properties": properties })
}

#[derive(Default)]
struct State {
    pages: HashMap<String, Vec<Value>>,
    schemas: HashMap<String, Value>,
    failing: HashSet<String>,
    failing_creates: HashSet<String>,
    queries: HashMap<String, Value>,
    calls: Vec<String>,
    created: Vec<PageRequest>,
}

/// Serves seeded pages and schemas and records every call.
///
/// Queries ignore filters and return every page seeded for the database.
/// Created pages get ids `page-1`, `page-2`, and so on.
#[derive(Clone, Default)]
pub struct FakeNotion {
    state: Arc<Mutex<State>>,
}

impl FakeNotion {
    /// Seeds the query results of `database_id`.
    #[must_use]
    pub fn with_pages(self, database_id: &str, pages: Vec<Value>) -> Self {
        self.state().pages.insert(database_id.to_string(), pages);
        self
    }

    /// Seeds the schema returned for `database_id`.
    #[must_use]
    pub fn with_schema(self, database_id: &str, schema: Value) -> Self {
        self.state().schemas.insert(database_id.to_string(), schema);
        self
    }

    /// Makes queries and schema lookups on `database_id` fail.
    #[must_use]
    pub fn fail_database(self, database_id: &str) -> Self {
        self.state().failing.insert(database_id.to_string());
        self
    }

    /// Makes page creation in `database_id` fail.
    #[must_use]
    pub fn fail_create_in(self, database_id: &str) -> Self {
        self.state().failing_creates.insert(database_id.to_string());
        self
    }

    /// Every call so far, as `"<method> <database>"`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// The body of the most recent query against `database_id`.
    #[must_use]
    pub fn last_query(&self, database_id: &str) -> Option<Value> {
        self.state().queries.get(database_id).cloned()
    }

    /// Successfully created pages, in order.
    #[must_use]
    pub fn created(&self) -> Vec<PageRequest> {
        self.state().created.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unavailable(database_id: &str) -> Error {
    Error::remote(503, Some(format!("Database {database_id} is unavailable.")))
}

impl NotionApi for FakeNotion {
    fn query_database<'a>(
        &'a self,
        database_id: &'a str,
        query: &'a Value,
    ) -> NotionFuture<'a, Vec<Value>> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(format!("query {database_id}"));
            if state.failing.contains(database_id) {
                return Err(unavailable(database_id));
            }
            state.queries.insert(database_id.to_string(), query.clone());
            Ok(state.pages.get(database_id).cloned().unwrap_or_default())
        })
    }

    fn retrieve_database<'a>(&'a self, database_id: &'a str) -> NotionFuture<'a, Value> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(format!("retrieve {database_id}"));
            if state.failing.contains(database_id) {
                return Err(unavailable(database_id));
            }
            state.schemas.get(database_id).cloned().ok_or_else(|| {
                Error::remote(404, Some(format!("Could not find database with ID: {database_id}.")))
            })
        })
    }

    fn create_page<'a>(&'a self, request: &'a PageRequest) -> NotionFuture<'a, RecordId> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(format!("create {}", request.database_id));
            if state.failing_creates.contains(&request.database_id) {
                return Err(Error::remote(400, Some("body failed validation.".to_string())));
            }
            state.created.push(request.clone());
            Ok(RecordId::from(format!("page-{}", state.created.len())))
        })
    }
}
