//! Notion REST API port.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::Error;
use crate::record::{PageRequest, RecordId};

/// Boxed future type alias used by [`NotionApi`] to keep the trait dyn-compatible.
pub type NotionFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// The three Notion endpoints the catalog client relies on.
///
/// Implementations must send the bearer token and the pinned API version,
/// and must surface the server's error message untouched.
pub trait NotionApi: Send + Sync {
    /// Queries a database and returns every result page as raw JSON.
    ///
    /// `query` is the request body (filters and sorts).
    fn query_database<'a>(&'a self, database_id: &'a str, query: &'a Value)
        -> NotionFuture<'a, Vec<Value>>;

    /// Retrieves a database's schema as raw JSON.
    fn retrieve_database<'a>(&'a self, database_id: &'a str) -> NotionFuture<'a, Value>;

    /// Creates a page (record) and returns its id.
    fn create_page<'a>(&'a self, request: &'a PageRequest) -> NotionFuture<'a, RecordId>;
}
