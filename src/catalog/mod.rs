//! Catalog of selectable options sourced from the Notion databases.
//!
//! [`CatalogClient`] talks to Notion directly; [`CachedCatalog`] puts the
//! local cache in front of it.

mod cached;
mod client;

use serde::{Deserialize, Serialize};

pub use cached::CachedCatalog;
pub use client::{CatalogClient, DatabaseCheck};

/// A normalized selectable entry (system, type, theme or project).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Stable key: a page id for systems and projects, the option name otherwise.
    pub key: String,
    /// Human-readable label.
    pub label: String,
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into() }
    }
}

/// The three lists loaded together when the task form opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Systems, sorted by label.
    pub systems: Vec<Choice>,
    /// Task types, in schema order.
    pub types: Vec<Choice>,
    /// Task themes, in schema order.
    pub themes: Vec<Choice>,
}
