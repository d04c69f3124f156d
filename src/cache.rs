//! Time-boxed local cache for catalog lists.
//!
//! A single entry is stored as JSON in the [`CACHE_SLOT`] slot. Reads
//! enforce the TTL and delete stale entries; storage and decode failures
//! degrade to "no cache" instead of surfacing.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Choice};
use crate::context::ServiceContext;
use crate::ports::{Clock, KeyValueStore, CACHE_SLOT};

/// Maximum age of a cache entry before it is treated as absent.
pub const DEFAULT_TTL: Duration = Duration::hours(1);

/// The cached catalog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Systems, sorted by label.
    #[serde(default)]
    pub systems: Vec<Choice>,
    /// Task types, in schema order.
    #[serde(default)]
    pub types: Vec<Choice>,
    /// Task themes, in schema order.
    #[serde(default)]
    pub themes: Vec<Choice>,
    /// Projects per system key.
    #[serde(default)]
    pub projects_by_system: BTreeMap<String, Vec<Choice>>,
    /// When the entry was last written.
    pub last_updated: DateTime<Utc>,
}

impl CacheEntry {
    fn empty(now: DateTime<Utc>) -> Self {
        Self {
            systems: Vec::new(),
            types: Vec::new(),
            themes: Vec::new(),
            projects_by_system: BTreeMap::new(),
            last_updated: now,
        }
    }

    /// Returns the cached catalog, if the entry holds one.
    ///
    /// An entry written only with project lists has no systems and does
    /// not count as a cached catalog.
    #[must_use]
    pub fn catalog(&self) -> Option<Catalog> {
        if self.systems.is_empty() {
            return None;
        }
        Some(Catalog {
            systems: self.systems.clone(),
            types: self.types.clone(),
            themes: self.themes.clone(),
        })
    }
}

/// A partial cache write.
///
/// Present list fields replace the stored ones. Project lists are merged
/// per system key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheUpdate {
    /// Replacement systems list.
    pub systems: Option<Vec<Choice>>,
    /// Replacement types list.
    pub types: Option<Vec<Choice>>,
    /// Replacement themes list.
    pub themes: Option<Vec<Choice>>,
    /// Project lists to merge in by system key.
    pub projects_by_system: BTreeMap<String, Vec<Choice>>,
}

impl CacheUpdate {
    /// An update replacing the three catalog lists.
    #[must_use]
    pub fn catalog(catalog: &Catalog) -> Self {
        Self {
            systems: Some(catalog.systems.clone()),
            types: Some(catalog.types.clone()),
            themes: Some(catalog.themes.clone()),
            projects_by_system: BTreeMap::new(),
        }
    }

    /// An update storing the project list of one system.
    #[must_use]
    pub fn projects(system_key: &str, projects: Vec<Choice>) -> Self {
        let mut projects_by_system = BTreeMap::new();
        projects_by_system.insert(system_key.to_string(), projects);
        Self { projects_by_system, ..Self::default() }
    }
}

/// Reads and writes the catalog cache entry.
pub struct CatalogCache<'a> {
    storage: &'a dyn KeyValueStore,
    clock: &'a dyn Clock,
    ttl: Duration,
}

impl<'a> CatalogCache<'a> {
    /// Creates a cache over the context's storage and clock with [`DEFAULT_TTL`].
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { storage: ctx.storage.as_ref(), clock: ctx.clock.as_ref(), ttl: DEFAULT_TTL }
    }

    /// Overrides the time-to-live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the stored entry if it exists and is younger than the TTL.
    ///
    /// A stale entry is removed as a side effect.
    #[must_use]
    pub fn get(&self) -> Option<CacheEntry> {
        let raw = match self.storage.get(CACHE_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read catalog cache");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Discarding undecodable catalog cache");
                return None;
            }
        };

        let age = self.clock.now() - entry.last_updated;
        if age > self.ttl {
            debug!(age_secs = age.num_seconds(), "Catalog cache expired");
            self.clear();
            return None;
        }

        Some(entry)
    }

    /// Merges `update` into the current entry (or a fresh one) and persists it.
    ///
    /// Write failures are logged and dropped.
    pub fn update(&self, update: CacheUpdate) {
        let now = self.clock.now();
        let mut entry = self.get().unwrap_or_else(|| CacheEntry::empty(now));

        if let Some(systems) = update.systems {
            entry.systems = systems;
        }
        if let Some(types) = update.types {
            entry.types = types;
        }
        if let Some(themes) = update.themes {
            entry.themes = themes;
        }
        entry.projects_by_system.extend(update.projects_by_system);
        entry.last_updated = now;

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode catalog cache");
                return;
            }
        };
        if let Err(e) = self.storage.set(CACHE_SLOT, &json) {
            warn!(error = %e, "Failed to write catalog cache");
        }
    }

    /// Removes the stored entry.
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(CACHE_SLOT) {
            warn!(error = %e, "Failed to clear catalog cache");
        }
    }
}
