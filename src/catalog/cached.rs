//! Cache-first catalog access.

use tracing::debug;

use super::{Catalog, CatalogClient, Choice};
use crate::cache::{CacheUpdate, CatalogCache};
use crate::context::ServiceContext;
use crate::error::Result;

/// Serves catalog lists from the local cache, falling back to Notion and
/// writing what it fetched back into the cache.
pub struct CachedCatalog<'a> {
    client: CatalogClient<'a>,
    cache: CatalogCache<'a>,
}

impl<'a> CachedCatalog<'a> {
    /// Creates a cached catalog over the context's ports.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { client: CatalogClient::new(ctx), cache: CatalogCache::new(ctx) }
    }

    /// Returns systems, types and themes.
    ///
    /// Serves a fresh cache entry unless `force_refresh` is set; otherwise
    /// loads from Notion and caches the result.
    ///
    /// # Errors
    ///
    /// Returns the error of the remote load. The cache is left untouched.
    pub async fn load(&self, force_refresh: bool) -> Result<Catalog> {
        if !force_refresh {
            if let Some(catalog) = self.cache.get().and_then(|entry| entry.catalog()) {
                debug!("Serving catalog from cache");
                return Ok(catalog);
            }
        }
        let catalog = self.client.load_all().await?;
        self.cache.update(CacheUpdate::catalog(&catalog));
        Ok(catalog)
    }

    /// Returns the projects of `system_key`.
    ///
    /// An empty key yields an empty list without touching the cache or Notion.
    ///
    /// # Errors
    ///
    /// Returns the error of the remote lookup on a cache miss.
    pub async fn projects_for_system(&self, system_key: &str) -> Result<Vec<Choice>> {
        if system_key.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(projects) =
            self.cache.get().and_then(|mut entry| entry.projects_by_system.remove(system_key))
        {
            debug!(system = system_key, "Serving projects from cache");
            return Ok(projects);
        }
        let projects = self.client.list_projects_for_system(system_key).await?;
        self.cache.update(CacheUpdate::projects(system_key, projects.clone()));
        Ok(projects)
    }
}
