//! `mailtask cache` commands.

use crate::cache::CatalogCache;
use crate::context::ServiceContext;

/// Deletes the cached catalog and project lists.
///
/// # Errors
///
/// Never fails; storage errors are logged by the cache.
pub fn clear(ctx: &ServiceContext) -> Result<(), String> {
    CatalogCache::new(ctx).clear();
    println!("Cache cleared.");
    Ok(())
}
