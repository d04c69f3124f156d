//! `mailtask projects` command.

use super::catalog::rows;
use super::{ensure_configured, print_table};
use crate::catalog::CachedCatalog;
use crate::context::ServiceContext;

/// Prints the projects of `system`.
///
/// # Errors
///
/// Returns an error string if settings are incomplete or the lookup fails.
pub async fn run(ctx: &ServiceContext, system: &str) -> Result<(), String> {
    ensure_configured(ctx)?;
    let projects =
        CachedCatalog::new(ctx).projects_for_system(system).await.map_err(|e| e.to_string())?;

    if projects.is_empty() {
        println!("No projects found for system {system}.");
        return Ok(());
    }
    print_table(&["ID", "PROJECT"], &rows(&projects));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{sample_settings, FakeNotion};

    #[tokio::test]
    async fn lookup_errors_are_reported() {
        let mut ctx = ServiceContext::in_memory();
        ctx.notion = Box::new(FakeNotion::default().fail_database("db-projects"));
        ctx.settings = sample_settings();

        let err = run(&ctx, "s1").await.unwrap_err();
        assert_eq!(err, "Database db-projects is unavailable.");
    }

    #[tokio::test]
    async fn no_projects_is_not_an_error() {
        let mut ctx = ServiceContext::in_memory();
        ctx.settings = sample_settings();
        assert!(run(&ctx, "s1").await.is_ok());
    }
}
