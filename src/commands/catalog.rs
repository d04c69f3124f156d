//! `mailtask catalog` command.

use super::{ensure_configured, print_table};
use crate::catalog::{CachedCatalog, Choice};
use crate::context::ServiceContext;

/// Prints systems, task types and themes.
///
/// # Errors
///
/// Returns an error string if settings are incomplete or the catalog cannot be loaded.
pub async fn run(ctx: &ServiceContext, refresh: bool) -> Result<(), String> {
    ensure_configured(ctx)?;
    let catalog = CachedCatalog::new(ctx).load(refresh).await.map_err(|e| e.to_string())?;

    println!("Systems");
    print_table(&["ID", "NAME"], &rows(&catalog.systems));
    println!("\nTypes: {}", labels(&catalog.types));
    println!("Themes: {}", labels(&catalog.themes));
    Ok(())
}

pub(super) fn rows(choices: &[Choice]) -> Vec<Vec<String>> {
    choices.iter().map(|c| vec![c.key.clone(), c.label.clone()]).collect()
}

fn labels(choices: &[Choice]) -> String {
    if choices.is_empty() {
        return "(none)".to_string();
    }
    choices.iter().map(|c| c.label.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::notion::{page, select_schema};
    use crate::adapters::memory::{sample_settings, FakeNotion};

    #[tokio::test]
    async fn unconfigured_catalog_fails_with_hint() {
        let ctx = ServiceContext::in_memory();
        let err = run(&ctx, false).await.unwrap_err();
        assert!(err.contains("mailtask config set"));
    }

    #[tokio::test]
    async fn configured_catalog_loads() {
        let notion = FakeNotion::default()
            .with_pages("db-systems", vec![page("s1", "Sistema", "CRM")])
            .with_schema("db-planning", select_schema(&[("Tipo", &["A"]), ("Tema", &["B"])]));
        let mut ctx = ServiceContext::in_memory();
        ctx.notion = Box::new(notion);
        ctx.settings = sample_settings();

        assert!(run(&ctx, false).await.is_ok());
    }

    #[test]
    fn empty_lists_render_placeholder() {
        assert_eq!(labels(&[]), "(none)");
        assert_eq!(labels(&[Choice::new("a", "A"), Choice::new("b", "B")]), "A, B");
    }
}
