//! `mailtask config` commands.

use tracing::info;

use crate::cache::CatalogCache;
use crate::catalog::CatalogClient;
use crate::cli::ConfigSetArgs;
use crate::context::ServiceContext;
use crate::settings::{required, NotionDatabases, Settings};

/// Merges the given flags into the stored settings.
///
/// The catalog cache is cleared because it may describe other databases.
///
/// # Errors
///
/// Returns an error string if the settings cannot be written.
pub fn set(ctx: &ServiceContext, args: &ConfigSetArgs) -> Result<(), String> {
    let update = Settings {
        notion_token: args.notion_token.clone(),
        databases: NotionDatabases {
            planning: args.planning_db.clone().unwrap_or_default(),
            tasks: args.tasks_db.clone().unwrap_or_default(),
            systems: args.systems_db.clone().unwrap_or_default(),
            projects: args.projects_db.clone().unwrap_or_default(),
        },
        todoist_token: args.todoist_token.clone(),
        todoist_default_project: args.todoist_project.clone(),
    };
    if update == Settings::default() {
        return Err("Nothing to set. Pass at least one flag; see `mailtask config set --help`.".to_string());
    }

    let saved = ctx.settings_store().save(update).map_err(|e| e.to_string())?;
    CatalogCache::new(ctx).clear();
    info!(complete = saved.is_complete(), "Settings saved");

    println!("Settings saved.");
    if !saved.is_complete() {
        println!("Still missing: {}", missing(&saved).join(", "));
    }
    Ok(())
}

/// Prints the stored settings as YAML with tokens masked.
///
/// # Errors
///
/// Returns an error string if the settings cannot be rendered.
pub fn show(ctx: &ServiceContext) -> Result<(), String> {
    let settings = ctx.settings_store().load();
    let yaml = serde_yaml::to_string(&settings.redacted())
        .map_err(|e| format!("Failed to render settings: {e}"))?;
    print!("{yaml}");
    Ok(())
}

/// Deletes the stored settings and the catalog cache.
///
/// # Errors
///
/// Returns an error string if the settings cannot be removed.
pub fn clear(ctx: &ServiceContext) -> Result<(), String> {
    ctx.settings_store().clear().map_err(|e| e.to_string())?;
    CatalogCache::new(ctx).clear();
    println!("Settings cleared.");
    Ok(())
}

/// Probes the planning, tasks and systems databases.
///
/// # Errors
///
/// Returns an error string if settings are incomplete or any database is unreachable.
pub async fn check(ctx: &ServiceContext) -> Result<(), String> {
    required(ctx.settings.notion_token.as_deref().unwrap_or_default(), "notion_token")
        .map_err(|e| e.to_string())?;
    let checks = CatalogClient::new(ctx).validate_setup().await.map_err(|e| e.to_string())?;

    for check in &checks {
        let status = if check.reachable { "ok" } else { "unreachable" };
        println!("{:<9} {status}", check.name);
    }
    if checks.iter().all(|c| c.reachable) {
        Ok(())
    } else {
        Err("Some databases are not reachable with the configured token.".to_string())
    }
}

fn missing(settings: &Settings) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if settings.notion_token.as_deref().unwrap_or_default().is_empty() {
        missing.push("notion token");
    }
    for (id, name) in [
        (&settings.databases.planning, "planning database"),
        (&settings.databases.tasks, "tasks database"),
        (&settings.databases.systems, "systems database"),
    ] {
        if id.is_empty() {
            missing.push(name);
        }
    }
    missing
}
