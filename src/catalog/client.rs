//! Remote catalog client over the [`NotionApi`] port.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{Catalog, Choice};
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::ports::{Clock, NotionApi};
use crate::record::{self, PageRequest, RecordId};
use crate::settings::{required, NotionDatabases};
use crate::workflow::TaskDraft;

/// Result of checking one configured database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseCheck {
    /// Which configured database was checked.
    pub name: &'static str,
    /// Whether its schema could be retrieved.
    pub reachable: bool,
}

/// Reads option lists from, and writes task records to, the Notion databases
/// named in the settings.
///
/// Database ids are checked before any request is issued. Nothing is retried.
pub struct CatalogClient<'a> {
    api: &'a dyn NotionApi,
    databases: &'a NotionDatabases,
    clock: &'a dyn Clock,
}

impl<'a> CatalogClient<'a> {
    /// Creates a client over the context's Notion port and configured databases.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { api: ctx.notion.as_ref(), databases: &ctx.settings.databases, clock: ctx.clock.as_ref() }
    }

    /// Lists systems in the order Notion sorts them by label.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the systems database is not set, or
    /// the remote/decode error of the query.
    pub async fn list_systems(&self) -> Result<Vec<Choice>> {
        let database = required(&self.databases.systems, "databases.systems")?;
        let query = json!({
            "sorts": [{ "property": record::SYSTEM, "direction": "ascending" }],
        });
        let pages = self.api.query_database(database, &query).await?;
        let systems = pages
            .iter()
            .map(|page| page_choice(page, record::SYSTEM))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = systems.len(), "Fetched systems");
        Ok(systems)
    }

    /// Lists task types in the order the planning schema declares them.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the planning database is not set, or
    /// the remote/decode error of the schema lookup.
    pub async fn list_types(&self) -> Result<Vec<Choice>> {
        self.planning_options(record::TYPE).await
    }

    /// Lists task themes in the order the planning schema declares them.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the planning database is not set, or
    /// the remote/decode error of the schema lookup.
    pub async fn list_themes(&self) -> Result<Vec<Choice>> {
        self.planning_options(record::THEME).await
    }

    /// Lists the projects related to `system_key`, in Notion's label order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the projects database is not set, or
    /// the remote/decode error of the query.
    pub async fn list_projects_for_system(&self, system_key: &str) -> Result<Vec<Choice>> {
        let database = required(&self.databases.projects, "databases.projects")?;
        let query = json!({
            "filter": {
                "property": record::PROJECT_SYSTEMS,
                "relation": { "contains": system_key },
            },
            "sorts": [{ "property": record::PROJECT_NAME, "direction": "ascending" }],
        });
        let pages = self.api.query_database(database, &query).await?;
        let projects = pages
            .iter()
            .map(|page| page_choice(page, record::PROJECT_NAME))
            .collect::<Result<Vec<_>>>()?;
        debug!(system = system_key, count = projects.len(), "Fetched projects");
        Ok(projects)
    }

    /// Loads systems, types and themes concurrently.
    ///
    /// # Errors
    ///
    /// Fails with the first error from any of the three lookups; no partial
    /// catalog is returned.
    pub async fn load_all(&self) -> Result<Catalog> {
        let (systems, types, themes) =
            tokio::try_join!(self.list_systems(), self.list_types(), self.list_themes())?;
        Ok(Catalog { systems, types, themes })
    }

    /// Creates the planning record for `draft`, with `body` attached as blocks.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the planning database is not set, or
    /// the remote error of the create call.
    pub async fn create_primary_record(&self, draft: &TaskDraft, body: &str) -> Result<RecordId> {
        let database = required(&self.databases.planning, "databases.planning")?;
        let request = PageRequest {
            database_id: database.to_string(),
            properties: record::planning_properties(draft, self.clock.now()),
            children: record::email_blocks(body),
        };
        let id = self.api.create_page(&request).await?;
        info!(record = %id, blocks = request.children.len(), "Created planning record");
        Ok(id)
    }

    /// Creates the task record linked to the planning record `primary`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tasks database is not set, or
    /// the remote error of the create call.
    pub async fn create_dependent_record(
        &self,
        primary: &RecordId,
        draft: &TaskDraft,
    ) -> Result<RecordId> {
        let database = required(&self.databases.tasks, "databases.tasks")?;
        let request = PageRequest {
            database_id: database.to_string(),
            properties: record::task_properties(draft, primary, self.clock.now()),
            children: Vec::new(),
        };
        let id = self.api.create_page(&request).await?;
        info!(record = %id, planning = %primary, "Created task record");
        Ok(id)
    }

    /// Returns `true` if the database's schema can be retrieved.
    pub async fn validate_database(&self, database_id: &str) -> bool {
        match self.api.retrieve_database(database_id).await {
            Ok(_) => true,
            Err(e) => {
                warn!(database = database_id, error = %e, "Database is not reachable");
                false
            }
        }
    }

    /// Probes the planning, tasks and systems databases concurrently.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any of the three ids is not set.
    pub async fn validate_setup(&self) -> Result<Vec<DatabaseCheck>> {
        let planning = required(&self.databases.planning, "databases.planning")?;
        let tasks = required(&self.databases.tasks, "databases.tasks")?;
        let systems = required(&self.databases.systems, "databases.systems")?;

        let (planning_ok, tasks_ok, systems_ok) = tokio::join!(
            self.validate_database(planning),
            self.validate_database(tasks),
            self.validate_database(systems),
        );
        Ok(vec![
            DatabaseCheck { name: "planning", reachable: planning_ok },
            DatabaseCheck { name: "tasks", reachable: tasks_ok },
            DatabaseCheck { name: "systems", reachable: systems_ok },
        ])
    }

    async fn planning_options(&self, property: &'static str) -> Result<Vec<Choice>> {
        let database = required(&self.databases.planning, "databases.planning")?;
        let schema = self.api.retrieve_database(database).await?;
        select_options(&schema, property)
    }
}

/// Normalizes a result page into a choice keyed by page id.
fn page_choice(page: &Value, title_property: &str) -> Result<Choice> {
    let id = page["id"].as_str().ok_or_else(|| Error::Decode {
        what: "query result",
        message: "page has no id".to_string(),
    })?;
    let label = page["properties"][title_property]["title"]
        .as_array()
        .map(|fragments| {
            fragments.iter().filter_map(|f| f["plain_text"].as_str()).collect::<String>()
        })
        .unwrap_or_default();
    Ok(Choice::new(id, label))
}

/// Extracts the select options of `property` from a database schema.
fn select_options(schema: &Value, property: &str) -> Result<Vec<Choice>> {
    let options = schema["properties"][property]["select"]["options"].as_array().ok_or_else(|| {
        Error::Decode {
            what: "database schema",
            message: format!("property {property:?} has no select options"),
        }
    })?;
    Ok(options
        .iter()
        .filter_map(|option| option["name"].as_str())
        .map(|name| Choice::new(name, name))
        .collect())
}
