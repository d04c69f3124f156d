//! Settings store: Notion credentials, database ids, and the external list token.
//!
//! Settings are JSON sealed through the [`SettingsCipher`] port and kept in
//! the [`SETTINGS_SLOT`] slot. Reads never fail: a missing, unopenable or
//! undecodable blob yields empty settings.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::ports::{KeyValueStore, SettingsCipher, SETTINGS_SLOT};

/// Ids of the four Notion databases the add-in works with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionDatabases {
    /// Planning database (primary records, type/theme schema).
    pub planning: String,
    /// Tasks database (dependent records).
    pub tasks: String,
    /// Systems database.
    pub systems: String,
    /// Projects database.
    pub projects: String,
}

/// Everything the add-in needs to reach Notion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Notion integration token.
    pub notion_token: Option<String>,
    /// Database ids.
    pub databases: NotionDatabases,
    /// Todoist API token, when the external list is enabled.
    pub todoist_token: Option<String>,
    /// Default Todoist project.
    pub todoist_default_project: Option<String>,
}

impl Settings {
    /// Returns `true` when the token and the planning, tasks and systems ids are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.notion_token.as_deref().is_some_and(|t| !t.is_empty())
            && !self.databases.planning.is_empty()
            && !self.databases.tasks.is_empty()
            && !self.databases.systems.is_empty()
    }

    /// Overlays the fields set in `update` onto `self`.
    ///
    /// Empty database ids in `update` leave the current value in place.
    pub fn merge(&mut self, update: Settings) {
        if update.notion_token.is_some() {
            self.notion_token = update.notion_token;
        }
        let NotionDatabases { planning, tasks, systems, projects } = update.databases;
        for (current, new) in [
            (&mut self.databases.planning, planning),
            (&mut self.databases.tasks, tasks),
            (&mut self.databases.systems, systems),
            (&mut self.databases.projects, projects),
        ] {
            if !new.is_empty() {
                *current = new;
            }
        }
        if update.todoist_token.is_some() {
            self.todoist_token = update.todoist_token;
        }
        if update.todoist_default_project.is_some() {
            self.todoist_default_project = update.todoist_default_project;
        }
    }

    /// Returns a copy safe to print: secrets are masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |secret: &Option<String>| secret.as_ref().map(|_| "********".to_string());
        Self {
            notion_token: mask(&self.notion_token),
            todoist_token: mask(&self.todoist_token),
            ..self.clone()
        }
    }
}

/// Returns `value`, or a configuration error naming `setting` when it is empty.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `value` is empty.
pub fn required<'v>(value: &'v str, setting: &'static str) -> Result<&'v str> {
    if value.is_empty() {
        Err(Error::Configuration { setting })
    } else {
        Ok(value)
    }
}

/// Loads and persists [`Settings`].
pub struct SettingsStore<'a> {
    storage: &'a dyn KeyValueStore,
    cipher: &'a dyn SettingsCipher,
}

impl<'a> SettingsStore<'a> {
    /// Creates a store over the given storage and cipher.
    #[must_use]
    pub fn new(storage: &'a dyn KeyValueStore, cipher: &'a dyn SettingsCipher) -> Self {
        Self { storage, cipher }
    }

    /// Loads the stored settings, degrading to defaults on any failure.
    #[must_use]
    pub fn load(&self) -> Settings {
        let sealed = match self.storage.get(SETTINGS_SLOT) {
            Ok(Some(sealed)) => sealed,
            Ok(None) => return Settings::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read settings");
                return Settings::default();
            }
        };
        let plaintext = match self.cipher.open(&sealed) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(error = %e, "Failed to open sealed settings");
                return Settings::default();
            }
        };
        serde_json::from_str(&plaintext).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding undecodable settings");
            Settings::default()
        })
    }

    /// Merges `update` over the stored settings and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the merged settings cannot be written.
    pub fn save(&self, update: Settings) -> Result<Settings> {
        let mut settings = self.load();
        settings.merge(update);
        let json = serde_json::to_string(&settings)
            .map_err(|e| Error::Storage { message: e.to_string() })?;
        self.storage
            .set(SETTINGS_SLOT, &self.cipher.seal(&json))
            .map_err(|e| Error::Storage { message: e.to_string() })?;
        Ok(settings)
    }

    /// Removes the stored settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the slot cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(SETTINGS_SLOT).map_err(|e| Error::Storage { message: e.to_string() })
    }
}
