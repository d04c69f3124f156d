//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{
    ConsoleMailbox, EnvelopeCipher, FileStore, LiveClock, LiveIdGenerator, LiveNotionClient,
};
use crate::adapters::memory::{FakeNotion, ManualClock, MemoryStore, RecordingMailbox, SequentialIdGenerator};
use crate::ports::{Clock, IdGenerator, KeyValueStore, Mailbox, NotionApi, SettingsCipher};
use crate::settings::{Settings, SettingsStore};

/// Environment variable overriding the Notion API root.
pub const NOTION_URL_ENV: &str = "MAILTASK_NOTION_URL";

/// Bundles all port trait objects and the loaded settings.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, in-memory).
pub struct ServiceContext {
    /// Clock for cache expiry and record timestamps.
    pub clock: Box<dyn Clock>,
    /// Durable slot storage for the cache and settings.
    pub storage: Box<dyn KeyValueStore>,
    /// Sealing for the settings blob.
    pub cipher: Box<dyn SettingsCipher>,
    /// Notion REST API.
    pub notion: Box<dyn NotionApi>,
    /// Host mailbox (open message and notifications).
    pub mailbox: Box<dyn Mailbox>,
    /// Submission id generator.
    pub id_gen: Box<dyn IdGenerator>,
    /// Settings as loaded when the context was built.
    pub settings: Settings,
}

impl ServiceContext {
    /// Creates a live context storing its state under `home`.
    ///
    /// Settings are loaded once; the Notion client uses the stored token
    /// and honours [`NOTION_URL_ENV`].
    #[must_use]
    pub fn live(home: &Path) -> Self {
        let storage = FileStore::new(home);
        let settings = SettingsStore::new(&storage, &EnvelopeCipher).load();

        let mut notion = LiveNotionClient::new(settings.notion_token.clone());
        if let Ok(url) = std::env::var(NOTION_URL_ENV) {
            notion = notion.with_base_url(url);
        }

        Self {
            clock: Box::new(LiveClock),
            storage: Box::new(storage),
            cipher: Box::new(EnvelopeCipher),
            notion: Box::new(notion),
            mailbox: Box::new(ConsoleMailbox::detached()),
            id_gen: Box::new(LiveIdGenerator),
            settings,
        }
    }

    /// Creates a context where every port is an in-memory fake and settings are empty.
    ///
    /// Tests replace individual fields to keep handles on the fakes.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            clock: Box::new(ManualClock::default()),
            storage: Box::new(MemoryStore::default()),
            cipher: Box::new(EnvelopeCipher),
            notion: Box::new(FakeNotion::default()),
            mailbox: Box::new(RecordingMailbox::default()),
            id_gen: Box::new(SequentialIdGenerator::default()),
            settings: Settings::default(),
        }
    }

    /// A store for the context's persisted settings.
    #[must_use]
    pub fn settings_store(&self) -> SettingsStore<'_> {
        SettingsStore::new(self.storage.as_ref(), self.cipher.as_ref())
    }
}
