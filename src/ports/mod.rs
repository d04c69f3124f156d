//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the task core and something it
//! does not own (time, durable storage, the settings cipher, the Notion API,
//! the host mailbox, IDs). Implementations live in `src/adapters/`.

pub mod cipher;
pub mod clock;
pub mod id_gen;
pub mod mailbox;
pub mod notion;
pub mod storage;

pub use cipher::SettingsCipher;
pub use clock::Clock;
pub use id_gen::IdGenerator;
pub use mailbox::{Mailbox, MessageContext};
pub use notion::{NotionApi, NotionFuture};
pub use storage::{KeyValueStore, StorageError, CACHE_SLOT, SETTINGS_SLOT};
