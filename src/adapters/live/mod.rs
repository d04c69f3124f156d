//! Live adapters for real external interactions.

pub mod cipher;
pub mod clock;
pub mod id_gen;
pub mod mailbox;
pub mod notion;
pub mod storage;

pub use cipher::EnvelopeCipher;
pub use clock::LiveClock;
pub use id_gen::LiveIdGenerator;
pub use mailbox::ConsoleMailbox;
pub use notion::LiveNotionClient;
pub use storage::FileStore;
