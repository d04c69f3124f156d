//! In-memory adapters for tests and offline runs.
//!
//! Each adapter is cheap to clone and clones share state, so a test can
//! hand one copy to a [`ServiceContext`](crate::context::ServiceContext)
//! and inspect another.

pub mod notion;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::ports::{Clock, IdGenerator, KeyValueStore, Mailbox, MessageContext, StorageError};
use crate::settings::{NotionDatabases, Settings};

pub use notion::FakeNotion;

/// Settings pointing at the fixed database ids the fakes are seeded with.
#[must_use]
pub fn sample_settings() -> Settings {
    Settings {
        notion_token: Some("secret-token".to_string()),
        databases: NotionDatabases {
            planning: "db-planning".to_string(),
            tasks: "db-tasks".to_string(),
            systems: "db-systems".to_string(),
            projects: "db-projects".to_string(),
        },
        todoist_token: None,
        todoist_default_project: None,
    }
}

/// A clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// A clock stopped at `at`.
    #[must_use]
    pub fn at(at: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(at)) }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().unwrap_or_default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A slot map held in memory, with an optional failure switch.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Reads a slot without going through the port.
    #[must_use]
    pub fn peek(&self, slot: &str) -> Option<String> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).get(slot).cloned()
    }

    /// Makes every subsequent port call fail (or succeed again).
    pub fn fail_all(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            Err("storage unavailable".into())
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.peek(slot))
    }

    fn set(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        self.check()?;
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).remove(slot);
        Ok(())
    }
}

/// A mailbox that records notifications.
#[derive(Clone, Default)]
pub struct RecordingMailbox {
    message: Option<MessageContext>,
    notifications: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl RecordingMailbox {
    /// Opens `message` in the mailbox.
    #[must_use]
    pub fn with_message(mut self, message: MessageContext) -> Self {
        self.message = Some(message);
        self
    }

    /// Makes `notify` fail.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Notifications posted so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Mailbox for RecordingMailbox {
    fn current_message(&self) -> Result<MessageContext, String> {
        self.message.clone().ok_or_else(|| "No email item found".to_string())
    }

    fn notify(&self, message: &str) -> Result<(), String> {
        if self.failing {
            return Err("notification rejected by host".to_string());
        }
        self.notifications.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
        Ok(())
    }
}

/// Issues `submission-1`, `submission-2`, and so on.
#[derive(Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&self) -> String {
        format!("submission-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_store_state() {
        let store = MemoryStore::default();
        store.clone().set("settings", "x").unwrap();
        assert_eq!(store.peek("settings").as_deref(), Some("x"));
    }

    #[test]
    fn failing_store_rejects_all_calls() {
        let store = MemoryStore::default();
        store.fail_all(true);
        assert!(store.get("a").is_err());
        assert!(store.set("a", "b").is_err());
        assert!(store.remove("a").is_err());
        store.fail_all(false);
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn manual_clock_advances_all_clones() {
        let clock = ManualClock::default();
        let start = clock.now();
        clock.clone().advance(Duration::minutes(5));
        assert_eq!(clock.now() - start, Duration::minutes(5));
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::default();
        assert_eq!(ids.generate_id(), "submission-1");
        assert_eq!(ids.generate_id(), "submission-2");
    }
}
