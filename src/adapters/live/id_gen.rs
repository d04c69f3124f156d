//! Live submission id generator.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Produces random v4 UUIDs, one per task submission.
#[derive(Default)]
pub struct LiveIdGenerator;

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_uuids() {
        let ids = LiveIdGenerator;
        let first = ids.generate_id();
        assert_ne!(first, ids.generate_id());
        assert!(Uuid::parse_str(&first).is_ok());
    }
}
