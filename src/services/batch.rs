// src/services/batch.rs
// DOCUMENTATION: Result type for bulk operations
// PURPOSE: Keep every item's outcome instead of bare success/failure counters

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// What happened to one item of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Succeeded { result: T },
    Failed { error: String },
}

/// One item of a batch, identified by the caller's id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemOutcome<Id, T> {
    pub id: Id,
    #[serde(flatten)]
    pub outcome: Outcome<T>,
}

/// Per-item outcomes of a sequential bulk operation
/// DOCUMENTATION: Serializes as { total, succeeded, failed, items }
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult<Id, T> {
    items: Vec<ItemOutcome<Id, T>>,
}

impl<Id, T> Default for BatchResult<Id, T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<Id, T> BatchResult<Id, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&mut self, id: Id, result: T) {
        self.items.push(ItemOutcome {
            id,
            outcome: Outcome::Succeeded { result },
        });
    }

    pub fn push_failure(&mut self, id: Id, error: impl Display) {
        self.items.push(ItemOutcome {
            id,
            outcome: Outcome::Failed {
                error: error.to_string(),
            },
        });
    }

    /// Record the result of one item
    pub fn record<E: Display>(&mut self, id: Id, result: Result<T, E>) {
        match result {
            Ok(value) => self.push_success(id, value),
            Err(e) => self.push_failure(id, e),
        }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Succeeded { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Items that failed, with their reasons
    #[cfg(test)]
    pub fn failures(&self) -> impl Iterator<Item = (&Id, &str)> {
        self.items.iter().filter_map(|i| match &i.outcome {
            Outcome::Failed { error } => Some((&i.id, error.as_str())),
            Outcome::Succeeded { .. } => None,
        })
    }
}

impl<Id: Serialize, T: Serialize> Serialize for BatchResult<Id, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BatchResult", 4)?;
        state.serialize_field("total", &self.total())?;
        state.serialize_field("succeeded", &self.succeeded())?;
        state.serialize_field("failed", &self.failed())?;
        state.serialize_field("items", &self.items)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_and_failures() {
        let mut batch: BatchResult<u32, &str> = BatchResult::new();
        batch.record(1, Ok::<_, String>("ok"));
        batch.record(2, Err("caregiver not found"));
        batch.push_success(3, "ok");

        assert_eq!(batch.total(), 3);
        assert_eq!(batch.succeeded(), 2);
        assert_eq!(batch.failed(), 1);

        let failures: Vec<_> = batch.failures().collect();
        assert_eq!(failures, vec![(&2, "caregiver not found")]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut batch: BatchResult<&str, u8> = BatchResult::new();
        batch.push_success("a", 7);
        batch.push_failure("b", "forbidden");

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            value,
            json!({
                "total": 2,
                "succeeded": 1,
                "failed": 1,
                "items": [
                    { "id": "a", "status": "succeeded", "result": 7 },
                    { "id": "b", "status": "failed", "error": "forbidden" }
                ]
            })
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch: BatchResult<u8, ()> = BatchResult::default();
        assert_eq!(batch.total(), 0);
        assert_eq!(batch.failed(), 0);
    }
}
