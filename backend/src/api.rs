//! Public API surface for the Rust backend.
//!
//! This file consolidates the DTO types shared by the repository layer and
//! the HTTP API. All types derive Serialize/Deserialize for JSON serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned fact identifier. Serialized as a bare integer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(pub i64);

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for FactId {
    fn from(value: i64) -> Self {
        FactId(value)
    }
}

impl FactId {
    pub fn new(value: i64) -> Self {
        FactId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Whether the store actually handed out this id.
    ///
    /// Store-assigned ids start at 1; anything else means the insert did not
    /// yield a usable key.
    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }
}

/// A persisted fact.
///
/// Serialized as `{"id": <int>, "fact": <string>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub fact: String,
}

impl Fact {
    pub fn new(id: impl Into<FactId>, fact: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fact: fact.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_serializes_with_flat_id() {
        let fact = Fact::new(7, "Chuck Norris counted to infinity. Twice.");
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["fact"], "Chuck Norris counted to infinity. Twice.");
    }

    #[test]
    fn test_fact_id_assignment() {
        assert!(FactId::new(1).is_assigned());
        assert!(!FactId::new(0).is_assigned());
        assert_eq!(FactId::from(42).to_string(), "42");
    }
}
