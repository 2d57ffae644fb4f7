//! Per-execution state
//!
//! One [`ExecutionContext`] exists per logical query, never shared across
//! calls. It carries the trace and the identity map that guarantees
//! at-most-one-instance-per-identifier within the execution.

use crate::entity::AnyEntity;
use crate::query::trace::QueryTrace;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// Normalized identifier value used as the identity-map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ID {
    Int(i64),
    String(String),
}

impl ID {
    /// Normalize a raw JSON identifier value. Values without a usable
    /// identity (null, objects, arrays) yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => Some(ID::Int(int)),
                None => Some(ID::String(number.to_string())),
            },
            serde_json::Value::String(string) => Some(ID::String(string.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ID::Int(int) => write!(f, "{int}"),
            ID::String(string) => f.write_str(string),
        }
    }
}

impl From<i64> for ID {
    fn from(value: i64) -> Self {
        ID::Int(value)
    }
}

impl From<&str> for ID {
    fn from(value: &str) -> Self {
        ID::String(value.to_string())
    }
}

/// Trace plus identity map for one execution.
#[derive(Default)]
pub struct ExecutionContext {
    pub trace: QueryTrace,
    /// (entity type, identifier value) -> already-hydrated instance.
    pub identity_map: HashMap<(TypeId, ID), AnyEntity>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_normalization() {
        assert_eq!(ID::from_json(&serde_json::json!(42)), Some(ID::Int(42)));
        assert_eq!(
            ID::from_json(&serde_json::json!("abc")),
            Some(ID::String("abc".to_string()))
        );
        assert_eq!(ID::from_json(&serde_json::json!(null)), None);
        assert_eq!(ID::from_json(&serde_json::json!({"nested": 1})), None);
    }
}
