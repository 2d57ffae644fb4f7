//! Per-execution observability record

use std::time::Duration;
use uuid::Uuid;

/// Source location of the user call that triggered an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerInfo {
    pub file: &'static str,
    pub line: u32,
}

impl From<&'static std::panic::Location<'static>> for CallerInfo {
    fn from(location: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// Everything observed about one query execution: compiled text, AST
/// snapshot, transport details, hydration counters and timing.
#[derive(Debug, Clone)]
pub struct QueryTrace {
    pub id: Uuid,
    pub graphql: String,
    pub ast: Option<serde_json::Value>,
    pub variables: serde_json::Map<String, serde_json::Value>,
    pub caller: Option<CallerInfo>,
    pub endpoint: Option<String>,
    pub response_size: usize,
    pub errors: Option<serde_json::Value>,
    pub hydrated_entities: u64,
    pub hydrated_relations: u64,
    pub hydrated_collections: u64,
    pub hydration_max_depth: u32,
    pub duration: Duration,
}

impl QueryTrace {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            graphql: String::new(),
            ast: None,
            variables: serde_json::Map::new(),
            caller: None,
            endpoint: None,
            response_size: 0,
            errors: None,
            hydrated_entities: 0,
            hydrated_relations: 0,
            hydrated_collections: 0,
            hydration_max_depth: 0,
            duration: Duration::ZERO,
        }
    }
}

impl Default for QueryTrace {
    fn default() -> Self {
        Self::new()
    }
}
