//! Per-query configuration

use super::expr::FilterExpression;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Ordering direction for `orderBy` arguments. Emitted as a bare GraphQL
/// enum literal (`ASC` / `DESC`), never quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-query configuration, created per builder invocation.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub limit: Option<u32>,
    /// Ordered field -> direction mapping; empty means no ordering.
    pub order_by: IndexMap<String, Direction>,
    pub filter: Option<FilterExpression>,
    pub paginate: bool,
    /// Opaque "continue after" cursor.
    pub cursor: Option<String>,
    /// Previously seen cursors, enabling backward pagination.
    pub cursor_stack: Vec<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone these options with detached cursor state, for producing a new
    /// page of the same logical query.
    pub fn for_page(&self, cursor: Option<String>, cursor_stack: Vec<String>) -> Self {
        let mut options = self.clone();
        options.cursor = cursor;
        options.cursor_stack = cursor_stack;
        options
    }
}
