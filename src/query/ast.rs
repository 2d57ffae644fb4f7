//! Query AST
//!
//! A minimal tree built per query and discarded after compilation. Pure
//! data: the dialect's walker turns it into document text. The metadata
//! graph it is derived from may be cyclic, but a built tree never is.

use super::arguments::Arguments;
use serde::Serialize;

/// Root of a query document: the operation keyword and its root fields.
#[derive(Debug, Clone, Serialize)]
pub struct QueryNode {
    pub operation: String,
    pub fields: Vec<FieldNode>,
}

impl QueryNode {
    pub fn new() -> Self {
        Self {
            operation: "query".to_string(),
            fields: Vec::new(),
        }
    }
}

impl Default for QueryNode {
    fn default() -> Self {
        Self::new()
    }
}

/// A selected field: leaf scalars have no selection set, relations do.
#[derive(Debug, Clone, Serialize)]
pub struct FieldNode {
    pub name: String,
    pub arguments: Arguments,
    pub selection_set: Option<SelectionSetNode>,
    pub is_collection: bool,
}

impl FieldNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Arguments::new(),
            selection_set: None,
            is_collection: false,
        }
    }

    pub fn with_selection(name: impl Into<String>, selection_set: SelectionSetNode) -> Self {
        let mut field = Self::new(name);
        field.selection_set = Some(selection_set);
        field
    }
}

/// Ordered list of child field nodes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionSetNode {
    pub fields: Vec<FieldNode>,
}

impl SelectionSetNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: FieldNode) {
        self.fields.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
