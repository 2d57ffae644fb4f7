//! Declarative entity definitions
//!
//! Entities describe their GraphQL mapping through [`EntityDef`] values
//! returned from [`GraphqlEntity::definition`]. The builder mirrors what an
//! attribute/annotation layer would declare in other ecosystems: root name,
//! optional repository association, and one [`FieldDef`] per mapped field.
//!
//! [`GraphqlEntity::definition`]: super::traits::GraphqlEntity

use super::traits::{EntityTypeInfo, GraphqlEntity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar kinds a mapped field can coerce into during hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Int,
    Float,
    Bool,
    String,
    DateTime,
    /// Untyped pass-through: the raw JSON value is assigned unchanged.
    Raw,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::DateTime => "datetime",
            FieldKind::Raw => "raw",
        };
        write!(f, "{name}")
    }
}

/// Declaration of a single mapped field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub local_name: String,
    pub mapped_from: Option<String>,
    pub kind: FieldKind,
    pub relation: Option<EntityTypeInfo>,
    pub is_collection: bool,
    pub is_identifier: bool,
    pub is_required: bool,
    pub ignore_validation: bool,
}

impl FieldDef {
    fn new(local_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            local_name: local_name.into(),
            mapped_from: None,
            kind,
            relation: None,
            is_collection: false,
            is_identifier: false,
            is_required: false,
            ignore_validation: false,
        }
    }

    /// Declare a scalar field of the given kind.
    pub fn scalar(local_name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(local_name, kind)
    }

    /// Declare a zero-or-one relation to another entity type.
    pub fn relation<T: GraphqlEntity>(local_name: impl Into<String>) -> Self {
        let mut def = Self::new(local_name, FieldKind::Raw);
        def.relation = Some(EntityTypeInfo::of::<T>());
        def
    }

    /// Declare a zero-or-many relation to another entity type.
    pub fn relation_list<T: GraphqlEntity>(local_name: impl Into<String>) -> Self {
        let mut def = Self::relation::<T>(local_name);
        def.is_collection = true;
        def
    }

    /// Override the GraphQL field name this field is read from and selected as.
    /// Defaults to the local name.
    pub fn mapped_from(mut self, name: impl Into<String>) -> Self {
        self.mapped_from = Some(name.into());
        self
    }

    /// Flag this field as the entity's unique identifier.
    pub fn identifier(mut self) -> Self {
        self.is_identifier = true;
        self
    }

    /// Flag this field as required: after-hydrate hooks are skipped unless a
    /// non-null value was assigned to every required field.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Exclude this field from schema-conformance validation.
    pub fn ignore_validation(mut self) -> Self {
        self.ignore_validation = true;
        self
    }
}

/// Declaration of an entity type: GraphQL root name, optional repository
/// association, and the ordered field list.
#[derive(Debug, Clone)]
pub struct EntityDef {
    pub root: String,
    pub repository: Option<&'static str>,
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Start a definition for the given GraphQL root query field.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            repository: None,
            fields: Vec::new(),
        }
    }

    /// Associate a repository type by name.
    pub fn repository(mut self, name: &'static str) -> Self {
        self.repository = Some(name);
        self
    }

    /// Append a field declaration. Declaration order is preserved and drives
    /// generated query field ordering.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}
