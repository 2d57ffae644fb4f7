//! Derived entity metadata
//!
//! [`EntityMetadata`] is the resolved, immutable form of an entity's
//! declarative definition. It is derived once per type by the
//! [`MetadataRegistry`](super::registry::MetadataRegistry) and shared behind
//! an `Arc` for the lifetime of the process.

use crate::entity::{EntityTypeInfo, EntityVTable, FieldKind};
use std::any::TypeId;

/// Resolved metadata for one mapped field.
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    /// Name of the field on the entity type.
    pub local_name: String,
    /// GraphQL field name in the query and response.
    pub mapped_from: String,
    /// Scalar coercion target. Ignored for relation fields.
    pub kind: FieldKind,
    /// Target entity type for relation fields, absent for scalars.
    pub relation: Option<EntityTypeInfo>,
    /// True when the relation produces zero-or-many rather than zero-or-one.
    pub is_collection: bool,
    /// True for the single identifying field, if any.
    pub is_identifier: bool,
    /// True when after-hydrate hooks require this field to have a value.
    pub is_required: bool,
    /// Excluded from schema-conformance validation.
    pub ignore_validation: bool,
}

impl FieldMetadata {
    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

/// Resolved metadata for one entity type. Immutable after construction and
/// safe for concurrent read-only reuse once cached.
#[derive(Debug, Clone)]
pub struct EntityMetadata {
    pub type_id: TypeId,
    pub type_name: &'static str,
    /// Root query field this entity maps to.
    pub graphql_root: String,
    /// Optional associated repository type name.
    pub repository: Option<&'static str>,
    /// Field metadata in declaration order.
    pub fields: Vec<FieldMetadata>,
    /// Index into `fields` of the identifier field, if any.
    pub identifier: Option<usize>,
    /// Erased constructor/assignment/hook operations for the type.
    pub vtable: EntityVTable,
}

impl EntityMetadata {
    /// The identifier field's metadata, if one was declared.
    pub fn identifier_field(&self) -> Option<&FieldMetadata> {
        self.identifier.map(|index| &self.fields[index])
    }

    /// Look a field up by its GraphQL name or its local name.
    pub fn find_field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields
            .iter()
            .find(|field| field.mapped_from == name || field.local_name == name)
    }
}
