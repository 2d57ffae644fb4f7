//! Process-wide metadata cache
//!
//! Metadata derivation is a pure function of the entity type, so the cache
//! tolerates concurrent first-population: the first stored value wins and
//! every caller observes the same `Arc` afterwards.

use super::types::{EntityMetadata, FieldMetadata};
use crate::entity::{EntityTypeInfo, GraphqlEntity};
use crate::error::{OrmError, OrmResult};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;

/// Lazily derives and caches [`EntityMetadata`] per entity type.
#[derive(Default)]
pub struct MetadataRegistry {
    cache: DashMap<TypeId, Arc<EntityMetadata>>,
    by_name: DashMap<String, EntityTypeInfo>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata for a statically known entity type. Repeated calls return
    /// the same `Arc`.
    pub fn metadata<T: GraphqlEntity>(&self) -> OrmResult<Arc<EntityMetadata>> {
        self.metadata_of(&EntityTypeInfo::of::<T>())
    }

    /// Metadata for a type reached dynamically, e.g. through a relation field.
    pub fn metadata_of(&self, info: &EntityTypeInfo) -> OrmResult<Arc<EntityMetadata>> {
        if let Some(cached) = self.cache.get(&info.type_id) {
            return Ok(cached.clone());
        }

        let derived = Arc::new(Self::derive(info)?);
        let entry = self.cache.entry(info.type_id).or_insert(derived);
        Ok(entry.value().clone())
    }

    /// Register an entity type for name-indexed lookup and enumeration
    /// (schema validation, debug tooling).
    pub fn register<T: GraphqlEntity>(&self) {
        let info = EntityTypeInfo::of::<T>();
        self.by_name.insert(info.type_name.to_string(), info);
    }

    /// Metadata for a registered type by its type name. Fails with
    /// `NotAnEntity` when nothing was registered under that name.
    pub fn metadata_by_name(&self, name: &str) -> OrmResult<Arc<EntityMetadata>> {
        let info = self
            .by_name
            .get(name)
            .map(|entry| *entry.value())
            .ok_or_else(|| OrmError::not_an_entity(name))?;
        self.metadata_of(&info)
    }

    /// All registered entity types, in no particular order.
    pub fn registered(&self) -> Vec<EntityTypeInfo> {
        self.by_name.iter().map(|entry| *entry.value()).collect()
    }

    fn derive(info: &EntityTypeInfo) -> OrmResult<EntityMetadata> {
        let def = (info.definition)();

        let mut fields = Vec::with_capacity(def.fields.len());
        let mut identifier = None;

        for field_def in def.fields {
            let mapped_from = field_def
                .mapped_from
                .unwrap_or_else(|| field_def.local_name.clone());

            let field = FieldMetadata {
                local_name: field_def.local_name,
                mapped_from,
                kind: field_def.kind,
                relation: field_def.relation,
                is_collection: field_def.is_collection,
                is_identifier: field_def.is_identifier,
                is_required: field_def.is_required,
                ignore_validation: field_def.ignore_validation,
            };

            if field.is_identifier {
                if identifier.is_some() {
                    return Err(OrmError::too_many_identifiers(info.type_name));
                }
                identifier = Some(fields.len());
            }

            fields.push(field);
        }

        Ok(EntityMetadata {
            type_id: info.type_id,
            type_name: info.type_name,
            graphql_root: def.root,
            repository: def.repository,
            fields,
            identifier,
            vtable: info.vtable,
        })
    }
}
