//! Core traits for mapped entities

use super::def::EntityDef;
use super::value::Value;
use crate::error::{OrmError, OrmResult};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// Raw response row, as decoded from the transport's JSON.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Shared handle to a hydrated entity. Hydration preserves referential
/// identity within one execution context, so instances are reference-counted
/// and interior-mutable.
pub type EntityRef<T> = Rc<RefCell<T>>;

/// Type-erased entity handle used by the hydrator and the identity map.
/// Always wraps a `RefCell<T>` for some `T: GraphqlEntity`.
pub type AnyEntity = Rc<dyn Any>;

/// Core trait that all mapped entities implement.
///
/// The `definition` is the declarative metadata source; `apply_field` is the
/// assignment capability the hydrator drives. The hook methods are optional
/// capabilities with no-op defaults: `before_hydrate` receives the raw row
/// verbatim before any field assignment, `after_hydrate` runs once the
/// entity is judged fully initialized.
pub trait GraphqlEntity: Default + 'static {
    /// Declarative mapping for this type: root name, repository, fields.
    fn definition() -> EntityDef;

    /// Assign one hydrated value to the field with the given local name.
    fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()>;

    /// Invoked before any field assignment, with the untransformed row.
    fn before_hydrate(&mut self, _row: &RawRow) {}

    /// Invoked after all fields were assigned, if every required field
    /// received a value.
    fn after_hydrate(&mut self) {}
}

/// Runtime handle for an entity type, carried by relation fields so the
/// registry and hydrator can reach the target type without static dispatch.
#[derive(Clone, Copy)]
pub struct EntityTypeInfo {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub definition: fn() -> EntityDef,
    pub vtable: EntityVTable,
}

impl EntityTypeInfo {
    pub fn of<T: GraphqlEntity>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name::<T>(),
            definition: T::definition,
            vtable: EntityVTable::of::<T>(),
        }
    }
}

impl std::fmt::Debug for EntityTypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityTypeInfo")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Erased operations over an entity type, monomorphized once per type.
#[derive(Clone, Copy)]
pub struct EntityVTable {
    pub new_instance: fn() -> AnyEntity,
    pub apply_field: fn(&AnyEntity, &str, Value) -> OrmResult<()>,
    pub before_hydrate: fn(&AnyEntity, &RawRow) -> OrmResult<()>,
    pub after_hydrate: fn(&AnyEntity) -> OrmResult<()>,
}

impl std::fmt::Debug for EntityVTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntityVTable")
    }
}

impl EntityVTable {
    fn of<T: GraphqlEntity>() -> Self {
        Self {
            new_instance: new_instance_erased::<T>,
            apply_field: apply_field_erased::<T>,
            before_hydrate: before_hydrate_erased::<T>,
            after_hydrate: after_hydrate_erased::<T>,
        }
    }
}

fn new_instance_erased<T: GraphqlEntity>() -> AnyEntity {
    Rc::new(RefCell::new(T::default()))
}

fn borrow_as<T: GraphqlEntity>(entity: &AnyEntity) -> OrmResult<&RefCell<T>> {
    entity.downcast_ref::<RefCell<T>>().ok_or_else(|| {
        OrmError::internal(format!(
            "entity handle does not hold a {}",
            short_type_name::<T>()
        ))
    })
}

fn apply_field_erased<T: GraphqlEntity>(
    entity: &AnyEntity,
    field: &str,
    value: Value,
) -> OrmResult<()> {
    borrow_as::<T>(entity)?.borrow_mut().apply_field(field, value)
}

fn before_hydrate_erased<T: GraphqlEntity>(entity: &AnyEntity, row: &RawRow) -> OrmResult<()> {
    borrow_as::<T>(entity)?.borrow_mut().before_hydrate(row);
    Ok(())
}

fn after_hydrate_erased<T: GraphqlEntity>(entity: &AnyEntity) -> OrmResult<()> {
    borrow_as::<T>(entity)?.borrow_mut().after_hydrate();
    Ok(())
}

/// Downcast an erased entity handle into its typed form.
pub fn downcast_entity<T: GraphqlEntity>(entity: AnyEntity) -> OrmResult<EntityRef<T>> {
    entity.downcast::<RefCell<T>>().map_err(|_| {
        OrmError::internal(format!(
            "entity handle does not hold a {}",
            short_type_name::<T>()
        ))
    })
}

/// Last path segment of a type name, e.g. `my_app::model::User` -> `User`.
pub(crate) fn short_type_name<T: 'static>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
