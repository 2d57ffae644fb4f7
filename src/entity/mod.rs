//! Entity declaration layer
//!
//! Mapped domain types implement [`GraphqlEntity`]: a declarative
//! [`EntityDef`] describing their GraphQL mapping, an `apply_field`
//! assignment capability, and optional before/after hydration hooks.

pub mod def;
pub mod traits;
pub mod value;

pub use def::{EntityDef, FieldDef, FieldKind};
pub use traits::{
    AnyEntity, EntityRef, EntityTypeInfo, EntityVTable, GraphqlEntity, RawRow, downcast_entity,
};
pub use value::Value;
