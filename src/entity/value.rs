//! Hydrated field values
//!
//! The hydrator performs all scalar coercion up front and hands entities a
//! [`Value`] that already matches the field's declared kind, so entity
//! `apply_field` implementations only unwrap the expected variant.

use super::traits::{AnyEntity, EntityRef, GraphqlEntity};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::fmt;

/// A value produced by hydration, ready for assignment to an entity field.
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<Utc>),
    /// Untyped pass-through for fields declared `FieldKind::Raw`.
    Raw(serde_json::Value),
    /// An already-hydrated related entity.
    Entity(AnyEntity),
    /// An already-hydrated collection of related entities.
    Collection(Vec<AnyEntity>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_i64(self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_f64(self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_raw(self) -> Option<serde_json::Value> {
        match self {
            Value::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// Unwrap a hydrated relation, downcasting to the expected entity type.
    pub fn into_entity<T: GraphqlEntity>(self) -> Option<EntityRef<T>> {
        match self {
            Value::Entity(entity) => entity.downcast::<RefCell<T>>().ok(),
            _ => None,
        }
    }

    /// Unwrap a hydrated collection, downcasting every element.
    pub fn into_entities<T: GraphqlEntity>(self) -> Option<Vec<EntityRef<T>>> {
        match self {
            Value::Collection(entities) => entities
                .into_iter()
                .map(|entity| entity.downcast::<RefCell<T>>().ok())
                .collect(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(value) => write!(f, "Bool({value})"),
            Value::Int(value) => write!(f, "Int({value})"),
            Value::Float(value) => write!(f, "Float({value})"),
            Value::String(value) => write!(f, "String({value:?})"),
            Value::DateTime(value) => write!(f, "DateTime({value})"),
            Value::Raw(value) => write!(f, "Raw({value})"),
            Value::Entity(_) => write!(f, "Entity(..)"),
            Value::Collection(entities) => write!(f, "Collection(len={})", entities.len()),
        }
    }
}
