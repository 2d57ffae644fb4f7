//! Entity hydration
//!
//! Recursively converts raw rows into typed object graphs. Referential
//! identity is preserved through the execution context's identity map, which
//! also terminates recursion over cyclic relation data: an in-progress
//! entity is registered under its identifier before its relations are
//! hydrated, so a relation pointing back at it resolves to the same
//! instance.

use crate::entity::{AnyEntity, EntityRef, FieldKind, GraphqlEntity, RawRow, Value, downcast_entity};
use crate::error::{OrmError, OrmResult};
use crate::execution::{ExecutionContext, ID};
use crate::metadata::{EntityMetadata, FieldMetadata, MetadataRegistry};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::sync::Arc;

pub struct EntityHydrator {
    registry: Arc<MetadataRegistry>,
}

impl EntityHydrator {
    pub fn new(registry: Arc<MetadataRegistry>) -> Self {
        Self { registry }
    }

    /// Hydrate a row into a typed entity reference.
    pub fn hydrate_as<T: GraphqlEntity>(
        &self,
        metadata: &EntityMetadata,
        row: &RawRow,
        context: &mut ExecutionContext,
    ) -> OrmResult<EntityRef<T>> {
        downcast_entity::<T>(self.hydrate(metadata, row, context, 0)?)
    }

    /// Hydrate a row against the given metadata, starting at `depth`.
    pub fn hydrate(
        &self,
        metadata: &EntityMetadata,
        row: &RawRow,
        context: &mut ExecutionContext,
        depth: u32,
    ) -> OrmResult<AnyEntity> {
        context.trace.hydration_max_depth = context.trace.hydration_max_depth.max(depth);
        context.trace.hydrated_entities += 1;

        let identifier = metadata
            .identifier_field()
            .and_then(|field| row.get(&field.mapped_from))
            .and_then(ID::from_json);

        if let Some(id) = &identifier {
            let key = (metadata.type_id, id.clone());
            if let Some(existing) = context.identity_map.get(&key) {
                return Ok(existing.clone());
            }
        }

        let entity = (metadata.vtable.new_instance)();

        // Register before recursing into relations so cyclic rows resolve to
        // the in-progress instance instead of recursing forever.
        if let Some(id) = identifier {
            context
                .identity_map
                .insert((metadata.type_id, id), entity.clone());
        }

        (metadata.vtable.before_hydrate)(&entity, row)?;

        let mut fully_initialized = true;

        for field in &metadata.fields {
            let Some(raw) = row.get(&field.mapped_from) else {
                // Absent keys are intentional partial hydration, not errors.
                if field.is_required {
                    fully_initialized = false;
                }
                continue;
            };

            if raw.is_null() && field.is_required {
                fully_initialized = false;
            }

            let value = if field.is_relation() {
                self.hydrate_relation(field, raw, context, depth)?
            } else {
                coerce(raw, field.kind)?
            };

            (metadata.vtable.apply_field)(&entity, &field.local_name, value)?;
        }

        if fully_initialized {
            (metadata.vtable.after_hydrate)(&entity)?;
        }

        Ok(entity)
    }

    fn hydrate_relation(
        &self,
        field: &FieldMetadata,
        raw: &serde_json::Value,
        context: &mut ExecutionContext,
        depth: u32,
    ) -> OrmResult<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }

        let target = field
            .relation
            .as_ref()
            .ok_or_else(|| OrmError::internal("relation hydration on a scalar field"))?;
        let target_metadata = self.registry.metadata_of(target)?;

        if field.is_collection {
            let rows = raw.as_array().ok_or_else(|| {
                OrmError::invalid_response_shape("a list of related rows", raw)
            })?;

            context.trace.hydrated_collections += 1;

            let mut entities = Vec::with_capacity(rows.len());
            for element in rows {
                let element_row = element.as_object().ok_or_else(|| {
                    OrmError::invalid_response_shape("a related row object", element)
                })?;
                entities.push(self.hydrate(&target_metadata, element_row, context, depth + 1)?);
            }

            return Ok(Value::Collection(entities));
        }

        let row = raw
            .as_object()
            .ok_or_else(|| OrmError::invalid_response_shape("a related row object", raw))?;

        context.trace.hydrated_relations += 1;

        Ok(Value::Entity(self.hydrate(
            &target_metadata,
            row,
            context,
            depth + 1,
        )?))
    }
}

/// Coerce a raw scalar value into its declared field kind.
fn coerce(raw: &serde_json::Value, kind: FieldKind) -> OrmResult<Value> {
    use serde_json::Value as Json;

    if raw.is_null() {
        return Ok(Value::Null);
    }

    match kind {
        FieldKind::Int => match raw {
            Json::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Value::Int(int));
                }
                float_to_int(number.as_f64().unwrap_or(f64::NAN))
                    .ok_or_else(|| OrmError::cast(raw, "int"))
                    .map(Value::Int)
            }
            Json::String(string) => {
                if let Ok(int) = string.trim().parse::<i64>() {
                    return Ok(Value::Int(int));
                }
                string
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(float_to_int)
                    .ok_or_else(|| OrmError::cast(raw, "int"))
                    .map(Value::Int)
            }
            _ => Err(OrmError::cast(raw, "int")),
        },
        FieldKind::Float => match raw {
            Json::Number(number) => Ok(Value::Float(number.as_f64().unwrap_or(f64::NAN))),
            Json::String(string) => string
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| OrmError::cast(raw, "float")),
            _ => Err(OrmError::cast(raw, "float")),
        },
        FieldKind::Bool => match raw {
            Json::Bool(value) => Ok(Value::Bool(*value)),
            Json::Number(number) => match number.as_i64() {
                Some(1) => Ok(Value::Bool(true)),
                Some(0) => Ok(Value::Bool(false)),
                _ => Err(OrmError::cast(raw, "bool")),
            },
            Json::String(string) => match string.as_str() {
                "1" | "true" => Ok(Value::Bool(true)),
                "0" | "false" => Ok(Value::Bool(false)),
                _ => Err(OrmError::cast(raw, "bool")),
            },
            _ => Err(OrmError::cast(raw, "bool")),
        },
        FieldKind::String => match raw {
            Json::String(string) => Ok(Value::String(string.clone())),
            Json::Bool(value) => Ok(Value::String(value.to_string())),
            Json::Number(number) => Ok(Value::String(number.to_string())),
            _ => Err(OrmError::cast(raw, "string")),
        },
        FieldKind::DateTime => match raw {
            // Numeric timestamps are interpreted as milliseconds since epoch.
            Json::Number(number) => {
                let millis = number
                    .as_i64()
                    .or_else(|| number.as_f64().map(|float| float as i64))
                    .ok_or_else(|| OrmError::cast(raw, "datetime"))?;
                DateTime::<Utc>::from_timestamp_millis(millis)
                    .map(Value::DateTime)
                    .ok_or_else(|| OrmError::cast(raw, "datetime"))
            }
            Json::String(string) => parse_datetime(string)
                .map(Value::DateTime)
                .ok_or_else(|| OrmError::cast(raw, "datetime")),
            _ => Err(OrmError::cast(raw, "datetime")),
        },
        FieldKind::Raw => Ok(Value::Raw(raw.clone())),
    }
}

/// Float-typed input converts only when it is exactly an integer value; a
/// narrowing cast would silently lose precision and fails loudly instead.
fn float_to_int(float: f64) -> Option<i64> {
    if float.is_finite() && float.fract() == 0.0 && float.abs() < 9.21e18 {
        Some(float as i64)
    } else {
        None
    }
}

fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(naive) = input.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = input.parse::<NaiveDate>() {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityDef, FieldDef};
    use serde_json::json;

    fn row(value: serde_json::Value) -> RawRow {
        value.as_object().unwrap().clone()
    }

    #[derive(Debug, Default)]
    struct User {
        id: i64,
        name: Option<String>,
        tasks: Vec<EntityRef<Task>>,
    }

    impl GraphqlEntity for User {
        fn definition() -> EntityDef {
            EntityDef::new("users")
                .field(FieldDef::scalar("id", FieldKind::Int).identifier())
                .field(FieldDef::scalar("name", FieldKind::String))
                .field(FieldDef::relation_list::<Task>("tasks"))
        }

        fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
            match field {
                "id" => self.id = value.into_i64().unwrap_or_default(),
                "name" => self.name = value.into_string(),
                "tasks" => self.tasks = value.into_entities::<Task>().unwrap_or_default(),
                other => return Err(OrmError::unknown_field("User", other)),
            }
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Task {
        id: i64,
        title: Option<String>,
        user: Option<EntityRef<User>>,
    }

    impl GraphqlEntity for Task {
        fn definition() -> EntityDef {
            EntityDef::new("tasks")
                .field(FieldDef::scalar("id", FieldKind::Int).identifier())
                .field(FieldDef::scalar("title", FieldKind::String))
                .field(FieldDef::relation::<User>("user"))
        }

        fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
            match field {
                "id" => self.id = value.into_i64().unwrap_or_default(),
                "title" => self.title = value.into_string(),
                "user" => self.user = value.into_entity::<User>(),
                other => return Err(OrmError::unknown_field("Task", other)),
            }
            Ok(())
        }
    }

    fn hydrator() -> EntityHydrator {
        EntityHydrator::new(Arc::new(MetadataRegistry::new()))
    }

    #[test]
    fn hydrates_scalars_with_coercion() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<Task>().unwrap();
        let mut context = ExecutionContext::new();

        let task = hydrator
            .hydrate_as::<Task>(
                &metadata,
                &row(json!({"id": "42", "title": "a title"})),
                &mut context,
            )
            .unwrap();

        assert_eq!(task.borrow().id, 42);
        assert_eq!(task.borrow().title.as_deref(), Some("a title"));
        assert_eq!(context.trace.hydrated_entities, 1);
    }

    #[test]
    fn identity_map_returns_same_instance() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<Task>().unwrap();
        let mut context = ExecutionContext::new();
        let data = row(json!({"id": 1, "title": "doc"}));

        let first = hydrator.hydrate_as::<Task>(&metadata, &data, &mut context).unwrap();
        let second = hydrator.hydrate_as::<Task>(&metadata, &data, &mut context).unwrap();

        assert!(std::rc::Rc::ptr_eq(&first, &second));
        // Both hydrations count, even though the second was an identity hit.
        assert_eq!(context.trace.hydrated_entities, 2);
    }

    #[test]
    fn relations_share_instances_by_identifier() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<Task>().unwrap();
        let mut context = ExecutionContext::new();

        let first = hydrator
            .hydrate_as::<Task>(
                &metadata,
                &row(json!({"id": 1, "title": "a", "user": {"id": 10, "name": "John"}})),
                &mut context,
            )
            .unwrap();
        let second = hydrator
            .hydrate_as::<Task>(
                &metadata,
                &row(json!({"id": 2, "title": "b", "user": {"id": 10, "name": "John"}})),
                &mut context,
            )
            .unwrap();

        let first_user = first.borrow().user.clone().unwrap();
        let second_user = second.borrow().user.clone().unwrap();
        assert!(std::rc::Rc::ptr_eq(&first_user, &second_user));
        assert_eq!(context.trace.hydrated_relations, 2);
    }

    #[test]
    fn cyclic_rows_resolve_to_the_in_progress_instance() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<User>().unwrap();
        let mut context = ExecutionContext::new();

        let user = hydrator
            .hydrate_as::<User>(
                &metadata,
                &row(json!({
                    "id": 10,
                    "name": "John",
                    "tasks": [
                        {"id": 1, "title": "loop", "user": {"id": 10}},
                    ],
                })),
                &mut context,
            )
            .unwrap();

        let task = user.borrow().tasks[0].clone();
        let back_reference = task.borrow().user.clone().unwrap();
        assert!(std::rc::Rc::ptr_eq(&user, &back_reference));
        assert_eq!(context.trace.hydrated_collections, 1);
        assert_eq!(context.trace.hydration_max_depth, 2);
    }

    #[test]
    fn null_relation_is_assigned_without_recursion() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<Task>().unwrap();
        let mut context = ExecutionContext::new();

        let task = hydrator
            .hydrate_as::<Task>(
                &metadata,
                &row(json!({"id": 1, "title": "solo", "user": null})),
                &mut context,
            )
            .unwrap();

        assert!(task.borrow().user.is_none());
        assert_eq!(context.trace.hydrated_relations, 0);
    }

    #[test]
    fn missing_keys_are_skipped() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<Task>().unwrap();
        let mut context = ExecutionContext::new();

        let task = hydrator
            .hydrate_as::<Task>(&metadata, &row(json!({"id": 1})), &mut context)
            .unwrap();

        assert!(task.borrow().title.is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<Task>().unwrap();
        let mut context = ExecutionContext::new();

        let task = hydrator
            .hydrate_as::<Task>(
                &metadata,
                &row(json!({"id": 1, "title": "doc", "unknown": "value"})),
                &mut context,
            )
            .unwrap();

        assert_eq!(task.borrow().title.as_deref(), Some("doc"));
    }

    #[test]
    fn cast_failure_aborts_hydration() {
        let hydrator = hydrator();
        let metadata = hydrator.registry.metadata::<Task>().unwrap();
        let mut context = ExecutionContext::new();

        let error = hydrator
            .hydrate_as::<Task>(&metadata, &row(json!({"id": "abc"})), &mut context)
            .unwrap_err();

        assert!(matches!(error, OrmError::Cast { .. }));
    }

    #[test]
    fn integer_coercion() {
        assert_eq!(coerce(&json!("42"), FieldKind::Int).unwrap().into_i64(), Some(42));
        assert_eq!(coerce(&json!(42.0), FieldKind::Int).unwrap().into_i64(), Some(42));
        assert!(coerce(&json!(42.5), FieldKind::Int).is_err());
        assert!(coerce(&json!("abc"), FieldKind::Int).is_err());
    }

    #[test]
    fn boolean_coercion_allow_list() {
        for truthy in [json!(true), json!(1), json!("1"), json!("true")] {
            assert_eq!(coerce(&truthy, FieldKind::Bool).unwrap().into_bool(), Some(true));
        }
        for falsy in [json!(false), json!(0), json!("0"), json!("false")] {
            assert_eq!(coerce(&falsy, FieldKind::Bool).unwrap().into_bool(), Some(false));
        }
        assert!(coerce(&json!("yes"), FieldKind::Bool).is_err());
        assert!(coerce(&json!(2), FieldKind::Bool).is_err());
    }

    #[test]
    fn datetime_coercion() {
        let from_millis = coerce(&json!(1700000000000i64), FieldKind::DateTime)
            .unwrap()
            .into_datetime()
            .unwrap();
        assert_eq!(from_millis.timestamp_millis(), 1700000000000);

        let from_string = coerce(&json!("2024-05-01T10:30:00Z"), FieldKind::DateTime)
            .unwrap()
            .into_datetime()
            .unwrap();
        assert_eq!(from_string.to_rfc3339(), "2024-05-01T10:30:00+00:00");

        assert!(coerce(&json!("not a date"), FieldKind::DateTime).is_err());
    }

    #[test]
    fn null_scalars_are_accepted_as_is() {
        assert!(coerce(&json!(null), FieldKind::Int).unwrap().is_null());
        assert!(coerce(&json!(null), FieldKind::Bool).unwrap().is_null());
    }
}
