//! Schema conformance validation
//!
//! Matches entity metadata against an introspected schema map and produces
//! human-readable violation strings: missing types, missing fields (with a
//! nearest-match suggestion), and scalar-kind mismatches.

use super::types::SchemaTypeMap;
use crate::entity::{EntityTypeInfo, FieldKind};
use crate::error::{OrmError, OrmResult};
use crate::metadata::{EntityMetadata, MetadataRegistry};
use std::sync::Arc;

/// GraphQL scalar names each field kind is allowed to map to.
fn accepted_scalars(kind: FieldKind) -> Option<&'static [&'static str]> {
    match kind {
        FieldKind::Int => Some(&["Int", "ID"]),
        FieldKind::Float => Some(&["Float"]),
        FieldKind::String => Some(&["String", "ID", "Date", "DateTime", "Time", "JSON", "UUID"]),
        FieldKind::Bool => Some(&["Boolean"]),
        FieldKind::DateTime => Some(&["DateTime", "Date", "Time", "String"]),
        FieldKind::Raw => None,
    }
}

pub struct SchemaValidator {
    registry: Arc<MetadataRegistry>,
}

impl SchemaValidator {
    pub fn new(registry: Arc<MetadataRegistry>) -> Self {
        Self { registry }
    }

    /// Validate the given entity types against the schema map.
    pub fn validate(&self, entities: &[EntityTypeInfo], schema: &SchemaTypeMap) -> Vec<String> {
        let mut violations = Vec::new();

        for info in entities {
            match self.registry.metadata_of(info) {
                Ok(metadata) => violations.extend(self.validate_entity(&metadata, schema)),
                Err(error) => violations.push(format!(
                    "Could not load metadata for \"{}\": {error}",
                    info.type_name
                )),
            }
        }

        violations
    }

    /// Validate every entity registered with the metadata registry.
    pub fn validate_registered(&self, schema: &SchemaTypeMap) -> Vec<String> {
        self.validate(&self.registry.registered(), schema)
    }

    /// Like [`validate`](Self::validate), but fails hard on any violation.
    pub fn ensure_valid(
        &self,
        entities: &[EntityTypeInfo],
        schema: &SchemaTypeMap,
    ) -> OrmResult<()> {
        let violations = self.validate(entities, schema);
        if violations.is_empty() {
            return Ok(());
        }
        Err(OrmError::SchemaValidation { violations })
    }

    fn validate_entity(&self, metadata: &EntityMetadata, schema: &SchemaTypeMap) -> Vec<String> {
        let mut violations = Vec::new();

        let Some(type_name) = resolve_graphql_type_name(&metadata.graphql_root, schema) else {
            violations.push(format!(
                "[{}] GraphQL type matching root \"{}\" not found in schema.",
                metadata.type_name, metadata.graphql_root,
            ));
            return violations;
        };

        let schema_fields = &schema[&type_name].fields;

        for field in &metadata.fields {
            if field.ignore_validation {
                continue;
            }

            let Some(schema_field) = schema_fields.get(&field.mapped_from) else {
                let suggestion = suggest_field(&field.mapped_from, schema_fields.keys());
                let did_you_mean = suggestion
                    .map(|candidate| format!(" Did you mean \"{candidate}\"?"))
                    .unwrap_or_default();

                violations.push(format!(
                    "[{}] Field \"{}\" (mapped from \"{}\") does not exist on GraphQL type \"{}\".{}",
                    metadata.type_name, field.local_name, field.mapped_from, type_name, did_you_mean,
                ));
                continue;
            };

            if field.is_relation() {
                continue;
            }

            if schema_field.kind != "SCALAR" && schema_field.kind != "ENUM" {
                continue;
            }

            let Some(scalar_name) = schema_field.name.as_deref() else {
                continue;
            };
            let Some(accepted) = accepted_scalars(field.kind) else {
                continue;
            };

            if !accepted.contains(&scalar_name) {
                violations.push(format!(
                    "[{}] Field \"{}\" has kind \"{}\" but GraphQL scalar is \"{}\" (expected one of: {}).",
                    metadata.type_name,
                    field.mapped_from,
                    field.kind,
                    scalar_name,
                    accepted.join(", "),
                ));
            }
        }

        violations
    }
}

/// Resolve an entity's root field name to a schema OBJECT type: capitalized,
/// capitalized singular, then verbatim.
fn resolve_graphql_type_name(root_name: &str, schema: &SchemaTypeMap) -> Option<String> {
    let capitalized = capitalize(root_name);
    let singular = capitalize(root_name.trim_end_matches('s'));

    for candidate in [capitalized, singular, root_name.to_string()] {
        if schema
            .get(&candidate)
            .is_some_and(|schema_type| schema_type.kind == "OBJECT")
        {
            return Some(candidate);
        }
    }

    None
}

fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Nearest field name within edit distance 3.
fn suggest_field<'a>(
    field_name: &str,
    candidates: impl Iterator<Item = &'a String>,
) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        let distance = strsim::levenshtein(field_name, candidate);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((candidate.as_str(), distance));
        }
    }

    best.filter(|(_, distance)| *distance <= 3)
        .map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityDef, FieldDef, GraphqlEntity, Value};
    use crate::schema::types::{SchemaFieldType, SchemaType};
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    struct Task {
        id: i64,
        title: Option<String>,
        done: bool,
    }

    impl GraphqlEntity for Task {
        fn definition() -> EntityDef {
            EntityDef::new("tasks")
                .field(FieldDef::scalar("id", FieldKind::Int).identifier())
                .field(FieldDef::scalar("title", FieldKind::String))
                .field(FieldDef::scalar("done", FieldKind::Bool))
        }

        fn apply_field(&mut self, field: &str, value: Value) -> OrmResult<()> {
            match field {
                "id" => self.id = value.into_i64().unwrap_or_default(),
                "title" => self.title = value.into_string(),
                "done" => self.done = value.into_bool().unwrap_or_default(),
                other => return Err(OrmError::unknown_field("Task", other)),
            }
            Ok(())
        }
    }

    fn schema_with(fields: &[(&str, &str, &str)]) -> SchemaTypeMap {
        let mut map = SchemaTypeMap::new();
        map.insert(
            "Task".to_string(),
            SchemaType {
                kind: "OBJECT".to_string(),
                fields: fields
                    .iter()
                    .map(|(name, kind, scalar)| {
                        (
                            name.to_string(),
                            SchemaFieldType {
                                kind: kind.to_string(),
                                name: Some(scalar.to_string()),
                            },
                        )
                    })
                    .collect::<HashMap<_, _>>(),
            },
        );
        map
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new(Arc::new(MetadataRegistry::new()))
    }

    #[test]
    fn accepts_conforming_metadata() {
        let schema = schema_with(&[
            ("id", "SCALAR", "ID"),
            ("title", "SCALAR", "String"),
            ("done", "SCALAR", "Boolean"),
        ]);

        let violations = validator().validate(&[EntityTypeInfo::of::<Task>()], &schema);
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn reports_missing_type() {
        let violations = validator().validate(&[EntityTypeInfo::of::<Task>()], &SchemaTypeMap::new());

        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("matching root \"tasks\" not found"));
    }

    #[test]
    fn suggests_near_matches_for_missing_fields() {
        let schema = schema_with(&[
            ("id", "SCALAR", "ID"),
            ("titel", "SCALAR", "String"),
            ("done", "SCALAR", "Boolean"),
        ]);

        let violations = validator().validate(&[EntityTypeInfo::of::<Task>()], &schema);

        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("\"title\""));
        assert!(violations[0].contains("Did you mean \"titel\"?"));
    }

    #[test]
    fn reports_scalar_mismatches() {
        let schema = schema_with(&[
            ("id", "SCALAR", "ID"),
            ("title", "SCALAR", "String"),
            ("done", "SCALAR", "Int"),
        ]);

        let violations = validator().validate(&[EntityTypeInfo::of::<Task>()], &schema);

        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("GraphQL scalar is \"Int\""));
    }

    #[test]
    fn ensure_valid_wraps_violations() {
        let error = validator()
            .ensure_valid(&[EntityTypeInfo::of::<Task>()], &SchemaTypeMap::new())
            .unwrap_err();

        assert!(matches!(error, OrmError::SchemaValidation { .. }));
    }
}
