//! Schema introspection
//!
//! Runs the standard introspection query through the transport client and
//! condenses the result into a [`SchemaTypeMap`] for validation.

use super::types::{SchemaFieldType, SchemaType, SchemaTypeMap};
use crate::client::GraphqlClient;
use crate::error::{OrmError, OrmResult};
use crate::execution::ExecutionContext;
use std::collections::HashMap;

const INTROSPECTION_QUERY: &str = "\
query IntrospectionQuery {
  __schema {
    types {
      name
      kind
      fields(includeDeprecated: true) {
        name
        type {
          name
          kind
          ofType {
            name
            kind
            ofType {
              name
              kind
            }
          }
        }
      }
    }
  }
}";

pub struct SchemaIntrospector<'a> {
    client: &'a dyn GraphqlClient,
}

impl<'a> SchemaIntrospector<'a> {
    pub fn new(client: &'a dyn GraphqlClient) -> Self {
        Self { client }
    }

    pub fn introspect(&self) -> OrmResult<SchemaTypeMap> {
        let mut context = ExecutionContext::new();

        let response = self
            .client
            .query(INTROSPECTION_QUERY, &mut context, &serde_json::Map::new())
            .map_err(OrmError::from)?;

        let types = response
            .get("data")
            .and_then(|data| data.get("__schema"))
            .and_then(|schema| schema.get("types"))
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| {
                OrmError::invalid_response_shape("an introspection __schema.types list", &response)
            })?;

        let mut map = SchemaTypeMap::new();

        for entry in types {
            let Some(name) = entry.get("name").and_then(serde_json::Value::as_str) else {
                continue;
            };
            let Some(kind) = entry.get("kind").and_then(serde_json::Value::as_str) else {
                continue;
            };

            // Built-in introspection types carry no mapping information.
            if name.starts_with("__") {
                continue;
            }

            let mut fields = HashMap::new();
            if let Some(raw_fields) = entry.get("fields").and_then(serde_json::Value::as_array) {
                for field in raw_fields {
                    let Some(field_name) = field.get("name").and_then(serde_json::Value::as_str)
                    else {
                        continue;
                    };
                    let field_type = field
                        .get("type")
                        .map(resolve_field_type)
                        .unwrap_or_else(unknown_field_type);
                    fields.insert(field_name.to_string(), field_type);
                }
            }

            map.insert(
                name.to_string(),
                SchemaType {
                    kind: kind.to_string(),
                    fields,
                },
            );
        }

        Ok(map)
    }
}

/// Unwrap NON_NULL/LIST wrapper chains down to the named type.
fn resolve_field_type(raw: &serde_json::Value) -> SchemaFieldType {
    let mut current = raw;

    loop {
        let kind = current.get("kind").and_then(serde_json::Value::as_str);
        if !matches!(kind, Some("NON_NULL") | Some("LIST")) {
            break;
        }
        match current.get("ofType") {
            Some(inner) if !inner.is_null() => current = inner,
            _ => break,
        }
    }

    SchemaFieldType {
        kind: current
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("UNKNOWN")
            .to_string(),
        name: current
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
    }
}

fn unknown_field_type() -> SchemaFieldType {
    SchemaFieldType {
        kind: "UNKNOWN".to_string(),
        name: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGraphqlClient;
    use serde_json::json;

    #[test]
    fn condenses_introspection_response() {
        let client = FakeGraphqlClient::new([json!({
            "data": {"__schema": {"types": [
                {
                    "name": "Task",
                    "kind": "OBJECT",
                    "fields": [
                        {"name": "id", "type": {"kind": "NON_NULL", "name": null,
                            "ofType": {"kind": "SCALAR", "name": "ID"}}},
                        {"name": "tags", "type": {"kind": "LIST", "name": null,
                            "ofType": {"kind": "NON_NULL", "name": null,
                                "ofType": {"kind": "SCALAR", "name": "String"}}}},
                    ],
                },
                {"name": "__Schema", "kind": "OBJECT", "fields": []},
            ]}}
        })]);

        let map = SchemaIntrospector::new(&client).introspect().unwrap();

        assert_eq!(map.len(), 1);
        let task = &map["Task"];
        assert_eq!(task.kind, "OBJECT");
        assert_eq!(task.fields["id"].name.as_deref(), Some("ID"));
        assert_eq!(task.fields["tags"].kind, "SCALAR");
        assert_eq!(task.fields["tags"].name.as_deref(), Some("String"));
    }

    #[test]
    fn rejects_unexpected_shape() {
        let client = FakeGraphqlClient::new([json!({"data": {}})]);

        let error = SchemaIntrospector::new(&client).introspect().unwrap_err();
        assert!(matches!(error, OrmError::InvalidResponseShape { .. }));
    }
}
