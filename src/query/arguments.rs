//! GraphQL argument values
//!
//! Arguments keep insertion order so compiled query text is deterministic;
//! re-inserting a key overrides the value but keeps its original position.

use super::options::Direction;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Ordered argument map attached to a field node.
pub type Arguments = IndexMap<String, ArgumentValue>;

/// A value with a defined GraphQL literal representation.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Backed enumeration value: emitted as its underlying value, quoted.
    Enum(String),
    /// Order direction: emitted as a bare enum literal.
    Direction(Direction),
    /// Emitted as a quoted RFC-3339 timestamp.
    DateTime(DateTime<Utc>),
    List(Vec<ArgumentValue>),
    /// Nested mapping, emitted as a brace block.
    Object(Arguments),
}

impl ArgumentValue {
    /// Convert a JSON value. Every JSON kind has a literal form, so this is
    /// total; walkers still reject non-finite floats at format time.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ArgumentValue::Null,
            serde_json::Value::Bool(b) => ArgumentValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ArgumentValue::Int(i),
                None => ArgumentValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ArgumentValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                ArgumentValue::List(items.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => ArgumentValue::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), Self::from_json(item)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ArgumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ArgumentValue::Null => serializer.serialize_unit(),
            ArgumentValue::Bool(b) => serializer.serialize_bool(*b),
            ArgumentValue::Int(i) => serializer.serialize_i64(*i),
            ArgumentValue::Float(f) => serializer.serialize_f64(*f),
            ArgumentValue::String(s) | ArgumentValue::Enum(s) => serializer.serialize_str(s),
            ArgumentValue::Direction(direction) => serializer.serialize_str(direction.as_str()),
            ArgumentValue::DateTime(datetime) => serializer.serialize_str(&datetime.to_rfc3339()),
            ArgumentValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ArgumentValue::Object(map) => {
                let mut ser = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    ser.serialize_entry(key, item)?;
                }
                ser.end()
            }
        }
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        ArgumentValue::String(value.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        ArgumentValue::String(value)
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        ArgumentValue::Int(value)
    }
}

impl From<i32> for ArgumentValue {
    fn from(value: i32) -> Self {
        ArgumentValue::Int(value.into())
    }
}

impl From<u32> for ArgumentValue {
    fn from(value: u32) -> Self {
        ArgumentValue::Int(value.into())
    }
}

impl From<f64> for ArgumentValue {
    fn from(value: f64) -> Self {
        ArgumentValue::Float(value)
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        ArgumentValue::Bool(value)
    }
}

impl From<Direction> for ArgumentValue {
    fn from(value: Direction) -> Self {
        ArgumentValue::Direction(value)
    }
}

impl From<DateTime<Utc>> for ArgumentValue {
    fn from(value: DateTime<Utc>) -> Self {
        ArgumentValue::DateTime(value)
    }
}

impl From<serde_json::Value> for ArgumentValue {
    fn from(value: serde_json::Value) -> Self {
        ArgumentValue::from_json(&value)
    }
}

impl<V: Into<ArgumentValue>> From<Vec<V>> for ArgumentValue {
    fn from(values: Vec<V>) -> Self {
        ArgumentValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<ArgumentValue>> FromIterator<V> for ArgumentValue {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        ArgumentValue::List(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_maps_every_kind() {
        let value = serde_json::json!({
            "id": 1,
            "active": true,
            "tags": ["a", "b"],
            "nested": {"depth": 2.5},
            "missing": null,
        });

        let ArgumentValue::Object(map) = ArgumentValue::from_json(&value) else {
            panic!("expected object");
        };
        assert_eq!(map["id"], ArgumentValue::Int(1));
        assert_eq!(map["active"], ArgumentValue::Bool(true));
        assert_eq!(
            map["tags"],
            ArgumentValue::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(map["missing"], ArgumentValue::Null);
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut args = Arguments::new();
        args.insert("first".to_string(), ArgumentValue::Int(1));
        args.insert("second".to_string(), ArgumentValue::Int(2));
        args.insert("first".to_string(), ArgumentValue::Int(10));

        let keys: Vec<&str> = args.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "second"]);
        assert_eq!(args["first"], ArgumentValue::Int(10));
    }
}
