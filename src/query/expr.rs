//! Filter expression tree
//!
//! A small discriminated structure with a builder facade. Serialization to
//! the nested argument mapping is pure recursion; field existence is the
//! schema validator's concern, not enforced here.

use super::arguments::{ArgumentValue, Arguments};

/// A filter over query results: a comparison leaf or a logical combinator.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    Comparison {
        field: String,
        operator: String,
        value: ArgumentValue,
    },
    Logical {
        operator: String,
        expressions: Vec<FilterExpression>,
    },
}

impl FilterExpression {
    /// Serialize into the nested mapping consumed by the dialect:
    /// `{ field: { op: value } }` for comparisons, `{ op: [ ... ] }` for
    /// logical nodes.
    pub fn to_value(&self) -> ArgumentValue {
        match self {
            FilterExpression::Comparison {
                field,
                operator,
                value,
            } => {
                let mut comparison = Arguments::new();
                comparison.insert(operator.clone(), value.clone());
                let mut wrapper = Arguments::new();
                wrapper.insert(field.clone(), ArgumentValue::Object(comparison));
                ArgumentValue::Object(wrapper)
            }
            FilterExpression::Logical {
                operator,
                expressions,
            } => {
                let children = expressions.iter().map(FilterExpression::to_value).collect();
                let mut wrapper = Arguments::new();
                wrapper.insert(operator.clone(), ArgumentValue::List(children));
                ArgumentValue::Object(wrapper)
            }
        }
    }
}

/// Builder facade for filter expressions.
pub struct Expr;

impl Expr {
    fn comparison(
        field: impl Into<String>,
        operator: &str,
        value: impl Into<ArgumentValue>,
    ) -> FilterExpression {
        FilterExpression::Comparison {
            field: field.into(),
            operator: operator.to_string(),
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<ArgumentValue>) -> FilterExpression {
        Self::comparison(field, "eq", value)
    }

    pub fn neq(field: impl Into<String>, value: impl Into<ArgumentValue>) -> FilterExpression {
        Self::comparison(field, "neq", value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> FilterExpression {
        Self::comparison(field, "contains", value.into())
    }

    pub fn not_contains(field: impl Into<String>, value: impl Into<String>) -> FilterExpression {
        Self::comparison(field, "notContains", value.into())
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<String>) -> FilterExpression {
        Self::comparison(field, "startsWith", value.into())
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<String>) -> FilterExpression {
        Self::comparison(field, "endsWith", value.into())
    }

    pub fn in_<V: Into<ArgumentValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> FilterExpression {
        Self::comparison(field, "in", values.into_iter().collect::<ArgumentValue>())
    }

    pub fn is_null(field: impl Into<String>) -> FilterExpression {
        Self::comparison(field, "isNull", true)
    }

    pub fn and_x(expressions: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
        FilterExpression::Logical {
            operator: "and".to_string(),
            expressions: expressions.into_iter().collect(),
        }
    }

    pub fn or_x(expressions: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
        FilterExpression::Logical {
            operator: "or".to_string(),
            expressions: expressions.into_iter().collect(),
        }
    }
}
