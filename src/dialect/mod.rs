//! Dialects: pluggable query-compilation and response-extraction strategies
//!
//! A dialect models one GraphQL server convention: how a [`QueryNode`] is
//! compiled to document text (via the walker it creates), how query options
//! and filters shape root arguments, and how result rows are extracted from
//! the raw response.

pub mod default;
pub mod items;

use crate::error::{OrmError, OrmResult};
use crate::query::arguments::{ArgumentValue, Arguments};
use crate::query::ast::{FieldNode, QueryNode, SelectionSetNode};
use crate::query::expr::FilterExpression;
use crate::query::options::QueryOptions;
use crate::query::printer::GraphqlPrinter;

pub use default::{DefaultDialect, DefaultWalker};
pub use items::{ItemsDialect, ItemsWalker};

/// Compiles a query AST into dialect-specific document text.
pub trait GraphqlWalker: Send + Sync {
    fn walk(&self, query: &QueryNode, options: &QueryOptions) -> OrmResult<String>;
}

/// Pagination state read from a response's root object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A query-compilation + response-extraction strategy.
pub trait Dialect: Send + Sync {
    /// The walker paired with this dialect. The compiler always asks the
    /// active dialect, never hardcodes one.
    fn create_walker(&self) -> Box<dyn GraphqlWalker>;

    /// Merge query options into the root field's arguments.
    fn apply_query_options(&self, arguments: &mut Arguments, options: &QueryOptions) {
        if let Some(limit) = options.limit {
            arguments.insert("first".to_string(), ArgumentValue::Int(limit.into()));
        }
        if !options.order_by.is_empty() {
            let order: Arguments = options
                .order_by
                .iter()
                .map(|(field, direction)| (field.clone(), ArgumentValue::Direction(*direction)))
                .collect();
            arguments.insert("orderBy".to_string(), ArgumentValue::Object(order));
        }
    }

    /// Merge a filter expression into the root field's arguments.
    fn apply_filter(&self, arguments: &mut Arguments, filter: &FilterExpression) {
        arguments.insert("filter".to_string(), filter.to_value());
    }

    /// Extract the collection value holding result rows from the root
    /// response value. `None` means "no rows".
    fn extract_collection<'a>(&self, root: &'a serde_json::Value)
    -> Option<&'a serde_json::Value>;

    /// Pagination state carried by the root response value.
    fn page_info(&self, _root: &serde_json::Value) -> PageInfo {
        PageInfo::default()
    }
}

/// Format an argument map as `(name: literal, ...)`, empty string when there
/// is nothing to emit. `skip_nulls` drops null-valued arguments entirely.
pub(crate) fn format_arguments(arguments: &Arguments, skip_nulls: bool) -> OrmResult<String> {
    let mut pairs = Vec::with_capacity(arguments.len());

    for (name, value) in arguments {
        if skip_nulls && matches!(value, ArgumentValue::Null) {
            continue;
        }
        pairs.push(format!("{name}: {}", format_value(name, value)?));
    }

    if pairs.is_empty() {
        return Ok(String::new());
    }

    Ok(format!("({})", pairs.join(", ")))
}

/// Format a single argument value as a GraphQL literal.
pub(crate) fn format_value(argument: &str, value: &ArgumentValue) -> OrmResult<String> {
    let literal = match value {
        ArgumentValue::Null => "null".to_string(),
        ArgumentValue::Bool(value) => value.to_string(),
        ArgumentValue::Int(value) => value.to_string(),
        ArgumentValue::Float(value) => {
            if !value.is_finite() {
                return Err(OrmError::unsupported_argument(
                    argument,
                    "non-finite float has no GraphQL literal form",
                ));
            }
            value.to_string()
        }
        ArgumentValue::String(value) | ArgumentValue::Enum(value) => {
            format!("\"{}\"", escape_string(value))
        }
        ArgumentValue::Direction(direction) => direction.as_str().to_string(),
        ArgumentValue::DateTime(datetime) => {
            format!("\"{}\"", datetime.to_rfc3339())
        }
        ArgumentValue::List(items) => {
            let rendered: OrmResult<Vec<String>> = items
                .iter()
                .map(|item| format_value(argument, item))
                .collect();
            format!("[{}]", rendered?.join(", "))
        }
        ArgumentValue::Object(map) => {
            let rendered: OrmResult<Vec<String>> = map
                .iter()
                .map(|(key, item)| Ok(format!("{key}: {}", format_value(argument, item)?)))
                .collect();
            format!("{{ {} }}", rendered?.join(", "))
        }
    };

    Ok(literal)
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Walk one field node into the printer. Collection-flagged selections are
/// wrapped under a synthetic `items` field when the dialect asks for it.
pub(crate) fn walk_field(
    printer: &mut GraphqlPrinter,
    field: &FieldNode,
    wrap_collections: bool,
    skip_null_args: bool,
) -> OrmResult<()> {
    let args = format_arguments(&field.arguments, skip_null_args)?;

    let Some(selection) = &field.selection_set else {
        printer.line(&format!("{}{args}", field.name));
        return Ok(());
    };

    printer.line(&format!("{}{args} {{", field.name));
    printer.indent();

    if wrap_collections && field.is_collection {
        printer.line("items {");
        printer.indent();
        walk_selection_set(printer, selection, wrap_collections, skip_null_args)?;
        printer.outdent();
        printer.line("}");
    } else {
        walk_selection_set(printer, selection, wrap_collections, skip_null_args)?;
    }

    printer.outdent();
    printer.line("}");
    Ok(())
}

pub(crate) fn walk_selection_set(
    printer: &mut GraphqlPrinter,
    selection: &SelectionSetNode,
    wrap_collections: bool,
    skip_null_args: bool,
) -> OrmResult<()> {
    for field in &selection.fields {
        walk_field(printer, field, wrap_collections, skip_null_args)?;
    }
    Ok(())
}
