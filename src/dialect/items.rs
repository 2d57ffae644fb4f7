//! Items-envelope dialect
//!
//! For servers that wrap every collection in an `items` envelope with
//! `hasNextPage`/`endCursor` pagination info (Data API builder style
//! endpoints). Root selections and nested collection selections are wrapped
//! one level deeper under a synthetic `items` field; pagination-enabled
//! queries additionally request `hasNextPage`/`endCursor` and receive
//! `first`/`after` arguments derived from the query options.

use super::{Dialect, GraphqlWalker, PageInfo, format_arguments, walk_selection_set};
use crate::error::OrmResult;
use crate::query::arguments::ArgumentValue;
use crate::query::ast::{FieldNode, QueryNode};
use crate::query::options::QueryOptions;
use crate::query::printer::GraphqlPrinter;

pub struct ItemsDialect;

impl ItemsDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ItemsDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for ItemsDialect {
    fn create_walker(&self) -> Box<dyn GraphqlWalker> {
        Box::new(ItemsWalker)
    }

    fn extract_collection<'a>(
        &self,
        root: &'a serde_json::Value,
    ) -> Option<&'a serde_json::Value> {
        root.get("items")
    }

    fn page_info(&self, root: &serde_json::Value) -> PageInfo {
        PageInfo {
            has_next_page: root
                .get("hasNextPage")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false),
            end_cursor: root
                .get("endCursor")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }
}

pub struct ItemsWalker;

impl GraphqlWalker for ItemsWalker {
    fn walk(&self, query: &QueryNode, options: &QueryOptions) -> OrmResult<String> {
        let mut printer = GraphqlPrinter::new();

        printer.line(&format!("{} {{", query.operation));
        printer.indent();

        for field in &query.fields {
            walk_root_field(&mut printer, field, options)?;
        }

        printer.outdent();
        printer.line("}");

        Ok(printer.finish())
    }
}

fn walk_root_field(
    printer: &mut GraphqlPrinter,
    field: &FieldNode,
    options: &QueryOptions,
) -> OrmResult<()> {
    let mut arguments = field.arguments.clone();
    if options.paginate {
        if let Some(limit) = options.limit {
            arguments.insert("first".to_string(), ArgumentValue::Int(limit.into()));
        }
        if let Some(cursor) = &options.cursor {
            arguments.insert("after".to_string(), ArgumentValue::String(cursor.clone()));
        }
    }

    let args = format_arguments(&arguments, true)?;

    printer.line(&format!("{}{args} {{", field.name));
    printer.indent();

    printer.line("items {");
    printer.indent();
    if let Some(selection) = &field.selection_set {
        walk_selection_set(printer, selection, true, true)?;
    }
    printer.outdent();
    printer.line("}");

    if options.paginate {
        printer.line("hasNextPage");
        printer.line("endCursor");
    }

    printer.outdent();
    printer.line("}");
    Ok(())
}
