//! Plain pass-through dialect
//!
//! Walks the tree verbatim: no envelope around selections, and the root
//! response value itself is the row or row list. Cursor application is not
//! defined for this dialect; `limit` still maps to a `first` argument.

use super::{Dialect, GraphqlWalker, walk_field};
use crate::error::OrmResult;
use crate::query::ast::QueryNode;
use crate::query::options::QueryOptions;
use crate::query::printer::GraphqlPrinter;

pub struct DefaultDialect;

impl DefaultDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DefaultDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for DefaultDialect {
    fn create_walker(&self) -> Box<dyn GraphqlWalker> {
        Box::new(DefaultWalker)
    }

    fn extract_collection<'a>(
        &self,
        root: &'a serde_json::Value,
    ) -> Option<&'a serde_json::Value> {
        Some(root)
    }
}

pub struct DefaultWalker;

impl GraphqlWalker for DefaultWalker {
    fn walk(&self, query: &QueryNode, _options: &QueryOptions) -> OrmResult<String> {
        let mut printer = GraphqlPrinter::new();

        printer.line(&format!("{} {{", query.operation));
        printer.indent();

        for field in &query.fields {
            walk_field(&mut printer, field, false, false)?;
        }

        printer.outdent();
        printer.line("}");

        Ok(printer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::arguments::ArgumentValue;
    use crate::query::ast::{FieldNode, SelectionSetNode};
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_query() {
        let mut selection = SelectionSetNode::new();
        selection.add(FieldNode::new("id"));
        selection.add(FieldNode::new("title"));

        let mut query = QueryNode::new();
        query.fields.push(FieldNode::with_selection("tasks", selection));

        let graphql = DefaultWalker.walk(&query, &QueryOptions::new()).unwrap();

        assert_eq!(graphql, "query {\n  tasks {\n    id\n    title\n  }\n}");
    }

    #[test]
    fn nested_relation() {
        let mut user = SelectionSetNode::new();
        user.add(FieldNode::new("id"));
        user.add(FieldNode::new("name"));

        let mut tasks = SelectionSetNode::new();
        tasks.add(FieldNode::new("id"));
        tasks.add(FieldNode::with_selection("user", user));

        let mut query = QueryNode::new();
        query.fields.push(FieldNode::with_selection("tasks", tasks));

        let graphql = DefaultWalker.walk(&query, &QueryOptions::new()).unwrap();

        assert_eq!(
            graphql,
            "query {\n  tasks {\n    id\n    user {\n      id\n      name\n    }\n  }\n}"
        );
    }

    #[test]
    fn arguments_on_root_field() {
        let mut selection = SelectionSetNode::new();
        selection.add(FieldNode::new("id"));

        let mut field = FieldNode::with_selection("task", selection);
        field.arguments.insert("id".to_string(), ArgumentValue::Int(1));
        field
            .arguments
            .insert("active".to_string(), ArgumentValue::Bool(true));

        let mut query = QueryNode::new();
        query.fields.push(field);

        let graphql = DefaultWalker.walk(&query, &QueryOptions::new()).unwrap();

        assert!(graphql.contains("task(id: 1, active: true)"));
    }

    #[test]
    fn extract_collection_passes_through() {
        let dialect = DefaultDialect::new();
        let data = serde_json::json!([{"id": 1}, {"id": 2}]);

        assert_eq!(dialect.extract_collection(&data), Some(&data));
    }
}
