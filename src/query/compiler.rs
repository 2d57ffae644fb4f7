//! Query compilation

use super::ast::QueryNode;
use super::options::QueryOptions;
use crate::dialect::GraphqlWalker;
use crate::error::OrmResult;

/// Compiles a query AST into document text through a dialect's walker.
pub struct QueryCompiler {
    walker: Box<dyn GraphqlWalker>,
}

impl QueryCompiler {
    pub fn new(walker: Box<dyn GraphqlWalker>) -> Self {
        Self { walker }
    }

    pub fn compile(&self, query: &QueryNode, options: &QueryOptions) -> OrmResult<String> {
        self.walker.walk(query, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Dialect, DefaultDialect, ItemsDialect};
    use crate::query::ast::{FieldNode, SelectionSetNode};

    fn tasks_query() -> QueryNode {
        let mut selection = SelectionSetNode::new();
        selection.add(FieldNode::new("id"));

        let mut query = QueryNode::new();
        query.fields.push(FieldNode::with_selection("tasks", selection));
        query
    }

    #[test]
    fn compiler_uses_the_dialect_walker() {
        let compiler = QueryCompiler::new(DefaultDialect::new().create_walker());
        let graphql = compiler.compile(&tasks_query(), &QueryOptions::new()).unwrap();
        assert!(graphql.contains("tasks"));

        let compiler = QueryCompiler::new(ItemsDialect::new().create_walker());
        let graphql = compiler.compile(&tasks_query(), &QueryOptions::new()).unwrap();
        assert!(graphql.contains("items {"));
    }
}
