//! Fluent query builder
//!
//! Per-entity facade collecting criteria, selected field paths, filter and
//! options, then producing an executable [`Query`]. Without an explicit
//! selection the query selects every mapped field recursively; a raw
//! document override skips building entirely.

use super::arguments::{ArgumentValue, Arguments};
use super::expr::FilterExpression;
use super::options::{Direction, QueryOptions};
use super::query::Query;
use super::selection::SelectionBuilder;
use crate::entity::GraphqlEntity;
use crate::error::OrmResult;
use crate::manager::{GraphqlManager, QuerySource};
use std::marker::PhantomData;
use std::sync::Arc;

pub struct QueryBuilder<T: GraphqlEntity> {
    manager: Arc<GraphqlManager>,
    criteria: Arguments,
    selected: Option<Vec<String>>,
    options: QueryOptions,
    variables: serde_json::Map<String, serde_json::Value>,
    raw_graphql: Option<String>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: GraphqlEntity> QueryBuilder<T> {
    pub fn new(manager: Arc<GraphqlManager>) -> Self {
        Self {
            manager,
            criteria: Arguments::new(),
            selected: None,
            options: QueryOptions::new(),
            variables: serde_json::Map::new(),
            raw_graphql: None,
            _entity: PhantomData,
        }
    }

    /// Select explicit field paths (dot-separated for nesting). Replaces any
    /// previous selection.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Append one field path to the explicit selection.
    pub fn add_select(mut self, field: impl Into<String>) -> Self {
        self.selected.get_or_insert_with(Vec::new).push(field.into());
        self
    }

    /// Add a direct key/value criterion, emitted as a root field argument.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) -> Self {
        self.criteria.insert(name.into(), value.into());
        self
    }

    /// Set the filter expression; the dialect decides the argument shape.
    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.options.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.options.order_by.insert(field.into(), direction);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.options.limit = Some(limit);
        self
    }

    /// Request cursor pagination: results come back as a paginated page.
    pub fn paginate(mut self) -> Self {
        self.options.paginate = true;
        self
    }

    /// Start after the given opaque cursor.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.options.cursor = Some(cursor.into());
        self
    }

    /// Pass a true GraphQL variable through to the transport verbatim.
    pub fn variable(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Use a literal query document instead of building one.
    pub fn graphql(mut self, document: impl Into<String>) -> Self {
        self.raw_graphql = Some(document.into());
        self
    }

    pub fn get_query(self) -> OrmResult<Query<T>> {
        if let Some(document) = self.raw_graphql {
            return Ok(Query::new(
                QuerySource::Text(document),
                self.options,
                self.variables,
                self.manager,
            ));
        }

        let registry = self.manager.registry();
        let metadata = registry.metadata::<T>()?;

        let query = SelectionBuilder::new(registry).build(
            &metadata,
            self.selected.as_deref(),
            self.criteria,
            &self.options,
            self.manager.dialect(),
        )?;

        Ok(Query::new(
            QuerySource::Ast(query),
            self.options,
            self.variables,
            self.manager,
        ))
    }
}
