//! Executable queries
//!
//! A [`Query`] pairs a compiled-or-AST document with options and a manager,
//! and exposes the hydrating result accessors.

use super::options::QueryOptions;
use super::pagination::PaginatedResult;
use crate::dialect::Dialect;
use crate::entity::{EntityRef, GraphqlEntity, RawRow};
use crate::error::{OrmError, OrmResult};
use crate::manager::{GraphqlManager, QuerySource};
use crate::metadata::EntityMetadata;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Query<T: GraphqlEntity> {
    source: QuerySource,
    options: QueryOptions,
    variables: serde_json::Map<String, serde_json::Value>,
    manager: Arc<GraphqlManager>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: GraphqlEntity> Query<T> {
    pub(crate) fn new(
        source: QuerySource,
        options: QueryOptions,
        variables: serde_json::Map<String, serde_json::Value>,
        manager: Arc<GraphqlManager>,
    ) -> Self {
        Self {
            source,
            options,
            variables,
            manager,
            _entity: PhantomData,
        }
    }

    /// The query document this query will send.
    pub fn get_graphql(&self) -> OrmResult<String> {
        match &self.source {
            QuerySource::Text(text) => Ok(text.clone()),
            QuerySource::Ast(node) => self.manager.compile(node, &self.options),
        }
    }

    /// Execute and hydrate all result rows.
    #[track_caller]
    pub fn get_result(&self) -> OrmResult<Vec<EntityRef<T>>> {
        let metadata = self.manager.registry().metadata::<T>()?;

        self.manager.execute(
            &self.source,
            &self.options,
            &self.variables,
            |response, context| {
                let rows = collect_rows(self.manager.dialect(), &metadata, response)?;
                rows.into_iter()
                    .map(|row| self.manager.hydrator().hydrate_as::<T>(&metadata, row, context))
                    .collect()
            },
        )
    }

    /// Execute and hydrate the first result row, if any.
    #[track_caller]
    pub fn get_one_or_null_result(&self) -> OrmResult<Option<EntityRef<T>>> {
        Ok(self.get_result()?.into_iter().next())
    }

    /// Execute as a cursor-paginated query.
    #[track_caller]
    pub fn get_paginated_result(&self) -> OrmResult<PaginatedResult<T>> {
        let mut options = self.options.clone();
        options.paginate = true;

        fetch_page::<T>(
            self.manager.clone(),
            self.source.clone(),
            options,
            self.variables.clone(),
        )
    }
}

/// Execute one page and wire up the continuation that re-executes the same
/// logical query with updated cursor state.
#[track_caller]
fn fetch_page<T: GraphqlEntity>(
    manager: Arc<GraphqlManager>,
    source: QuerySource,
    options: QueryOptions,
    variables: serde_json::Map<String, serde_json::Value>,
) -> OrmResult<PaginatedResult<T>> {
    let metadata = manager.registry().metadata::<T>()?;

    let (items, page_info) = manager.execute(
        &source,
        &options,
        &variables,
        |response, context| {
            let root = response
                .get("data")
                .and_then(|data| data.get(&metadata.graphql_root));
            let page_info = root
                .map(|value| manager.dialect().page_info(value))
                .unwrap_or_default();

            let rows = collect_rows(manager.dialect(), &metadata, response)?;
            let items: OrmResult<Vec<EntityRef<T>>> = rows
                .into_iter()
                .map(|row| manager.hydrator().hydrate_as::<T>(&metadata, row, context))
                .collect();

            Ok((items?, page_info))
        },
    )?;

    let cursor_stack = options.cursor_stack.clone();
    let continuation = {
        let manager = manager.clone();
        Box::new(move |cursor: Option<String>, stack: Vec<String>| {
            fetch_page::<T>(
                manager.clone(),
                source.clone(),
                options.for_page(cursor, stack),
                variables.clone(),
            )
        })
    };

    Ok(PaginatedResult::new(
        items,
        page_info.has_next_page,
        !cursor_stack.is_empty(),
        page_info.end_cursor,
        cursor_stack,
        continuation,
    ))
}

/// Locate the result rows for an entity inside a raw response.
///
/// A missing or null root key means "no rows", not an error; a scalar where
/// rows were expected is an invalid response shape.
pub(crate) fn collect_rows<'a>(
    dialect: &dyn Dialect,
    metadata: &EntityMetadata,
    response: &'a serde_json::Value,
) -> OrmResult<Vec<&'a RawRow>> {
    let Some(root) = response
        .get("data")
        .and_then(|data| data.get(&metadata.graphql_root))
    else {
        return Ok(Vec::new());
    };

    if root.is_null() {
        return Ok(Vec::new());
    }

    if !root.is_object() && !root.is_array() {
        return Err(OrmError::invalid_response_shape(
            "an object or list of rows",
            root,
        ));
    }

    let Some(collection) = dialect.extract_collection(root) else {
        return Ok(Vec::new());
    };

    match collection {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(rows) => rows
            .iter()
            .map(|row| {
                row.as_object()
                    .ok_or_else(|| OrmError::invalid_response_shape("a row object", row))
            })
            .collect(),
        serde_json::Value::Object(row) => Ok(vec![row]),
        other => Err(OrmError::invalid_response_shape(
            "an object or list of rows",
            other,
        )),
    }
}
