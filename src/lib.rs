//! Object-relational mapping over GraphQL
//!
//! Declarative entity definitions are compiled into GraphQL query documents,
//! sent through a pluggable transport client, and hydrated back into typed
//! object graphs — including nested relations, collections and cursor-based
//! pagination.
//!
//! The core pieces:
//! - [`entity`]: the [`GraphqlEntity`] trait and declarative definitions
//! - [`metadata`]: derived field/relation mappings, cached per type
//! - [`query`]: AST, selection builder, filter expressions, fluent builder
//! - [`dialect`]: pluggable query-compilation and response-extraction
//!   strategies
//! - [`hydrator`]: row-to-entity conversion with an identity map
//! - [`manager`]: per-request orchestration, tracing, pagination

pub mod client;
pub mod collector;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod execution;
pub mod hydrator;
pub mod manager;
pub mod metadata;
pub mod query;
pub mod repository;
pub mod schema;
pub mod testing;

// Re-export the common surface for convenience
pub use client::{GraphqlClient, HttpGraphqlClient};
pub use collector::{MemoryCollector, NoopCollector, TraceCollector};
pub use dialect::{DefaultDialect, Dialect, GraphqlWalker, ItemsDialect, PageInfo};
pub use entity::{
    AnyEntity, EntityDef, EntityRef, EntityTypeInfo, FieldDef, FieldKind, GraphqlEntity, RawRow,
    Value,
};
pub use error::{OrmError, OrmResult};
pub use execution::{ExecutionContext, ID};
pub use hydrator::EntityHydrator;
pub use manager::{GraphqlManager, QuerySource};
pub use metadata::{EntityMetadata, FieldMetadata, MetadataRegistry};
pub use query::{
    ArgumentValue, Arguments, Direction, Expr, FilterExpression, PaginatedResult, Query,
    QueryBuilder, QueryNode, QueryOptions, QueryTrace,
};
pub use repository::Repository;
pub use schema::{SchemaIntrospector, SchemaTypeMap, SchemaValidator};
