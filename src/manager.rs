//! Execution orchestrator
//!
//! [`GraphqlManager`] ties the compiler, transport client and hydrator
//! together per request. Each execution gets a fresh
//! [`ExecutionContext`]; the completed trace is reported to the collector
//! exactly once per call, success or failure.

use crate::client::GraphqlClient;
use crate::collector::{NoopCollector, TraceCollector};
use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::execution::ExecutionContext;
use crate::hydrator::EntityHydrator;
use crate::metadata::MetadataRegistry;
use crate::query::ast::QueryNode;
use crate::query::compiler::QueryCompiler;
use crate::query::options::QueryOptions;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// A query to execute: prebuilt AST or literal document text.
#[derive(Debug, Clone)]
pub enum QuerySource {
    Ast(QueryNode),
    Text(String),
}

pub struct GraphqlManager {
    registry: Arc<MetadataRegistry>,
    client: Arc<dyn GraphqlClient>,
    hydrator: EntityHydrator,
    dialect: Box<dyn Dialect>,
    collector: Box<dyn TraceCollector>,
}

impl GraphqlManager {
    pub fn new(client: Arc<dyn GraphqlClient>, dialect: impl Dialect + 'static) -> Self {
        let registry = Arc::new(MetadataRegistry::new());
        Self {
            hydrator: EntityHydrator::new(registry.clone()),
            registry,
            client,
            dialect: Box::new(dialect),
            collector: Box::new(NoopCollector),
        }
    }

    pub fn with_collector(mut self, collector: impl TraceCollector + 'static) -> Self {
        self.collector = Box::new(collector);
        self
    }

    pub fn with_registry(mut self, registry: Arc<MetadataRegistry>) -> Self {
        self.hydrator = EntityHydrator::new(registry.clone());
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Arc<MetadataRegistry> {
        &self.registry
    }

    pub fn hydrator(&self) -> &EntityHydrator {
        &self.hydrator
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Compile an AST through the active dialect's walker.
    pub fn compile(&self, query: &QueryNode, options: &QueryOptions) -> OrmResult<String> {
        QueryCompiler::new(self.dialect.create_walker()).compile(query, options)
    }

    /// Execute a query and convert the raw response through `hydration`.
    ///
    /// The execution context is created here and lives for exactly this
    /// call; the trace is handed to the collector on every path.
    #[track_caller]
    pub fn execute<R>(
        &self,
        source: &QuerySource,
        options: &QueryOptions,
        variables: &serde_json::Map<String, serde_json::Value>,
        hydration: impl FnOnce(&serde_json::Value, &mut ExecutionContext) -> OrmResult<R>,
    ) -> OrmResult<R> {
        let caller = Location::caller();

        let mut context = ExecutionContext::new();
        context.trace.caller = Some(caller.into());
        context.trace.variables = variables.clone();

        let started = Instant::now();

        let result = (|| {
            let compiled = match source {
                QuerySource::Ast(node) => {
                    context.trace.ast = Some(serde_json::to_value(node)?);
                    self.compile(node, options)?
                }
                QuerySource::Text(text) => text.clone(),
            };
            context.trace.graphql = compiled.clone();

            let response = self
                .client
                .query(&compiled, &mut context, variables)
                .map_err(crate::error::OrmError::from)?;

            hydration(&response, &mut context)
        })();

        context.trace.duration = started.elapsed();
        self.collector.record(&context.trace);
        self.log(&context);

        result
    }

    fn log(&self, context: &ExecutionContext) {
        let trace = &context.trace;

        if trace.errors.is_some() {
            error!(
                query_id = %trace.id,
                endpoint = trace.endpoint.as_deref().unwrap_or(""),
                duration_ms = trace.duration.as_millis() as u64,
                response_size = trace.response_size,
                errors = ?trace.errors,
                "GraphQL query returned errors"
            );
            return;
        }

        debug!(
            query_id = %trace.id,
            endpoint = trace.endpoint.as_deref().unwrap_or(""),
            duration_ms = trace.duration.as_millis() as u64,
            response_size = trace.response_size,
            hydrated_entities = trace.hydrated_entities,
            hydrated_relations = trace.hydrated_relations,
            "GraphQL query executed"
        );
    }
}
