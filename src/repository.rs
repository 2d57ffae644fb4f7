//! Entity repositories
//!
//! Thin per-entity facade over the manager: query-builder factory plus the
//! common find operations, selecting every mapped field.

use crate::entity::{EntityRef, GraphqlEntity};
use crate::error::OrmResult;
use crate::manager::GraphqlManager;
use crate::query::arguments::{ArgumentValue, Arguments};
use crate::query::builder::QueryBuilder;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct Repository<T: GraphqlEntity> {
    manager: Arc<GraphqlManager>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: GraphqlEntity> Repository<T> {
    pub fn new(manager: Arc<GraphqlManager>) -> Self {
        Self {
            manager,
            _entity: PhantomData,
        }
    }

    pub fn create_query_builder(&self) -> QueryBuilder<T> {
        QueryBuilder::new(self.manager.clone())
    }

    /// Fetch all entities matching the given root-argument criteria.
    #[track_caller]
    pub fn find_by<K, V>(&self, criteria: impl IntoIterator<Item = (K, V)>) -> OrmResult<Vec<EntityRef<T>>>
    where
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        let mut builder = self.create_query_builder();
        for (name, value) in criteria {
            builder = builder.arg(name, value);
        }
        builder.get_query()?.get_result()
    }

    /// Fetch all entities of this type.
    #[track_caller]
    pub fn find_all(&self) -> OrmResult<Vec<EntityRef<T>>> {
        self.find_by(Arguments::new())
    }

    /// Fetch the first entity matching the criteria, if any.
    #[track_caller]
    pub fn find_one_by<K, V>(
        &self,
        criteria: impl IntoIterator<Item = (K, V)>,
    ) -> OrmResult<Option<EntityRef<T>>>
    where
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        Ok(self.find_by(criteria)?.into_iter().next())
    }
}
