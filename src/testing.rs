//! Test doubles for downstream users
//!
//! [`FakeGraphqlClient`] replaces the HTTP transport in tests: it replays a
//! queue of canned responses and records every document it was asked to
//! execute.

use crate::client::GraphqlClient;
use crate::execution::ExecutionContext;
use anyhow::{Result, bail};
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct FakeGraphqlClient {
    responses: Mutex<VecDeque<serde_json::Value>>,
    queries: Mutex<Vec<String>>,
}

impl FakeGraphqlClient {
    pub fn new(responses: impl IntoIterator<Item = serde_json::Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// The most recently executed query document.
    pub fn last_query(&self) -> Option<String> {
        self.queries.lock().expect("query lock poisoned").last().cloned()
    }

    /// Every executed query document, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("query lock poisoned").clone()
    }
}

impl GraphqlClient for FakeGraphqlClient {
    fn query(
        &self,
        document: &str,
        context: &mut ExecutionContext,
        _variables: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.queries
            .lock()
            .expect("query lock poisoned")
            .push(document.to_string());

        let Some(response) = self
            .responses
            .lock()
            .expect("response lock poisoned")
            .pop_front()
        else {
            bail!("no queued response left for query: {document}");
        };

        context.trace.endpoint = Some("fake://graphql".to_string());
        context.trace.response_size = response.to_string().len();
        if let Some(errors) = response.get("errors") {
            if !errors.is_null() {
                context.trace.errors = Some(errors.clone());
            }
        }

        Ok(response)
    }
}
