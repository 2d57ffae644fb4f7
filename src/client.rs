//! Transport client collaborator
//!
//! The core delegates network execution to a [`GraphqlClient`]. Transport
//! failures are forwarded untouched; the client records endpoint, response
//! size and response errors into the execution trace so observability
//! survives failures.

use crate::execution::ExecutionContext;
use anyhow::{Context, Result};

pub trait GraphqlClient: Send + Sync {
    /// Execute a compiled query document and return the decoded response
    /// body (a mapping with at least a `data` key, optionally `errors`).
    fn query(
        &self,
        document: &str,
        context: &mut ExecutionContext,
        variables: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value>;
}

/// Blocking HTTP transport posting `{query, variables}` to one endpoint.
pub struct HttpGraphqlClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    headers: Vec<(String, String)>,
}

impl HttpGraphqlClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            headers: Vec::new(),
        }
    }

    /// Attach a header to every request, e.g. an authorization token.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, TLS).
    pub fn with_http_client(mut self, http: reqwest::blocking::Client) -> Self {
        self.http = http;
        self
    }
}

impl GraphqlClient for HttpGraphqlClient {
    fn query(
        &self,
        document: &str,
        context: &mut ExecutionContext,
        variables: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value> {
        context.trace.endpoint = Some(self.endpoint.clone());

        let body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        let mut request = self.http.post(&self.endpoint).json(&body);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .with_context(|| format!("GraphQL request to {} failed", self.endpoint))?;

        let text = response
            .text()
            .context("failed to read GraphQL response body")?;
        context.trace.response_size = text.len();

        let parsed: serde_json::Value = serde_json::from_str(&text)
            .context("GraphQL response is not valid JSON")?;

        if let Some(errors) = parsed.get("errors") {
            if !errors.is_null() {
                context.trace.errors = Some(errors.clone());
            }
        }

        Ok(parsed)
    }
}
