//! SPARQL endpoint client
//!
//! Executes SELECT queries over HTTP GET and decodes the SPARQL 1.1
//! JSON results format.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use oiekg_core::{OiekgError, QueryService, ResolverConfig, Result, ResultSet, Term};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// HTTP client for a SPARQL endpoint
pub struct SparqlClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl SparqlClient {
    /// Create a client; `timeout` bounds every query
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OiekgError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Create from config
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl QueryService for SparqlClient {
    async fn select(&self, query: &str) -> Result<ResultSet> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
            .header("Accept", SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OiekgError::Query(format!(
                        "Query timed out after {}ms",
                        self.timeout.as_millis()
                    ))
                } else {
                    OiekgError::Query(format!("Request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(OiekgError::Query(format!(
                "SPARQL endpoint error ({status}): {error_text}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OiekgError::Query(format!("Failed to read response: {e}")))?;

        decode_results(&body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct SparqlJson {
    #[serde(default)]
    head: Head,
    results: Option<Bindings>,
}

#[derive(Debug, Default, Deserialize)]
struct Head {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Bindings {
    #[serde(default)]
    bindings: Vec<HashMap<String, Term>>,
}

/// Decode a SPARQL JSON results document
pub fn decode_results(body: &str) -> Result<ResultSet> {
    let parsed: SparqlJson = serde_json::from_str(body)
        .map_err(|e| OiekgError::Query(format!("Failed to parse SPARQL results: {e}")))?;

    let results = parsed.results.ok_or_else(|| {
        OiekgError::Query("SPARQL response has no result bindings".to_string())
    })?;

    Ok(ResultSet {
        vars: parsed.head.vars,
        rows: results.bindings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oiekg_core::TermKind;

    #[test]
    fn test_decode_results() {
        let body = r#"{
            "head": {"link": [], "vars": ["name"]},
            "results": {"distinct": false, "ordered": true, "bindings": [
                {"name": {"type": "uri", "value": "http://dbpedia.org/resource/Barack_Obama"}}
            ]}
        }"#;

        let results = decode_results(body).unwrap();
        assert_eq!(results.vars, vec!["name"]);
        assert_eq!(results.rows.len(), 1);
        assert_eq!(results.rows[0]["name"].kind, TermKind::Uri);
        assert_eq!(
            results.first_value("name"),
            Some("http://dbpedia.org/resource/Barack_Obama")
        );
    }

    #[test]
    fn test_decode_typed_literal() {
        let body = r#"{"head": {"vars": ["label"]}, "results": {"bindings": [
            {"label": {"type": "typed-literal", "datatype": "http://www.w3.org/2001/XMLSchema#string", "value": "Obama"}},
            {"label": {"type": "literal", "xml:lang": "en", "value": "Obama"}}
        ]}}"#;

        let results = decode_results(body).unwrap();
        assert_eq!(results.rows[0]["label"].kind, TermKind::TypedLiteral);
        assert_eq!(results.rows[1]["label"].kind, TermKind::Literal);
    }

    #[test]
    fn test_decode_empty_bindings() {
        let body = r#"{"head": {"vars": ["name"]}, "results": {"bindings": []}}"#;
        assert!(decode_results(body).unwrap().is_empty());
    }

    #[test]
    fn test_decode_ask_response_rejected() {
        let body = r#"{"head": {}, "boolean": true}"#;
        assert!(decode_results(body).is_err());
    }

    #[test]
    fn test_decode_html_rejected() {
        assert!(matches!(
            decode_results("<html>Virtuoso 37000 Error</html>"),
            Err(OiekgError::Query(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let client = SparqlClient::from_config(&ResolverConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "http://dbpedia.org/sparql");
        assert_eq!(client.timeout(), Duration::from_millis(40_000));
    }
}
