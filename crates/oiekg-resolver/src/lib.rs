//! OIEKG Resolver - Entity resolution against a knowledge base
//!
//! Looks up a resource whose `rdfs:label` matches an entity label
//! case-insensitively and takes the first result. There is no ranking
//! and no use of sentence context or entity type, so a partial label
//! match can resolve to an unrelated resource.

use futures::stream::{self, StreamExt};

use oiekg_core::{QueryService, Result};

pub mod sparql;

pub use sparql::SparqlClient;

/// Label lookup with `/argN/` placeholders
pub const LABEL_QUERY_TEMPLATE: &str = "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
SELECT ?name
WHERE {
?name rdfs:label ?label .
FILTER regex(?label, '/arg0/', 'i' ) .
}
LIMIT 1";

/// Variable holding the resolved resource
pub const NAME_VAR: &str = "name";

/// Replace every `/argN/` placeholder with `args[N]`
pub fn fill_template(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |query, (i, arg)| {
            query.replace(&format!("/arg{i}/"), arg)
        })
}

/// Label query for one entity
pub fn formulate_query(label: &str) -> String {
    fill_template(LABEL_QUERY_TEMPLATE, &[&escape_label(label)])
}

/// Escape regex metacharacters, then make the pattern safe inside a
/// single-quoted SPARQL string
fn escape_label(label: &str) -> String {
    let mut pattern = String::with_capacity(label.len());
    for c in label.chars() {
        if "\\|.?*+(){}[]^$-".contains(c) {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    let mut literal = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '\'' => literal.push_str("\\'"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            _ => literal.push(c),
        }
    }
    literal
}

/// Outcome of resolving one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub label: String,
    pub resource: Option<String>,
}

/// Greedy first-match entity resolver
pub struct EntityResolver<Q: QueryService> {
    service: Q,
    concurrency: usize,
}

impl<Q: QueryService> EntityResolver<Q> {
    pub fn new(service: Q) -> Self {
        Self {
            service,
            concurrency: 4,
        }
    }

    /// Maximum lookups in flight for [`resolve_all`](Self::resolve_all)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// First matching resource, propagating query failures
    pub async fn try_resolve(&self, label: &str) -> Result<Option<String>> {
        let query = formulate_query(label);
        let results = self.service.select(&query).await?;
        Ok(results.first_value(NAME_VAR).map(str::to_string))
    }

    /// First matching resource; failures are logged and yield `None`
    pub async fn resolve(&self, label: &str) -> Option<String> {
        match self.try_resolve(label).await {
            Ok(Some(resource)) => {
                tracing::debug!(label, %resource, "entity resolved");
                Some(resource)
            }
            Ok(None) => {
                tracing::debug!(label, "no matching resource");
                None
            }
            Err(e) => {
                tracing::error!(
                    label,
                    endpoint = self.service.endpoint(),
                    error = %e,
                    "entity lookup failed"
                );
                None
            }
        }
    }

    /// Resolve many labels concurrently
    ///
    /// Output order is completion order; every result carries its label.
    pub async fn resolve_all<I, S>(&self, labels: I) -> Vec<Resolution>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        stream::iter(labels.into_iter().map(Into::into))
            .map(|label: String| async move {
                let resource = self.resolve(&label).await;
                Resolution { label, resource }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }
}
