//! OIEKG Graph - In-memory triple graph
//!
//! Materializes extracted relation triples into a graph of
//! (subject, predicate, object) statements. Resources are keyed by their
//! exact identifier string, so textual variants of the same entity stay
//! distinct. Repeated triples produce repeated statements.

use std::collections::HashMap;

use oiekg_core::RelationTriple;

pub mod ontology;

/// Index of a resource in its graph
pub type ResourceId = usize;

/// Object position of a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Resource(ResourceId),
    Literal(String),
}

/// A single (subject, predicate, object) statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: ResourceId,
    pub predicate: String,
    pub object: Node,
}

/// Statement store with get-or-create resource identity
///
/// Statements enumerate in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    resources: Vec<String>,
    index: HashMap<String, ResourceId>,
    statements: Vec<Statement>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the resource identified by `identifier`
    pub fn resource(&mut self, identifier: &str) -> ResourceId {
        if let Some(&id) = self.index.get(identifier) {
            return id;
        }

        let id = self.resources.len();
        self.resources.push(identifier.to_string());
        self.index.insert(identifier.to_string(), id);
        id
    }

    /// Look up an existing resource
    pub fn find_resource(&self, identifier: &str) -> Option<ResourceId> {
        self.index.get(identifier).copied()
    }

    /// Identifier of a resource
    pub fn resource_name(&self, id: ResourceId) -> Option<&str> {
        self.resources.get(id).map(String::as_str)
    }

    /// Add a statement whose object is a resource
    pub fn add_resource_statement(&mut self, subject: &str, predicate: &str, object: &str) {
        let subject = self.resource(subject);
        let object = self.resource(object);
        self.statements.push(Statement {
            subject,
            predicate: predicate.to_string(),
            object: Node::Resource(object),
        });
    }

    /// Add a statement whose object is a plain text literal
    pub fn add_literal(&mut self, subject: &str, predicate: &str, value: impl Into<String>) {
        let subject = self.resource(subject);
        self.statements.push(Statement {
            subject,
            predicate: predicate.to_string(),
            object: Node::Literal(value.into()),
        });
    }

    /// Materialize one extracted triple from its head tokens
    ///
    /// The object always becomes a resource.
    pub fn add_triple(&mut self, triple: &RelationTriple) {
        self.add_resource_statement(
            &triple.subject.head.word,
            &triple.relation.head.word,
            &triple.object.head.word,
        );
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Render one statement as `subject predicate object .`
    pub fn format_statement(&self, statement: &Statement) -> String {
        let subject = self.resource_name(statement.subject).unwrap_or_default();
        let object = match &statement.object {
            Node::Resource(id) => self.resource_name(*id).unwrap_or_default().to_string(),
            Node::Literal(value) => quote_literal(value),
        };
        format!("{subject} {} {object} .", statement.predicate)
    }

    /// One line per statement, in enumeration order
    ///
    /// The iterator is lazy and can be recreated at will; an unchanged
    /// graph always yields the same lines.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.statements.iter().map(|s| self.format_statement(s))
    }
}

/// Build a fresh graph from triples in document order
pub fn materialize<'a, I>(triples: I) -> Graph
where
    I: IntoIterator<Item = &'a RelationTriple>,
{
    let mut graph = Graph::new();
    for triple in triples {
        graph.add_triple(triple);
    }
    tracing::debug!(
        statements = graph.len(),
        resources = graph.resource_count(),
        "materialized triples"
    );
    graph
}

/// Serialize a graph to statement lines
pub fn serialize(graph: &Graph) -> impl Iterator<Item = String> + '_ {
    graph.lines()
}

/// Double-quote a literal, escaping `\` and `"`
pub fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

// ============================================================================
// Tests
// ============================================================================
