//! OIEKG Core - Domain models, traits, and shared types
//!
//! This crate defines the abstractions shared by the pipeline stages:
//! - Documents and their annotations (sentences, tokens, mentions, triples)
//! - Coreference clusters
//! - SPARQL result sets
//! - Common error types
//! - The `Annotator` and `QueryService` capability traits
//! - Configuration management

pub mod annotation;
pub mod config;

pub use annotation::{AnnotationOptions, AnnotationStage, CorefAlgorithm};
pub use config::{
    AnnotatorConfig, AppConfig, ConfigError, LoaderConfig, LoggingConfig, ResolverConfig,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for OIEKG operations
#[derive(Error, Debug)]
pub enum OiekgError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for OiekgError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OiekgError>;

// ============================================================================
// Documents
// ============================================================================

/// A plain-text input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source path or label
    pub id: String,

    /// Plain text body
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// True when there is nothing to annotate
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ============================================================================
// Annotations
// ============================================================================

/// A word or punctuation unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 1-based position in the sentence
    pub index: usize,

    /// Surface text
    pub word: String,

    /// Lemma (empty unless lemmatization ran)
    pub lemma: String,

    /// Part-of-speech tag
    pub pos: String,

    /// Named-entity label ("O" for none)
    pub ner: String,

    /// Character offsets in the document
    pub begin: usize,
    pub end: usize,
}

impl Token {
    /// Lemma, falling back to the surface text
    pub fn lemma_or_word(&self) -> &str {
        if self.lemma.is_empty() {
            &self.word
        } else {
            &self.lemma
        }
    }
}

/// A named-entity mention: tokens `[token_begin, token_end)` of one sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub text: String,
    pub entity_type: String,
    pub sentence: usize,
    pub token_begin: usize,
    pub token_end: usize,

    /// Representative mention text of the coreference cluster, if any
    pub canonical: Option<String>,
}

impl EntityMention {
    /// Canonical mention text, or the mention itself outside coreference
    pub fn canonical_or_text(&self) -> &str {
        self.canonical.as_deref().unwrap_or(&self.text)
    }
}

/// One span of a coreference cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefMention {
    pub id: u64,
    pub text: String,

    /// 0-based sentence index
    pub sentence: usize,
    pub token_begin: usize,
    pub token_end: usize,

    /// PROPER, PRONOMINAL, NOMINAL or LIST
    pub mention_type: String,
    pub representative: bool,
}

impl CorefMention {
    /// Whether this mention spans exactly the given tokens of a sentence
    pub fn same_span(&self, sentence: usize, token_begin: usize, token_end: usize) -> bool {
        self.sentence == sentence && self.token_begin == token_begin && self.token_end == token_end
    }
}

impl std::fmt::Display for CorefMention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" in sentence {}", self.text, self.sentence + 1)
    }
}

/// Mentions judged to denote the same entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefCluster {
    pub id: u64,
    pub mentions: Vec<CorefMention>,
}

impl CorefCluster {
    /// The designated representative mention
    pub fn representative(&self) -> Option<&CorefMention> {
        self.mentions
            .iter()
            .find(|m| m.representative)
            .or_else(|| self.mentions.first())
    }
}

impl std::fmt::Display for CorefCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mentions: Vec<String> = self.mentions.iter().map(|m| m.to_string()).collect();
        write!(f, "CHAIN{}-[{}]", self.id, mentions.join(", "))
    }
}

/// One slot (subject, relation or object) of an extracted triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleSlot {
    /// Surface text of the span
    pub text: String,

    /// Space-joined lemmas of the span
    pub lemma: String,

    /// Syntactic head token of the span
    pub head: Token,
}

/// An open-domain (subject, relation, object) extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationTriple {
    pub subject: TripleSlot,
    pub relation: TripleSlot,
    pub object: TripleSlot,

    /// Extractor confidence in [0, 1]
    pub confidence: f64,
}

/// A sentence with its annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// 0-based index in the document
    pub index: usize,

    /// Sentence text reconstructed from its tokens
    pub text: String,

    pub tokens: Vec<Token>,
    pub entity_mentions: Vec<EntityMention>,
    pub coref_mentions: Vec<CorefMention>,
    pub triples: Vec<RelationTriple>,
}

/// Result of annotating one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub document_id: String,
    pub sentences: Vec<Sentence>,
    pub coref_clusters: Vec<CorefCluster>,
}

impl AnnotatedDocument {
    /// An annotation with no sentences
    pub fn empty(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            sentences: Vec::new(),
            coref_clusters: Vec::new(),
        }
    }

    /// All entity mentions in document order
    pub fn entity_mentions(&self) -> impl Iterator<Item = &EntityMention> {
        self.sentences.iter().flat_map(|s| s.entity_mentions.iter())
    }

    /// All triples in document order
    pub fn triples(&self) -> impl Iterator<Item = &RelationTriple> {
        self.sentences.iter().flat_map(|s| s.triples.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

// ============================================================================
// Query Results
// ============================================================================

/// Kind of RDF term bound in a result row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    Uri,
    Literal,
    #[serde(alias = "typed-literal")]
    TypedLiteral,
    Bnode,
}

/// A bound RDF term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    #[serde(rename = "type")]
    pub kind: TermKind,
    pub value: String,
}

/// Tabular result of a SELECT query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Projected variable names
    pub vars: Vec<String>,

    /// One map per solution, keyed by variable name
    pub rows: Vec<HashMap<String, Term>>,
}

impl ResultSet {
    /// Value of `var` in the first row
    pub fn first_value(&self, var: &str) -> Option<&str> {
        self.rows
            .first()
            .and_then(|row| row.get(var))
            .map(|term| term.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Boundary over an external annotation engine
#[async_trait::async_trait]
pub trait Annotator: Send + Sync {
    /// Annotate one document
    async fn annotate(
        &self,
        document: &Document,
        options: &AnnotationOptions,
    ) -> Result<AnnotatedDocument>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// Boundary over an external SPARQL query service
#[async_trait::async_trait]
pub trait QueryService: Send + Sync {
    /// Execute a SELECT query
    async fn select(&self, query: &str) -> Result<ResultSet>;

    /// Endpoint description for logging
    fn endpoint(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
