//! Annotation request types
//!
//! Describes which stages the external annotation engine should run and
//! the stage-specific options that influence triple extraction.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::{OiekgError, Result};

/// A single stage of the annotation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStage {
    Tokenize,
    SentenceSplit,
    PartOfSpeech,
    Lemma,
    NamedEntities,
    EntityMentions,
    DependencyParse,
    Coreference,
    NaturalLogic,
    OpenIe,
}

impl AnnotationStage {
    /// Annotator name understood by the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tokenize => "tokenize",
            Self::SentenceSplit => "ssplit",
            Self::PartOfSpeech => "pos",
            Self::Lemma => "lemma",
            Self::NamedEntities => "ner",
            Self::EntityMentions => "entitymentions",
            Self::DependencyParse => "depparse",
            Self::Coreference => "coref",
            Self::NaturalLogic => "natlog",
            Self::OpenIe => "openie",
        }
    }

    /// Stages whose output this stage consumes
    pub fn prerequisites(&self) -> &'static [AnnotationStage] {
        match self {
            Self::Tokenize => &[],
            Self::SentenceSplit => &[Self::Tokenize],
            Self::PartOfSpeech => &[Self::SentenceSplit],
            Self::Lemma => &[Self::PartOfSpeech],
            Self::NamedEntities => &[Self::Lemma],
            Self::EntityMentions => &[Self::NamedEntities],
            Self::DependencyParse => &[Self::PartOfSpeech],
            Self::Coreference => &[Self::NamedEntities, Self::DependencyParse],
            Self::NaturalLogic => &[Self::Lemma, Self::DependencyParse],
            Self::OpenIe => &[Self::NaturalLogic],
        }
    }
}

impl std::fmt::Display for AnnotationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnnotationStage {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tokenize" => Ok(Self::Tokenize),
            "ssplit" => Ok(Self::SentenceSplit),
            "pos" => Ok(Self::PartOfSpeech),
            "lemma" => Ok(Self::Lemma),
            "ner" => Ok(Self::NamedEntities),
            "entitymentions" => Ok(Self::EntityMentions),
            "depparse" => Ok(Self::DependencyParse),
            "coref" => Ok(Self::Coreference),
            "natlog" => Ok(Self::NaturalLogic),
            "openie" => Ok(Self::OpenIe),
            _ => Err(ConfigError::InvalidValue {
                key: "annotators".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Coreference algorithm used by the engine
///
/// `Statistical` is the fast mode; `Neural` trades latency for accuracy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorefAlgorithm {
    #[default]
    Statistical,
    Neural,
    Deterministic,
}

impl CorefAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statistical => "statistical",
            Self::Neural => "neural",
            Self::Deterministic => "deterministic",
        }
    }
}

impl std::str::FromStr for CorefAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "statistical" => Ok(Self::Statistical),
            "neural" => Ok(Self::Neural),
            "deterministic" | "dcoref" => Ok(Self::Deterministic),
            _ => Err(ConfigError::InvalidValue {
                key: "coref_algorithm".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Options for one annotation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationOptions {
    /// Stages to run, in order
    pub stages: Vec<AnnotationStage>,

    /// Coreference algorithm
    pub coreference_algorithm: CorefAlgorithm,

    /// Only emit a triple when it consumes the entire sentence fragment
    pub strict_triple_extraction: bool,

    /// Replace pronominal mentions inside triples with their canonical mention
    pub resolve_coreference_in_triples: bool,
}

impl AnnotationOptions {
    /// Create options for the given stages with engine defaults
    pub fn new(stages: Vec<AnnotationStage>) -> Self {
        Self {
            stages,
            coreference_algorithm: CorefAlgorithm::default(),
            strict_triple_extraction: false,
            resolve_coreference_in_triples: false,
        }
    }

    /// Every stage, including entity mentions, as used by the `demo` run
    pub fn full_pipeline() -> Self {
        use AnnotationStage::*;
        Self::new(vec![
            Tokenize,
            SentenceSplit,
            PartOfSpeech,
            Lemma,
            NamedEntities,
            DependencyParse,
            NaturalLogic,
            EntityMentions,
            Coreference,
            OpenIe,
        ])
    }

    /// Open IE with coreference-resolved, strict triples
    pub fn open_ie() -> Self {
        use AnnotationStage::*;
        Self::new(vec![
            Tokenize,
            SentenceSplit,
            PartOfSpeech,
            Lemma,
            NamedEntities,
            DependencyParse,
            Coreference,
            NaturalLogic,
            OpenIe,
        ])
        .with_coref_algorithm(CorefAlgorithm::Statistical)
        .with_strict_triples(true)
        .with_resolved_coreference(true)
    }

    pub fn with_coref_algorithm(mut self, algorithm: CorefAlgorithm) -> Self {
        self.coreference_algorithm = algorithm;
        self
    }

    pub fn with_strict_triples(mut self, strict: bool) -> Self {
        self.strict_triple_extraction = strict;
        self
    }

    pub fn with_resolved_coreference(mut self, resolve: bool) -> Self {
        self.resolve_coreference_in_triples = resolve;
        self
    }

    /// Whether a stage was requested
    pub fn requests(&self, stage: AnnotationStage) -> bool {
        self.stages.contains(&stage)
    }

    /// Comma-separated annotator list for the engine
    pub fn annotators(&self) -> String {
        self.stages
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Check that every stage is preceded by its prerequisites
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(OiekgError::ConfigError(
                "no annotation stages requested".to_string(),
            ));
        }

        for (position, stage) in self.stages.iter().enumerate() {
            let earlier = &self.stages[..position];
            if earlier.contains(stage) {
                return Err(OiekgError::ConfigError(format!(
                    "annotation stage '{stage}' requested twice"
                )));
            }
            if let Some(missing) = stage
                .prerequisites()
                .iter()
                .find(|required| !earlier.contains(required))
            {
                return Err(OiekgError::ConfigError(format!(
                    "annotation stage '{stage}' requires '{missing}' earlier in the pipeline"
                )));
            }
        }

        Ok(())
    }
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self::full_pipeline()
    }
}
