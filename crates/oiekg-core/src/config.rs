//! OIEKG Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with defaults that work against a local CoreNLP server and DBpedia.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::annotation::{AnnotationOptions, CorefAlgorithm};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Input document loading
    pub loader: LoaderConfig,

    /// Annotation engine connection and options
    pub annotator: AnnotatorConfig,

    /// Knowledge base lookup
    pub resolver: ResolverConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError { path, message },
            other => other,
        })
    }

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Loader
        if let Ok(dir) = std::env::var("OIEKG_INPUT_DIR") {
            self.loader.input_dir = PathBuf::from(dir);
        }

        // Annotation engine
        if let Ok(url) = std::env::var("CORENLP_URL") {
            self.annotator.url = url;
        }
        if let Ok(secs) = std::env::var("CORENLP_TIMEOUT_SECS") {
            self.annotator.timeout_secs = parse_number("CORENLP_TIMEOUT_SECS", secs)?;
        }
        if let Ok(algorithm) = std::env::var("COREF_ALGORITHM") {
            self.annotator.coref_algorithm = algorithm.parse()?;
        }

        // SPARQL endpoint
        if let Ok(endpoint) = std::env::var("SPARQL_ENDPOINT") {
            self.resolver.endpoint = endpoint;
        }
        if let Ok(ms) = std::env::var("SPARQL_TIMEOUT_MS") {
            self.resolver.timeout_ms = parse_number("SPARQL_TIMEOUT_MS", ms)?;
        }
        if let Ok(n) = std::env::var("RESOLVER_CONCURRENCY") {
            self.resolver.concurrency = parse_number("RESOLVER_CONCURRENCY", n)?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Document loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory scanned recursively for input files
    pub input_dir: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./data/"),
        }
    }
}

/// Annotation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// CoreNLP server base URL
    pub url: String,

    /// Request timeout in seconds (parsing long documents is slow)
    pub timeout_secs: u64,

    /// Coreference algorithm
    pub coref_algorithm: CorefAlgorithm,

    /// Only keep triples consuming the entire fragment
    pub strict_triples: bool,

    /// Substitute canonical mentions for pronouns inside triples
    pub resolve_coref: bool,
}

impl AnnotatorConfig {
    /// Apply the triple-extraction settings to a set of options
    pub fn apply_to(&self, options: AnnotationOptions) -> AnnotationOptions {
        options
            .with_coref_algorithm(self.coref_algorithm)
            .with_strict_triples(self.strict_triples)
            .with_resolved_coreference(self.resolve_coref)
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9000".to_string(),
            timeout_secs: 300,
            coref_algorithm: CorefAlgorithm::Statistical,
            strict_triples: true,
            resolve_coref: true,
        }
    }
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// SPARQL endpoint URL
    pub endpoint: String,

    /// Client-side timeout per query in milliseconds
    pub timeout_ms: u64,

    /// Maximum lookups in flight
    pub concurrency: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://dbpedia.org/sparql".to_string(),
            timeout_ms: 40_000,
            concurrency: 4,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
