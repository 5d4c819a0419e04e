//! CoreNLP server client
//!
//! Sends raw text to a running CoreNLP server and decodes the JSON
//! annotation it returns. Pipeline properties travel in the `properties`
//! query parameter, the document text is the request body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use oiekg_core::{
    AnnotatedDocument, AnnotationOptions, AnnotationStage, Annotator, AnnotatorConfig, Document,
    OiekgError, Result,
};

use crate::response;

/// HTTP client for a CoreNLP server
pub struct CoreNlpClient {
    client: Client,
    base_url: String,
}

impl CoreNlpClient {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OiekgError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create from config
    pub fn from_config(config: &AnnotatorConfig) -> Result<Self> {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pipeline properties for one request
    ///
    /// Stage options are only sent for stages that were requested.
    pub fn properties(options: &AnnotationOptions) -> serde_json::Value {
        let mut properties = serde_json::json!({
            "annotators": options.annotators(),
            "outputFormat": "json",
        });
        if options.requests(AnnotationStage::Coreference) {
            properties["coref.algorithm"] = options.coreference_algorithm.as_str().into();
        }
        if options.requests(AnnotationStage::OpenIe) {
            properties["openie.triple.strict"] = options.strict_triple_extraction.to_string().into();
            properties["openie.resolve_coref"] =
                options.resolve_coreference_in_triples.to_string().into();
        }
        properties
    }
}

#[async_trait]
impl Annotator for CoreNlpClient {
    async fn annotate(
        &self,
        document: &Document,
        options: &AnnotationOptions,
    ) -> Result<AnnotatedDocument> {
        if document.is_blank() {
            return Ok(AnnotatedDocument::empty(&document.id));
        }
        options.validate()?;

        tracing::debug!(
            document = %document.id,
            annotators = %options.annotators(),
            "sending document to CoreNLP"
        );

        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .query(&[("properties", Self::properties(options).to_string())])
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(document.text.clone())
            .send()
            .await
            .map_err(|e| OiekgError::Annotation(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(OiekgError::Annotation(format!(
                "CoreNLP error ({status}): {error_text}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OiekgError::Annotation(format!("Failed to read response: {e}")))?;

        let annotated = response::decode(&document.id, &body)?;
        tracing::debug!(
            document = %document.id,
            sentences = annotated.sentences.len(),
            triples = annotated.triples().count(),
            "document annotated"
        );
        Ok(annotated)
    }

    fn name(&self) -> &str {
        "corenlp"
    }
}
