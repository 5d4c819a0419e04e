//! OIEKG Annotator - Annotation engine boundary
//!
//! Hands documents to an external NLP engine and returns immutable
//! [`AnnotatedDocument`] values: sentences, tokens, entity mentions,
//! coreference clusters and open-domain relation triples.

use oiekg_core::{AnnotatedDocument, AnnotationOptions, Annotator, Document, Result};

pub mod corenlp;
pub mod response;

pub use corenlp::CoreNlpClient;

/// Annotation result for one document of a batch
#[derive(Debug)]
pub struct AnnotationOutcome {
    pub document_id: String,
    pub result: Result<AnnotatedDocument>,
}

/// Annotate documents one after another
///
/// A failing document yields an `Err` outcome; the remaining documents
/// are still annotated.
pub async fn annotate_all<A>(
    annotator: &A,
    documents: &[Document],
    options: &AnnotationOptions,
) -> Vec<AnnotationOutcome>
where
    A: Annotator + ?Sized,
{
    let mut outcomes = Vec::with_capacity(documents.len());

    for document in documents {
        let result = annotator.annotate(document, options).await;
        if let Err(e) = &result {
            tracing::error!(
                document = %document.id,
                engine = annotator.name(),
                error = %e,
                "annotation failed"
            );
        }
        outcomes.push(AnnotationOutcome {
            document_id: document.id.clone(),
            result,
        });
    }

    outcomes
}
