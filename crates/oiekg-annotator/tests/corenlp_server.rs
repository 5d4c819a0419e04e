//! CoreNLP client tests against a local stand-in server

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use oiekg_annotator::{annotate_all, CoreNlpClient};
use oiekg_core::{AnnotationOptions, AnnotationStage, Annotator, Document, OiekgError};

type Received = Arc<Mutex<Vec<(Value, String)>>>;

fn elected_response() -> Value {
    json!({
        "sentences": [{
            "index": 0,
            "basicDependencies": [
                {"dep": "ROOT", "governor": 0, "dependent": 3},
                {"dep": "nsubj:pass", "governor": 3, "dependent": 1},
                {"dep": "aux:pass", "governor": 3, "dependent": 2},
                {"dep": "xcomp", "governor": 3, "dependent": 4},
                {"dep": "punct", "governor": 3, "dependent": 5}
            ],
            "tokens": [
                {"index": 1, "word": "Obama", "originalText": "Obama", "lemma": "Obama", "pos": "NNP", "ner": "PERSON", "after": " "},
                {"index": 2, "word": "was", "originalText": "was", "lemma": "be", "pos": "VBD", "ner": "O", "after": " "},
                {"index": 3, "word": "elected", "originalText": "elected", "lemma": "elect", "pos": "VBN", "ner": "O", "after": " "},
                {"index": 4, "word": "President", "originalText": "President", "lemma": "President", "pos": "NNP", "ner": "TITLE", "after": ""},
                {"index": 5, "word": ".", "originalText": ".", "lemma": ".", "pos": ".", "ner": "O", "after": ""}
            ],
            "entitymentions": [
                {"tokenBegin": 0, "tokenEnd": 1, "text": "Obama", "ner": "PERSON"},
                {"tokenBegin": 3, "tokenEnd": 4, "text": "President", "ner": "TITLE"}
            ],
            "openie": [{
                "subject": "Obama", "subjectSpan": [0, 1],
                "relation": "was elected", "relationSpan": [1, 3],
                "object": "President", "objectSpan": [3, 4]
            }]
        }],
        "corefs": {
            "1": [{"id": 1, "text": "Obama", "type": "PROPER", "sentNum": 1, "startIndex": 1, "endIndex": 2, "isRepresentativeMention": true}]
        }
    })
}

async fn annotate_handler(
    State(received): State<Received>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Result<Json<Value>, (StatusCode, String)> {
    let properties: Value = params
        .get("properties")
        .and_then(|p| serde_json::from_str(p).ok())
        .unwrap_or(Value::Null);
    received.lock().unwrap().push((properties, body.clone()));

    if body.contains("FAIL") {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "java.lang.OutOfMemoryError".to_string(),
        ));
    }
    Ok(Json(elected_response()))
}

async fn spawn_engine() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/", post(annotate_handler))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), received)
}

#[tokio::test]
async fn test_extracts_elected_triple() {
    let (url, _) = spawn_engine().await;
    let client = CoreNlpClient::new(url, Duration::from_secs(5)).unwrap();
    let doc = Document::new("inline", "Obama was elected President.");

    let annotated = client
        .annotate(&doc, &AnnotationOptions::open_ie())
        .await
        .unwrap();

    let triples: Vec<_> = annotated.triples().collect();
    assert!(!triples.is_empty());

    let triple = triples[0];
    assert_eq!(triple.subject.lemma, "Obama");
    assert!(triple.relation.lemma.contains("elect"));
    assert!(triple.object.lemma.contains("President"));
    assert!(triple.confidence > 0.0 && triple.confidence <= 1.0);
    assert_eq!(triple.relation.head.word, "elected");

    let mention = annotated.entity_mentions().next().unwrap();
    assert_eq!(mention.entity_type, "PERSON");
    assert_eq!(mention.canonical.as_deref(), Some("Obama"));
}

#[tokio::test]
async fn test_request_carries_text_and_properties() {
    let (url, received) = spawn_engine().await;
    let client = CoreNlpClient::new(url, Duration::from_secs(5)).unwrap();
    let doc = Document::new("inline", "Obama was elected President.");

    client
        .annotate(&doc, &AnnotationOptions::open_ie())
        .await
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let (properties, body) = &received[0];
    assert_eq!(body, "Obama was elected President.");
    assert_eq!(
        properties["annotators"],
        "tokenize,ssplit,pos,lemma,ner,depparse,coref,natlog,openie"
    );
    assert_eq!(properties["openie.resolve_coref"], "true");
    assert_eq!(properties["outputFormat"], "json");
}

#[tokio::test]
async fn test_empty_document_skips_engine() {
    let (url, received) = spawn_engine().await;
    let client = CoreNlpClient::new(url, Duration::from_secs(5)).unwrap();
    let doc = Document::new("blank", "   \n");

    for options in [AnnotationOptions::open_ie(), AnnotationOptions::full_pipeline()] {
        let annotated = client.annotate(&doc, &options).await.unwrap();
        assert_eq!(annotated.sentences.len(), 0);
        assert_eq!(annotated.entity_mentions().count(), 0);
        assert_eq!(annotated.triples().count(), 0);
    }
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_options_rejected_before_request() {
    let (url, received) = spawn_engine().await;
    let client = CoreNlpClient::new(url, Duration::from_secs(5)).unwrap();
    let options = AnnotationOptions::new(vec![AnnotationStage::Tokenize, AnnotationStage::OpenIe]);

    let err = client
        .annotate(&Document::new("d", "Obama was elected."), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, OiekgError::ConfigError(_)));
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_engine_failure_is_isolated_per_document() {
    let (url, _) = spawn_engine().await;
    let client = CoreNlpClient::new(url, Duration::from_secs(5)).unwrap();
    let documents = vec![
        Document::new("first", "Obama was elected President."),
        Document::new("broken", "FAIL this one"),
        Document::new("third", "Obama was elected President."),
    ];

    let outcomes = annotate_all(&client, &documents, &AnnotationOptions::open_ie()).await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    assert_eq!(outcomes[1].document_id, "broken");
    match &outcomes[1].result {
        Err(OiekgError::Annotation(msg)) => assert!(msg.contains("OutOfMemoryError")),
        other => panic!("expected annotation error, got {other:?}"),
    }
    assert!(outcomes[2].result.is_ok());
}

#[tokio::test]
async fn test_unreachable_engine() {
    // Bind and drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CoreNlpClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = client
        .annotate(&Document::new("d", "text"), &AnnotationOptions::open_ie())
        .await
        .unwrap_err();
    assert!(matches!(err, OiekgError::Annotation(_)));
}
