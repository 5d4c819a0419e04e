//! Decoding of the engine's JSON annotation output
//!
//! Maps `sentences`, `tokens`, `entitymentions`, `openie`,
//! `basicDependencies` and `corefs` onto the immutable annotation types.
//! Token spans in the output are 0-based and end-exclusive, token indices
//! and coreference positions are 1-based.

use std::collections::HashMap;

use serde::Deserialize;

use oiekg_core::{
    AnnotatedDocument, CorefCluster, CorefMention, EntityMention, OiekgError, RelationTriple,
    Result, Sentence, Token, TripleSlot,
};

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    sentences: Vec<RawSentence>,
    #[serde(default)]
    corefs: HashMap<String, Vec<RawCorefMention>>,
}

#[derive(Debug, Deserialize)]
struct RawSentence {
    index: usize,
    #[serde(default)]
    tokens: Vec<RawToken>,
    #[serde(default)]
    entitymentions: Vec<RawEntityMention>,
    #[serde(default)]
    openie: Vec<RawTriple>,
    #[serde(default, rename = "basicDependencies")]
    basic_dependencies: Vec<RawDependency>,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    index: usize,
    word: String,
    #[serde(default, rename = "originalText")]
    original_text: String,
    #[serde(default)]
    lemma: String,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    ner: String,
    #[serde(default, rename = "characterOffsetBegin")]
    begin: usize,
    #[serde(default, rename = "characterOffsetEnd")]
    end: usize,
    #[serde(default)]
    after: String,
}

#[derive(Debug, Deserialize)]
struct RawEntityMention {
    #[serde(rename = "tokenBegin")]
    token_begin: usize,
    #[serde(rename = "tokenEnd")]
    token_end: usize,
    text: String,
    #[serde(default)]
    ner: String,
}

#[derive(Debug, Deserialize)]
struct RawTriple {
    subject: String,
    #[serde(default, rename = "subjectSpan")]
    subject_span: Option<[usize; 2]>,
    relation: String,
    #[serde(default, rename = "relationSpan")]
    relation_span: Option<[usize; 2]>,
    object: String,
    #[serde(default, rename = "objectSpan")]
    object_span: Option<[usize; 2]>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDependency {
    governor: usize,
    dependent: usize,
}

#[derive(Debug, Deserialize)]
struct RawCorefMention {
    id: u64,
    text: String,
    #[serde(default, rename = "type")]
    mention_type: String,
    #[serde(rename = "sentNum")]
    sent_num: usize,
    #[serde(rename = "startIndex")]
    start_index: usize,
    #[serde(rename = "endIndex")]
    end_index: usize,
    #[serde(default, rename = "isRepresentativeMention")]
    is_representative: bool,
}

/// Decode an engine response body for the given document
pub fn decode(document_id: &str, body: &str) -> Result<AnnotatedDocument> {
    let raw: RawDocument = serde_json::from_str(body)
        .map_err(|e| OiekgError::Annotation(format!("Failed to parse engine response: {e}")))?;
    Ok(convert(document_id, raw))
}

fn convert(document_id: &str, raw: RawDocument) -> AnnotatedDocument {
    let coref_clusters = convert_clusters(raw.corefs);

    let sentences = raw
        .sentences
        .into_iter()
        .map(|s| convert_sentence(s, &coref_clusters))
        .collect();

    AnnotatedDocument {
        document_id: document_id.to_string(),
        sentences,
        coref_clusters,
    }
}

fn convert_clusters(corefs: HashMap<String, Vec<RawCorefMention>>) -> Vec<CorefCluster> {
    let mut clusters: Vec<CorefCluster> = corefs
        .into_iter()
        .enumerate()
        .map(|(position, (key, mentions))| CorefCluster {
            id: key.parse().unwrap_or(position as u64),
            mentions: mentions
                .into_iter()
                .map(|m| CorefMention {
                    id: m.id,
                    text: m.text,
                    sentence: m.sent_num.saturating_sub(1),
                    token_begin: m.start_index.saturating_sub(1),
                    token_end: m.end_index.saturating_sub(1),
                    mention_type: m.mention_type,
                    representative: m.is_representative,
                })
                .collect(),
        })
        .filter(|c| !c.mentions.is_empty())
        .collect();

    clusters.sort_by_key(|c| c.id);
    clusters
}

fn convert_sentence(raw: RawSentence, clusters: &[CorefCluster]) -> Sentence {
    let tokens: Vec<Token> = raw
        .tokens
        .iter()
        .map(|t| Token {
            index: t.index,
            word: t.word.clone(),
            lemma: t.lemma.clone(),
            pos: t.pos.clone(),
            ner: t.ner.clone(),
            begin: t.begin,
            end: t.end,
        })
        .collect();

    let text = raw
        .tokens
        .iter()
        .map(|t| {
            let surface = if t.original_text.is_empty() {
                &t.word
            } else {
                &t.original_text
            };
            format!("{surface}{}", t.after)
        })
        .collect::<String>()
        .trim_end()
        .to_string();

    // dependent index -> governor index, both 1-based, 0 is ROOT
    let governors: HashMap<usize, usize> = raw
        .basic_dependencies
        .iter()
        .map(|d| (d.dependent, d.governor))
        .collect();

    let entity_mentions = raw
        .entitymentions
        .into_iter()
        .map(|m| {
            let canonical = clusters
                .iter()
                .find(|c| {
                    c.mentions
                        .iter()
                        .any(|cm| links(cm, raw.index, m.token_begin, m.token_end, &tokens))
                })
                .and_then(|c| c.representative())
                .map(|rep| rep.text.clone());

            EntityMention {
                text: m.text,
                entity_type: m.ner,
                sentence: raw.index,
                token_begin: m.token_begin,
                token_end: m.token_end,
                canonical,
            }
        })
        .collect();

    let coref_mentions = clusters
        .iter()
        .flat_map(|c| c.mentions.iter())
        .filter(|m| m.sentence == raw.index)
        .cloned()
        .collect();

    let triples = raw
        .openie
        .into_iter()
        .map(|t| RelationTriple {
            subject: slot(t.subject, t.subject_span, &tokens, &governors),
            relation: slot(t.relation, t.relation_span, &tokens, &governors),
            object: slot(t.object, t.object_span, &tokens, &governors),
            confidence: t.confidence.unwrap_or(1.0).clamp(0.0, 1.0),
        })
        .collect();

    Sentence {
        index: raw.index,
        text,
        tokens,
        entity_mentions,
        coref_mentions,
        triples,
    }
}

/// Whether a coreference mention denotes the entity mention `[begin, end)`
///
/// Spans must be equal, except that the coreference span may carry one
/// leading determiner ("the United States" vs. "United States").
fn links(
    cm: &CorefMention,
    sentence: usize,
    begin: usize,
    end: usize,
    tokens: &[Token],
) -> bool {
    if cm.same_span(sentence, begin, end) {
        return true;
    }
    cm.sentence == sentence
        && cm.token_end == end
        && cm.token_begin + 1 == begin
        && tokens
            .get(cm.token_begin)
            .is_some_and(|t| t.pos == "DT")
}

fn slot(
    text: String,
    span: Option<[usize; 2]>,
    tokens: &[Token],
    governors: &HashMap<usize, usize>,
) -> TripleSlot {
    let span_tokens = span
        .and_then(|[begin, end]| tokens.get(begin..end.min(tokens.len())))
        .filter(|t| !t.is_empty() && spells(t, &text));

    match span_tokens {
        Some(span_tokens) => {
            let lemma = span_tokens
                .iter()
                .map(|t| t.lemma_or_word())
                .collect::<Vec<_>>()
                .join(" ");
            TripleSlot {
                text,
                lemma,
                head: span_head(span_tokens, governors).clone(),
            }
        }
        // Coreference-resolved slots carry the span of the representative
        // mention, which may index another sentence
        None => {
            let word = text.split_whitespace().last().unwrap_or_default().to_string();
            TripleSlot {
                lemma: text.clone(),
                head: Token {
                    word,
                    ..Default::default()
                },
                text,
            }
        }
    }
}

/// Whether `tokens` spell out `text`, ignoring whitespace
fn spells(tokens: &[Token], text: &str) -> bool {
    let words = tokens.iter().flat_map(|t| t.word.chars());
    let expected = text.chars().filter(|c| !c.is_whitespace());
    words.filter(|c| !c.is_whitespace()).eq(expected)
}

/// The span token whose governor lies outside the span
///
/// Falls back to the last token when no dependency parse is available.
fn span_head<'a>(span: &'a [Token], governors: &HashMap<usize, usize>) -> &'a Token {
    let last = &span[span.len() - 1];
    if governors.is_empty() {
        return last;
    }

    let first_index = span[0].index;
    let last_index = last.index;
    span.iter()
        .find(|t| match governors.get(&t.index) {
            Some(&governor) => governor == 0 || governor < first_index || governor > last_index,
            None => false,
        })
        .unwrap_or(last)
}
