//! Ontology listing for entity mentions
//!
//! Declares every entity type and every mention as an OWL class, with
//! the mention a subclass of its type and the source sentence attached as
//! an `rdfs:comment`. Repeated mentions repeat their declarations.

use oiekg_core::AnnotatedDocument;

use crate::quote_literal;

pub const PREFIXES: [&str; 3] = [
    "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>",
    "PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>",
    "PREFIX owl: <http://www.w3.org/2002/07/owl#>",
];

const CONTINUATION: &str = "               ";

/// Ontology lines for every entity mention of a document
pub fn ontology_lines(document: &AnnotatedDocument) -> Vec<String> {
    let mut lines: Vec<String> = PREFIXES.iter().map(|p| p.to_string()).collect();

    for sentence in &document.sentences {
        for mention in &sentence.entity_mentions {
            let entity_type = &mention.entity_type;
            lines.push(format!("{entity_type} rdf:type owl:Class."));
            lines.push(format!("{} rdf:type owl:Class ;", mention.text));
            lines.push(format!("{CONTINUATION}rdfs:subClassOf :{entity_type} ;"));
            lines.push(format!(
                "{CONTINUATION}rdfs:comment {} .",
                quote_literal(&sentence.text)
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use oiekg_core::{EntityMention, Sentence};

    fn mention(text: &str, entity_type: &str) -> EntityMention {
        EntityMention {
            text: text.to_string(),
            entity_type: entity_type.to_string(),
            sentence: 0,
            token_begin: 0,
            token_end: 1,
            canonical: None,
        }
    }

    #[test]
    fn test_prefixes_only_for_empty_document() {
        let lines = ontology_lines(&AnnotatedDocument::empty("d"));
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("PREFIX owl:"));
    }

    #[test]
    fn test_mention_declarations() {
        let document = AnnotatedDocument {
            document_id: "d".to_string(),
            sentences: vec![Sentence {
                index: 0,
                text: "Obama was born in Honolulu.".to_string(),
                tokens: Vec::new(),
                entity_mentions: vec![mention("Obama", "PERSON"), mention("Honolulu", "CITY")],
                coref_mentions: Vec::new(),
                triples: Vec::new(),
            }],
            coref_clusters: Vec::new(),
        };

        let lines = ontology_lines(&document);
        assert_eq!(lines.len(), 3 + 8);
        assert_eq!(lines[3], "PERSON rdf:type owl:Class.");
        assert_eq!(lines[4], "Obama rdf:type owl:Class ;");
        assert_eq!(lines[5], "               rdfs:subClassOf :PERSON ;");
        assert_eq!(
            lines[6],
            "               rdfs:comment \"Obama was born in Honolulu.\" ."
        );
        assert_eq!(lines[7], "CITY rdf:type owl:Class.");
    }
}
