//! Console report
//!
//! Every writer takes an `io::Write` so the report can be captured.

use std::io::{self, Write};

use oiekg_core::AnnotatedDocument;
use oiekg_graph::Graph;
use oiekg_resolver::Resolution;

const RULE: &str = "---------------------";

/// Boxed section title
pub fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")
}

/// `text : TYPE` per entity mention
pub fn entity_mentions(out: &mut impl Write, doc: &AnnotatedDocument) -> io::Result<()> {
    for mention in doc.entity_mentions() {
        writeln!(out, "{} : {}", mention.text, mention.entity_type)?;
    }
    Ok(())
}

/// `canonical : TYPE` per entity mention
pub fn named_entities(out: &mut impl Write, doc: &AnnotatedDocument) -> io::Result<()> {
    for mention in doc.entity_mentions() {
        writeln!(out, "{} : {}", mention.canonical_or_text(), mention.entity_type)?;
    }
    Ok(())
}

/// Coreference chains followed by the coreference mentions of each sentence
pub fn coref_chains(out: &mut impl Write, doc: &AnnotatedDocument) -> io::Result<()> {
    for cluster in &doc.coref_clusters {
        writeln!(out, "\t{cluster}")?;
    }
    for sentence in &doc.sentences {
        writeln!(out, "---")?;
        writeln!(out, "mentions")?;
        for mention in &sentence.coref_mentions {
            writeln!(out, "\t{} ({})", mention.text, mention.mention_type)?;
        }
    }
    Ok(())
}

/// `[confidence]: (S, …), (R, …), (O, …)` over lemma glosses, confidence unrounded
pub fn triples_with_confidence(out: &mut impl Write, doc: &AnnotatedDocument) -> io::Result<()> {
    for triple in doc.triples() {
        writeln!(
            out,
            "[{:?}]: (S, {}), (R, {}), (O, {})",
            triple.confidence, triple.subject.lemma, triple.relation.lemma, triple.object.lemma
        )?;
    }
    Ok(())
}

/// Head tokens of each triple as they go into the graph
pub fn triple_heads(out: &mut impl Write, doc: &AnnotatedDocument) -> io::Result<()> {
    for triple in doc.triples() {
        writeln!(
            out,
            "Triples : ({} ||| {} ||| {} ||| )",
            triple.subject.head.word, triple.relation.head.word, triple.object.head.word
        )?;
    }
    Ok(())
}

/// Tab-separated `confidence subject relation object`
pub fn triples_tab_separated(out: &mut impl Write, doc: &AnnotatedDocument) -> io::Result<()> {
    for triple in doc.triples() {
        writeln!(
            out,
            "{:?}\t{}\t{}\t{}",
            triple.confidence, triple.subject.lemma, triple.relation.lemma, triple.object.lemma
        )?;
    }
    Ok(())
}

/// One line per graph statement
pub fn statements(out: &mut impl Write, graph: &Graph) -> io::Result<()> {
    for line in graph.lines() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Plain lines, e.g. the ontology listing
pub fn lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn resolutions(out: &mut impl Write, resolutions: &[Resolution]) -> io::Result<()> {
    for resolution in resolutions {
        match &resolution.resource {
            Some(resource) => writeln!(out, "'{}' was resolved to {resource}", resolution.label)?,
            None => writeln!(out, "'{}' could not be resolved", resolution.label)?,
        }
    }
    Ok(())
}
