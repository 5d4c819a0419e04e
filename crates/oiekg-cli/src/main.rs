//! OIEKG CLI - Command-line interface
//!
//! Usage:
//!   oiekg demo [--input <dir>]
//!   oiekg solve [--text <passage>] [--endpoint <url>] [--timeout-ms <ms>]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use oiekg_annotator::{annotate_all, CoreNlpClient};
use oiekg_core::{AnnotationOptions, Annotator, AppConfig, LoggingConfig};
use oiekg_graph::{ontology, Graph};
use oiekg_resolver::{EntityResolver, SparqlClient};

mod report;

const DEFAULT_PASSAGE: &str = "Barack Hussein Obama (born August 4, 1961) is an American politician who served as \
the 44th President of the United States from January 20, 2009 to January 20, 2017. He is the only \
President who was born in Hawaii and the only President who was born outside of the contiguous 48 states. \
Obama was born in 1961 in Honolulu. He was born to a white mother and a black father. His mother, Ann \
Dunham (1942–1995), was born in Wichita, Kansas. She was mostly of English descent. His father, Barack \
Obama Sr. (1936–1982), was a married Luo Kenyan man from Nyang'oma Kogelo. In 2008, Obama was nominated \
for president a year after his campaign began and after a close primary campaign against Hillary \
Clinton. He was elected over Republican John McCain and was inaugurated on January 20, 2009. Nine months \
later, Obama was named the 2009 Nobel Peace Prize laureate.";

#[derive(Parser)]
#[command(name = "oiekg")]
#[command(about = "Open information extraction into a triple graph")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CoreNLP server URL
    #[arg(long, global = true)]
    corenlp_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate every file below a directory and materialize the triples
    Demo {
        /// Input directory (defaults to ./data/)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Annotate one passage, list entities and triples, resolve entities
    Solve {
        /// Passage to analyse (defaults to a built-in biography)
        #[arg(long)]
        text: Option<String>,

        /// SPARQL endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Per-lookup timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Lookups in flight
        #[arg(long)]
        concurrency: Option<usize>,

        /// Skip the knowledge-base lookups
        #[arg(long)]
        no_resolve: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    if let Some(url) = cli.corenlp_url {
        config.annotator.url = url;
    }

    init_tracing(&config.logging);

    match cli.command {
        Commands::Demo { input } => {
            if let Some(input) = input {
                config.loader.input_dir = input;
            }
            run_demo(&config).await
        }
        Commands::Solve {
            text,
            endpoint,
            timeout_ms,
            concurrency,
            no_resolve,
        } => {
            if let Some(endpoint) = endpoint {
                config.resolver.endpoint = endpoint;
            }
            if let Some(timeout_ms) = timeout_ms {
                config.resolver.timeout_ms = timeout_ms;
            }
            if let Some(concurrency) = concurrency {
                config.resolver.concurrency = concurrency;
            }
            let text = text.unwrap_or_else(|| DEFAULT_PASSAGE.to_string());
            run_solve(&config, &text, !no_resolve).await
        }
    }
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("{},hyper=warn,reqwest=warn", config.level).into()
    });

    if config.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Directory run: mentions, coreference, triples and the accumulated graph
async fn run_demo(config: &AppConfig) -> anyhow::Result<()> {
    let input_dir = &config.loader.input_dir;
    let documents = oiekg_loader::load_documents(input_dir)
        .with_context(|| format!("cannot load documents from {}", input_dir.display()))?;

    let annotator = CoreNlpClient::from_config(&config.annotator)?;
    let options = config.annotator.apply_to(AnnotationOptions::full_pipeline());
    let outcomes = annotate_all(&annotator, &documents, &options).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut graph = Graph::new();
    let mut failed = 0usize;

    for outcome in outcomes {
        let annotated = match outcome.result {
            Ok(annotated) => annotated,
            Err(_) => {
                failed += 1;
                continue;
            }
        };

        writeln!(out, "{}", annotated.document_id)?;
        report::section(&mut out, "Entity Mentions: ")?;
        report::entity_mentions(&mut out, &annotated)?;
        report::section(&mut out, "Coreference Chain: ")?;
        report::coref_chains(&mut out, &annotated)?;
        report::section(&mut out, "OpenIE: ")?;
        report::triples_with_confidence(&mut out, &annotated)?;
        report::triple_heads(&mut out, &annotated)?;

        for triple in annotated.triples() {
            graph.add_triple(triple);
        }
    }

    report::section(&mut out, "Write to graph ")?;
    report::statements(&mut out, &graph)?;
    out.flush()?;

    tracing::info!(
        documents = documents.len(),
        failed,
        statements = graph.len(),
        "demo run finished"
    );
    Ok(())
}

/// Single-passage run: entities, ontology, triples, entity resolution
async fn run_solve(config: &AppConfig, text: &str, resolve: bool) -> anyhow::Result<()> {
    let document = oiekg_loader::load_text("inline", text);
    let annotator = CoreNlpClient::from_config(&config.annotator)?;
    let options = config.annotator.apply_to(AnnotationOptions::open_ie());

    let annotated = annotator
        .annotate(&document, &options)
        .await
        .context("annotation failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "–– Named Entities ––")?;
    report::named_entities(&mut out, &annotated)?;

    writeln!(out, "–– Coreference Ontology ––")?;
    report::lines(&mut out, &ontology::ontology_lines(&annotated))?;

    writeln!(out, "–– Triples ––")?;
    report::triples_tab_separated(&mut out, &annotated)?;

    if resolve {
        writeln!(out, "–– Entity Resolution ––")?;
        out.flush()?;

        let resolver = EntityResolver::new(SparqlClient::from_config(&config.resolver)?)
            .with_concurrency(config.resolver.concurrency);
        let labels: Vec<String> = annotated
            .entity_mentions()
            .map(|m| m.text.clone())
            .collect();
        let resolutions = resolver.resolve_all(labels).await;
        report::resolutions(&mut out, &resolutions)?;
    }

    out.flush()?;
    Ok(())
}
