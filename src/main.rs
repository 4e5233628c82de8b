//! Checks the queries of one file from the command line.
//!
//! ```bash
//! # Named queries of a Hibernate project
//! query-check --artifact hibernate-core-6.4.1.Final.jar src/main/resources/META-INF/jpa-named-queries.properties
//!
//! # A file holding a single native MySQL query, with semantic tokens
//! query-check --native --artifact mysql-connector-j-8.3.0.jar --tokens report.sql
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use url::Url;

use query_language_server::analysis::{
    spawn_analysis_worker, ArtifactCapabilities, EmbeddedQuerySnippet, ProblemSeverity, QueryAnalyzer,
};
use query_language_server::config::{ConfigHandle, QueryAnalysisConfig};
use query_language_server::document::HostDocument;
use query_language_server::language_regions::LocatorRegistry;
use query_language_server::logging::init_logger;
use query_language_server::lsp::{semantic_tokens, to_lsp_diagnostics};
use query_language_server::metrics::metrics;

#[derive(Parser)]
#[command(name = "query-check")]
#[command(version)]
#[command(about = "Reports syntax problems in JPQL, HQL, native SQL and SpEL queries")]
struct Cli {
    /// File to check: a named-queries properties file, or a file holding one query
    file: PathBuf,

    /// Artifact on the project classpath, e.g. hibernate-core-6.4.1.Final.jar (repeatable)
    #[arg(long = "artifact", short = 'a')]
    artifacts: Vec<String>,

    /// Treat a plain query file as native SQL
    #[arg(long)]
    native: bool,

    /// Also print semantic tokens
    #[arg(long)]
    tokens: bool,

    /// Editor settings JSON applied over the defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long, default_value = "text", value_enum)]
    format: OutputFormat,

    /// Log level (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    no_color: bool,

    /// Also write a DEBUG session log to the cache directory
    #[arg(long)]
    log_file: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = match init_logger(cli.no_color, cli.log_level.as_deref(), cli.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {}", e);
            return ExitCode::from(2);
        }
    };
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// `Ok(false)` when an error-severity problem was found.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let text = std::fs::read_to_string(&cli.file).with_context(|| format!("reading {}", cli.file.display()))?;
    let path = std::fs::canonicalize(&cli.file).unwrap_or_else(|_| cli.file.clone());
    let url = Url::from_file_path(&path).map_err(|()| anyhow::anyhow!("not a file path: {}", path.display()))?;
    let document = HostDocument::new(url.clone(), 0, &text);

    let mut config = QueryAnalysisConfig::default();
    if let Some(settings) = &cli.settings {
        let json = std::fs::read_to_string(settings).with_context(|| format!("reading {}", settings.display()))?;
        config = QueryAnalysisConfig::from_json_str(&json)?;
    }

    let file_name = path.to_string_lossy();
    let mut snippets = LocatorRegistry::with_defaults().locate(&file_name, &text);
    if snippets.is_empty() && !file_name.ends_with(".properties") {
        snippets.push(EmbeddedQuerySnippet::new(text.clone(), 0, cli.native));
    }
    info!("Checking {} query site(s) in {}", snippets.len(), cli.file.display());

    let analyzer = Arc::new(QueryAnalyzer::new(
        Arc::new(ArtifactCapabilities::from_artifacts(&cli.artifacts)),
        Arc::new(ConfigHandle::new(config)),
    ));
    let worker = spawn_analysis_worker(analyzer);
    let problems = worker.reconcile(url.clone(), snippets.clone()).await?.problems;
    let tokens = if cli.tokens {
        worker.semantic_tokens(url, snippets).await?.tokens
    } else {
        Vec::new()
    };

    let clean = !problems.iter().any(|p| p.severity == ProblemSeverity::Error);
    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "diagnostics": to_lsp_diagnostics(&document, &problems),
                "semanticTokens": if cli.tokens { Some(semantic_tokens::semantic_tokens(&document, &tokens)) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            for diagnostic in to_lsp_diagnostics(&document, &problems) {
                println!(
                    "{}:{}:{}: {:?}: {}",
                    cli.file.display(),
                    diagnostic.range.start.line + 1,
                    diagnostic.range.start.character + 1,
                    diagnostic.severity.unwrap_or(lsp_types::DiagnosticSeverity::ERROR),
                    diagnostic.message
                );
            }
            for token in &tokens {
                let Some(position) = document.position_of(token.start) else { continue };
                println!(
                    "{}:{}: {:<9} {}",
                    position.line + 1,
                    position.character + 1,
                    token.token_type.as_str(),
                    token.text(&text).unwrap_or_default()
                );
            }
        }
    }
    debug!("{:?}", metrics().summary());
    Ok(clean)
}
