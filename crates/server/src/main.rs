//! GraphRAG QA CLI
//!
//! Runs the HTTP API or a single operation against the same stores.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graphrag_qa_agents::IndexStatus;
use graphrag_qa_server::{start_server, AppConfig, AppContext};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// GraphRAG QA - question answering over text and an entity graph
#[derive(Parser)]
#[command(name = "graphrag-qa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use in-memory databases (nothing is persisted)
    #[arg(long, global = true)]
    memory: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address (defaults to GRAPHRAG_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (defaults to GRAPHRAG_PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Split, embed and store a text document
    Ingest {
        /// Path to a UTF-8 text file
        path: PathBuf,
    },

    /// Extract triples from a sample of the corpus into the graph
    BuildGraph,

    /// Answer one question and print the JSON response
    Ask {
        question: String,
    },

    /// Show graph and vector index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so command output stays parseable
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AppConfig::from_env();
    if cli.memory {
        info!("Using in-memory databases");
        config = config.in_memory();
    }

    let ctx = AppContext::initialize(&config)
        .await
        .context("Failed to initialize application")?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.host.clone());
            let port = port.unwrap_or(config.port);
            start_server(ctx, &host, port)
                .await
                .context("Server failed")?;
        }
        Commands::Ingest { path } => {
            cmd_ingest(ctx, path).await?;
        }
        Commands::BuildGraph => {
            cmd_build_graph(ctx).await?;
        }
        Commands::Ask { question } => {
            cmd_ask(ctx, question).await?;
        }
        Commands::Stats => {
            cmd_stats(ctx).await?;
        }
    }

    Ok(())
}

async fn cmd_ingest(ctx: AppContext, path: PathBuf) -> Result<()> {
    let count = ctx
        .index
        .ingest_file(&path)
        .await
        .with_context(|| format!("Failed to ingest {}", path.display()))?;

    println!("✓ Ingested {} chunks from {}", count, path.display());
    Ok(())
}

async fn cmd_build_graph(ctx: AppContext) -> Result<()> {
    let report = ctx.retrieval.build_graph_from_corpus().await;

    println!("Graph build:");
    println!("  • Chunks processed: {}", report.chunks_processed);
    println!("  • Triples parsed: {}", report.triples_parsed);
    println!("  • Triples stored: {}", report.triples_stored);
    println!("  • Lines skipped: {}", report.lines_skipped);

    Ok(())
}

async fn cmd_ask(ctx: AppContext, question: String) -> Result<()> {
    let exchange = ctx.answers.answer(&question).await?;
    let body = serde_json::to_string_pretty(&exchange.to_response())?;
    println!("{}", body);
    Ok(())
}

async fn cmd_stats(ctx: AppContext) -> Result<()> {
    println!("Graph store:");
    match ctx.graph.stats().await {
        Some(stats) => {
            println!("  • Entities: {}", stats.entity_count);
            println!("  • Relations: {}", stats.relation_count);
        }
        None => println!("  • Disconnected (using fallback triples)"),
    }

    println!("Vector index:");
    match ctx.index.status().await {
        IndexStatus::Ready { chunks } => println!("  • Ready ({} chunks)", chunks),
        IndexStatus::Fallback { reason } => println!("  • Fallback: {}", reason),
    }

    Ok(())
}
