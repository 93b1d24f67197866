use anyhow::Result;
use axum::Router;
use clap::Parser;
use qa_core::config::{CLUSTER_THRESHOLD, DUPLICATE_THRESHOLD, MIN_RELEVANCE};
use qa_core::EngineConfig;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use server::{build_app, Settings};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Corpus directory with threads, materials and ai-answers JSON/JSONL files
    #[arg(long, default_value = "./data")]
    data: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Minimum cosine similarity reported as a likely duplicate
    #[arg(long, default_value_t = DUPLICATE_THRESHOLD)]
    duplicate_threshold: f32,
    /// Minimum overlap for a thread to join an FAQ cluster
    #[arg(long, default_value_t = CLUSTER_THRESHOLD)]
    cluster_threshold: f32,
    /// Default minimum relevance for question search
    #[arg(long, default_value_t = MIN_RELEVANCE)]
    min_relevance: u32,
    /// Maximum threads clustered per FAQ request
    #[arg(long, default_value_t = 300)]
    max_cluster_docs: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let settings = Settings {
        engine: EngineConfig {
            duplicate_threshold: args.duplicate_threshold,
            cluster_threshold: args.cluster_threshold,
            min_relevance: args.min_relevance,
            ..EngineConfig::default()
        },
        max_cluster_docs: args.max_cluster_docs,
    };
    let app: Router = build_app(&args.data, settings)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
