//! WebSearch Web Server
//!
//! Serves the advanced web search agent over HTTP.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use websearch_core::{init_logging, AgentConfig};
use websearch_web::{AppState, WebConfig, WebSearchServerBuilder};

/// WebSearch Web Server - HTTP interface for the advanced web search agent
#[derive(Parser)]
#[command(name = "websearch-web")]
#[command(about = "HTTP interface for the advanced web search agent")]
#[command(version)]
struct Args {
    /// Server host to bind to (defaults to WEBSEARCH_HOST or 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on (defaults to WEBSEARCH_PORT or 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let agent_config = AgentConfig::load(args.config.as_deref())?;

    let mut logging_config = agent_config.logging.clone();
    if let Some(level) = &args.log_level {
        logging_config.level = level.clone();
    }
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let mut builder = WebSearchServerBuilder::with_config(WebConfig::from_env());
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }

    info!(
        search_provider = %agent_config.search.provider,
        llm_provider = %agent_config.llm.provider,
        "🏗️  Building server"
    );

    let state = AppState::from_config(agent_config)
        .await
        .context("Failed to set up the search engine")?;

    builder.build(state).start().await?;
    Ok(())
}
