//! WebSearch CLI - Command-line interface for the advanced web search agent
//!
//! Runs the iterative search loop from the terminal, replays agent action-group events,
//! and manages the configuration file.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use websearch_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success, AgentConfig,
    LoggingConfig, RunResult,
};
use websearch_research::{ActionGroupHandler, AdvancedSearchEngine};

#[derive(Parser)]
#[command(name = "websearch")]
#[command(about = "Iterative web search that refines its query until the results answer it")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Provider {
    Tavily,
    Serper,
}

impl Provider {
    fn as_str(&self) -> &'static str {
        match self {
            Provider::Tavily => "tavily",
            Provider::Serper => "serper",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run an advanced search
    Search {
        /// Question to answer
        query: String,

        /// Maximum refinement iterations
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Search provider to use
        #[arg(long, value_enum)]
        provider: Option<Provider>,

        /// Print the run result as JSON
        #[arg(long)]
        json: bool,

        /// Show the query used in each iteration
        #[arg(long)]
        trace: bool,
    },

    /// Handle an agent action-group event read from a JSON file ("-" for stdin)
    Invoke {
        /// Event file
        event: PathBuf,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,

        /// With --validate, also check that the LLM provider answers
        #[arg(long)]
        check_llm: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Config commands must work even when the config file is broken
    let config = match &cli.command {
        Commands::Config { .. } => None,
        _ => Some(AgentConfig::load(cli.config.as_deref())?),
    };

    let mut logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(LoggingConfig::default);
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting websearch CLI v{}", env!("CARGO_PKG_VERSION"));

    match (cli.command, config) {
        (
            Commands::Search {
                query,
                max_iterations,
                provider,
                json,
                trace,
            },
            Some(config),
        ) => handle_search(query, max_iterations, provider, json, trace, config).await,
        (Commands::Invoke { event }, Some(config)) => handle_invoke(event, config).await,
        (
            Commands::Config {
                show,
                init,
                force,
                validate,
                check_llm,
            },
            _,
        ) => handle_config(cli.config, show, init, force, validate, check_llm).await,
        _ => bail!("Configuration was not loaded"),
    }
}

async fn handle_search(
    query: String,
    max_iterations: Option<usize>,
    provider: Option<Provider>,
    json: bool,
    trace: bool,
    mut config: AgentConfig,
) -> anyhow::Result<()> {
    if let Some(provider) = provider {
        config.search.provider = provider.as_str().to_string();
        // The key loaded for the previous provider belongs to a different vendor
        config.search.api_key = None;
        config.apply_env_overrides();
    }

    log_operation_start!("search_command", query = %query);

    let engine = AdvancedSearchEngine::from_config(&config)
        .await
        .map_err(|e| {
            log_operation_error!("create_engine", e);
            e
        })
        .context("Failed to set up the search engine")?;
    let engine = match max_iterations {
        Some(max_iterations) => engine.with_max_iterations(max_iterations)?,
        None => engine,
    };

    if !json {
        println!("🔍 Searching: {}", query);
    }

    let run = engine.run_with_trace(&query).await.map_err(|e| {
        log_operation_error!("search_command", e);
        e
    })?;

    log_operation_success!(
        "search_command",
        iterations_used = run.result.iterations_used
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&run.result)?);
        return Ok(());
    }

    if trace {
        for record in &run.iterations {
            println!(
                "🔄 Iteration {}: {} ({} queries, {} results{})",
                record.iteration,
                record.query,
                record.rewritten_queries.len(),
                record.results_retrieved,
                if record.judge_degraded {
                    ", judge failed"
                } else {
                    ""
                }
            );
        }
        println!();
    }

    print_result(&run.result);
    Ok(())
}

fn print_result(result: &RunResult) {
    if result.is_answered() {
        println!("✅ Answer:\n");
    } else {
        println!("⚠️  No satisfactory answer found:\n");
    }
    println!("{}", result.final_answer.answer);

    if !result.final_answer.references.is_empty() {
        println!("\n📚 References:");
        for (i, reference) in result.final_answer.references.iter().enumerate() {
            println!("  {}. {} - {}", i + 1, reference.title, reference.url);
        }
    }

    println!(
        "\n📊 {} iteration(s), {} queries, {} results",
        result.iterations_used, result.total_queries_issued, result.total_results_retrieved
    );
}

async fn handle_invoke(event_path: PathBuf, config: AgentConfig) -> anyhow::Result<()> {
    let raw = if event_path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)?;
        buffer
    } else {
        tokio::fs::read_to_string(&event_path)
            .await
            .with_context(|| format!("Failed to read event file {:?}", event_path))?
    };
    let event: serde_json::Value = serde_json::from_str(&raw).context("Event is not valid JSON")?;

    let engine = AdvancedSearchEngine::from_config(&config)
        .await
        .context("Failed to set up the search engine")?;
    let response = ActionGroupHandler::new(engine).handle_value(event).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn handle_config(
    config_path: Option<PathBuf>,
    show: bool,
    init: bool,
    force: bool,
    validate: bool,
    check_llm: bool,
) -> anyhow::Result<()> {
    if !(show || init || validate) {
        bail!("Nothing to do, pass --init, --show or --validate");
    }

    if init {
        let path = config_path.clone().unwrap_or_else(AgentConfig::default_path);
        if path.exists() && !force {
            bail!("{:?} already exists, pass --force to overwrite it", path);
        }

        AgentConfig::default().save_to_file(&path)?;
        println!("✅ Configuration initialized at: {:?}", path);
        println!("📝 Set TAVILY_API_KEY (or SERPER_API_KEY) and your LLM provider key before searching.");
    }

    if show {
        let config = AgentConfig::load(config_path.as_deref())?;
        println!("📋 Current configuration:");
        println!("{}", toml::to_string_pretty(&config.redacted())?);
    }

    if validate {
        let config = AgentConfig::load(config_path.as_deref())?;
        if let Err(e) = config.validate() {
            println!("❌ Configuration validation failed: {}", e);
            return Err(e.into());
        }
        println!("✅ Configuration is valid");

        if check_llm {
            println!("🤖 Checking {} with model {}...", config.llm.provider, config.llm.fast_model);
            websearch_llm::check_connection(&config).await?;
            println!("✅ LLM provider is reachable");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args_parsing() {
        let cli = Cli::try_parse_from([
            "websearch",
            "search",
            "latest rust release",
            "--max-iterations",
            "2",
            "--provider",
            "serper",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Search {
                query,
                max_iterations,
                provider,
                json,
                trace,
            } => {
                assert_eq!(query, "latest rust release");
                assert_eq!(max_iterations, Some(2));
                assert_eq!(provider, Some(Provider::Serper));
                assert!(json);
                assert!(!trace);
            }
            _ => panic!("Expected search command"),
        }
    }

    #[test]
    fn test_config_args_parsing() {
        let cli =
            Cli::try_parse_from(["websearch", "config", "--validate", "--check-llm", "-v"]).unwrap();

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Config {
                validate: true,
                check_llm: true,
                init: false,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result = Cli::try_parse_from(["websearch", "search", "q", "--provider", "bing"]);
        assert!(result.is_err());
    }
}
