use agenda_collector::apis::{create_extractor, supported_sources};
use agenda_collector::config::Config;
use agenda_collector::fetcher::Fetcher;
use agenda_collector::storage::EventStore;
use agenda_collector::tasks::{run_collection, run_scheduled, AppContext, JobOutcome};
use agenda_collector::types::{EventFilter, EventStatus, Extractor};
use agenda_collector::{logging, metrics};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "agenda_collector")]
#[command(about = "Cultural events collector for the newsletter agenda")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: String,

    /// Restrict to these sources (comma-separated)
    #[arg(long, global = true)]
    sources: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one collection over all sources and print the result
    Run,
    /// Run collection periodically until interrupted
    Schedule {
        /// Minutes between runs (defaults to the configured interval)
        #[arg(long)]
        interval_minutes: Option<u64>,
    },
    /// List registered sources
    Sources,
    /// Run a single extractor and print its candidates without storing them
    Extract {
        #[arg(long)]
        source: String,
    },
    /// List stored events
    Events {
        /// draft, published or archived
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config).with_context(|| format!("loading {}", cli.config))?;
    if config.metrics.enabled {
        metrics::init_metrics(config.metrics.port);
    }

    let only: Option<Vec<String>> = cli.sources.as_deref().map(|list| {
        list.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    match cli.command {
        Commands::Run => {
            let ctx = AppContext::from_config(config)?;
            let outcome = run_collection(&ctx, only.as_deref()).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let JobOutcome::Failed { error } = outcome {
                return Err(anyhow!(error));
            }
        }
        Commands::Schedule { interval_minutes } => {
            let minutes = interval_minutes.unwrap_or(config.scheduler.interval_minutes).max(1);
            let ctx = AppContext::from_config(config)?;
            info!("Scheduling collection every {} minutes", minutes);
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
            };
            let runs = run_scheduled(&ctx, only.as_deref(), Duration::from_secs(minutes * 60), shutdown).await;
            info!("Scheduler stopped after {} runs", runs);
        }
        Commands::Sources => {
            for id in supported_sources() {
                let disabled = config.collector.disabled_sources.iter().any(|d| d == id);
                println!("{}{}", id, if disabled { " (disabled)" } else { "" });
            }
        }
        Commands::Extract { source } => {
            let fetcher = Fetcher::new(&config.fetcher)?;
            let extractor = create_extractor(&source, &fetcher)
                .ok_or_else(|| anyhow!("Unknown source: {}", source))?;
            let candidates = extractor.extract().await?;
            if candidates.is_empty() {
                warn!(source = %source, "Extractor returned no candidates");
            }
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
        Commands::Events { status, limit } => {
            let status = status.map(|s| s.parse::<EventStatus>()).transpose()?;
            let ctx = AppContext::from_config(config)?;
            let filter = EventFilter {
                status,
                limit: Some(limit),
                ..EventFilter::default()
            };
            let events = ctx.store.list(&filter).await?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }
    Ok(())
}
