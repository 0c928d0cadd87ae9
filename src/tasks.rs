use crate::apis::build_registry;
use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::pipeline::{Collector, Ingestor, RunResult};
use crate::storage::{EventStore, InMemoryEventStore, SqliteEventStore};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument};

/// Everything a collection job needs, built once at startup and passed down.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub fetcher: Fetcher,
    pub store: Arc<dyn EventStore>,
}

impl AppContext {
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config.fetcher)?;
        let store: Arc<dyn EventStore> = match config.store.backend {
            StoreBackend::Sqlite => {
                info!(path = %config.store.path.display(), "Opening SQLite event store");
                Arc::new(SqliteEventStore::open(&config.store.path)?)
            }
            StoreBackend::Memory => {
                info!("Using in-memory event store");
                Arc::new(InMemoryEventStore::new())
            }
        };
        Ok(Self { config, fetcher, store })
    }

    pub fn with_store(config: Config, store: Arc<dyn EventStore>) -> Result<Self> {
        let fetcher = Fetcher::new(&config.fetcher)?;
        Ok(Self { config, fetcher, store })
    }
}

/// What a collection job reports back to its trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobOutcome {
    Completed(RunResult),
    Failed { error: String },
}

/// One full collection run over the selected sources.
///
/// Never panics: a run that cannot start, or that dies, is reported as
/// `JobOutcome::Failed`.
#[instrument(skip(ctx))]
pub async fn run_collection(ctx: &AppContext, only: Option<&[String]>) -> JobOutcome {
    let extractors = build_registry(&ctx.fetcher, &ctx.config.collector, only);
    if extractors.is_empty() {
        error!("No sources selected for collection");
        return JobOutcome::Failed {
            error: "no sources selected".to_string(),
        };
    }

    let ingestor = Arc::new(Ingestor::new(Arc::clone(&ctx.store)));
    let collector = Collector::new(extractors, ingestor);

    match tokio::spawn(async move { collector.run().await }).await {
        Ok(result) => JobOutcome::Completed(result),
        Err(e) => {
            error!("Collection run failed: {}", e);
            JobOutcome::Failed {
                error: format!("collection run failed: {}", e),
            }
        }
    }
}

/// Run collection every `interval` until `shutdown` resolves.
///
/// Runs are sequential, so at most one is in flight; ticks missed while a
/// run is going are skipped. Returns the number of completed runs.
pub async fn run_scheduled<F>(ctx: &AppContext, only: Option<&[String]>, interval: Duration, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut runs = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping scheduler after {} runs", runs);
                break;
            }
            _ = ticker.tick() => {
                match run_collection(ctx, only).await {
                    JobOutcome::Completed(result) => info!(
                        "Scheduled run {} done: {} extracted, {} new, {} errors",
                        runs + 1,
                        result.total_extracted,
                        result.new_events,
                        result.errors.len()
                    ),
                    JobOutcome::Failed { error } => error!("Scheduled run {} failed: {}", runs + 1, error),
                }
                runs += 1;
            }
        }
    }
    runs
}
