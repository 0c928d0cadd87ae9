use agenda_collector::config::{Config, StoreBackend};
use agenda_collector::constants::{CEAC_SOURCE, TEATRO_MUNICIPAL_SOURCE};
use agenda_collector::pipeline::{RunResult, SourceError};
use agenda_collector::storage::{EventStore, InMemoryEventStore};
use agenda_collector::tasks::{run_collection, run_scheduled, AppContext, JobOutcome};
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn memory_config() -> Config {
    let mut config = Config::default();
    config.store.backend = StoreBackend::Memory;
    config
}

fn offline_sources() -> Vec<String> {
    vec![TEATRO_MUNICIPAL_SOURCE.to_string(), CEAC_SOURCE.to_string()]
}

#[test]
fn test_job_outcome_serialization() -> Result<()> {
    let completed = JobOutcome::Completed(RunResult {
        total_extracted: 5,
        new_events: 3,
        errors: vec![SourceError {
            source: "gam".to_string(),
            message: "HTTP request failed".to_string(),
        }],
    });
    assert_eq!(
        serde_json::to_value(&completed)?,
        json!({
            "total_extracted": 5,
            "new_events": 3,
            "errors": [{ "source": "gam", "message": "HTTP request failed" }]
        })
    );

    let failed = JobOutcome::Failed {
        error: "no sources selected".to_string(),
    };
    assert_eq!(serde_json::to_value(&failed)?, json!({ "error": "no sources selected" }));

    let parsed: JobOutcome = serde_json::from_value(json!({ "error": "boom" }))?;
    assert_eq!(parsed, JobOutcome::Failed { error: "boom".to_string() });
    Ok(())
}

#[tokio::test]
async fn test_run_collection_with_pending_sources() -> Result<()> {
    let ctx = AppContext::from_config(memory_config())?;
    let only = offline_sources();

    let outcome = run_collection(&ctx, Some(only.as_slice())).await;

    assert_eq!(outcome, JobOutcome::Completed(RunResult::default()));
    assert_eq!(ctx.store.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_run_collection_without_sources_fails() -> Result<()> {
    let mut config = memory_config();
    config.collector.disabled_sources = offline_sources();
    let ctx = AppContext::from_config(config)?;
    let only = offline_sources();

    let outcome = run_collection(&ctx, Some(only.as_slice())).await;

    assert_eq!(
        outcome,
        JobOutcome::Failed {
            error: "no sources selected".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_sqlite_context_creates_database() -> Result<()> {
    let dir = tempdir()?;
    let mut config = Config::default();
    config.store.path = dir.path().join("data").join("events.db");

    let ctx = AppContext::from_config(config)?;

    assert_eq!(ctx.store.count().await?, 0);
    assert!(dir.path().join("data").join("events.db").exists());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_runs_until_shutdown() -> Result<()> {
    let store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    let ctx = AppContext::with_store(memory_config(), store)?;
    let only = offline_sources();

    let shutdown = tokio::time::sleep(Duration::from_secs(250));
    let runs = run_scheduled(&ctx, Some(only.as_slice()), Duration::from_secs(100), shutdown).await;

    // Ticks at 0s, 100s and 200s
    assert_eq!(runs, 3);
    Ok(())
}
