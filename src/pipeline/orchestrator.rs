use super::ingestion::Ingestor;
use crate::metrics;
use crate::types::{CandidateEvent, Extractor};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

/// A source that failed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    pub source: String,
    pub message: String,
}

/// Result of one collection run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub total_extracted: usize,
    pub new_events: usize,
    pub errors: Vec<SourceError>,
}

type SourceOutcome = std::result::Result<Vec<CandidateEvent>, String>;

/// Runs every registered extractor concurrently and feeds the candidates to
/// the ingestor as each source finishes.
pub struct Collector {
    extractors: Vec<Arc<dyn Extractor>>,
    ingestor: Arc<Ingestor>,
}

impl Collector {
    pub fn new(extractors: Vec<Arc<dyn Extractor>>, ingestor: Arc<Ingestor>) -> Self {
        Self { extractors, ingestor }
    }

    pub fn sources(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.source_id()).collect()
    }

    /// Run all sources once.
    ///
    /// A failing or panicking extractor is reported in `errors` and never
    /// stops the others. There is no run-level timeout: each source is only
    /// bounded by its fetch timeout.
    #[instrument(skip(self), fields(sources = self.extractors.len()))]
    pub async fn run(&self) -> RunResult {
        let started = Instant::now();
        info!("Starting collection from {} sources", self.extractors.len());

        let mut tasks = JoinSet::new();
        let mut pending: Vec<&'static str> = Vec::with_capacity(self.extractors.len());
        for extractor in &self.extractors {
            let extractor = Arc::clone(extractor);
            let source = extractor.source_id();
            pending.push(source);
            tasks.spawn(async move {
                let outcome: SourceOutcome = match AssertUnwindSafe(extractor.extract())
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(candidates)) => Ok(candidates),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(payload) => Err(format!("extractor panicked: {}", panic_message(payload))),
                };
                (source, outcome)
            });
        }

        let mut result = RunResult::default();
        while let Some(joined) = tasks.join_next().await {
            let (source, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    // Attributed below, once every finished source is known
                    error!("Extractor task did not complete: {}", e);
                    continue;
                }
            };
            if let Some(pos) = pending.iter().position(|s| *s == source) {
                pending.swap_remove(pos);
            }

            match outcome {
                Ok(candidates) => {
                    info!(source, "Source returned {} candidates", candidates.len());
                    metrics::record_source_success(source, candidates.len());
                    result.total_extracted += candidates.len();
                    self.ingest_all(source, candidates, &mut result).await;
                }
                Err(message) => record_failure(source, message, &mut result),
            }
        }
        record_unfinished(pending, &mut result);

        let elapsed = started.elapsed().as_secs_f64();
        metrics::record_run(elapsed, result.errors.len());
        info!(
            "Collection finished in {:.1}s: {} extracted, {} new, {} errors",
            elapsed,
            result.total_extracted,
            result.new_events,
            result.errors.len()
        );
        result
    }

    async fn ingest_all(&self, source: &'static str, candidates: Vec<CandidateEvent>, result: &mut RunResult) {
        for mut candidate in candidates {
            if candidate.provenance.is_none() {
                candidate.provenance = Some(source.to_string());
            }
            let title = candidate.title.clone();
            match self.ingestor.ingest(candidate).await {
                Ok(true) => result.new_events += 1,
                Ok(false) => {}
                // Store trouble is not a source failure
                Err(e) => {
                    warn!(source, "Failed to ingest '{}': {}", title, e);
                    metrics::record_ingest_failure(source);
                }
            }
        }
        debug!(source, "Source ingested");
    }
}

fn record_failure(source: &'static str, message: String, result: &mut RunResult) {
    error!(source, "Source failed: {}", message);
    metrics::record_source_failure(source);
    result.errors.push(SourceError {
        source: source.to_string(),
        message,
    });
}

/// Sources whose task ended without reporting back (aborted runtime, panic
/// outside the extractor future).
fn record_unfinished(pending: Vec<&'static str>, result: &mut RunResult) {
    for source in pending {
        record_failure(source, "extractor task did not complete".to_string(), result);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfinished_sources_are_reported() {
        let mut result = RunResult::default();
        record_unfinished(vec!["gam", "mnba"], &mut result);

        let sources: Vec<_> = result.errors.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["gam", "mnba"]);
        assert!(result.errors.iter().all(|e| e.message == "extractor task did not complete"));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(Box::new("selector exploded")), "selector exploded");
        assert_eq!(panic_message(Box::new(String::from("bad markup"))), "bad markup");
        assert_eq!(panic_message(Box::new(42_u32)), "unknown panic");
    }
}
