// Collection pipeline: concurrent extraction, then dedup/ingestion

pub mod ingestion;
pub mod orchestrator;

pub use ingestion::Ingestor;
pub use orchestrator::{Collector, RunResult, SourceError};
