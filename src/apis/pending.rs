use crate::error::Result;
use crate::types::{CandidateEvent, Extractor};
use tracing::debug;

/// A registered source that has no extraction rules yet (client-rendered
/// sites, or listings still to be mapped). Always yields nothing, so the
/// source shows up in runs without ever failing them.
pub struct PendingSource {
    source_id: &'static str,
    url: &'static str,
}

impl PendingSource {
    pub const fn new(source_id: &'static str, url: &'static str) -> Self {
        Self { source_id, url }
    }

    pub fn url(&self) -> &'static str {
        self.url
    }
}

#[async_trait::async_trait]
impl Extractor for PendingSource {
    fn source_id(&self) -> &'static str {
        self.source_id
    }

    async fn extract(&self) -> Result<Vec<CandidateEvent>> {
        debug!(source = self.source_id, url = self.url, "No extraction rules for source yet");
        Ok(Vec::new())
    }
}
