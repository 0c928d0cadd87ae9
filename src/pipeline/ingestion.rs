use crate::error::Result;
use crate::metrics;
use crate::storage::EventStore;
use crate::types::{generate_slug, CandidateEvent, EventStatus, NewEvent};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Deduplication and ingestion of collected candidates.
///
/// A candidate is a duplicate when a stored event has exactly the same title
/// (case- and whitespace-sensitive). Duplicates are discarded without touching
/// the stored event. Everything that gets in is stored as a draft.
pub struct Ingestor {
    store: Arc<dyn EventStore>,
    // Title lookup and insert run as one step
    write_lock: Mutex<()>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Returns `true` when the candidate was inserted, `false` when it was
    /// discarded as a duplicate or for having no title.
    pub async fn ingest(&self, candidate: CandidateEvent) -> Result<bool> {
        if candidate.title.trim().is_empty() {
            debug!(provenance = ?candidate.provenance, "Discarding candidate without title");
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;

        if self.store.exists_by_title(&candidate.title).await? {
            debug!("Duplicate event skipped: {}", candidate.title);
            metrics::record_duplicate();
            return Ok(false);
        }

        let new_event = Self::prepare(candidate);
        let event = self.store.insert(new_event).await?;
        info!("Ingested new event: {} ({})", event.title, event.slug);
        metrics::record_ingested();
        Ok(true)
    }

    fn prepare(candidate: CandidateEvent) -> NewEvent {
        if candidate.status != EventStatus::Draft {
            debug!(
                "Candidate '{}' arrived as {}, storing as draft",
                candidate.title, candidate.status
            );
        }

        let end = match candidate.end {
            Some(end) if end < candidate.start => {
                warn!(
                    "Dropping end {} before start {} for '{}'",
                    end, candidate.start, candidate.title
                );
                None
            }
            other => other,
        };

        let slug = candidate
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| generate_slug(&candidate.title));

        NewEvent {
            title: candidate.title,
            slug,
            description: candidate.description,
            start: candidate.start,
            end,
            category: candidate.category,
            region: candidate.region,
            external_url: candidate.external_url,
            image_url: candidate.image_url,
            status: EventStatus::Draft,
            provenance: candidate.provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryEventStore;
    use crate::types::{EventCategory, EventFilter, EventRegion};
    use chrono::{Duration, NaiveDate};

    fn candidate(title: &str) -> CandidateEvent {
        let start = NaiveDate::from_ymd_opt(2025, 11, 18)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        CandidateEvent::new(title, start, EventCategory::Art, EventRegion::Metropolitana)
    }

    fn ingestor() -> Ingestor {
        Ingestor::new(Arc::new(InMemoryEventStore::new()))
    }

    #[tokio::test]
    async fn test_blank_title_is_not_ingested() {
        let ingestor = ingestor();
        assert!(!ingestor.ingest(candidate("   ")).await.unwrap());
        assert_eq!(ingestor.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_supplied_slug_is_kept() {
        let ingestor = ingestor();
        let mut c = candidate("Bienal de Artes Mediales");
        c.slug = Some("bienal-2025".to_string());
        assert!(ingestor.ingest(c).await.unwrap());

        let stored = ingestor.store().list(&EventFilter::default()).await.unwrap();
        assert_eq!(stored[0].slug, "bienal-2025");
    }

    #[tokio::test]
    async fn test_generated_slug_and_draft_status() {
        let ingestor = ingestor();
        let mut c = candidate("Noche de Museos");
        c.status = EventStatus::Archived;
        assert!(ingestor.ingest(c).await.unwrap());

        let stored = ingestor.store().list(&EventFilter::default()).await.unwrap();
        assert_eq!(stored[0].status, EventStatus::Draft);
        assert!(stored[0].slug.starts_with("noche-de-museos-"));
    }

    #[tokio::test]
    async fn test_end_before_start_is_dropped() {
        let ingestor = ingestor();
        let mut c = candidate("Ciclo de cine");
        c.end = Some(c.start - Duration::days(3));
        assert!(ingestor.ingest(c).await.unwrap());

        let mut ok = candidate("Ciclo de danza");
        let end = ok.start + Duration::days(10);
        ok.end = Some(end);
        assert!(ingestor.ingest(ok).await.unwrap());

        let stored = ingestor.store().list(&EventFilter::default()).await.unwrap();
        let cine = stored.iter().find(|e| e.title == "Ciclo de cine").unwrap();
        let danza = stored.iter().find(|e| e.title == "Ciclo de danza").unwrap();
        assert_eq!(cine.end, None);
        assert_eq!(danza.end, Some(end));
    }
}
