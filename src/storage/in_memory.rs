use super::EventStore;
use crate::error::{Result, ScraperError};
use crate::types::{Event, EventFilter, EventStatus, NewEvent};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// In-memory store for development and tests. Keeps insertion order.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Event>>> {
        self.events.lock().map_err(|_| ScraperError::Api {
            message: "event store lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        Ok(self.lock()?.iter().any(|e| e.title == title))
    }

    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let mut events = self.lock()?;
        if events.iter().any(|e| e.slug == event.slug) {
            return Err(ScraperError::SlugConflict(event.slug));
        }
        let event = Event::from_new(Uuid::new_v4(), event, Utc::now());
        debug!("Created event: {} with id {}", event.title, event.id);
        events.push(event.clone());
        Ok(event)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.lock()?.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut matching: Vec<Event> = self.lock()?.iter().filter(|e| filter.matches(e)).cloned().collect();
        matching.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(matching
            .into_iter()
            .skip(filter.skip)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    async fn update_status(&self, id: Uuid, status: EventStatus) -> Result<Event> {
        let mut events = self.lock()?;
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ScraperError::NotFound(id.to_string()))?;
        event.status = status;
        event.updated_at = Some(Utc::now());
        debug!("Updated event: {} with id {} to {}", event.title, id, status);
        Ok(event.clone())
    }
}
