use crate::error::Result;
use crate::types::{Event, EventFilter, EventStatus, NewEvent};
use async_trait::async_trait;
use uuid::Uuid;

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryEventStore;
pub use sqlite::SqliteEventStore;

/// Durable event persistence used by ingestion and curation.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Exact title comparison: case- and whitespace-sensitive.
    async fn exists_by_title(&self, title: &str) -> Result<bool>;

    /// Insert a new event. Fails with `SlugConflict` if the slug is taken.
    async fn insert(&self, event: NewEvent) -> Result<Event>;

    async fn get(&self, id: Uuid) -> Result<Option<Event>>;

    /// Events matching `filter`, latest start first.
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    async fn count(&self) -> Result<usize>;

    async fn update_status(&self, id: Uuid, status: EventStatus) -> Result<Event>;

    /// Soft delete. Events are never removed.
    async fn archive(&self, id: Uuid) -> Result<Event> {
        self.update_status(id, EventStatus::Archived).await
    }
}
