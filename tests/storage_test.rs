use agenda_collector::error::ScraperError;
use agenda_collector::storage::{EventStore, InMemoryEventStore, SqliteEventStore};
use agenda_collector::types::{EventCategory, EventFilter, EventRegion, EventStatus, NewEvent};
use anyhow::Result;
use chrono::NaiveDate;
use tempfile::tempdir;
use uuid::Uuid;

fn new_event(title: &str, slug: &str, day: u32, category: EventCategory) -> NewEvent {
    let start = NaiveDate::from_ymd_opt(2025, 11, day).unwrap().and_hms_opt(19, 30, 0).unwrap();
    NewEvent {
        title: title.to_string(),
        slug: slug.to_string(),
        description: format!("Descripción de {}", title),
        start,
        end: Some(start + chrono::Duration::hours(2)),
        category,
        region: EventRegion::Metropolitana,
        external_url: Some(format!("https://example.cl/{}", slug)),
        image_url: None,
        status: EventStatus::Draft,
        provenance: Some("mnba".to_string()),
    }
}

async fn exercise_store(store: &dyn EventStore) -> Result<()> {
    let matta = store.insert(new_event("Retrospectiva Matta", "retrospectiva-matta", 3, EventCategory::Art)).await?;
    store.insert(new_event("Jazz en el parque", "jazz-en-el-parque", 20, EventCategory::Music)).await?;
    store.insert(new_event("Hamlet", "hamlet", 11, EventCategory::Theater)).await?;
    assert_eq!(store.count().await?, 3);

    // Round trip of every field
    let loaded = store.get(matta.id).await?.unwrap();
    assert_eq!(loaded, matta);
    assert!(store.get(Uuid::new_v4()).await?.is_none());

    // Exact title lookup
    assert!(store.exists_by_title("Hamlet").await?);
    assert!(!store.exists_by_title("hamlet").await?);
    assert!(!store.exists_by_title(" Hamlet").await?);

    // Latest start first, with paging
    let all = store.list(&EventFilter::default()).await?;
    let titles: Vec<_> = all.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Jazz en el parque", "Hamlet", "Retrospectiva Matta"]);

    let page = store.list(&EventFilter { skip: 1, limit: Some(1), ..EventFilter::default() }).await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Hamlet");

    let music = store
        .list(&EventFilter { category: Some(EventCategory::Music), ..EventFilter::default() })
        .await?;
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].slug, "jazz-en-el-parque");

    // Slugs are unique
    let conflict = store.insert(new_event("Hamlet", "hamlet", 12, EventCategory::Theater)).await;
    assert!(matches!(conflict, Err(ScraperError::SlugConflict(slug)) if slug == "hamlet"));
    assert_eq!(store.count().await?, 3);

    // Soft delete keeps the row
    let archived = store.archive(matta.id).await?;
    assert_eq!(archived.status, EventStatus::Archived);
    assert!(archived.updated_at.is_some());
    assert_eq!(store.count().await?, 3);

    let drafts = store
        .list(&EventFilter { status: Some(EventStatus::Draft), ..EventFilter::default() })
        .await?;
    assert_eq!(drafts.len(), 2);

    let missing = store.update_status(Uuid::new_v4(), EventStatus::Published).await;
    assert!(matches!(missing, Err(ScraperError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_in_memory_store() -> Result<()> {
    let store = InMemoryEventStore::new();
    exercise_store(&store).await
}

#[tokio::test]
async fn test_sqlite_store() -> Result<()> {
    let dir = tempdir()?;
    let store = SqliteEventStore::open(dir.path().join("events.db"))?;
    exercise_store(&store).await
}

#[tokio::test]
async fn test_sqlite_store_persists_across_reopen() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("nested").join("events.db");

    let id = {
        let store = SqliteEventStore::open(&path)?;
        store.insert(new_event("Noche de Museos", "noche-de-museos", 8, EventCategory::Other)).await?.id
    };

    let reopened = SqliteEventStore::open(&path)?;
    let event = reopened.get(id).await?.unwrap();
    assert_eq!(event.title, "Noche de Museos");
    assert_eq!(event.category, EventCategory::Other);
    assert!(reopened.exists_by_title("Noche de Museos").await?);
    Ok(())
}

#[tokio::test]
async fn test_sqlite_keeps_sub_second_start() -> Result<()> {
    let dir = tempdir()?;
    let store = SqliteEventStore::open(dir.path().join("events.db"))?;

    // Start times that fell back to the collection time carry a fraction
    let mut fallback = new_event("Fecha por confirmar", "fecha-por-confirmar", 5, EventCategory::Other);
    fallback.start = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap().and_hms_nano_opt(10, 15, 42, 123_456_789).unwrap();
    fallback.end = None;
    let whole = new_event("Hamlet", "hamlet", 5, EventCategory::Theater);

    let inserted = store.insert(fallback.clone()).await?;
    store.insert(whole).await?;

    let loaded = store.get(inserted.id).await?.unwrap();
    assert_eq!(loaded.start, fallback.start);
    assert_eq!(loaded, inserted);

    // Latest first within the same day
    let titles: Vec<_> = store.list(&EventFilter::default()).await?.into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Hamlet", "Fecha por confirmar"]);
    Ok(())
}
