use super::EventStore;
use crate::error::{Result, ScraperError};
use crate::types::{Event, EventFilter, EventStatus, NewEvent};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

// Fraction is written only when non-zero and optional when parsing
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const EVENT_COLUMNS: &str = "id, slug, title, description, start_at, end_at, category, region, \
     external_url, image_url, status, provenance, created_at, updated_at";

/// SQLite-backed event store.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::with_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id            TEXT PRIMARY KEY,
                slug          TEXT NOT NULL UNIQUE,
                title         TEXT NOT NULL,
                description   TEXT NOT NULL DEFAULT '',
                start_at      TEXT NOT NULL,
                end_at        TEXT,
                category      TEXT NOT NULL,
                region        TEXT NOT NULL,
                external_url  TEXT,
                image_url     TEXT,
                status        TEXT NOT NULL DEFAULT 'draft',
                provenance    TEXT,
                created_at    TEXT NOT NULL,
                updated_at    TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_events_title ON events (title);
            CREATE INDEX IF NOT EXISTS idx_events_status ON events (status);
            "#,
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ScraperError::Api {
            message: "sqlite connection lock poisoned".to_string(),
        })
    }

    fn fetch_one(conn: &Connection, id: Uuid) -> Result<Option<Event>> {
        let sql = format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(event_from_row(row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn exists_by_title(&self, title: &str) -> Result<bool> {
        let conn = self.conn()?;
        // `=` on TEXT is binary collation: case- and whitespace-sensitive.
        let found: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE title = ?1)",
            params![title],
            |row| row.get(0),
        )?;
        Ok(found != 0)
    }

    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let conn = self.conn()?;
        let taken: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE slug = ?1)",
            params![event.slug],
            |row| row.get(0),
        )?;
        if taken != 0 {
            return Err(ScraperError::SlugConflict(event.slug));
        }

        let event = Event::from_new(Uuid::new_v4(), event, Utc::now());
        conn.execute(
            "INSERT INTO events (id, slug, title, description, start_at, end_at, category, region,
                                 external_url, image_url, status, provenance, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, NULL)",
            params![
                event.id.to_string(),
                event.slug,
                event.title,
                event.description,
                event.start.format(NAIVE_FORMAT).to_string(),
                event.end.map(|e| e.format(NAIVE_FORMAT).to_string()),
                event.category.as_str(),
                event.region.as_str(),
                event.external_url,
                event.image_url,
                event.status.as_str(),
                event.provenance,
                event.created_at.to_rfc3339(),
            ],
        )?;
        debug!("Created event: {} with id {}", event.title, event.id);
        Ok(event)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        let conn = self.conn()?;
        Self::fetch_one(&conn, id)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let conn = self.conn()?;
        let mut sql = format!("SELECT {} FROM events WHERE 1 = 1", EVENT_COLUMNS);
        let mut args: Vec<String> = Vec::new();
        if let Some(status) = filter.status {
            args.push(status.as_str().to_string());
            sql.push_str(&format!(" AND status = ?{}", args.len()));
        }
        if let Some(category) = filter.category {
            args.push(category.as_str().to_string());
            sql.push_str(&format!(" AND category = ?{}", args.len()));
        }
        if let Some(region) = filter.region {
            args.push(region.as_str().to_string());
            sql.push_str(&format!(" AND region = ?{}", args.len()));
        }
        let limit = filter.limit.map_or(-1, |l| l as i64);
        sql.push_str(&format!(" ORDER BY start_at DESC LIMIT {} OFFSET {}", limit, filter.skip));

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(event_from_row(row)?);
        }
        Ok(events)
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    async fn update_status(&self, id: Uuid, status: EventStatus) -> Result<Event> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE events SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), id.to_string()],
        )?;
        if changed == 0 {
            return Err(ScraperError::NotFound(id.to_string()));
        }
        Self::fetch_one(&conn, id)?.ok_or_else(|| ScraperError::NotFound(id.to_string()))
    }
}

fn event_from_row(row: &Row<'_>) -> Result<Event> {
    let id: String = row.get(0)?;
    let start: String = row.get(4)?;
    let end: Option<String> = row.get(5)?;
    let category: String = row.get(6)?;
    let region: String = row.get(7)?;
    let status: String = row.get(10)?;
    let created_at: String = row.get(12)?;
    let updated_at: Option<String> = row.get(13)?;

    Ok(Event {
        id: Uuid::parse_str(&id).map_err(|_| ScraperError::InvalidValue { kind: "id", value: id.clone() })?,
        slug: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start: parse_naive(&start)?,
        end: end.as_deref().map(parse_naive).transpose()?,
        category: category.parse()?,
        region: region.parse()?,
        external_url: row.get(8)?,
        image_url: row.get(9)?,
        status: status.parse()?,
        provenance: row.get(11)?,
        created_at: parse_utc(&created_at)?,
        updated_at: updated_at.as_deref().map(parse_utc).transpose()?,
    })
}

fn parse_naive(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, NAIVE_FORMAT)
        .map_err(|_| ScraperError::InvalidValue { kind: "timestamp", value: value.to_string() })
}

fn parse_utc(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ScraperError::InvalidValue { kind: "timestamp", value: value.to_string() })
}
