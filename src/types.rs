use crate::error::{Result, ScraperError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Art,
    Music,
    Theater,
    Literature,
    Cinema,
    Dance,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventRegion {
    Metropolitana,
    Valparaiso,
    Biobio,
    Online,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Archived => "archived",
        }
    }
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Art => "art",
            EventCategory::Music => "music",
            EventCategory::Theater => "theater",
            EventCategory::Literature => "literature",
            EventCategory::Cinema => "cinema",
            EventCategory::Dance => "dance",
            EventCategory::Other => "other",
        }
    }
}

impl EventRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventRegion::Metropolitana => "metropolitana",
            EventRegion::Valparaiso => "valparaiso",
            EventRegion::Biobio => "biobio",
            EventRegion::Online => "online",
        }
    }
}

impl FromStr for EventStatus {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(EventStatus::Draft),
            "published" => Ok(EventStatus::Published),
            "archived" => Ok(EventStatus::Archived),
            other => Err(ScraperError::InvalidValue { kind: "status", value: other.to_string() }),
        }
    }
}

impl FromStr for EventCategory {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "art" => Ok(EventCategory::Art),
            "music" => Ok(EventCategory::Music),
            "theater" => Ok(EventCategory::Theater),
            "literature" => Ok(EventCategory::Literature),
            "cinema" => Ok(EventCategory::Cinema),
            "dance" => Ok(EventCategory::Dance),
            "other" => Ok(EventCategory::Other),
            other => Err(ScraperError::InvalidValue { kind: "category", value: other.to_string() }),
        }
    }
}

impl FromStr for EventRegion {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "metropolitana" => Ok(EventRegion::Metropolitana),
            "valparaiso" => Ok(EventRegion::Valparaiso),
            "biobio" => Ok(EventRegion::Biobio),
            "online" => Ok(EventRegion::Online),
            other => Err(ScraperError::InvalidValue { kind: "region", value: other.to_string() }),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized event as produced by an extractor, not yet persisted.
///
/// `start` is local wall-clock time. When the source date could not be read
/// it holds the time of extraction instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub category: EventCategory,
    pub region: EventRegion,
    pub external_url: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub slug: Option<String>,
    pub provenance: Option<String>,
}

impl CandidateEvent {
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        category: EventCategory,
        region: EventRegion,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start,
            end: None,
            category,
            region,
            external_url: None,
            image_url: None,
            status: EventStatus::Draft,
            slug: None,
            provenance: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_external_url(mut self, url: Option<String>) -> Self {
        self.external_url = url.filter(|u| !u.is_empty());
        self
    }

    pub fn with_image_url(mut self, url: Option<String>) -> Self {
        self.image_url = url.filter(|u| !u.is_empty());
        self
    }
}

/// Row handed to an `EventStore` for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub category: EventCategory,
    pub region: EventRegion,
    pub external_url: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub provenance: Option<String>,
}

/// Persisted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub category: EventCategory,
    pub region: EventRegion,
    pub external_url: Option<String>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub provenance: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn from_new(id: Uuid, new: NewEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            slug: new.slug,
            title: new.title,
            description: new.description,
            start: new.start,
            end: new.end,
            category: new.category,
            region: new.region,
            external_url: new.external_url,
            image_url: new.image_url,
            status: new.status,
            provenance: new.provenance,
            created_at,
            updated_at: None,
        }
    }
}

/// Filter for listing stored events. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub category: Option<EventCategory>,
    pub region: Option<EventRegion>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.status.map_or(true, |s| event.status == s)
            && self.category.map_or(true, |c| event.category == c)
            && self.region.map_or(true, |r| event.region == r)
    }
}

/// Titles are not unique, so every slug carries a random suffix.
pub fn generate_slug(title: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let base = slugify(title);
    if base.is_empty() {
        suffix[..8].to_string()
    } else {
        format!("{}-{}", base, &suffix[..8])
    }
}

fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.to_lowercase().chars() {
        let c = match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        };
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    out
}

/// A single collection source.
///
/// Implementations fetch their own pages and must degrade to an empty list
/// when the source is unreachable. `Err` is reserved for failures the run
/// should report, and never affects other sources.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    /// Unique identifier, also used as provenance tag.
    fn source_id(&self) -> &'static str;

    async fn extract(&self) -> Result<Vec<CandidateEvent>>;
}
