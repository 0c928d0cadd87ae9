use super::common::{element_text, resolve_url, select_attr, select_text, selector};
use crate::constants::{ANINAT_BASE_URL, ANINAT_SOURCE, ANINAT_URLS};
use crate::date_parse::{parse_spanish_date, parse_spanish_date_opt};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{CandidateEvent, EventCategory, EventRegion, Extractor};
use scraper::Html;
use tracing::{info, instrument, warn};

/// Galería Aninat. Squarespace blog, one listing page per season.
pub struct AninatExtractor {
    fetcher: Fetcher,
}

impl AninatExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl Extractor for AninatExtractor {
    fn source_id(&self) -> &'static str {
        ANINAT_SOURCE
    }

    #[instrument(skip(self))]
    async fn extract(&self) -> Result<Vec<CandidateEvent>> {
        let mut events = Vec::new();
        // An unreachable season page must not hide the others
        for url in ANINAT_URLS {
            let Some(body) = self.fetcher.fetch(url, None).await else {
                warn!(url = %url, "Skipping Aninat page");
                continue;
            };
            events.extend(parse_listing(&body)?);
        }
        info!("Successfully extracted {} events from Galería Aninat", events.len());
        Ok(events)
    }
}

pub fn parse_listing(body: &str) -> Result<Vec<CandidateEvent>> {
    let document = Html::parse_document(body);
    let article_sel = selector("article.BlogList-item")?;
    let title_sel = selector(".BlogList-item-title")?;
    let image_sel = selector("img")?;
    let excerpt_sel = selector(".BlogList-item-excerpt")?;
    let meta_date_sel = selector(".Blog-meta-item--date")?;

    let mut events = Vec::new();
    for article in document.select(&article_sel) {
        let Some(title_el) = article.select(&title_sel).next() else {
            continue;
        };
        let title = element_text(&title_el);
        if title.is_empty() {
            continue;
        }
        let link = title_el.value().attr("href").and_then(|h| resolve_url(ANINAT_BASE_URL, h));
        // Squarespace lazy-loads: the real image sits in data-image
        let image = select_attr(&article, &image_sel, &["data-image", "src"])
            .and_then(|s| resolve_url(ANINAT_BASE_URL, &s));
        let excerpt = select_text(&article, &excerpt_sel).unwrap_or_default();

        // Excerpts read "Del 22 de noviembre al 31 de diciembre"; the post
        // date is only a fallback.
        let start = parse_spanish_date_opt(&excerpt, None).unwrap_or_else(|| {
            let meta = select_text(&article, &meta_date_sel).unwrap_or_default();
            parse_spanish_date(&meta, None)
        });

        events.push(
            CandidateEvent::new(title, start, EventCategory::Art, EventRegion::Metropolitana)
                .with_description(excerpt)
                .with_external_url(link)
                .with_image_url(image),
        );
    }
    Ok(events)
}
