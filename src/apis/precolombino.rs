use super::common::{first_attr, resolve_url, select_attr, select_text, selector};
use crate::constants::{PRECOLOMBINO_BASE_URL, PRECOLOMBINO_SOURCE, PRECOLOMBINO_URL};
use crate::date_parse::parse_spanish_date;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{CandidateEvent, EventCategory, EventRegion, Extractor};
use scraper::Html;
use tracing::{info, instrument};

const UNTITLED: &str = "Sin título";

/// Museo Chileno de Arte Precolombino, exhibitions mosaic.
pub struct PrecolombinoExtractor {
    fetcher: Fetcher,
}

impl PrecolombinoExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl Extractor for PrecolombinoExtractor {
    fn source_id(&self) -> &'static str {
        PRECOLOMBINO_SOURCE
    }

    #[instrument(skip(self))]
    async fn extract(&self) -> Result<Vec<CandidateEvent>> {
        let Some(body) = self.fetcher.fetch(PRECOLOMBINO_URL, None).await else {
            return Ok(Vec::new());
        };
        let events = parse_listing(&body)?;
        info!("Successfully extracted {} events from Museo Precolombino", events.len());
        Ok(events)
    }
}

pub fn parse_listing(body: &str) -> Result<Vec<CandidateEvent>> {
    let document = Html::parse_document(body);
    let block_sel = selector("div.destacado-chico.mosaic-block")?;
    let overlay_sel = selector("a.mosaic-overlay")?;
    let title_sel = selector(".details h3")?;
    let description_sel = selector(".details p")?;
    let image_sel = selector(".mosaic-backdrop img")?;

    let mut events = Vec::new();
    for block in document.select(&block_sel) {
        let Some(overlay) = block.select(&overlay_sel).next() else {
            continue;
        };
        let link = first_attr(&overlay, &["href"]).and_then(|h| resolve_url(PRECOLOMBINO_BASE_URL, &h));
        let title = select_text(&overlay, &title_sel).unwrap_or_else(|| UNTITLED.to_string());
        let description = select_text(&overlay, &description_sel).unwrap_or_default();
        let image = select_attr(&block, &image_sel, &["src"]).and_then(|s| resolve_url(PRECOLOMBINO_BASE_URL, &s));
        // Permanent exhibitions have no date at all
        let start = parse_spanish_date(&description, None);

        events.push(
            CandidateEvent::new(title, start, EventCategory::Art, EventRegion::Metropolitana)
                .with_description(description)
                .with_external_url(link)
                .with_image_url(image),
        );
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let body = r#"
            <div class="destacado-chico mosaic-block">
              <a class="mosaic-overlay" href="https://precolombino.cl/exposiciones/chile-antes-de-chile/">
                <div class="details"><h3>Chile antes de Chile</h3><p>Exposición permanente</p></div>
              </a>
              <div class="mosaic-backdrop"><img src="https://precolombino.cl/wp/wp-content/uploads/cadc.jpg"></div>
            </div>
            <div class="destacado-chico mosaic-block">
              <a class="mosaic-overlay" href="/exposiciones/textiles/"><div class="details"></div></a>
            </div>
            <div class="destacado-chico mosaic-block"><span>sin enlace</span></div>
        "#;
        let events = parse_listing(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Chile antes de Chile");
        assert_eq!(events[0].description, "Exposición permanente");
        assert_eq!(events[0].image_url.as_deref(), Some("https://precolombino.cl/wp/wp-content/uploads/cadc.jpg"));
        assert_eq!(events[1].title, UNTITLED);
        assert_eq!(events[1].external_url.as_deref(), Some("https://precolombino.cl/exposiciones/textiles/"));
    }
}
