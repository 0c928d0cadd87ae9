use super::common::{element_text, resolve_url, select_attr, select_text, selector};
use crate::constants::{MNBA_BASE_URL, MNBA_SOURCE, MNBA_URL};
use crate::date_parse::parse_spanish_date;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{CandidateEvent, EventCategory, EventRegion, Extractor};
use scraper::Html;
use tracing::{debug, info, instrument};

/// Museo Nacional de Bellas Artes, Drupal "cartelera" view.
pub struct MnbaExtractor {
    fetcher: Fetcher,
}

impl MnbaExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl Extractor for MnbaExtractor {
    fn source_id(&self) -> &'static str {
        MNBA_SOURCE
    }

    #[instrument(skip(self))]
    async fn extract(&self) -> Result<Vec<CandidateEvent>> {
        let Some(body) = self.fetcher.fetch(MNBA_URL, None).await else {
            return Ok(Vec::new());
        };
        let events = parse_listing(&body)?;
        info!("Successfully extracted {} events from MNBA", events.len());
        Ok(events)
    }
}

pub fn parse_listing(body: &str) -> Result<Vec<CandidateEvent>> {
    let document = Html::parse_document(body);
    let row_sel = selector(".views-row")?;
    let title_sel = selector(".destacado__title a")?;
    let image_sel = selector(".field--name-field-image img")?;
    let range_sel = selector(".field--name-field-fechas")?;
    let date_sel = selector(".date")?;

    let mut events = Vec::new();
    for row in document.select(&row_sel) {
        let Some(title_el) = row.select(&title_sel).next() else {
            debug!("Skipping row without title link");
            continue;
        };
        let title = element_text(&title_el);
        if title.is_empty() {
            continue;
        }
        let link = title_el.value().attr("href").and_then(|h| resolve_url(MNBA_BASE_URL, h));
        let image = select_attr(&row, &image_sel, &["src"]).and_then(|s| resolve_url(MNBA_BASE_URL, &s));

        // The range field states the start date more reliably than `.date`
        let date_text = select_text(&row, &range_sel).or_else(|| select_text(&row, &date_sel));
        let start = parse_spanish_date(date_text.as_deref().unwrap_or_default(), None);

        let description = match &link {
            Some(l) => format!("Evento en Museo Nacional de Bellas Artes. Más info en: {}", l),
            None => "Evento en Museo Nacional de Bellas Artes.".to_string(),
        };

        events.push(
            CandidateEvent::new(title, start, EventCategory::Art, EventRegion::Metropolitana)
                .with_description(description)
                .with_external_url(link)
                .with_image_url(image),
        );
    }
    Ok(events)
}
