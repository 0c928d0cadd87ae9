use super::common::{background_image_url, element_text, resolve_url, select_attr, select_text, selector};
use crate::constants::{GALERIA_NAC_BASE_URL, GALERIA_NAC_SOURCE, GALERIA_NAC_URL};
use crate::date_parse::parse_spanish_date;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{CandidateEvent, EventCategory, EventRegion, Extractor};
use scraper::Html;
use tracing::{info, instrument};

/// Galería NAC. Shopify blog; cover images only exist as inline
/// `background-image` styles.
pub struct GaleriaNacExtractor {
    fetcher: Fetcher,
}

impl GaleriaNacExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl Extractor for GaleriaNacExtractor {
    fn source_id(&self) -> &'static str {
        GALERIA_NAC_SOURCE
    }

    #[instrument(skip(self))]
    async fn extract(&self) -> Result<Vec<CandidateEvent>> {
        let Some(body) = self.fetcher.fetch(GALERIA_NAC_URL, None).await else {
            return Ok(Vec::new());
        };
        let events = parse_listing(&body)?;
        info!("Successfully extracted {} events from Galería NAC", events.len());
        Ok(events)
    }
}

pub fn parse_listing(body: &str) -> Result<Vec<CandidateEvent>> {
    let document = Html::parse_document(body);
    let article_sel = selector("article")?;
    let title_sel = selector("h3 a")?;
    let image_link_sel = selector("a.img")?;
    let summary_sel = selector(".bajada")?;

    let mut events = Vec::new();
    for article in document.select(&article_sel) {
        let Some(title_el) = article.select(&title_sel).next() else {
            continue;
        };
        let title = element_text(&title_el);
        if title.is_empty() {
            continue;
        }
        let link = title_el.value().attr("href").and_then(|h| resolve_url(GALERIA_NAC_BASE_URL, h));
        let image = select_attr(&article, &image_link_sel, &["style"])
            .and_then(|style| background_image_url(&style))
            .and_then(|src| resolve_url(GALERIA_NAC_BASE_URL, &src));

        // "28 de Noviembre del 2025 al 10 de Enero del 2026"
        let summary = select_text(&article, &summary_sel).unwrap_or_default();
        let start = parse_spanish_date(&summary, None);

        events.push(
            CandidateEvent::new(title, start, EventCategory::Art, EventRegion::Metropolitana)
                .with_description(summary)
                .with_external_url(link)
                .with_image_url(image),
        );
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate};

    const LISTING: &str = r#"
        <section class="blog">
          <article>
            <a class="img" href="/blogs/exposiciones/marea"
               style="background-image: url(//cdn.shopify.com/s/files/1/marea.jpg?v=17)"></a>
            <h3><a href="/blogs/exposiciones/marea">Marea alta</a></h3>
            <p class="bajada">28 de Noviembre del 2025 al 10 de Enero del 2026</p>
          </article>
          <article>
            <h3><a href="/blogs/exposiciones/sin-fecha">Sin fecha</a></h3>
          </article>
        </section>
    "#;

    #[test]
    fn test_parse_listing() {
        let events = parse_listing(LISTING).unwrap();
        assert_eq!(events.len(), 2);

        let marea = &events[0];
        assert_eq!(marea.title, "Marea alta");
        assert_eq!(marea.image_url.as_deref(), Some("https://cdn.shopify.com/s/files/1/marea.jpg?v=17"));
        assert_eq!(marea.external_url.as_deref(), Some("https://galerianac.cl/blogs/exposiciones/marea"));
        assert_eq!(marea.start.date(), NaiveDate::from_ymd_opt(2025, 11, 28).unwrap());
        assert_eq!(marea.end, None);

        // Missing date falls back to the collection time
        let drift = (Local::now().naive_local() - events[1].start).num_seconds().abs();
        assert!(drift < 5);
        assert_eq!(events[1].description, "");
    }
}
