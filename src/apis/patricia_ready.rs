use super::common::{first_attr, resolve_url, select_attr, select_text, selector};
use crate::constants::{BROWSER_USER_AGENT, PATRICIA_READY_BASE_URL, PATRICIA_READY_SOURCE, PATRICIA_READY_URL};
use crate::date_parse::parse_spanish_date;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{CandidateEvent, EventCategory, EventRegion, Extractor};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::Html;
use tracing::{info, instrument};

/// Galería Patricia Ready. Webflow CMS list; the listing carries no dates.
pub struct PatriciaReadyExtractor {
    fetcher: Fetcher,
}

impl PatriciaReadyExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers
    }
}

#[async_trait::async_trait]
impl Extractor for PatriciaReadyExtractor {
    fn source_id(&self) -> &'static str {
        PATRICIA_READY_SOURCE
    }

    #[instrument(skip(self))]
    async fn extract(&self) -> Result<Vec<CandidateEvent>> {
        let Some(body) = self.fetcher.fetch(PATRICIA_READY_URL, Some(Self::headers())).await else {
            return Ok(Vec::new());
        };
        let events = parse_listing(&body)?;
        info!("Successfully extracted {} events from Galería Patricia Ready", events.len());
        Ok(events)
    }
}

pub fn parse_listing(body: &str) -> Result<Vec<CandidateEvent>> {
    let document = Html::parse_document(body);
    let item_sel = selector(".w-dyn-item .exhib-tabs-item")?;
    let title_sel = selector(".exhib-tab-title")?;
    let description_sel = selector(".exhib-tab-descr")?;
    let image_sel = selector("img.exhib-tabs-img")?;

    let mut events = Vec::new();
    for item in document.select(&item_sel) {
        let Some(title) = select_text(&item, &title_sel) else {
            continue;
        };
        let description = select_text(&item, &description_sel).unwrap_or_default();
        // The item itself is the anchor
        let link = first_attr(&item, &["href"]).and_then(|h| resolve_url(PATRICIA_READY_BASE_URL, &h));
        let image = select_attr(&item, &image_sel, &["src"]).and_then(|s| resolve_url(PATRICIA_READY_BASE_URL, &s));
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
            <div class="w-dyn-list"><div class="w-dyn-items">
              <div class="w-dyn-item">
                <a class="exhib-tabs-item" href="/exhibiciones/umbral">
                  <img class="exhib-tabs-img" src="https://uploads-ssl.webflow.com/umbral.jpg">
                  <div class="exhib-tab-title">Umbral</div>
                  <div class="exhib-tab-descr">Muestra individual. Desde el 4 de marzo de 2025.</div>
                </a>
              </div>
              <div class="w-dyn-item">
                <a class="exhib-tabs-item" href="/exhibiciones/vacia"><div class="exhib-tab-descr">x</div></a>
              </div>
            </div></div>
        "#;
        let events = parse_listing(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Umbral");
        assert_eq!(events[0].external_url.as_deref(), Some("https://galeriapready.cl/exhibiciones/umbral"));
        assert_eq!(events[0].image_url.as_deref(), Some("https://uploads-ssl.webflow.com/umbral.jpg"));
        assert_eq!(events[0].start.format("%Y-%m-%d").to_string(), "2025-03-04");
    }

    #[test]
    fn test_requests_send_browser_user_agent() {
        let headers = PatriciaReadyExtractor::headers();
        assert_eq!(headers.get(USER_AGENT).unwrap(), BROWSER_USER_AGENT);
    }
}
