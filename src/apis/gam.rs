use super::common::{first_attr, resolve_url, select_attr, select_text, selector};
use crate::constants::{GAM_BASE_URL, GAM_SOURCE, GAM_URL};
use crate::date_parse::parse_spanish_date;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{CandidateEvent, EventCategory, EventRegion, Extractor};
use scraper::Html;
use tracing::{debug, info, instrument};

/// Centro Cultural Gabriela Mistral calendar.
///
/// Each calendar cell is a Bootstrap tooltip button whose `title` attribute
/// holds an HTML fragment with the event card.
pub struct GamExtractor {
    fetcher: Fetcher,
}

impl GamExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl Extractor for GamExtractor {
    fn source_id(&self) -> &'static str {
        GAM_SOURCE
    }

    #[instrument(skip(self))]
    async fn extract(&self) -> Result<Vec<CandidateEvent>> {
        let Some(body) = self.fetcher.fetch(GAM_URL, None).await else {
            return Ok(Vec::new());
        };
        let events = parse_calendar(&body)?;
        info!("Successfully extracted {} events from GAM", events.len());
        Ok(events)
    }
}

pub fn parse_calendar(body: &str) -> Result<Vec<CandidateEvent>> {
    let document = Html::parse_document(body);
    let button_sel = selector(r#"button[data-bs-toggle="tooltip"]"#)?;
    let title_sel = selector(".tool-titulo p")?;
    let link_sel = selector(".tool-link a")?;
    let image_sel = selector(".tool-img img")?;
    let summary_sel = selector(".tool-resumen p b")?;

    let mut events = Vec::new();
    for button in document.select(&button_sel) {
        // Bootstrap moves `title` to `data-bs-original-title` once initialised
        let Some(tooltip) = first_attr(&button, &["title", "data-bs-original-title"]) else {
            continue;
        };
        let fragment = Html::parse_fragment(&tooltip);
        let card = fragment.root_element();

        let Some(title) = select_text(&card, &title_sel) else {
            debug!("Skipping tooltip without title");
            continue;
        };
        let Some(link) = select_attr(&card, &link_sel, &["href"]).and_then(|h| resolve_url(GAM_BASE_URL, &h)) else {
            debug!(title = %title, "Skipping tooltip without link");
            continue;
        };
        let image = select_attr(&card, &image_sel, &["src"]).and_then(|s| resolve_url(GAM_BASE_URL, &s));
        let summary = select_text(&card, &summary_sel);
        let start = parse_spanish_date(summary.as_deref().unwrap_or_default(), None);
        let description = format!("Evento GAM. Fechas: {}", summary.as_deref().unwrap_or("N/A"));

        events.push(
            CandidateEvent::new(title, start, EventCategory::Art, EventRegion::Metropolitana)
                .with_description(description)
                .with_external_url(Some(link))
                .with_image_url(image),
        );
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_calendar_reads_tooltip_fragments() {
        let body = r#"
            <table class="calendario"><tr>
              <td><button data-bs-toggle="tooltip" data-bs-html="true"
                  title="<div class='tool-img'><img src='/wp-content/uploads/danza.jpg'></div><div class='tool-titulo'><p>Danza en el GAM</p></div><div class='tool-resumen'><p><b>7 Nov 2025</b></p></div><div class='tool-link'><a href='/teatro/danza-en-el-gam/'>Ver más</a></div>">7</button></td>
              <td><button data-bs-toggle="tooltip"
                  data-bs-original-title="<div class='tool-titulo'><p>Concierto</p></div><div class='tool-link'><a href='https://gam.cl/musica/concierto/'>Ver</a></div>">8</button></td>
              <td><button data-bs-toggle="tooltip" title="<div class='tool-titulo'><p>Sin enlace</p></div>">9</button></td>
              <td><button data-bs-toggle="tooltip">10</button></td>
            </tr></table>
        "#;
        let events = parse_calendar(body).unwrap();
        assert_eq!(events.len(), 2);

        let danza = &events[0];
        assert_eq!(danza.title, "Danza en el GAM");
        assert_eq!(danza.external_url.as_deref(), Some("https://gam.cl/teatro/danza-en-el-gam/"));
        assert_eq!(danza.image_url.as_deref(), Some("https://gam.cl/wp-content/uploads/danza.jpg"));
        assert_eq!(danza.start.date(), NaiveDate::from_ymd_opt(2025, 11, 7).unwrap());
        assert_eq!(danza.description, "Evento GAM. Fechas: 7 Nov 2025");

        assert_eq!(events[1].title, "Concierto");
        assert_eq!(events[1].description, "Evento GAM. Fechas: N/A");
    }
}
