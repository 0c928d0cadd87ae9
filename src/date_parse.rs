//! Spanish-locale date text to timestamps.
//!
//! Listing pages write dates as "18 de noviembre de 2025", "10/Julio/2025",
//! "3 Oct 2025" or ranges such as "Del 22 de noviembre al 31 de diciembre".
//! Only the first recognizable day and month are used; the start of a range
//! is what matters for sorting.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(\d{1,2})(?:\s*/\s*|\s+de\s+|\s+)([a-zñ]+)\.?(?:(?:\s*/\s*|\s+del?\s+|,?\s+)(\d{4})\b)?",
    )
    .expect("day/month/year pattern")
});

static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(202\d)\b").expect("year pattern"));

/// Month number for a Spanish (or English) month name or abbreviation.
///
/// "fenero" is a misspelling of "enero" that shows up in MNBA listings.
pub fn month_number(name: &str) -> Option<u32> {
    let month = match name.trim_end_matches('.').to_lowercase().as_str() {
        "enero" | "fenero" | "ene" | "january" | "jan" => 1,
        "febrero" | "feb" | "february" => 2,
        "marzo" | "mar" | "march" => 3,
        "abril" | "abr" | "april" | "apr" => 4,
        "mayo" | "may" => 5,
        "junio" | "jun" | "june" => 6,
        "julio" | "jul" | "july" => 7,
        "agosto" | "ago" | "august" | "aug" => 8,
        "septiembre" | "setiembre" | "sep" | "sept" | "set" | "september" => 9,
        "octubre" | "oct" | "october" => 10,
        "noviembre" | "nov" | "november" => 11,
        "diciembre" | "dic" | "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse the first day/month/year found in `text`.
///
/// The year is taken from the date itself when written next to it, otherwise
/// from the nearest standalone `202x` token in the text, otherwise from
/// `year_hint`, otherwise the current year.
pub fn parse_spanish_date_opt(text: &str, year_hint: Option<i32>) -> Option<NaiveDateTime> {
    let clean = text.to_lowercase();

    for caps in DAY_MONTH_YEAR.captures_iter(&clean) {
        let Some(month) = caps.get(2).and_then(|m| month_number(m.as_str())) else {
            continue;
        };
        let Ok(day) = caps[1].parse::<u32>() else {
            continue;
        };
        let position = caps.get(0).map_or(0, |m| m.start());
        let year = caps
            .get(3)
            .and_then(|y| y.as_str().parse::<i32>().ok())
            .or_else(|| nearest_year_token(&clean, position))
            .or(year_hint)
            .unwrap_or_else(|| Local::now().year());

        if let Some(dt) = NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(0, 0, 0)) {
            return Some(dt);
        }
    }
    None
}

/// Like [`parse_spanish_date_opt`], but falls back to the current local time.
///
/// Never fails. Unreadable dates show up in the admin as events starting at
/// collection time, and are counted in `agenda_date_fallback_total`.
pub fn parse_spanish_date(text: &str, year_hint: Option<i32>) -> NaiveDateTime {
    match parse_spanish_date_opt(text, year_hint) {
        Some(dt) => dt,
        None => {
            debug!(text = %text, "No recognizable date, using current time");
            crate::metrics::record_date_fallback();
            Local::now().naive_local()
        }
    }
}

fn nearest_year_token(text: &str, position: usize) -> Option<i32> {
    YEAR_TOKEN
        .find_iter(text)
        .min_by_key(|m| m.start().abs_diff(position))
        .and_then(|m| m.as_str().parse().ok())
}
