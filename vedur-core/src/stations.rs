//! Station list scraping.
//!
//! The station overview page lists every station in a `.listtable` table.
//! Automatic stations are the links whose text contains the letter `A`; their
//! `href` carries the numeric id and their `title` the station name followed by
//! ` -`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::{
    error::{Result, VedurError},
    model::StationRecord,
};

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".listtable td a").expect("static selector is valid"));

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"station=(\d+)").expect("static regex is valid"));

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[\p{L}0-9-]+[\s-]?)+)\s-").expect("static regex is valid")
});

/// Marker in the link text of automatic stations.
const AUTOMATIC_MARKER: char = 'A';

fn load(body: &str) -> Result<Html> {
    if body.trim().is_empty() {
        return Err(VedurError::DomLoad { message: "empty document".to_string() });
    }
    Ok(Html::parse_document(body))
}

fn capture<'h>(pattern: &Regex, haystack: &'h str) -> Option<&'h str> {
    pattern.captures(haystack).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Extract `{name, id}` for every automatic station link, in document order.
///
/// A single link that does not match the expected markup fails the whole
/// scrape with [`VedurError::ScrapePatternMismatch`].
pub fn scrape_stations(body: &str) -> Result<Vec<StationRecord>> {
    let document = load(body)?;
    let mut stations = Vec::new();

    for link in document.select(&LINK_SELECTOR) {
        if !link.text().any(|t| t.contains(AUTOMATIC_MARKER)) {
            continue;
        }

        let href = link.value().attr("href").unwrap_or_default();
        let title = link.value().attr("title").unwrap_or_default();

        let (Some(id), Some(name)) = (capture(&ID_PATTERN, href), capture(&TITLE_PATTERN, title))
        else {
            warn!(href, title, "station link does not match expected markup");
            return Err(VedurError::scrape(format!(
                "station link href={href:?} title={title:?} does not match"
            )));
        };

        stations.push(StationRecord { name: name.to_string(), id: id.to_string() });
    }

    debug!(count = stations.len(), "scraped station list");
    Ok(stations)
}
