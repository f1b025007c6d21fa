//! Scrape adapter for the forebet e-soccer page.
//!
//! Page layout the selectors rely on:
//! ```text
//! <div class="match-row">
//!   <span class="homeTeam">Team A</span> <span class="awayTeam">Team B</span>
//!   <div class="stat-row"><span class="stat-name">Posse A</span><span class="stat-value">62%</span></div>
//!   ...
//! </div>
//! ```

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::http_client::fetch_text;
use crate::normalize::{Normalized, RecordOutcome, SkipReason, record_from_text_stats};
use crate::record::StatKey;

pub const DEFAULT_SCRAPE_URL: &str = "https://www.forebet.com/pt/esoccer/esoccer-battle-8-mins-play";

struct Selectors {
    match_row: Selector,
    home: Selector,
    away: Selector,
    stat_row: Selector,
    stat_name: Selector,
    stat_value: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            match_row: parse_selector(".match-row")?,
            home: parse_selector(".homeTeam")?,
            away: parse_selector(".awayTeam")?,
            stat_row: parse_selector(".stat-row")?,
            stat_name: parse_selector(".stat-name")?,
            stat_value: parse_selector(".stat-value")?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("invalid selector {css}: {err}"))
}

pub fn fetch_scraped_matches(url: &str) -> Result<Normalized> {
    let html = fetch_text(url, &[]).context("scrape request failed")?;
    parse_match_rows_html(&html)
}

pub fn parse_match_rows_html(html: &str) -> Result<Normalized> {
    let selectors = Selectors::new()?;
    let document = Html::parse_document(html);
    let outcomes = document
        .select(&selectors.match_row)
        .map(|row| normalize_match_row(row, &selectors))
        .collect::<Vec<_>>();
    debug!(rows = outcomes.len(), "parsed match rows");
    Ok(Normalized::from_outcomes(outcomes))
}

fn normalize_match_row(row: ElementRef<'_>, selectors: &Selectors) -> RecordOutcome {
    let (Some(home), Some(away)) = (
        first_text(row, &selectors.home),
        first_text(row, &selectors.away),
    ) else {
        return RecordOutcome::Skipped(SkipReason::MissingTeams);
    };

    // Later rows with the same label win, same as building a map.
    let mut values: Vec<(StatKey, String)> = Vec::new();
    for stat in row.select(&selectors.stat_row) {
        let (Some(name), Some(value)) = (
            first_text(stat, &selectors.stat_name),
            first_text(stat, &selectors.stat_value),
        ) else {
            return RecordOutcome::Skipped(SkipReason::MalformedStatRow);
        };
        let Some(key) = StatKey::from_page_label(&name) else {
            continue;
        };
        values.retain(|(k, _)| *k != key);
        values.push((key, value));
    }

    record_from_text_stats(
        home,
        away,
        values.iter().map(|(key, value)| (*key, value.as_str())),
    )
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
