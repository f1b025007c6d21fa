use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::api_source::ApiSource;
use crate::config::{AppConfig, SourceKind};
use crate::fake_feed;
use crate::normalize::Normalized;
use crate::scrape_source;

/// Where a tick's records come from.
#[derive(Debug, Clone)]
pub enum Source {
    Scrape { url: String },
    Live(ApiSource),
    LiveWithStats(ApiSource),
    Demo,
}

impl Source {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api = || {
            config
                .api
                .as_ref()
                .map(|api| ApiSource::new(&api.base_url, &api.api_key))
                .context("api source selected without api settings")
        };
        Ok(match config.source {
            SourceKind::Scrape => Source::Scrape {
                url: config.scrape_url.clone(),
            },
            SourceKind::Live => Source::Live(api()?),
            SourceKind::LiveWithStats => Source::LiveWithStats(api()?),
            SourceKind::Demo => Source::Demo,
        })
    }

    pub fn fetch(&self) -> Result<Normalized> {
        match self {
            Source::Scrape { url } => scrape_source::fetch_scraped_matches(url),
            Source::Live(api) => api.fetch_live(),
            Source::LiveWithStats(api) => api.fetch_live_with_stats(),
            Source::Demo => Ok(fake_feed::generate(&mut rand::thread_rng())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub normalized: Normalized,
    pub fetched_at: DateTime<Local>,
    // Set when the fetch failed and the tick fell back to no records.
    pub warning: Option<String>,
}

/// Runs one fetch. Failures never escape: they turn into an empty tick with a warning.
pub fn fetch_tick(source: &Source) -> TickOutcome {
    run_tick(|| source.fetch())
}

pub fn run_tick(fetch: impl FnOnce() -> Result<Normalized>) -> TickOutcome {
    let fetched_at = Local::now();
    match fetch() {
        Ok(normalized) => {
            info!(
                records = normalized.records.len(),
                skipped = normalized.skipped.len(),
                "tick fetched"
            );
            for skipped in &normalized.skipped {
                warn!(index = skipped.index, "record skipped: {}", skipped.reason);
            }
            TickOutcome {
                normalized,
                fetched_at,
                warning: None,
            }
        }
        Err(err) => {
            warn!("source fetch failed: {err:#}");
            TickOutcome {
                normalized: Normalized::default(),
                fetched_at,
                warning: Some(format!("Could not load match data: {err:#}")),
            }
        }
    }
}
