use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::classifier::{ClassifierConfig, DEFAULT_DELTA_ATTACKS, DEFAULT_DELTA_POSSESSION};
use crate::scrape_source::DEFAULT_SCRAPE_URL;

pub const MIN_REFRESH_MINUTES: u32 = 1;
pub const MAX_REFRESH_MINUTES: u32 = 30;
pub const DEFAULT_REFRESH_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Scrape,
    Live,
    LiveWithStats,
    Demo,
}

impl SourceKind {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "scrape" | "html" => Ok(SourceKind::Scrape),
            "live" | "api" => Ok(SourceKind::Live),
            "live_stats" | "live-stats" => Ok(SourceKind::LiveWithStats),
            "demo" | "fake" => Ok(SourceKind::Demo),
            other => Err(anyhow::anyhow!(
                "unsupported ESOCCER_SOURCE={other}, expected scrape, live, live_stats or demo"
            )),
        }
    }

    pub fn needs_api_key(self) -> bool {
        matches!(self, SourceKind::Live | SourceKind::LiveWithStats)
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Scrape => "scrape",
            SourceKind::Live => "live api",
            SourceKind::LiveWithStats => "live api + stats",
            SourceKind::Demo => "demo",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceKind,
    pub refresh_minutes: u32,
    pub classifier: ClassifierConfig,
    pub scrape_url: String,
    // Present only for the API sources.
    pub api: Option<ApiConfig>,
    pub report_dir: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env.local`, `.env` and the process environment. A missing API
    /// key for an API source is an error.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let source = match non_empty(lookup("ESOCCER_SOURCE")) {
            Some(raw) => SourceKind::parse(&raw)?,
            None => SourceKind::Scrape,
        };

        let refresh_minutes = clamp_refresh_minutes(
            lookup("ESOCCER_REFRESH_MINUTES")
                .and_then(|val| val.trim().parse::<i64>().ok())
                .unwrap_or(i64::from(DEFAULT_REFRESH_MINUTES)),
        );

        let classifier = ClassifierConfig {
            delta_attacks: lookup("ESOCCER_DELTA_ATTACKS")
                .and_then(|val| val.trim().parse::<i64>().ok())
                .unwrap_or(DEFAULT_DELTA_ATTACKS),
            delta_possession: lookup("ESOCCER_DELTA_POSSESSION")
                .and_then(|val| val.trim().parse::<i64>().ok())
                .unwrap_or(DEFAULT_DELTA_POSSESSION),
            require_strict_dominance_b: lookup("ESOCCER_STRICT_B")
                .map(|val| parse_flag(&val))
                .unwrap_or(false),
        };

        let api = if source.needs_api_key() {
            let api_key = non_empty(lookup("ESOCCER_API_KEY"))
                .context("ESOCCER_API_KEY missing; required for the live api sources")?;
            let base_url = non_empty(lookup("ESOCCER_API_BASE"))
                .context("ESOCCER_API_BASE missing; required for the live api sources")?;
            Some(ApiConfig { base_url, api_key })
        } else {
            None
        };

        Ok(Self {
            source,
            refresh_minutes,
            classifier,
            scrape_url: non_empty(lookup("ESOCCER_SCRAPE_URL"))
                .unwrap_or_else(|| DEFAULT_SCRAPE_URL.to_string()),
            api,
            report_dir: non_empty(lookup("ESOCCER_REPORT_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            log_file: non_empty(lookup("ESOCCER_LOG_FILE")).map(PathBuf::from),
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        refresh_interval(self.refresh_minutes)
    }
}

pub fn clamp_refresh_minutes(minutes: i64) -> u32 {
    minutes.clamp(i64::from(MIN_REFRESH_MINUTES), i64::from(MAX_REFRESH_MINUTES)) as u32
}

pub fn refresh_interval(minutes: u32) -> Duration {
    Duration::from_secs(u64::from(minutes) * 60)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
