use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::fetch_text;
use crate::normalize::{Normalized, RecordOutcome, SkipReason, record_from_json_stats};

const API_KEY_HEADER: &str = "x-api-key";
const LIST_KEYS: [&str; 3] = ["data", "results", "matches"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEvent {
    pub id: String,
    pub team_a: String,
    pub team_b: String,
}

#[derive(Debug, Clone)]
pub struct ApiSource {
    base_url: String,
    api_key: String,
}

impl ApiSource {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn live_url(&self) -> String {
        format!("{}/matches/live", self.base_url)
    }

    pub fn event_stats_url(&self, event_id: &str) -> String {
        format!("{}/events/{event_id}/statistics", self.base_url)
    }

    fn get(&self, url: &str) -> Result<String> {
        fetch_text(url, &[(API_KEY_HEADER, self.api_key.as_str())])
    }

    /// Live matches with their inline `stats` map.
    pub fn fetch_live(&self) -> Result<Normalized> {
        let body = self.get(&self.live_url()).context("live matches request failed")?;
        parse_live_matches_json(&body)
    }

    /// Live matches, with statistics looked up per event. A failed lookup only
    /// drops that event.
    pub fn fetch_live_with_stats(&self) -> Result<Normalized> {
        let body = self.get(&self.live_url()).context("live matches request failed")?;
        let events = parse_live_events_json(&body)?;
        debug!(events = events.len(), "looking up event statistics");

        let outcomes = events.into_iter().map(|event| {
            let event = match event {
                Ok(event) => event,
                Err(reason) => return RecordOutcome::Skipped(reason),
            };
            match self
                .get(&self.event_stats_url(&event.id))
                .and_then(|raw| parse_event_stats_json(&raw))
            {
                Ok(stats) => record_from_json_stats(event.team_a, event.team_b, &stats),
                Err(err) => {
                    warn!(event_id = %event.id, "statistics lookup failed: {err:#}");
                    RecordOutcome::Skipped(SkipReason::LookupFailed {
                        event_id: event.id,
                        message: format!("{err:#}"),
                    })
                }
            }
        });
        Ok(Normalized::from_outcomes(outcomes))
    }
}

pub fn parse_live_matches_json(raw: &str) -> Result<Normalized> {
    let entries = parse_entries(raw)?;
    let outcomes = entries.iter().map(|entry| {
        if !entry.is_object() {
            return RecordOutcome::Skipped(SkipReason::NotAnObject);
        }
        let (team_a, team_b) = team_names(entry);
        let stats = entry.get("stats").unwrap_or(&Value::Null);
        record_from_json_stats(team_a, team_b, stats)
    });
    Ok(Normalized::from_outcomes(outcomes))
}

pub fn parse_live_events_json(raw: &str) -> Result<Vec<Result<LiveEvent, SkipReason>>> {
    let entries = parse_entries(raw)?;
    Ok(entries
        .iter()
        .map(|entry| {
            if !entry.is_object() {
                return Err(SkipReason::NotAnObject);
            }
            let id = entry.get("id").and_then(as_string).unwrap_or_default();
            if id.is_empty() {
                return Err(SkipReason::MissingEventId);
            }
            let (team_a, team_b) = team_names(entry);
            Ok(LiveEvent { id, team_a, team_b })
        })
        .collect())
}

/// Statistics response: either the flat stats map itself or `{ "stats": {...} }`.
pub fn parse_event_stats_json(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Value::Null);
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid statistics json")?;
    let stats = match root.get("stats") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => root,
    };
    if !stats.is_object() && !stats.is_null() {
        return Err(anyhow::anyhow!("statistics payload is not an object"));
    }
    Ok(stats)
}

fn parse_entries(raw: &str) -> Result<Vec<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid live matches json")?;
    match root {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in LIST_KEYS {
                match map.remove(key) {
                    Some(Value::Array(items)) => return Ok(items),
                    Some(Value::Null) => return Ok(Vec::new()),
                    _ => {}
                }
            }
            Err(anyhow::anyhow!("live matches payload has no match list"))
        }
        _ => Err(anyhow::anyhow!("live matches payload is not a list")),
    }
}

fn team_names(entry: &Value) -> (String, String) {
    let name = |side: &str| {
        entry
            .get(side)
            .and_then(|team| team.get("name"))
            .and_then(as_string)
            .unwrap_or_default()
    };
    (name("home_team"), name("away_team"))
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
