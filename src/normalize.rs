use std::fmt;

use serde_json::Value;

use crate::record::{MatchRecord, StatKey};

/// Why a single source entry was dropped. The rest of the tick continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingTeams,
    MalformedStatRow,
    NotAnObject,
    MissingEventId,
    InvalidStat { key: StatKey, raw: String },
    LookupFailed { event_id: String, message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingTeams => write!(f, "team name elements missing"),
            SkipReason::MalformedStatRow => write!(f, "stat row without a name or value"),
            SkipReason::NotAnObject => write!(f, "entry is not a json object"),
            SkipReason::MissingEventId => write!(f, "live event without an id"),
            SkipReason::InvalidStat { key, raw } => {
                write!(f, "invalid value {raw:?} for {}", key.api_key())
            }
            SkipReason::LookupFailed { event_id, message } => {
                write!(f, "statistics lookup for event {event_id} failed: {message}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Record(MatchRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    // Position of the entry in the source payload.
    pub index: usize,
    pub reason: SkipReason,
}

/// Result of normalizing one payload: accepted records in source order plus
/// whatever was rejected along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub records: Vec<MatchRecord>,
    pub skipped: Vec<Skipped>,
}

impl Normalized {
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = RecordOutcome>) -> Self {
        let mut out = Normalized::default();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                RecordOutcome::Record(record) => out.records.push(record),
                RecordOutcome::Skipped(reason) => out.skipped.push(Skipped { index, reason }),
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.skipped.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.skipped.is_empty() {
            format!("{} records", self.records.len())
        } else {
            format!(
                "{} records, {} rejected",
                self.records.len(),
                self.skipped.len()
            )
        }
    }
}

/// Parses a displayed stat such as `"62%"` or `" 14 "`: surrounding whitespace
/// and one trailing `%` are dropped, the rest must be plain digits. Signs,
/// decimals and thousands separators are rejected.
pub fn parse_stat_text(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}

pub fn parse_stat_value(value: &Value) -> Option<u32> {
    match value {
        Value::Null => Some(0),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return u32::try_from(v).ok();
            }
            let f = n.as_f64()?;
            if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
                Some(f as u32)
            } else {
                None
            }
        }
        Value::String(s) => parse_stat_text(s),
        _ => None,
    }
}

/// Fills a record from `(key, raw text)` pairs. Keys that never show up stay 0.
pub fn record_from_text_stats<'a>(
    team_a: String,
    team_b: String,
    stats: impl IntoIterator<Item = (StatKey, &'a str)>,
) -> RecordOutcome {
    let mut record = MatchRecord::new(team_a, team_b);
    for (key, raw) in stats {
        match parse_stat_text(raw) {
            Some(value) => *record.stat_mut(key) = value,
            None => {
                return RecordOutcome::Skipped(SkipReason::InvalidStat {
                    key,
                    raw: raw.to_string(),
                });
            }
        }
    }
    RecordOutcome::Record(record)
}

/// Fills a record from a flat JSON `stats` object keyed by `StatKey::api_key`.
/// A `null` stats value yields an all-zero record, any other non-object is skipped.
pub fn record_from_json_stats(team_a: String, team_b: String, stats: &Value) -> RecordOutcome {
    if !(stats.is_object() || stats.is_null()) {
        return RecordOutcome::Skipped(SkipReason::NotAnObject);
    }
    let mut record = MatchRecord::new(team_a, team_b);
    for key in StatKey::ALL {
        let Some(raw) = stats.get(key.api_key()) else {
            continue;
        };
        match parse_stat_value(raw) {
            Some(value) => *record.stat_mut(key) = value,
            None => {
                return RecordOutcome::Skipped(SkipReason::InvalidStat {
                    key,
                    raw: raw.to_string(),
                });
            }
        }
    }
    RecordOutcome::Record(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_percent_and_whitespace() {
        assert_eq!(parse_stat_text("62%"), Some(62));
        assert_eq!(parse_stat_text(" 14 "), Some(14));
        assert_eq!(parse_stat_text("62 %"), Some(62));
        assert_eq!(parse_stat_text("0"), Some(0));
    }

    #[test]
    fn rejects_text_without_digits() {
        assert_eq!(parse_stat_text(""), None);
        assert_eq!(parse_stat_text("-"), None);
        assert_eq!(parse_stat_text("n/a"), None);
    }

    #[test]
    fn rejects_decimals_signs_and_separators() {
        assert_eq!(parse_stat_text("50.4%"), None);
        assert_eq!(parse_stat_text("-3"), None);
        assert_eq!(parse_stat_text("1,234"), None);
        assert_eq!(parse_stat_text("%"), None);
        assert_eq!(parse_stat_text("5%%"), None);
        assert_eq!(parse_stat_value(&json!("49.6%")), None);
    }

    #[test]
    fn non_object_stats_are_skipped() {
        let team = || "x".to_string();
        assert_eq!(
            record_from_json_stats(team(), team(), &json!("attacks_home=4")),
            RecordOutcome::Skipped(SkipReason::NotAnObject)
        );
        assert_eq!(
            record_from_json_stats(team(), team(), &json!([1, 2])),
            RecordOutcome::Skipped(SkipReason::NotAnObject)
        );
        assert_eq!(
            record_from_json_stats(team(), team(), &Value::Null),
            RecordOutcome::Record(MatchRecord::new("x", "x"))
        );
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(parse_stat_text("99999999999"), None);
    }

    #[test]
    fn json_values() {
        assert_eq!(parse_stat_value(&json!(7)), Some(7));
        assert_eq!(parse_stat_value(&json!(55.0)), Some(55));
        assert_eq!(parse_stat_value(&json!("48%")), Some(48));
        assert_eq!(parse_stat_value(&Value::Null), Some(0));
        assert_eq!(parse_stat_value(&json!(-3)), None);
        assert_eq!(parse_stat_value(&json!(12.5)), None);
        assert_eq!(parse_stat_value(&json!(true)), None);
    }

    #[test]
    fn outcomes_keep_order_and_indices() {
        let normalized = Normalized::from_outcomes(vec![
            RecordOutcome::Record(MatchRecord::new("a", "b")),
            RecordOutcome::Skipped(SkipReason::MissingTeams),
            RecordOutcome::Record(MatchRecord::new("c", "d")),
        ]);
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[1].team_a, "c");
        assert_eq!(normalized.skipped[0].index, 1);
        assert_eq!(normalized.summary(), "2 records, 1 rejected");
    }
}
