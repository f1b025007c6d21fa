use std::fs;
use std::path::PathBuf;

use esoccer_terminal::api_source::{
    ApiSource, parse_event_stats_json, parse_live_events_json, parse_live_matches_json,
};
use esoccer_terminal::classifier::{ClassifierConfig, classify};
use esoccer_terminal::normalize::{RecordOutcome, SkipReason, record_from_json_stats};
use esoccer_terminal::record::{MatchRecord, StatKey};
use esoccer_terminal::scrape_source::parse_match_rows_html;
use serde_json::json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_scraped_page_fixture() {
    let raw = read_fixture("esoccer_page.html");
    let normalized = parse_match_rows_html(&raw).expect("fixture should parse");

    assert_eq!(normalized.records.len(), 3);
    let first = &normalized.records[0];
    assert_eq!(first.team_a, "Arsenal (Boulevard)");
    assert_eq!(first.team_b, "Chelsea (Kray)");
    assert_eq!(first.attacks_a, 20);
    assert_eq!(first.possession_a, 60);
    assert_eq!(first.possession_b, 40);
    assert_eq!(first.shots_b, 5);
    assert_eq!(first.shots_on_goal_b, 3);
    assert!(classify(first, &ClassifierConfig::default()));

    let partial = &normalized.records[1];
    assert_eq!(partial.team_a, "Liverpool (Palkan)");
    assert_eq!(partial.attacks_a, 12);
    assert_eq!(partial.attacks_b, 10);
    assert_eq!(partial.possession_a, 51);
    assert_eq!(partial.possession_b, 0);
    assert_eq!(partial.dangerous_attacks_a, 0);

    assert_eq!(normalized.records[2].team_a, "PSG (Nio)");
    assert!(!classify(&normalized.records[2], &ClassifierConfig::default()));
}

#[test]
fn scraped_rows_with_errors_are_skipped_not_fatal() {
    let raw = read_fixture("esoccer_page.html");
    let normalized = parse_match_rows_html(&raw).expect("fixture should parse");

    assert_eq!(normalized.skipped.len(), 2);
    assert_eq!(normalized.skipped[0].index, 2);
    assert_eq!(normalized.skipped[0].reason, SkipReason::MissingTeams);
    assert_eq!(normalized.skipped[1].index, 3);
    assert_eq!(
        normalized.skipped[1].reason,
        SkipReason::InvalidStat {
            key: StatKey::AttacksA,
            raw: "-".to_string(),
        }
    );
}

#[test]
fn page_without_rows_is_empty() {
    let normalized = parse_match_rows_html("<html><body><p>Sem jogos</p></body></html>")
        .expect("html should parse");
    assert!(normalized.is_empty());
}

fn single_row_page(stat_rows: &str) -> String {
    format!(
        "<html><body><div class=\"match-row\">\
         <span class=\"homeTeam\">Home</span><span class=\"awayTeam\">Away</span>\
         {stat_rows}</div></body></html>"
    )
}

#[test]
fn decimal_possession_skips_the_row() {
    let raw = single_row_page(
        "<div class=\"stat-row\"><span class=\"stat-name\">Ataques A</span><span class=\"stat-value\">30</span></div>\
         <div class=\"stat-row\"><span class=\"stat-name\">Posse A</span><span class=\"stat-value\">50.4%</span></div>\
         <div class=\"stat-row\"><span class=\"stat-name\">Posse B</span><span class=\"stat-value\">49.6%</span></div>",
    );
    let normalized = parse_match_rows_html(&raw).expect("html should parse");

    assert!(normalized.records.is_empty());
    assert_eq!(normalized.skipped.len(), 1);
    assert_eq!(
        normalized.skipped[0].reason,
        SkipReason::InvalidStat {
            key: StatKey::PossessionA,
            raw: "50.4%".to_string(),
        }
    );
}

#[test]
fn signed_and_grouped_values_skip_the_row() {
    for value in ["-3", "1,234"] {
        let raw = single_row_page(&format!(
            "<div class=\"stat-row\"><span class=\"stat-name\">Ataques A</span><span class=\"stat-value\">{value}</span></div>"
        ));
        let normalized = parse_match_rows_html(&raw).expect("html should parse");
        assert!(normalized.records.is_empty(), "{value} should be rejected");
        assert_eq!(normalized.skipped.len(), 1);
    }
}

#[test]
fn stat_row_without_value_skips_even_for_unknown_label() {
    let raw = single_row_page(
        "<div class=\"stat-row\"><span class=\"stat-name\">Ataques A</span><span class=\"stat-value\">30</span></div>\
         <div class=\"stat-row\"><span class=\"stat-name\">Escanteios A</span></div>",
    );
    let normalized = parse_match_rows_html(&raw).expect("html should parse");

    assert!(normalized.records.is_empty());
    assert_eq!(normalized.skipped[0].reason, SkipReason::MalformedStatRow);
}

#[test]
fn live_entry_with_non_object_stats_is_skipped() {
    let raw = r#"[
        {"home_team": {"name": "H"}, "away_team": {"name": "A"}, "stats": "n/a"},
        {"home_team": {"name": "H2"}, "away_team": {"name": "A2"}, "stats": [1, 2]},
        {"home_team": {"name": "H3"}, "away_team": {"name": "A3"}, "stats": null}
    ]"#;
    let normalized = parse_live_matches_json(raw).expect("json should parse");

    assert_eq!(normalized.records.len(), 1);
    assert_eq!(normalized.records[0].team_a, "H3");
    assert_eq!(normalized.skipped.len(), 2);
    assert!(normalized
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::NotAnObject));
}

#[test]
fn parses_live_matches_fixture() {
    let raw = read_fixture("live_matches.json");
    let normalized = parse_live_matches_json(&raw).expect("fixture should parse");

    assert_eq!(normalized.records.len(), 3);
    let first = &normalized.records[0];
    assert_eq!(first.team_a, "Arsenal (Boulevard)");
    assert_eq!(first.possession_a, 60);
    assert_eq!(first.shots_a, 5);
    assert_eq!(first.shots_b, 5);

    let strict = ClassifierConfig {
        require_strict_dominance_b: true,
        ..ClassifierConfig::default()
    };
    assert!(classify(first, &ClassifierConfig::default()));
    assert!(!classify(first, &strict));

    let partial = &normalized.records[1];
    assert_eq!(partial.attacks_a, 33);
    assert_eq!(partial.attacks_b, 21);
    assert_eq!(partial.possession_a, 55);
    assert_eq!(partial.possession_b, 0);
    assert_eq!(partial.shots_on_goal_b, 0);

    let nameless = &normalized.records[2];
    assert_eq!(nameless.team_a, "");
    assert_eq!(nameless.team_b, "");
    assert_eq!(nameless.possession_a, 140);
}

#[test]
fn live_matches_fixture_skips_bad_entries() {
    let raw = read_fixture("live_matches.json");
    let normalized = parse_live_matches_json(&raw).expect("fixture should parse");

    assert_eq!(normalized.skipped.len(), 2);
    assert_eq!(normalized.skipped[0].index, 2);
    assert!(matches!(
        normalized.skipped[0].reason,
        SkipReason::InvalidStat {
            key: StatKey::AttacksA,
            ..
        }
    ));
    assert_eq!(normalized.skipped[1].index, 3);
    assert_eq!(normalized.skipped[1].reason, SkipReason::NotAnObject);
    assert_eq!(normalized.summary(), "3 records, 2 rejected");
}

#[test]
fn live_matches_accepts_bare_array() {
    let raw = r#"[{"home_team":{"name":"A"},"away_team":{"name":"B"},"stats":{"attacks_home":3}}]"#;
    let normalized = parse_live_matches_json(raw).expect("array should parse");
    assert_eq!(normalized.records.len(), 1);
    assert_eq!(normalized.records[0].attacks_a, 3);
}

#[test]
fn live_matches_null_is_empty() {
    assert!(parse_live_matches_json("null").expect("null should parse").is_empty());
    assert!(parse_live_matches_json("").expect("empty should parse").is_empty());
    assert!(
        parse_live_matches_json(r#"{"data":null}"#)
            .expect("null list should parse")
            .is_empty()
    );
}

#[test]
fn malformed_live_payload_is_an_error() {
    assert!(parse_live_matches_json("{not json").is_err());
    assert!(parse_live_matches_json(r#"{"error":"quota"}"#).is_err());
    assert!(parse_live_matches_json("42").is_err());
}

#[test]
fn missing_stat_defaults_to_zero() {
    let stats = json!({
        "attacks_home": 25,
        "attacks_away": 9,
        "dangerous_attacks_home": 4,
    });
    let outcome = record_from_json_stats("H".to_string(), "A".to_string(), &stats);
    let RecordOutcome::Record(record) = outcome else {
        panic!("record should not be skipped");
    };
    assert_eq!(record.attacks_a, 25);
    assert_eq!(record.dangerous_attacks_b, 0);
    assert_eq!(record.possession_a, 0);
    assert_eq!(record.shots_on_goal_b, 0);
}

#[test]
fn live_events_carry_ids_and_names() {
    let raw = read_fixture("live_matches.json");
    let events = parse_live_events_json(&raw).expect("fixture should parse");
    assert_eq!(events.len(), 5);

    let first = events[0].as_ref().expect("first event is valid");
    assert_eq!(first.id, "9001");
    assert_eq!(first.team_b, "Chelsea (Kray)");
    assert_eq!(events[1].as_ref().expect("second event").id, "9002");
    assert_eq!(events[3], Err(SkipReason::NotAnObject));
}

#[test]
fn live_event_without_id_is_skipped() {
    let events = parse_live_events_json(r#"[{"home_team":{"name":"A"}}]"#).expect("should parse");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], Err(SkipReason::MissingEventId));
}

#[test]
fn parses_event_statistics_fixture() {
    let raw = read_fixture("event_stats.json");
    let stats = parse_event_stats_json(&raw).expect("fixture should parse");
    let RecordOutcome::Record(record) =
        record_from_json_stats("H".to_string(), "A".to_string(), &stats)
    else {
        panic!("stats fixture should normalize");
    };
    assert_eq!(record.attacks_a, 44);
    assert_eq!(record.shots_b, 4);
    assert!(classify(&record, &ClassifierConfig::default()));
}

#[test]
fn event_statistics_may_be_flat() {
    let stats = parse_event_stats_json(r#"{"attacks_home": 9}"#).expect("flat map should parse");
    assert_eq!(stats["attacks_home"], 9);
    assert!(parse_event_stats_json("null").expect("null").is_null());
    assert!(parse_event_stats_json("[1,2]").is_err());
}

#[test]
fn api_urls_are_built_from_base() {
    let api = ApiSource::new("https://api.example.test/v1/", "secret");
    assert_eq!(api.live_url(), "https://api.example.test/v1/matches/live");
    assert_eq!(
        api.event_stats_url("9001"),
        "https://api.example.test/v1/events/9001/statistics"
    );
}

#[test]
fn record_snapshot_json_defaults_missing_stats() {
    let raw = r#"[{"team_a":"H","team_b":"A","attacks_a":21,"possession_a":58}]"#;
    let records: Vec<MatchRecord> = serde_json::from_str(raw).expect("snapshot should parse");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].attacks_a, 21);
    assert_eq!(records[0].attacks_b, 0);
    assert_eq!(records[0].possession_a, 58);
}
