use serde::Serialize;

use crate::record::MatchRecord;

pub const DEFAULT_DELTA_ATTACKS: i64 = 10;
pub const DEFAULT_DELTA_POSSESSION: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub delta_attacks: i64,
    pub delta_possession: i64,
    // AND instead of OR when checking team B's shots / shots on goal.
    pub require_strict_dominance_b: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            delta_attacks: DEFAULT_DELTA_ATTACKS,
            delta_possession: DEFAULT_DELTA_POSSESSION,
            require_strict_dominance_b: false,
        }
    }
}

impl ClassifierConfig {
    pub fn mode_label(&self) -> &'static str {
        if self.require_strict_dominance_b {
            "B strict (shots AND on goal)"
        } else {
            "B lenient (shots OR on goal)"
        }
    }
}

/// Both halves of the rule, kept apart so the dashboard can show why a row missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub dominance_a: bool,
    pub dominance_b: bool,
}

impl Verdict {
    pub fn matched(&self) -> bool {
        self.dominance_a && self.dominance_b
    }
}

/// Team A out-attacks team B by the configured margins. The attack and
/// possession margins are inclusive, dangerous attacks must be strictly higher.
pub fn dominance_a(record: &MatchRecord, config: &ClassifierConfig) -> bool {
    let attacks_diff = i64::from(record.attacks_a) - i64::from(record.attacks_b);
    let possession_diff = i64::from(record.possession_a) - i64::from(record.possession_b);
    attacks_diff >= config.delta_attacks
        && record.dangerous_attacks_a > record.dangerous_attacks_b
        && possession_diff >= config.delta_possession
}

/// Team B takes more shots and/or more shots on goal. Ties never count.
pub fn dominance_b(record: &MatchRecord, config: &ClassifierConfig) -> bool {
    let more_shots = record.shots_b > record.shots_a;
    let more_on_goal = record.shots_on_goal_b > record.shots_on_goal_a;
    if config.require_strict_dominance_b {
        more_shots && more_on_goal
    } else {
        more_shots || more_on_goal
    }
}

pub fn evaluate(record: &MatchRecord, config: &ClassifierConfig) -> Verdict {
    Verdict {
        dominance_a: dominance_a(record, config),
        dominance_b: dominance_b(record, config),
    }
}

pub fn classify(record: &MatchRecord, config: &ClassifierConfig) -> bool {
    evaluate(record, config).matched()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MatchRecord {
        MatchRecord {
            team_a: "A".to_string(),
            team_b: "B".to_string(),
            attacks_a: 20,
            attacks_b: 5,
            dangerous_attacks_a: 8,
            dangerous_attacks_b: 3,
            possession_a: 60,
            possession_b: 40,
            shots_a: 2,
            shots_b: 5,
            shots_on_goal_a: 1,
            shots_on_goal_b: 3,
        }
    }

    #[test]
    fn differences_are_signed() {
        let record = MatchRecord {
            attacks_a: 0,
            attacks_b: u32::MAX,
            ..base()
        };
        let config = ClassifierConfig {
            delta_attacks: -(i64::from(u32::MAX)),
            ..ClassifierConfig::default()
        };
        assert!(dominance_a(&record, &config));
    }

    #[test]
    fn negative_possession_margin_allows_trailing_team() {
        let record = MatchRecord {
            possession_a: 45,
            possession_b: 55,
            ..base()
        };
        let config = ClassifierConfig {
            delta_possession: -10,
            ..ClassifierConfig::default()
        };
        assert!(dominance_a(&record, &config));
    }

    #[test]
    fn verdict_reports_each_half() {
        let record = MatchRecord {
            shots_b: 0,
            shots_on_goal_b: 0,
            ..base()
        };
        let verdict = evaluate(&record, &ClassifierConfig::default());
        assert!(verdict.dominance_a);
        assert!(!verdict.dominance_b);
        assert!(!verdict.matched());
    }
}
