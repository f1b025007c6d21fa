use serde::{Deserialize, Serialize};

/// One match snapshot taken during a single tick. Built by the normalizer and
/// never mutated afterwards; verdicts live next to it in `batch::ClassifiedRecord`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRecord {
    pub team_a: String,
    pub team_b: String,
    pub attacks_a: u32,
    pub attacks_b: u32,
    pub dangerous_attacks_a: u32,
    pub dangerous_attacks_b: u32,
    // Percentages, passed through without range checks.
    pub possession_a: u32,
    pub possession_b: u32,
    pub shots_a: u32,
    pub shots_b: u32,
    pub shots_on_goal_a: u32,
    pub shots_on_goal_b: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKey {
    AttacksA,
    AttacksB,
    DangerousAttacksA,
    DangerousAttacksB,
    PossessionA,
    PossessionB,
    ShotsA,
    ShotsB,
    ShotsOnGoalA,
    ShotsOnGoalB,
}

impl StatKey {
    pub const ALL: [StatKey; 10] = [
        StatKey::AttacksA,
        StatKey::AttacksB,
        StatKey::DangerousAttacksA,
        StatKey::DangerousAttacksB,
        StatKey::PossessionA,
        StatKey::PossessionB,
        StatKey::ShotsA,
        StatKey::ShotsB,
        StatKey::ShotsOnGoalA,
        StatKey::ShotsOnGoalB,
    ];

    /// Key used in the REST payload `stats` map.
    pub fn api_key(self) -> &'static str {
        match self {
            StatKey::AttacksA => "attacks_home",
            StatKey::AttacksB => "attacks_away",
            StatKey::DangerousAttacksA => "dangerous_attacks_home",
            StatKey::DangerousAttacksB => "dangerous_attacks_away",
            StatKey::PossessionA => "possession_home",
            StatKey::PossessionB => "possession_away",
            StatKey::ShotsA => "shots_total_home",
            StatKey::ShotsB => "shots_total_away",
            StatKey::ShotsOnGoalA => "shots_on_goal_home",
            StatKey::ShotsOnGoalB => "shots_on_goal_away",
        }
    }

    /// Label of the `.stat-name` cell on the scraped page.
    pub fn page_label(self) -> &'static str {
        match self {
            StatKey::AttacksA => "Ataques A",
            StatKey::AttacksB => "Ataques B",
            StatKey::DangerousAttacksA => "Ataques perigosos A",
            StatKey::DangerousAttacksB => "Ataques perigosos B",
            StatKey::PossessionA => "Posse A",
            StatKey::PossessionB => "Posse B",
            StatKey::ShotsA => "Finalizações A",
            StatKey::ShotsB => "Finalizações B",
            StatKey::ShotsOnGoalA => "Chutes a gol A",
            StatKey::ShotsOnGoalB => "Chutes a gol B",
        }
    }

    pub fn from_page_label(label: &str) -> Option<StatKey> {
        let label = label.trim();
        StatKey::ALL.into_iter().find(|key| key.page_label() == label)
    }

    /// Short column header used by the dashboard and the report.
    pub fn column_label(self) -> &'static str {
        match self {
            StatKey::AttacksA => "Att A",
            StatKey::AttacksB => "Att B",
            StatKey::DangerousAttacksA => "DAtt A",
            StatKey::DangerousAttacksB => "DAtt B",
            StatKey::PossessionA => "Poss A",
            StatKey::PossessionB => "Poss B",
            StatKey::ShotsA => "Shots A",
            StatKey::ShotsB => "Shots B",
            StatKey::ShotsOnGoalA => "SoG A",
            StatKey::ShotsOnGoalB => "SoG B",
        }
    }
}

impl MatchRecord {
    pub fn new(team_a: impl Into<String>, team_b: impl Into<String>) -> Self {
        Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
            ..Self::default()
        }
    }

    pub fn stat(&self, key: StatKey) -> u32 {
        match key {
            StatKey::AttacksA => self.attacks_a,
            StatKey::AttacksB => self.attacks_b,
            StatKey::DangerousAttacksA => self.dangerous_attacks_a,
            StatKey::DangerousAttacksB => self.dangerous_attacks_b,
            StatKey::PossessionA => self.possession_a,
            StatKey::PossessionB => self.possession_b,
            StatKey::ShotsA => self.shots_a,
            StatKey::ShotsB => self.shots_b,
            StatKey::ShotsOnGoalA => self.shots_on_goal_a,
            StatKey::ShotsOnGoalB => self.shots_on_goal_b,
        }
    }

    pub(crate) fn stat_mut(&mut self, key: StatKey) -> &mut u32 {
        match key {
            StatKey::AttacksA => &mut self.attacks_a,
            StatKey::AttacksB => &mut self.attacks_b,
            StatKey::DangerousAttacksA => &mut self.dangerous_attacks_a,
            StatKey::DangerousAttacksB => &mut self.dangerous_attacks_b,
            StatKey::PossessionA => &mut self.possession_a,
            StatKey::PossessionB => &mut self.possession_b,
            StatKey::ShotsA => &mut self.shots_a,
            StatKey::ShotsB => &mut self.shots_b,
            StatKey::ShotsOnGoalA => &mut self.shots_on_goal_a,
            StatKey::ShotsOnGoalB => &mut self.shots_on_goal_b,
        }
    }
}
