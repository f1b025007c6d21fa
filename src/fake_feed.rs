use rand::Rng;

use crate::normalize::Normalized;
use crate::record::MatchRecord;

const TEAMS: [&str; 16] = [
    "Arsenal (Boulevard)",
    "Chelsea (Kray)",
    "Liverpool (Palkan)",
    "Man City (Lion)",
    "Real Madrid (Wboy)",
    "Barcelona (Koftovsky)",
    "Juventus (Hotshot)",
    "Inter (Grellz)",
    "PSG (Nio)",
    "Bayern (Special)",
    "Dortmund (Cavani)",
    "Napoli (Sabo)",
    "Atletico (Meltosik)",
    "Milan (Cleo)",
    "Porto (Kodak)",
    "Ajax (Fear)",
];

/// Random live snapshot for running the dashboard without a network source.
/// Roughly one in four rows is shaped so that it should match the default rule.
pub fn generate(rng: &mut impl Rng) -> Normalized {
    let count = rng.gen_range(6..=12);
    let records = (0..count)
        .map(|_| {
            if rng.gen_bool(0.25) {
                dominant_record(rng)
            } else {
                random_record(rng)
            }
        })
        .collect();
    Normalized {
        records,
        skipped: Vec::new(),
    }
}

fn pick_teams(rng: &mut impl Rng) -> (String, String) {
    let a = rng.gen_range(0..TEAMS.len());
    let mut b = rng.gen_range(0..TEAMS.len() - 1);
    if b >= a {
        b += 1;
    }
    (TEAMS[a].to_string(), TEAMS[b].to_string())
}

fn random_record(rng: &mut impl Rng) -> MatchRecord {
    let (team_a, team_b) = pick_teams(rng);
    let possession_a = rng.gen_range(30..=70);
    MatchRecord {
        team_a,
        team_b,
        attacks_a: rng.gen_range(5..=60),
        attacks_b: rng.gen_range(5..=60),
        dangerous_attacks_a: rng.gen_range(0..=30),
        dangerous_attacks_b: rng.gen_range(0..=30),
        possession_a,
        possession_b: 100 - possession_a,
        shots_a: rng.gen_range(0..=12),
        shots_b: rng.gen_range(0..=12),
        shots_on_goal_a: rng.gen_range(0..=6),
        shots_on_goal_b: rng.gen_range(0..=6),
    }
}

fn dominant_record(rng: &mut impl Rng) -> MatchRecord {
    let (team_a, team_b) = pick_teams(rng);
    let attacks_b = rng.gen_range(5..=25);
    let dangerous_attacks_b = rng.gen_range(0..=10);
    let possession_a = rng.gen_range(56..=70);
    let shots_a = rng.gen_range(0..=4);
    let shots_on_goal_a = rng.gen_range(0..=2);
    MatchRecord {
        team_a,
        team_b,
        attacks_a: attacks_b + rng.gen_range(10..=30),
        attacks_b,
        dangerous_attacks_a: dangerous_attacks_b + rng.gen_range(1..=10),
        dangerous_attacks_b,
        possession_a,
        possession_b: 100 - possession_a,
        shots_a,
        shots_b: shots_a + rng.gen_range(1..=5),
        shots_on_goal_a,
        shots_on_goal_b: shots_on_goal_a + rng.gen_range(0..=3),
    }
}
