//! League table built from simulated results.

use season_core::{Match, Side, Team, TeamId};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const POINTS_PER_WIN: u32 = 2;
pub const POINTS_PER_DRAW: u32 = 1;

/// One team's line in the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    pub team: TeamId,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub fouls: u32,
}

impl Standing {
    fn new(team: TeamId) -> Self {
        Self {
            team,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
            fouls: 0,
        }
    }

    /// Table points.
    pub fn points(&self) -> u32 {
        self.wins * POINTS_PER_WIN + self.draws * POINTS_PER_DRAW
    }

    pub fn score_difference(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }

    fn add_result(&mut self, scored: u32, conceded: u32, fouls: u32) {
        self.played += 1;
        self.points_for += scored;
        self.points_against += conceded;
        self.fouls += fouls;
        match scored.cmp(&conceded) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => self.draws += 1,
        }
    }
}

type CmpFunc = fn(&Standing, &Standing) -> Ordering;

fn compare_points(a: &Standing, b: &Standing) -> Ordering {
    b.points().cmp(&a.points())
}

fn compare_score_difference(a: &Standing, b: &Standing) -> Ordering {
    b.score_difference().cmp(&a.score_difference())
}

fn compare_points_scored(a: &Standing, b: &Standing) -> Ordering {
    b.points_for.cmp(&a.points_for)
}

fn compare_name(a: &Standing, b: &Standing) -> Ordering {
    a.team.cmp(&b.team)
}

/// Tie-breakers in priority order.
const CRITERIA: [CmpFunc; 4] = [
    compare_points,
    compare_score_difference,
    compare_points_scored,
    compare_name,
];

pub fn compare(a: &Standing, b: &Standing) -> Ordering {
    CRITERIA
        .iter()
        .map(|f| f(a, b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Table for `teams` over every simulated match, best first. Teams without
/// results are listed with zeros.
pub fn standings(teams: &[Team], matches: &[Match]) -> Vec<Standing> {
    let mut table: HashMap<TeamId, Standing> = teams
        .iter()
        .map(|t| (t.id(), Standing::new(t.id())))
        .collect();
    for m in matches.iter().filter(|m| m.is_simulated()) {
        for side in [Side::Home, Side::Away] {
            let Some(id) = m.team(side) else { continue };
            if let Some(row) = table.get_mut(id) {
                row.add_result(m.score(side), m.score(side.opponent()), m.fouls(side));
            }
        }
    }
    let mut rows: Vec<Standing> = table.into_values().collect();
    rows.sort_by(compare);
    rows
}
