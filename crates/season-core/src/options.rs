//! League-wide scheduling options.

use crate::calendar::{BlackoutDates, WeeklyStartTimes};
use crate::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tournament shapes the scheduler knows how to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Every team meets every other team once.
    #[default]
    RoundRobin,
    /// Round robin followed by the mirrored return fixtures.
    RoundRobinReturn,
    /// Fixed six-match cup among the top four teams.
    FourTeamCup,
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TournamentFormat::RoundRobin => "round_robin",
            TournamentFormat::RoundRobinReturn => "round_robin_return",
            TournamentFormat::FourTeamCup => "four_team_cup",
        })
    }
}

impl FromStr for TournamentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "round_robin" => Ok(TournamentFormat::RoundRobin),
            "round_robin_return" => Ok(TournamentFormat::RoundRobinReturn),
            "four_team_cup" | "cup" => Ok(TournamentFormat::FourTeamCup),
            other => Err(format!("unknown tournament format: {other}")),
        }
    }
}

/// Operator-facing configuration for one season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentOptions {
    pub league_name: String,
    pub format: TournamentFormat,
    pub start_times: WeeklyStartTimes,
    /// Spacing between kickoffs on the same day. Zero stacks every match of a
    /// day on the latest start.
    pub hours_between_matches: f64,
    pub rounds_per_week: f64,
    /// No match is scheduled before this date.
    pub start_date: NaiveDate,
    pub blackouts: Vec<BlackoutDates>,
}

impl TournamentOptions {
    /// Options with every weekday disabled, two-hour spacing and one round a
    /// week.
    pub fn new(league_name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            league_name: league_name.into(),
            format: TournamentFormat::default(),
            start_times: WeeklyStartTimes::default(),
            hours_between_matches: 2.0,
            rounds_per_week: 1.0,
            start_date,
            blackouts: Vec::new(),
        }
    }

    /// Spacing rounded to whole minutes.
    pub fn minutes_between_matches(&self) -> u32 {
        (self.hours_between_matches.max(0.0) * 60.0).round() as u32
    }
}

/// Validate windows, spacing, pace, and blackout ranges.
pub fn validate_options(options: &TournamentOptions) -> Result<(), ValidationError> {
    if options.league_name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !options.hours_between_matches.is_finite() || options.hours_between_matches < 0.0 {
        return Err(ValidationError::InvalidSpacing(options.hours_between_matches));
    }
    if !options.rounds_per_week.is_finite() || options.rounds_per_week <= 0.0 {
        return Err(ValidationError::InvalidRoundsPerWeek(options.rounds_per_week));
    }
    for window in options.start_times.enabled() {
        if window.latest < window.earliest {
            return Err(ValidationError::InvalidWindow {
                weekday: window.weekday,
            });
        }
    }
    for b in &options.blackouts {
        if b.end < b.start {
            return Err(ValidationError::InvalidBlackout {
                start: b.start,
                end: b.end,
            });
        }
    }
    Ok(())
}
