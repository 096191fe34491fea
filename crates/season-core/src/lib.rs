#![deny(warnings)]

//! Core domain models and invariants for the quidditch season generator.
//!
//! This crate defines the serializable value types shared by the scheduler,
//! the match simulator, and the season runtime, together with validation
//! helpers that guarantee the basic invariants those engines rely on.

pub mod calendar;
pub mod matches;
pub mod options;
pub mod play;
pub mod skill;
pub mod state;
pub mod team;

pub use calendar::{BlackoutDates, TimeEntry, ValidStartTime, WeeklyStartTimes};
pub use matches::{Match, MatchSummary, TeamId};
pub use options::{validate_options, TournamentFormat, TournamentOptions};
pub use play::{
    BludgerInteraction, BludgerOutcome, ChaserOutcome, Play, PlayKind, SeekerOutcome, Side,
    GOAL_POINTS, SNITCH_POINTS,
};
pub use skill::{InjuryCalendar, Player, Skill, SKILL_MAX, SKILL_MIN};
pub use state::{validate_state, SeasonState};
pub use team::{validate_team, Position, Team};

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// League and team names must not be blank.
    #[error("name must not be empty")]
    EmptyName,
    /// A roster does not hold the fixed number of players for its position.
    #[error("team {team}: {position} roster holds {found} players, expected {expected}")]
    RosterSize {
        team: String,
        position: Position,
        expected: usize,
        found: usize,
    },
    /// Two teams in one season share a name.
    #[error("duplicate team name: {0}")]
    DuplicateTeam(String),
    /// Blackout range ends before it starts.
    #[error("blackout range {start}..{end} ends before it starts")]
    InvalidBlackout { start: NaiveDate, end: NaiveDate },
    /// An enabled weekday has its latest start before its earliest.
    #[error("{weekday} start window closes before it opens")]
    InvalidWindow { weekday: Weekday },
    /// The same weekday appears twice in a start-time table.
    #[error("{0} listed more than once in start times")]
    DuplicateWeekday(Weekday),
    /// Spacing between matches must be finite and >= 0.
    #[error("hours between matches must be finite and non-negative, got {0}")]
    InvalidSpacing(f64),
    /// Rounds per week must be finite and > 0.
    #[error("rounds per week must be finite and positive, got {0}")]
    InvalidRoundsPerWeek(f64),
    /// A simulated match is read-only.
    #[error("match {0} has already been simulated")]
    AlreadySimulated(u32),
}
