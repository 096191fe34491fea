#![deny(warnings)]

//! Calendar scheduling for quidditch seasons.
//!
//! A tournament format computes how many matches a season needs and how they
//! group into rounds. The template builder turns the operator's weekly start
//! windows into a repeating set of kickoff slots, and the walker replays that
//! template across the calendar, skipping blackout weeks, until every match
//! has a date. Formats then pair teams onto the resulting match shells.

pub mod format;
pub mod template;
pub mod walker;

pub use format::{round_robin_pairings, MatchCounts, TournamentVariant};
pub use template::{build_template, MatchTemplate};
pub use walker::{walk, RoundSlots, Schedule, WalkPlan};

use season_core::ValidationError;
use thiserror::Error;

/// Failures while turning counts into dated fixtures.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("cannot schedule: no weekday is enabled")]
    NoEnabledWeekday,
    #[error("cannot schedule: the weekly template holds no slots")]
    EmptyTemplate,
    #[error("scheduling made no progress after placing {placed} of {required} matches")]
    NoProgress { placed: u32, required: u32 },
    #[error("schedule ran past the end of the supported calendar")]
    CalendarOverflow,
    #[error("format needs {required} teams, found {found}")]
    NotEnoughTeams { required: usize, found: usize },
    #[error("schedule holds {found} matches but the pairing needs {expected}")]
    MatchCountMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
