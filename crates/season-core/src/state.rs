//! Serializable snapshot of a whole season.

use crate::matches::Match;
use crate::options::{validate_options, TournamentOptions};
use crate::team::{validate_team, Team};
use crate::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything needed to reproduce or resume a season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonState {
    pub options: TournamentOptions,
    pub teams: Vec<Team>,
    /// Global seed every match seed derives from.
    pub seed: u64,
    pub matches: Vec<Match>,
    /// Kickoff of the last scheduled match.
    pub end: Option<NaiveDateTime>,
}

impl SeasonState {
    pub fn new(options: TournamentOptions, teams: Vec<Team>, seed: u64) -> Self {
        Self {
            options,
            teams,
            seed,
            matches: Vec::new(),
            end: None,
        }
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn simulated_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_simulated()).count()
    }
}

/// Validate options, every team, and team name uniqueness.
pub fn validate_state(state: &SeasonState) -> Result<(), ValidationError> {
    validate_options(&state.options)?;
    let mut seen = HashSet::new();
    for team in &state.teams {
        validate_team(team)?;
        if !seen.insert(team.name.as_str()) {
            return Err(ValidationError::DuplicateTeam(team.name.clone()));
        }
    }
    Ok(())
}
