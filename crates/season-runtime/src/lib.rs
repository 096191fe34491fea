#![deny(warnings)]

//! Season orchestration.
//!
//! [`Season`] owns the whole season state. Changing options or teams triggers
//! an explicit [`Season::recompute`] that rebuilds the schedule from scratch;
//! results are filled in by [`Season::simulate_all`] or one match at a time.

pub mod standings;

pub use standings::{standings, Standing};

use season_core::{
    validate_options, validate_state, Match, MatchSummary, SeasonState, Team, TournamentFormat,
    TournamentOptions, ValidationError,
};
use season_match::{match_seed, simulate, Lineup, MatchIdentity};
use season_schedule::{MatchCounts, ScheduleError, TournamentVariant};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SeasonError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("match references unknown team {0}")]
    UnknownTeam(String),
    #[error("no match numbered {0}")]
    MatchNotFound(u32),
}

/// A season owned by the caller.
#[derive(Clone, Debug)]
pub struct Season {
    state: SeasonState,
}

impl Season {
    /// Validate the inputs and build the schedule.
    pub fn new(options: TournamentOptions, teams: Vec<Team>, seed: u64) -> Result<Self, SeasonError> {
        let mut season = Self::from_state(SeasonState::new(options, teams, seed))?;
        season.recompute()?;
        Ok(season)
    }

    /// Resume from a saved state without touching its schedule or results.
    pub fn from_state(state: SeasonState) -> Result<Self, SeasonError> {
        validate_state(&state)?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &SeasonState {
        &self.state
    }

    pub fn into_state(self) -> SeasonState {
        self.state
    }

    pub fn matches(&self) -> &[Match] {
        &self.state.matches
    }

    pub fn teams(&self) -> &[Team] {
        &self.state.teams
    }

    /// Replace the options and rebuild the schedule.
    pub fn set_options(&mut self, options: TournamentOptions) -> Result<(), SeasonError> {
        validate_options(&options)?;
        self.state.options = options;
        self.recompute()
    }

    /// Replace the teams and rebuild the schedule.
    pub fn set_teams(&mut self, teams: Vec<Team>) -> Result<(), SeasonError> {
        let candidate = SeasonState::new(self.state.options.clone(), teams, self.state.seed);
        validate_state(&candidate)?;
        self.state.teams = candidate.teams;
        self.recompute()
    }

    pub fn set_seed(&mut self, seed: u64) -> Result<(), SeasonError> {
        self.state.seed = seed;
        self.recompute()
    }

    pub fn counts(&self) -> MatchCounts {
        self.state
            .options
            .format
            .compute_counts(self.state.teams.len(), self.state.options.rounds_per_week)
    }

    /// Rebuild the schedule and pairings from the current options and teams.
    /// Any existing results are discarded. The cup seeds its bracket from the
    /// table as it stands before the rebuild.
    pub fn recompute(&mut self) -> Result<(), SeasonError> {
        let format = self.state.options.format;
        let schedule = format.build_schedule(&self.state.options, self.state.teams.len())?;
        let mut matches = schedule.to_matches();
        if !matches.is_empty() {
            let ranked = match format {
                TournamentFormat::FourTeamCup => self.ranked_teams(),
                TournamentFormat::RoundRobin | TournamentFormat::RoundRobinReturn => {
                    self.state.teams.clone()
                }
            };
            format.assign_teams(&mut matches, &ranked, self.state.seed)?;
        }
        info!(
            league = %self.state.options.league_name,
            teams = self.state.teams.len(),
            matches = matches.len(),
            end = ?schedule.end,
            "season recomputed"
        );
        self.state.matches = matches;
        self.state.end = schedule.end;
        Ok(())
    }

    /// Simulate every assigned match that has no result yet. Returns how many
    /// were simulated.
    pub fn simulate_all(&mut self) -> Result<usize, SeasonError> {
        let SeasonState {
            teams,
            matches,
            seed,
            ..
        } = &mut self.state;
        let mut simulated = 0;
        for m in matches.iter_mut().filter(|m| m.is_assigned() && !m.is_simulated()) {
            play_match(teams, *seed, m)?;
            simulated += 1;
        }
        info!(simulated, total = matches.len(), "season simulated");
        Ok(simulated)
    }

    /// Simulate a single match by number.
    pub fn simulate_match(&mut self, number: u32) -> Result<&Match, SeasonError> {
        let SeasonState {
            teams,
            matches,
            seed,
            ..
        } = &mut self.state;
        let m = matches
            .iter_mut()
            .find(|m| m.number == number)
            .ok_or(SeasonError::MatchNotFound(number))?;
        if m.is_simulated() {
            return Err(ValidationError::AlreadySimulated(number).into());
        }
        play_match(teams, *seed, m)?;
        Ok(&*m)
    }

    pub fn standings(&self) -> Vec<Standing> {
        standings(&self.state.teams, &self.state.matches)
    }

    /// Teams in table order.
    pub fn ranked_teams(&self) -> Vec<Team> {
        self.standings()
            .iter()
            .filter_map(|row| self.state.team(row.team.as_str()).cloned())
            .collect()
    }

    pub fn summaries(&self) -> Vec<MatchSummary> {
        self.state.matches.iter().filter_map(Match::summary).collect()
    }
}

fn find_team<'t>(teams: &'t [Team], name: &str) -> Result<&'t Team, SeasonError> {
    teams
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| SeasonError::UnknownTeam(name.to_string()))
}

fn play_match(teams: &[Team], global_seed: u64, m: &mut Match) -> Result<(), SeasonError> {
    let (Some(home), Some(away)) = (m.home.clone(), m.away.clone()) else {
        return Err(SeasonError::UnknownTeam(format!("unassigned match {}", m.number)));
    };
    let day = m.start.date();
    let home_lineup = Lineup::select(find_team(teams, home.as_str())?, day)?;
    let away_lineup = Lineup::select(find_team(teams, away.as_str())?, day)?;
    let seed = MatchIdentity::of(m)
        .map(|id| match_seed(global_seed, &id))
        .unwrap_or(global_seed);
    let result = simulate(&home_lineup, &away_lineup, seed);
    debug!(
        number = m.number,
        home = %home,
        away = %away,
        score = %format!("{}-{}", result.home_score, result.away_score),
        "match result"
    );
    m.complete(result.plays, result.home_fouls, result.away_fouls)?;
    Ok(())
}
