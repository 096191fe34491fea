#![deny(warnings)]

//! YAML league files.
//!
//! A league file describes the scheduling options and the teams of one
//! season. Rosters may be partial or missing; gaps are filled with generated
//! players drawn deterministically from the league seed.

mod names;

use chrono::{NaiveDate, NaiveTime, Weekday};
use names::NamePool;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use season_core::{
    validate_options, validate_team, BlackoutDates, Player, Position, Team, TournamentFormat,
    TournamentOptions, ValidStartTime, ValidationError,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// League bundled with the binary.
pub const DEMO_LEAGUE: &str = include_str!("../../../assets/leagues/demo.yaml");

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid yaml: {0}")]
    Yaml(String),
    #[error("invalid league: {0}")]
    Invalid(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e.to_string())
    }
}

/// A parsed and validated league.
#[derive(Clone, Debug, PartialEq)]
pub struct League {
    pub options: TournamentOptions,
    pub teams: Vec<Team>,
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
struct LeagueFile {
    league: String,
    #[serde(default)]
    seed: u64,
    #[serde(default)]
    format: Option<String>,
    start_date: NaiveDate,
    #[serde(default = "default_hours")]
    hours_between_matches: f64,
    #[serde(default = "default_rounds_per_week")]
    rounds_per_week: f64,
    #[serde(default)]
    start_times: Vec<WindowEntry>,
    #[serde(default)]
    blackouts: Vec<RangeEntry>,
    #[serde(default)]
    teams: Vec<TeamEntry>,
}

fn default_hours() -> f64 {
    2.0
}

fn default_rounds_per_week() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

fn default_rating() -> i64 {
    5
}

#[derive(Debug, Deserialize)]
struct WindowEntry {
    weekday: Weekday,
    earliest: String,
    latest: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct RangeEntry {
    #[serde(alias = "from")]
    start: NaiveDate,
    #[serde(alias = "to")]
    end: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    name: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    home: Option<String>,
    /// Baseline skill for generated players.
    #[serde(default = "default_rating")]
    rating: i64,
    #[serde(default)]
    beaters: Vec<PlayerEntry>,
    #[serde(default)]
    chasers: Vec<PlayerEntry>,
    #[serde(default)]
    keepers: Vec<PlayerEntry>,
    #[serde(default)]
    seekers: Vec<PlayerEntry>,
}

impl TeamEntry {
    fn roster(&self, position: Position) -> &[PlayerEntry] {
        match position {
            Position::Beater => &self.beaters,
            Position::Chaser => &self.chasers,
            Position::Keeper => &self.keepers,
            Position::Seeker => &self.seekers,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlayerEntry {
    name: String,
    offense: i64,
    defense: i64,
    teamwork: i64,
    foul_likelihood: i64,
    #[serde(default)]
    injured: Vec<RangeEntry>,
}

/// Parse a league from YAML text.
pub fn parse_league(text: &str) -> Result<League, ConfigError> {
    let file: LeagueFile = serde_yaml::from_str(text)?;
    let format = match &file.format {
        Some(raw) => raw.parse::<TournamentFormat>().map_err(ConfigError::Invalid)?,
        None => TournamentFormat::default(),
    };

    let mut options = TournamentOptions::new(file.league.clone(), file.start_date);
    options.format = format;
    options.hours_between_matches = file.hours_between_matches;
    options.rounds_per_week = file.rounds_per_week;
    for window in &file.start_times {
        let mut start = ValidStartTime::new(
            window.weekday,
            parse_time(&window.earliest)?,
            parse_time(&window.latest)?,
        );
        start.enabled = window.enabled;
        options.start_times.set(start);
    }
    options.blackouts = file
        .blackouts
        .iter()
        .map(|b| BlackoutDates::new(b.start, b.end))
        .collect::<Result<_, _>>()?;
    validate_options(&options)?;

    let mut seen = HashSet::new();
    let mut teams = Vec::with_capacity(file.teams.len());
    for (idx, entry) in file.teams.iter().enumerate() {
        if !seen.insert(entry.name.as_str()) {
            return Err(ValidationError::DuplicateTeam(entry.name.clone()).into());
        }
        let team = build_team(entry, team_seed(file.seed, idx))?;
        validate_team(&team)?;
        teams.push(team);
    }

    info!(
        league = %options.league_name,
        teams = teams.len(),
        format = %options.format,
        "league loaded"
    );
    Ok(League {
        options,
        teams,
        seed: file.seed,
    })
}

/// Read and parse a league file.
pub fn load_league<P: AsRef<Path>>(path: P) -> Result<League, ConfigError> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_league(&text)
}

/// The bundled demo league.
pub fn demo_league() -> Result<League, ConfigError> {
    parse_league(DEMO_LEAGUE)
}

fn team_seed(league_seed: u64, idx: usize) -> u64 {
    league_seed ^ (idx as u64 + 1).wrapping_mul(GOLDEN_GAMMA)
}

fn parse_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| ConfigError::Invalid(format!("bad time {raw:?}: {e}")))
}

fn build_team(entry: &TeamEntry, seed: u64) -> Result<Team, ConfigError> {
    let short_name = entry
        .short_name
        .clone()
        .unwrap_or_else(|| entry.name.chars().take(3).collect::<String>().to_uppercase());
    let home = entry.home.clone().unwrap_or_else(|| entry.name.clone());
    let mut team = Team::new(entry.name.clone(), short_name, home);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pool = NamePool::new(
        Position::ALL
            .iter()
            .flat_map(|p| entry.roster(*p))
            .map(|p| p.name.as_str()),
    );
    for position in Position::ALL {
        let listed = entry.roster(position);
        if listed.len() > position.roster_size() {
            return Err(ConfigError::Invalid(format!(
                "team {} lists {} {}s, at most {} allowed",
                entry.name,
                listed.len(),
                position,
                position.roster_size()
            )));
        }
        let roster = team.roster_mut(position);
        for p in listed {
            roster.push(player_from_entry(&entry.name, p));
        }
        while roster.len() < position.roster_size() {
            roster.push(generated_player(&mut rng, &mut pool, entry.rating));
        }
    }
    Ok(team)
}

fn player_from_entry(team: &str, entry: &PlayerEntry) -> Player {
    for (field, value) in [
        ("offense", entry.offense),
        ("defense", entry.defense),
        ("teamwork", entry.teamwork),
        ("foul_likelihood", entry.foul_likelihood),
    ] {
        if season_core::Skill::is_out_of_range(value) {
            warn!(team, player = %entry.name, field, value, "skill out of range; clamped");
        }
    }
    let mut player = Player::new(
        entry.name.clone(),
        entry.offense,
        entry.defense,
        entry.teamwork,
        entry.foul_likelihood,
    );
    for range in &entry.injured {
        player.injuries.add_range(range.start, range.end);
    }
    player
}

fn generated_player<R: Rng>(rng: &mut R, pool: &mut NamePool, rating: i64) -> Player {
    let mut around = |spread: i64| rating + rng.gen_range(-spread..=spread);
    let offense = around(2);
    let defense = around(2);
    let teamwork = around(2);
    let foul = rng.gen_range(1..=5);
    Player::new(pool.draw(rng), offense, defense, teamwork, foul)
}
