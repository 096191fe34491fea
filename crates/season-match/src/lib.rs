#![deny(warnings)]

//! Play-by-play match simulation.
//!
//! Every match runs on its own `ChaCha8Rng` stream whose seed is derived from
//! the season seed and the fixture's identity, so a season replays exactly
//! for a given seed regardless of the order matches are simulated in.

pub mod engine;
pub mod lineup;
pub mod seed;

pub use engine::{simulate, SimulationResult, MAX_PLAYS};
pub use lineup::{Lineup, LineupPlayer};
pub use seed::{match_seed, MatchIdentity};
