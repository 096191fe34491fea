//! Per-match seed derivation.

use chrono::{Datelike, NaiveDateTime, Timelike};
use season_core::Match;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fields a match seed is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchIdentity<'a> {
    pub number: u32,
    pub round: u32,
    pub start: NaiveDateTime,
    /// Home team name.
    pub home: &'a str,
}

impl<'a> MatchIdentity<'a> {
    /// Identity of an assigned match; `None` while the home side is unknown.
    pub fn of(m: &'a Match) -> Option<Self> {
        let home = m.home.as_ref()?;
        Some(Self {
            number: m.number,
            round: m.round,
            start: m.start,
            home: home.as_str(),
        })
    }
}

/// Seed for one match, stable across platforms and releases.
pub fn match_seed(global: u64, id: &MatchIdentity<'_>) -> u64 {
    let start = id.start;
    let parts = [
        u64::from(id.number),
        u64::from(id.round),
        i64::from(start.year()) as u64,
        u64::from(start.month()),
        u64::from(start.day()),
        u64::from(start.hour()),
        u64::from(start.minute()),
        fxhash::hash64(id.home),
    ];
    parts
        .iter()
        .fold(mix64(global), |acc, &part| mix64(acc ^ part.wrapping_mul(GOLDEN_GAMMA)))
}

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
