//! Player skill ratings and the injury calendar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Lowest value any rating may hold.
pub const SKILL_MIN: u8 = 1;
/// Highest value any rating may hold.
pub const SKILL_MAX: u8 = 10;

/// A single attribute rating, always within [`SKILL_MIN`, `SKILL_MAX`].
///
/// Out-of-range inputs are clamped rather than rejected, including values
/// arriving through deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Skill(u8);

impl Skill {
    /// Build a rating, clamping `value` into the valid range.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(i64::from(SKILL_MIN), i64::from(SKILL_MAX)) as u8)
    }

    /// Raw rating value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Rating scaled to (0, 1].
    pub fn scaled(self) -> f64 {
        f64::from(self.0) / f64::from(SKILL_MAX)
    }

    /// Rating at half strength, never below [`SKILL_MIN`].
    pub fn halved(self) -> Self {
        Self((self.0 / 2).max(SKILL_MIN))
    }

    /// Whether `value` would be altered by clamping.
    pub fn is_out_of_range(value: i64) -> bool {
        value < i64::from(SKILL_MIN) || value > i64::from(SKILL_MAX)
    }
}

impl From<i64> for Skill {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Skill> for i64 {
    fn from(skill: Skill) -> Self {
        i64::from(skill.0)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Days on which a player is unavailable.
///
/// Stored day by day so that both point lookups and range queries stay cheap
/// for the handful of injuries a season produces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InjuryCalendar {
    days: BTreeSet<NaiveDate>,
}

impl InjuryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every day in the inclusive range as injured. Reversed bounds are
    /// swapped.
    pub fn add_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let (start, end) = ordered(start, end);
        self.days
            .extend(start.iter_days().take_while(|day| *day <= end));
    }

    /// Clear every injured day in the inclusive range.
    pub fn remove_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let (start, end) = ordered(start, end);
        let cleared: Vec<NaiveDate> = self.days.range(start..=end).copied().collect();
        for day in cleared {
            self.days.remove(&day);
        }
    }

    pub fn is_injured_on(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Injured days within the inclusive range, in calendar order.
    pub fn days_in(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        let (start, end) = ordered(start, end);
        self.days.range(start..=end).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

fn ordered(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A rostered player with skill ratings and an injury calendar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name, unique within a team by convention.
    pub name: String,
    /// Attacking ability: scoring, bludger hitting, snitch chasing.
    pub offense: Skill,
    /// Defensive ability: saves, bludger blocking, dodging.
    pub defense: Skill,
    /// How well the player combines with teammates.
    pub teamwork: Skill,
    /// Propensity to commit fouls (higher fouls more).
    pub foul_likelihood: Skill,
    /// Days the player is injured.
    #[serde(default)]
    pub injuries: InjuryCalendar,
}

impl Player {
    /// Build a player; every rating is clamped into [1, 10].
    pub fn new(
        name: impl Into<String>,
        offense: i64,
        defense: i64,
        teamwork: i64,
        foul_likelihood: i64,
    ) -> Self {
        Self {
            name: name.into(),
            offense: Skill::new(offense),
            defense: Skill::new(defense),
            teamwork: Skill::new(teamwork),
            foul_likelihood: Skill::new(foul_likelihood),
            injuries: InjuryCalendar::new(),
        }
    }

    /// Builder-style helper marking an inclusive injury range.
    pub fn with_injury(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.injuries.add_range(start, end);
        self
    }

    pub fn is_injured_on(&self, date: NaiveDate) -> bool {
        self.injuries.is_injured_on(date)
    }

    /// Composite strength used to order players within a position:
    /// offense + defense + teamwork - foul likelihood, each scaled to (0, 1],
    /// halved while `injured`.
    pub fn net_modifier(&self, injured: bool) -> f64 {
        let net = self.offense.scaled() + self.defense.scaled() + self.teamwork.scaled()
            - self.foul_likelihood.scaled();
        if injured {
            net / 2.0
        } else {
            net
        }
    }

    /// [`Player::net_modifier`] with the injury state looked up for `date`.
    pub fn net_modifier_on(&self, date: NaiveDate) -> f64 {
        self.net_modifier(self.is_injured_on(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn injury_ranges_are_inclusive_and_queryable() {
        let mut cal = InjuryCalendar::new();
        cal.add_range(day(10), day(5));
        assert_eq!(cal.len(), 6);
        assert!(cal.is_injured_on(day(5)));
        assert!(cal.is_injured_on(day(10)));
        assert!(!cal.is_injured_on(day(11)));
        assert_eq!(cal.days_in(day(8), day(20)).count(), 3);

        cal.remove_range(day(6), day(9));
        assert_eq!(cal.days_in(day(1), day(31)).collect::<Vec<_>>(), vec![day(5), day(10)]);
    }

    #[test]
    fn injured_players_rank_at_half_strength() {
        let p = Player::new("Oliver Wood", 8, 9, 7, 2).with_injury(day(1), day(3));
        let fit = p.net_modifier(false);
        assert!((fit - 2.2).abs() < 1e-9);
        assert!((p.net_modifier_on(day(2)) - fit / 2.0).abs() < 1e-9);
        assert!((p.net_modifier_on(day(4)) - fit).abs() < 1e-9);
    }

    #[test]
    fn skill_deserialization_clamps() {
        let p: Player = serde_json::from_str(
            r#"{"name":"Ginny","offense":14,"defense":-3,"teamwork":5,"foul_likelihood":0}"#,
        )
        .unwrap();
        assert_eq!(p.offense.get(), SKILL_MAX);
        assert_eq!(p.defense.get(), SKILL_MIN);
        assert_eq!(p.teamwork.get(), 5);
        assert!(p.injuries.is_empty());
    }

    #[test]
    fn halving_never_drops_below_minimum() {
        assert_eq!(Skill::new(9).halved().get(), 4);
        assert_eq!(Skill::new(1).halved().get(), SKILL_MIN);
    }

    proptest! {
        #[test]
        fn skills_always_clamped(v in any::<i64>()) {
            let s = Skill::new(v);
            prop_assert!((SKILL_MIN..=SKILL_MAX).contains(&s.get()));
            prop_assert_eq!(Skill::is_out_of_range(v), i64::from(s.get()) != v);
        }
    }
}
