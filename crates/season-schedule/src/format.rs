//! Tournament formats: match counts, calendar building, and team pairing.

use crate::template::build_template;
use crate::walker::{walk, RoundSlots, Schedule, WalkPlan};
use crate::ScheduleError;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use season_core::{BlackoutDates, Match, Team, TournamentFormat, TournamentOptions};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Season shape derived from the number of teams.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchCounts {
    pub total_matches: u32,
    pub total_rounds: u32,
    pub matches_per_round: u32,
    pub matches_per_week: u32,
    pub matches_per_day: u32,
}

impl MatchCounts {
    /// All zero: nothing to schedule.
    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }

    /// Matches each enabled weekday may host before leftovers are stacked.
    pub fn day_quota(&self, enabled_days: usize) -> u32 {
        let days = u32::try_from(enabled_days.max(1)).unwrap_or(u32::MAX);
        (self.matches_per_week / days).max(1)
    }

    pub fn walk_plan(&self) -> WalkPlan {
        WalkPlan {
            total_matches: self.total_matches,
            matches_per_round: self.matches_per_round,
            matches_per_week: self.matches_per_week,
        }
    }
}

/// Behaviour every tournament format provides.
pub trait TournamentVariant {
    /// Counts for `num_teams` teams at `rounds_per_week` rounds a week.
    fn compute_counts(&self, num_teams: usize, rounds_per_week: f64) -> MatchCounts;

    /// Dated kickoffs for the season.
    fn build_schedule(
        &self,
        options: &TournamentOptions,
        num_teams: usize,
    ) -> Result<Schedule, ScheduleError>;

    /// Put teams on every shell in `matches`, in match order. `ranked` is the
    /// team list in standings order.
    fn assign_teams(
        &self,
        matches: &mut [Match],
        ranked: &[Team],
        seed: u64,
    ) -> Result<(), ScheduleError>;
}

const CUP_TEAMS: usize = 4;
const CUP_KICKOFF_HOURS: [u32; 2] = [13, 16];
/// (month, nth Saturday) for each cup round.
const CUP_ROUNDS: [(u32, u8); 3] = [(9, 2), (10, 4), (12, 2)];
/// Fixed pairings among the top four, indexed by standing.
const CUP_PAIRINGS: [[(usize, usize); 2]; 3] = [[(0, 3), (1, 2)], [(2, 0), (3, 1)], [(0, 1), (2, 3)]];

impl TournamentVariant for TournamentFormat {
    fn compute_counts(&self, num_teams: usize, rounds_per_week: f64) -> MatchCounts {
        match self {
            TournamentFormat::RoundRobin => round_robin_counts(num_teams, rounds_per_week),
            TournamentFormat::RoundRobinReturn => {
                let single = round_robin_counts(num_teams, rounds_per_week);
                MatchCounts {
                    total_matches: single.total_matches * 2,
                    total_rounds: single.total_rounds * 2,
                    ..single
                }
            }
            TournamentFormat::FourTeamCup => {
                if num_teams < CUP_TEAMS {
                    return MatchCounts::default();
                }
                MatchCounts {
                    total_matches: 6,
                    total_rounds: 3,
                    matches_per_round: 2,
                    matches_per_week: 2,
                    matches_per_day: 1,
                }
            }
        }
    }

    fn build_schedule(
        &self,
        options: &TournamentOptions,
        num_teams: usize,
    ) -> Result<Schedule, ScheduleError> {
        let counts = self.compute_counts(num_teams, options.rounds_per_week);
        if counts.is_empty() {
            info!(format = %self, teams = num_teams, "nothing to schedule");
            return Ok(Schedule::default());
        }
        let schedule = match self {
            TournamentFormat::FourTeamCup => cup_schedule(options.start_date, &options.blackouts)?,
            TournamentFormat::RoundRobin | TournamentFormat::RoundRobinReturn => {
                let quota = counts.day_quota(options.start_times.enabled_count());
                let template = build_template(
                    &options.start_times,
                    options.minutes_between_matches(),
                    counts.matches_per_week,
                    quota,
                )?;
                walk(
                    &template,
                    &counts.walk_plan(),
                    options.start_date,
                    &options.blackouts,
                )?
            }
        };
        info!(
            format = %self,
            matches = schedule.total(),
            rounds = schedule.rounds.len(),
            end = ?schedule.end,
            "schedule built"
        );
        Ok(schedule)
    }

    fn assign_teams(
        &self,
        matches: &mut [Match],
        ranked: &[Team],
        seed: u64,
    ) -> Result<(), ScheduleError> {
        let pairs: Vec<(usize, usize)> = match self {
            TournamentFormat::RoundRobin | TournamentFormat::RoundRobinReturn => {
                let mut order: Vec<usize> = (0..ranked.len()).collect();
                order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
                let mut rounds = round_robin_pairings(ranked.len());
                if *self == TournamentFormat::RoundRobinReturn {
                    let returns: Vec<Vec<(usize, usize)>> = rounds
                        .iter()
                        .map(|r| r.iter().map(|&(h, a)| (a, h)).collect())
                        .collect();
                    rounds.extend(returns);
                }
                rounds
                    .into_iter()
                    .flatten()
                    .map(|(h, a)| (order[h], order[a]))
                    .collect()
            }
            TournamentFormat::FourTeamCup => {
                if ranked.len() < CUP_TEAMS {
                    return Err(ScheduleError::NotEnoughTeams {
                        required: CUP_TEAMS,
                        found: ranked.len(),
                    });
                }
                CUP_PAIRINGS.iter().flatten().copied().collect()
            }
        };
        if pairs.len() != matches.len() {
            return Err(ScheduleError::MatchCountMismatch {
                expected: pairs.len(),
                found: matches.len(),
            });
        }
        for (m, (h, a)) in matches.iter_mut().zip(pairs) {
            let home = &ranked[h];
            m.assign(home.id(), ranked[a].id(), home.home.clone());
        }
        Ok(())
    }
}

fn round_robin_counts(num_teams: usize, rounds_per_week: f64) -> MatchCounts {
    if num_teams < 2 {
        return MatchCounts::default();
    }
    let n = u32::try_from(num_teams).unwrap_or(u32::MAX);
    let matches_per_round = n / 2;
    let total_rounds = if n % 2 == 0 { n - 1 } else { n };
    let per_week = (rounds_per_week.max(0.0) * f64::from(matches_per_round) - 1e-9).ceil();
    let matches_per_week = (per_week as u32).max(1);
    MatchCounts {
        total_matches: n * (n - 1) / 2,
        total_rounds,
        matches_per_round,
        matches_per_week,
        matches_per_day: matches_per_week.div_ceil(matches_per_round),
    }
}

/// Round-robin pairings by the circle method, as `(home, away)` indices.
///
/// Odd team counts get a bye slot, so each team sits out exactly one round.
/// Home and away alternate across rounds for every fixed position.
pub fn round_robin_pairings(num_teams: usize) -> Vec<Vec<(usize, usize)>> {
    if num_teams < 2 {
        return Vec::new();
    }
    let mut slots: Vec<Option<usize>> = (0..num_teams).map(Some).collect();
    if num_teams % 2 == 1 {
        slots.push(None);
    }
    let m = slots.len();
    let mut rounds = Vec::with_capacity(m - 1);
    for r in 0..m - 1 {
        let mut round = Vec::with_capacity(m / 2);
        for i in 0..m / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[m - 1 - i]) {
                round.push(if (r + i) % 2 == 0 { (a, b) } else { (b, a) });
            }
        }
        rounds.push(round);
        slots[1..].rotate_right(1);
    }
    rounds
}

/// Cup kickoffs on fixed Saturdays of the first season whose September date
/// falls on or after `start`.
fn cup_schedule(start: NaiveDate, blackouts: &[BlackoutDates]) -> Result<Schedule, ScheduleError> {
    let anchor = |year: i32, (month, nth): (u32, u8)| {
        NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Sat, nth)
            .ok_or(ScheduleError::CalendarOverflow)
    };
    let mut year = start.year();
    if anchor(year, CUP_ROUNDS[0])? < start {
        year += 1;
    }

    let mut schedule = Schedule::default();
    for (i, when) in CUP_ROUNDS.iter().enumerate() {
        let day = anchor(year, *when)?;
        if blackouts.iter().any(|b| b.normalized().contains(day)) {
            warn!(%day, "cup date falls inside a blackout; keeping the fixed date");
        }
        let mut slots = BTreeMap::new();
        for hour in CUP_KICKOFF_HOURS {
            let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or(ScheduleError::CalendarOverflow)?;
            slots.insert(day.and_time(time), 1);
        }
        schedule.end = slots.keys().next_back().copied();
        schedule.rounds.push(RoundSlots {
            round: i as u32 + 1,
            slots,
        });
    }
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use season_core::{Player, Position};
    use std::collections::HashSet;

    fn team(name: &str) -> Team {
        let mut t = Team::new(name, &name[..3], format!("{name} Pitch"));
        for position in Position::ALL {
            for i in 0..position.roster_size() {
                t.roster_mut(position)
                    .push(Player::new(format!("{name} {i}"), 5, 5, 5, 5));
            }
        }
        t
    }

    fn teams(n: usize) -> Vec<Team> {
        (0..n).map(|i| team(&format!("Team {i:02}"))).collect()
    }

    fn friday_options() -> TournamentOptions {
        let mut o = TournamentOptions::new("League", NaiveDate::from_ymd_opt(2024, 9, 2).unwrap());
        o.start_times.enable(
            Weekday::Fri,
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        );
        o
    }

    #[test]
    fn round_robin_counts_for_even_and_odd_leagues() {
        let eight = TournamentFormat::RoundRobin.compute_counts(8, 1.0);
        assert_eq!(
            (eight.total_matches, eight.total_rounds, eight.matches_per_round),
            (28, 7, 4)
        );
        assert_eq!(eight.matches_per_week, 4);
        assert_eq!(eight.matches_per_day, 1);

        let seven = TournamentFormat::RoundRobin.compute_counts(7, 1.0);
        assert_eq!(
            (seven.total_matches, seven.total_rounds, seven.matches_per_round),
            (21, 7, 3)
        );

        let paced = TournamentFormat::RoundRobin.compute_counts(6, 1.5);
        assert_eq!(paced.matches_per_week, 5);
        assert_eq!(paced.matches_per_day, 2);
    }

    #[test]
    fn return_legs_double_totals() {
        let c = TournamentFormat::RoundRobinReturn.compute_counts(6, 1.0);
        assert_eq!((c.total_matches, c.total_rounds, c.matches_per_round), (30, 10, 3));
    }

    #[test]
    fn too_few_teams_gives_zero_counts() {
        assert!(TournamentFormat::RoundRobin.compute_counts(1, 1.0).is_empty());
        assert!(TournamentFormat::RoundRobin.compute_counts(0, 1.0).is_empty());
        assert!(TournamentFormat::FourTeamCup.compute_counts(3, 1.0).is_empty());
        let s = TournamentFormat::RoundRobin
            .build_schedule(&friday_options(), 1)
            .unwrap();
        assert_eq!(s.total(), 0);
    }

    #[test]
    fn six_teams_on_friday_evenings_end_to_end() {
        let ranked = teams(6);
        let schedule = TournamentFormat::RoundRobin
            .build_schedule(&friday_options(), ranked.len())
            .unwrap();
        assert_eq!(schedule.rounds.len(), 5);
        let mut matches = schedule.to_matches();
        assert_eq!(matches.len(), 15);
        for m in &matches {
            assert_eq!(m.start.weekday(), Weekday::Fri);
        }
        assert!(matches.windows(2).all(|w| w[0].start < w[1].start));
        for round in &schedule.rounds {
            assert_eq!(round.total(), 3);
            let days: HashSet<NaiveDate> = round.slots.keys().map(|dt| dt.date()).collect();
            assert_eq!(days.len(), 1);
        }

        TournamentFormat::RoundRobin
            .assign_teams(&mut matches, &ranked, 99)
            .unwrap();
        let mut fixtures = HashSet::new();
        for m in &matches {
            let (home, away) = (m.home.clone().unwrap(), m.away.clone().unwrap());
            assert_ne!(home, away);
            let key = if home < away { (home, away) } else { (away, home) };
            assert!(fixtures.insert(key));
        }
        assert_eq!(fixtures.len(), 15);
        // Nobody plays twice in the same round.
        for round in 1..=5 {
            let mut seen = HashSet::new();
            for m in matches.iter().filter(|m| m.round == round) {
                assert!(seen.insert(m.home.clone()));
                assert!(seen.insert(m.away.clone()));
            }
        }
    }

    #[test]
    fn pairing_is_seeded() {
        let ranked = teams(6);
        let schedule = TournamentFormat::RoundRobin
            .build_schedule(&friday_options(), 6)
            .unwrap();
        let mut a = schedule.to_matches();
        let mut b = schedule.to_matches();
        TournamentFormat::RoundRobin.assign_teams(&mut a, &ranked, 5).unwrap();
        TournamentFormat::RoundRobin.assign_teams(&mut b, &ranked, 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mismatched_shells_are_rejected() {
        let ranked = teams(4);
        let mut shells = vec![Match::shell(
            1,
            1,
            NaiveDate::from_ymd_opt(2024, 9, 6).unwrap().and_hms_opt(18, 0, 0).unwrap(),
        )];
        let err = TournamentFormat::RoundRobin
            .assign_teams(&mut shells, &ranked, 1)
            .unwrap_err();
        assert_eq!(err, ScheduleError::MatchCountMismatch { expected: 6, found: 1 });
    }

    #[test]
    fn cup_uses_fixed_saturdays() {
        let mut o = friday_options();
        o.format = TournamentFormat::FourTeamCup;
        let s = TournamentFormat::FourTeamCup.build_schedule(&o, 5).unwrap();
        let days: Vec<NaiveDate> = s.kickoffs().map(|(_, dt)| dt.date()).collect();
        let sat = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        assert_eq!(
            days,
            vec![sat(9, 14), sat(9, 14), sat(10, 26), sat(10, 26), sat(12, 14), sat(12, 14)]
        );
        assert_eq!(s.end, Some(sat(12, 14).and_hms_opt(16, 0, 0).unwrap()));

        let ranked = teams(5);
        let mut matches = s.to_matches();
        TournamentFormat::FourTeamCup
            .assign_teams(&mut matches, &ranked, 0)
            .unwrap();
        assert_eq!(matches[0].home, Some(ranked[0].id()));
        assert_eq!(matches[0].away, Some(ranked[3].id()));
        assert_eq!(matches[0].location.as_deref(), Some("Team 00 Pitch"));
        assert!(matches.iter().all(|m| m.home != Some(ranked[4].id())));
    }

    #[test]
    fn late_start_moves_cup_to_next_year() {
        let mut o = friday_options();
        o.start_date = NaiveDate::from_ymd_opt(2024, 9, 20).unwrap();
        let s = TournamentFormat::FourTeamCup.build_schedule(&o, 4).unwrap();
        let first = s.kickoffs().next().unwrap().1.date();
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 9, 13).unwrap());
    }

    #[test]
    fn cup_needs_four_teams() {
        let err = TournamentFormat::FourTeamCup
            .assign_teams(&mut [], &teams(3), 0)
            .unwrap_err();
        assert_eq!(err, ScheduleError::NotEnoughTeams { required: 4, found: 3 });
    }

    proptest! {
        #[test]
        fn circle_method_meets_everyone_once(n in 2usize..16) {
            let rounds = round_robin_pairings(n);
            let counts = TournamentFormat::RoundRobin.compute_counts(n, 1.0);
            prop_assert_eq!(rounds.len() as u32, counts.total_rounds);
            let mut seen = HashSet::new();
            for round in &rounds {
                prop_assert_eq!(round.len() as u32, counts.matches_per_round);
                for &(h, a) in round {
                    prop_assert!(seen.insert((h.min(a), h.max(a))));
                }
            }
            prop_assert_eq!(seen.len() as u32, counts.total_matches);
        }
    }
}
