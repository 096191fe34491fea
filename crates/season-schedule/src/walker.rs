//! Replays a weekly template across the calendar.

use crate::template::MatchTemplate;
use crate::ScheduleError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use season_core::calendar::week_start;
use season_core::{BlackoutDates, Match};
use std::collections::BTreeMap;
use tracing::debug;

/// Calendar days the cursor may cover without placing a match before the walk
/// gives up. Roughly ten years.
const IDLE_DAY_LIMIT: u64 = 7 * 520;

/// Match totals the walk must honour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkPlan {
    pub total_matches: u32,
    pub matches_per_round: u32,
    pub matches_per_week: u32,
}

/// Kickoffs assigned to one round, with the number of matches at each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSlots {
    pub round: u32,
    pub slots: BTreeMap<NaiveDateTime, u32>,
}

impl RoundSlots {
    fn new(round: u32) -> Self {
        Self {
            round,
            slots: BTreeMap::new(),
        }
    }

    pub fn total(&self) -> u32 {
        self.slots.values().sum()
    }

    fn first_date(&self) -> Option<NaiveDate> {
        self.slots.keys().next().map(|dt| dt.date())
    }
}

/// Dated kickoffs for a whole season, grouped by round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    pub rounds: Vec<RoundSlots>,
    /// Latest kickoff in the schedule.
    pub end: Option<NaiveDateTime>,
}

impl Schedule {
    pub fn total(&self) -> u32 {
        self.rounds.iter().map(RoundSlots::total).sum()
    }

    /// Every kickoff in order, repeated once per match it hosts.
    pub fn kickoffs(&self) -> impl Iterator<Item = (u32, NaiveDateTime)> + '_ {
        self.rounds.iter().flat_map(|r| {
            r.slots
                .iter()
                .flat_map(move |(dt, n)| std::iter::repeat((r.round, *dt)).take(*n as usize))
        })
    }

    /// Unassigned match shells numbered from 1 in kickoff order.
    pub fn to_matches(&self) -> Vec<Match> {
        self.kickoffs()
            .enumerate()
            .map(|(i, (round, dt))| Match::shell(i as u32 + 1, round, dt))
            .collect()
    }
}

/// Date cursor that steps over blackout ranges.
struct Cursor {
    date: NaiveDate,
    blackouts: Vec<BlackoutDates>,
    next: usize,
    /// Days stepped over since the last placement.
    idle_days: u64,
}

impl Cursor {
    fn new(start: NaiveDate, blackouts: &[BlackoutDates]) -> Self {
        Self {
            date: start,
            blackouts: BlackoutDates::normalize_all(blackouts),
            next: 0,
            idle_days: 0,
        }
    }

    fn step(&mut self) -> Result<(), ScheduleError> {
        self.date = self.date.succ_opt().ok_or(ScheduleError::CalendarOverflow)?;
        self.idle_days += 1;
        Ok(())
    }

    fn skip_blackouts(&mut self) -> Result<(), ScheduleError> {
        while let Some(range) = self.blackouts.get(self.next) {
            if range.end < self.date {
                self.next += 1;
            } else if range.contains(self.date) {
                let resume = range.end.succ_opt().ok_or(ScheduleError::CalendarOverflow)?;
                self.idle_days += (resume - self.date).num_days().unsigned_abs();
                self.date = resume;
                self.next += 1;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Move forward to the next open day falling on `weekday`.
    fn align_to(&mut self, weekday: Weekday) -> Result<(), ScheduleError> {
        loop {
            self.skip_blackouts()?;
            if self.date.weekday() == weekday || self.idle_days > IDLE_DAY_LIMIT {
                return Ok(());
            }
            self.step()?;
        }
    }

    /// Leave the current day and land on the next open `weekday`.
    fn advance_past(&mut self, weekday: Weekday) -> Result<(), ScheduleError> {
        self.step()?;
        self.align_to(weekday)
    }
}

/// Assign a kickoff to every match in `plan`, walking weeks from `start`.
///
/// Rounds fill strictly in order. Once a round is full the next one opens; the
/// template restarts on the following anchor day when the week's quota is met,
/// when the finished round spread over more than one week, or when every slot
/// of the template has been used.
pub fn walk(
    template: &MatchTemplate,
    plan: &WalkPlan,
    start: NaiveDate,
    blackouts: &[BlackoutDates],
) -> Result<Schedule, ScheduleError> {
    if plan.total_matches == 0 {
        return Ok(Schedule::default());
    }
    let Some(anchor) = template.anchor() else {
        return Err(ScheduleError::EmptyTemplate);
    };
    if plan.matches_per_round == 0 || plan.matches_per_week == 0 {
        return Err(ScheduleError::NoProgress {
            placed: 0,
            required: plan.total_matches,
        });
    }

    let entries = &template.entries;
    let mut cursor = Cursor::new(start, blackouts);
    let mut rounds = vec![RoundSlots::new(1)];
    let mut idx = 0;
    let mut placed = 0;
    let mut in_round = 0;
    let mut in_week = 0;
    let mut end = None;

    while placed < plan.total_matches {
        let entry = entries[idx];
        cursor.align_to(entry.weekday)?;
        if cursor.idle_days > IDLE_DAY_LIMIT {
            return Err(ScheduleError::NoProgress {
                placed,
                required: plan.total_matches,
            });
        }
        let kickoff = cursor.date.and_time(entry.time);
        let take = entry
            .count
            .min(plan.matches_per_round - in_round)
            .min(plan.total_matches - placed);
        if let Some(round) = rounds.last_mut() {
            *round.slots.entry(kickoff).or_insert(0) += take;
        }
        placed += take;
        in_round += take;
        in_week += take;
        end = Some(kickoff);
        cursor.idle_days = 0;
        idx += 1;

        if placed >= plan.total_matches {
            break;
        }

        let mut restart = idx >= entries.len() || in_week >= plan.matches_per_week;
        if in_round >= plan.matches_per_round {
            let spanned = rounds
                .last()
                .and_then(RoundSlots::first_date)
                .is_some_and(|first| week_start(first) != week_start(cursor.date));
            restart |= spanned;
            debug!(round = rounds.len(), until = %kickoff, spanned, "round filled");
            rounds.push(RoundSlots::new(rounds.len() as u32 + 1));
            in_round = 0;
        }
        if restart {
            idx = 0;
            in_week = 0;
            cursor.advance_past(anchor)?;
        }
    }

    debug!(rounds = rounds.len(), matches = placed, "walked schedule");
    Ok(Schedule { rounds, end })
}
