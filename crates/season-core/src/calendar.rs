//! Weekly start-time preferences, template slots, and blackout ranges.

use crate::ValidationError;
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Weekdays in calendar order, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Position of `weekday` in a Monday-first week.
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

/// Operator-editable start window for one weekday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidStartTime {
    /// Day the window applies to.
    pub weekday: Weekday,
    /// Whether matches may be scheduled on this weekday at all.
    pub enabled: bool,
    /// Earliest allowed start.
    pub earliest: NaiveTime,
    /// Latest allowed start.
    pub latest: NaiveTime,
}

impl ValidStartTime {
    /// An enabled window.
    pub fn new(weekday: Weekday, earliest: NaiveTime, latest: NaiveTime) -> Self {
        Self {
            weekday,
            enabled: true,
            earliest,
            latest,
        }
    }

    /// A disabled window; both bounds sit at midnight.
    pub fn disabled(weekday: Weekday) -> Self {
        Self {
            weekday,
            enabled: false,
            earliest: NaiveTime::MIN,
            latest: NaiveTime::MIN,
        }
    }
}

/// One [`ValidStartTime`] per weekday, Monday first.
///
/// Serialized as a list; weekdays missing from the list deserialize as
/// disabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ValidStartTime>", into = "Vec<ValidStartTime>")]
pub struct WeeklyStartTimes {
    days: [ValidStartTime; 7],
}

impl Default for WeeklyStartTimes {
    fn default() -> Self {
        Self {
            days: WEEK.map(ValidStartTime::disabled),
        }
    }
}

impl WeeklyStartTimes {
    pub fn get(&self, weekday: Weekday) -> &ValidStartTime {
        &self.days[weekday_index(weekday)]
    }

    /// Replace the window for `window.weekday`.
    pub fn set(&mut self, window: ValidStartTime) {
        self.days[weekday_index(window.weekday)] = window;
    }

    /// Enable `weekday` with the given window.
    pub fn enable(&mut self, weekday: Weekday, earliest: NaiveTime, latest: NaiveTime) {
        self.set(ValidStartTime::new(weekday, earliest, latest));
    }

    pub fn disable(&mut self, weekday: Weekday) {
        self.days[weekday_index(weekday)].enabled = false;
    }

    /// All seven windows, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = &ValidStartTime> {
        self.days.iter()
    }

    /// Enabled windows, Monday first.
    pub fn enabled(&self) -> impl Iterator<Item = &ValidStartTime> {
        self.days.iter().filter(|d| d.enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    pub fn is_enabled(&self, weekday: Weekday) -> bool {
        self.get(weekday).enabled
    }
}

impl TryFrom<Vec<ValidStartTime>> for WeeklyStartTimes {
    type Error = ValidationError;

    fn try_from(windows: Vec<ValidStartTime>) -> Result<Self, Self::Error> {
        let mut week = Self::default();
        let mut seen = [false; 7];
        for window in windows {
            let idx = weekday_index(window.weekday);
            if seen[idx] {
                return Err(ValidationError::DuplicateWeekday(window.weekday));
            }
            seen[idx] = true;
            week.set(window);
        }
        Ok(week)
    }
}

impl From<WeeklyStartTimes> for Vec<ValidStartTime> {
    fn from(week: WeeklyStartTimes) -> Self {
        week.days.to_vec()
    }
}

/// A weekly template slot: `count` matches start at `time` on `weekday`.
///
/// The natural ordering is weekday (Monday first), then time of day. Slots in
/// a template are unique, so the trailing count comparison only keeps `Ord`
/// consistent with `Eq`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub weekday: Weekday,
    pub time: NaiveTime,
    pub count: u32,
}

impl TimeEntry {
    pub fn new(weekday: Weekday, time: NaiveTime, count: u32) -> Self {
        Self {
            weekday,
            time,
            count,
        }
    }

    /// Whether both entries occupy the same weekday and time.
    pub fn same_slot(&self, weekday: Weekday, time: NaiveTime) -> bool {
        self.weekday == weekday && self.time == time
    }

    /// Ordering used when handing out leftover matches: fewest matches first,
    /// then Friday-first weekday priority, then the latest time first.
    pub fn cmp_redistribution(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| friday_first(self.weekday).cmp(&friday_first(other.weekday)))
            .then_with(|| other.time.cmp(&self.time))
    }
}

impl PartialOrd for TimeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        weekday_index(self.weekday)
            .cmp(&weekday_index(other.weekday))
            .then_with(|| self.time.cmp(&other.time))
            .then_with(|| self.count.cmp(&other.count))
    }
}

/// Weekday rank in a Friday..Thursday rotation (Friday = 0).
pub fn friday_first(weekday: Weekday) -> u32 {
    (weekday.num_days_from_monday() + 3) % 7
}

/// Inclusive date range during which no match may be played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BlackoutDates {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidBlackout { start, end });
        }
        Ok(Self { start, end })
    }

    /// The range widened to whole Monday..Sunday weeks.
    pub fn normalized(&self) -> Self {
        Self {
            start: week_start(self.start),
            end: week_end(self.end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Normalize, sort by start, and merge overlapping or touching ranges.
    pub fn normalize_all(ranges: &[BlackoutDates]) -> Vec<BlackoutDates> {
        let mut weeks: Vec<BlackoutDates> = ranges.iter().map(BlackoutDates::normalized).collect();
        weeks.sort_by_key(|r| r.start);
        let mut merged: Vec<BlackoutDates> = Vec::with_capacity(weeks.len());
        for range in weeks {
            match merged.last_mut() {
                Some(prev) if range.start <= prev.end.succ_opt().unwrap_or(prev.end) => {
                    prev.end = prev.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        merged
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(date)
}

/// Sunday of the week containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(6 - date.weekday().num_days_from_monday())))
        .unwrap_or(date)
}
