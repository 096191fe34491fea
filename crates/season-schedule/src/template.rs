//! Weekly kickoff template.

use crate::ScheduleError;
use chrono::{NaiveTime, Timelike, Weekday};
use season_core::{TimeEntry, WeeklyStartTimes};
use tracing::debug;

/// Slack allowed past a day's latest start before a slot is dropped.
const WINDOW_TOLERANCE_MINUTES: u32 = 1;

/// Kickoff slots for one week, ordered Monday first then by time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchTemplate {
    pub entries: Vec<TimeEntry>,
    /// Matches that did not fit any window and were stacked onto existing
    /// slots.
    pub redistributed: u32,
}

impl MatchTemplate {
    /// Matches one pass over the template places.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Weekday a new template pass starts on.
    pub fn anchor(&self) -> Option<Weekday> {
        self.entries.first().map(|e| e.weekday)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the weekly template for `matches_needed` matches.
///
/// Enabled weekdays are filled Monday first. Each day takes at most
/// `day_quota` slots, starting at its earliest kickoff and stepping by
/// `minutes_between`, and its final slot is pulled onto the latest kickoff; a
/// zero step stacks the whole day on its latest kickoff.
/// Matches left over once every window is full are stacked onto the emptiest
/// slots.
pub fn build_template(
    start_times: &WeeklyStartTimes,
    minutes_between: u32,
    matches_needed: u32,
    day_quota: u32,
) -> Result<MatchTemplate, ScheduleError> {
    if start_times.enabled_count() == 0 {
        return Err(ScheduleError::NoEnabledWeekday);
    }
    let day_quota = day_quota.max(1);
    let mut remaining = matches_needed;
    let mut entries: Vec<TimeEntry> = Vec::new();

    for window in start_times.enabled() {
        if remaining == 0 {
            break;
        }
        let earliest = minutes_of(window.earliest);
        let latest = minutes_of(window.latest);

        if minutes_between == 0 {
            let n = remaining.min(day_quota);
            bump(&mut entries, window.weekday, window.latest, n);
            remaining -= n;
            continue;
        }

        let mut next = earliest;
        let mut placed_today = 0;
        while placed_today < day_quota && remaining > 0 && next <= latest + WINDOW_TOLERANCE_MINUTES {
            let slot = at_minutes(next.min(latest)).unwrap_or(window.latest);
            bump(&mut entries, window.weekday, slot, 1);
            placed_today += 1;
            remaining -= 1;
            next += minutes_between;
        }
        if placed_today > 0 {
            snap_last_to_latest(&mut entries, window.weekday, window.latest);
        }
    }

    let mut redistributed = 0;
    while remaining > 0 {
        let target = entries
            .iter_mut()
            .min_by(|a, b| a.cmp_redistribution(b))
            .ok_or(ScheduleError::EmptyTemplate)?;
        target.count += 1;
        remaining -= 1;
        redistributed += 1;
    }
    entries.sort();

    debug!(
        slots = entries.len(),
        matches = matches_needed,
        redistributed,
        "built weekly template"
    );
    Ok(MatchTemplate {
        entries,
        redistributed,
    })
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

fn at_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0)
}

fn bump(entries: &mut Vec<TimeEntry>, weekday: Weekday, time: NaiveTime, n: u32) {
    match entries.iter_mut().find(|e| e.same_slot(weekday, time)) {
        Some(entry) => entry.count += n,
        None => entries.push(TimeEntry::new(weekday, time, n)),
    }
}

fn snap_last_to_latest(entries: &mut Vec<TimeEntry>, weekday: Weekday, latest: NaiveTime) {
    let Some(last_idx) = entries.iter().rposition(|e| e.weekday == weekday) else {
        return;
    };
    if entries[last_idx].time == latest {
        return;
    }
    let count = entries[last_idx].count;
    entries.remove(last_idx);
    bump(entries, weekday, latest, count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn friday_evenings() -> WeeklyStartTimes {
        let mut week = WeeklyStartTimes::default();
        week.enable(Weekday::Fri, hm(18, 0), hm(22, 0));
        week
    }

    #[test]
    fn friday_window_holds_three_slots() {
        let t = build_template(&friday_evenings(), 120, 3, 3).unwrap();
        let times: Vec<NaiveTime> = t.entries.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![hm(18, 0), hm(20, 0), hm(22, 0)]);
        assert_eq!(t.total(), 3);
        assert_eq!(t.redistributed, 0);
        assert_eq!(t.anchor(), Some(Weekday::Fri));
    }

    #[test]
    fn spent_window_snaps_last_slot_to_latest() {
        let mut week = WeeklyStartTimes::default();
        week.enable(Weekday::Sat, hm(12, 0), hm(15, 0));
        let t = build_template(&week, 120, 2, 4).unwrap();
        let times: Vec<NaiveTime> = t.entries.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![hm(12, 0), hm(15, 0)]);
    }

    #[test]
    fn quota_stop_still_ends_on_latest() {
        let mut week = WeeklyStartTimes::default();
        week.enable(Weekday::Sat, hm(12, 0), hm(20, 0));
        let t = build_template(&week, 120, 2, 2).unwrap();
        let times: Vec<NaiveTime> = t.entries.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![hm(12, 0), hm(20, 0)]);

        let single = build_template(&week, 120, 1, 1).unwrap();
        assert_eq!(single.entries, vec![TimeEntry::new(Weekday::Sat, hm(20, 0), 1)]);
    }

    #[test]
    fn one_minute_tolerance_keeps_a_slot() {
        let mut week = WeeklyStartTimes::default();
        week.enable(Weekday::Wed, hm(18, 0), hm(19, 59));
        let t = build_template(&week, 120, 2, 2).unwrap();
        let times: Vec<NaiveTime> = t.entries.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![hm(18, 0), hm(19, 59)]);
    }

    #[test]
    fn zero_spacing_stacks_on_latest() {
        let t = build_template(&friday_evenings(), 0, 3, 3).unwrap();
        assert_eq!(t.entries, vec![TimeEntry::new(Weekday::Fri, hm(22, 0), 3)]);
    }

    #[test]
    fn leftovers_go_friday_first_then_latest() {
        let mut week = WeeklyStartTimes::default();
        week.enable(Weekday::Mon, hm(18, 0), hm(18, 0));
        week.enable(Weekday::Fri, hm(18, 0), hm(20, 0));
        let t = build_template(&week, 120, 5, 1).unwrap();
        assert_eq!(t.redistributed, 3);
        assert_eq!(t.total(), 5);
        // Mon 18:00 and Fri 20:00 each get one slot; the three extras go to
        // Fri, then Mon, then Fri again.
        assert_eq!(
            t.entries,
            vec![
                TimeEntry::new(Weekday::Mon, hm(18, 0), 2),
                TimeEntry::new(Weekday::Fri, hm(20, 0), 3),
            ]
        );
    }

    #[test]
    fn no_enabled_day_is_unschedulable() {
        let err = build_template(&WeeklyStartTimes::default(), 120, 3, 1).unwrap_err();
        assert_eq!(err, ScheduleError::NoEnabledWeekday);
    }

    fn week_from_mask(mask: u8) -> WeeklyStartTimes {
        let mut week = WeeklyStartTimes::default();
        for (i, day) in season_core::calendar::WEEK.iter().enumerate() {
            if mask & (1 << i) != 0 {
                week.enable(*day, hm(17, 0), hm(21, 0));
            }
        }
        week
    }

    proptest! {
        #[test]
        fn template_sum_matches_need(
            mask in 1u8..128,
            spacing in 0u32..300,
            needed in 0u32..40,
            quota in 0u32..6,
        ) {
            let week = week_from_mask(mask);
            let t = build_template(&week, spacing, needed, quota).unwrap();
            prop_assert_eq!(t.total(), needed);
            prop_assert!(t.entries.iter().all(|e| e.count >= 1));
            prop_assert!(t.entries.iter().all(|e| week.is_enabled(e.weekday)));
            prop_assert!(t.entries.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn under_allocation_is_topped_up_exactly(extra in 1u32..12) {
            // The Friday window holds three slots at two-hour spacing.
            let base = build_template(&friday_evenings(), 120, 3, 3).unwrap();
            let t = build_template(&friday_evenings(), 120, 3 + extra, 3).unwrap();
            prop_assert_eq!(t.redistributed, extra);
            prop_assert_eq!(t.total(), base.total() + extra);
            for (before, after) in base.entries.iter().zip(&t.entries) {
                prop_assert!(after.count >= before.count);
            }
        }
    }
}
