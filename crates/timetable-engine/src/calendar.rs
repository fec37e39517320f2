//! Calendar helpers: Monday-start weeks, per-day activity lists and the set of
//! days that get a "has activity" marker.
//!
//! Markers come from materialized [`Activity`] records only. A subject's
//! recurring meetings do not mark days by themselves; use
//! [`crate::correlator::occurrences_between`] for that projection.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::model::Activity;

/// A Monday-to-Sunday week, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
        WeekRange {
            start,
            end: start + Days::new(6),
        }
    }

    /// The week `weeks` weeks after this one (before it, if negative).
    pub fn shifted(self, weeks: i64) -> Self {
        let days = Days::new(weeks.unsigned_abs() * 7);
        let start = if weeks >= 0 {
            self.start.checked_add_days(days)
        } else {
            self.start.checked_sub_days(days)
        };
        start.map(WeekRange::containing).unwrap_or(self)
    }

    pub fn previous(self) -> Self {
        self.shifted(-1)
    }

    pub fn next(self) -> Self {
        self.shifted(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for WeekRange {
    /// e.g. `13 Oct - 19 Oct`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%-d %b"),
            self.end.format("%-d %b")
        )
    }
}

/// First and last day of a month, or `None` for an invalid month.
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Activities dated `date`, in input order.
pub fn activities_on(activities: &[Activity], date: NaiveDate) -> Vec<&Activity> {
    activities.iter().filter(|a| a.date == date).collect()
}

/// Activities inside `week`, ordered by date, then time (untimed first), then
/// input order.
pub fn activities_in_week(activities: &[Activity], week: WeekRange) -> Vec<&Activity> {
    let mut found: Vec<&Activity> = activities.iter().filter(|a| week.contains(a.date)).collect();
    found.sort_by_key(|a| (a.date, a.time.map(|w| w.start)));
    found
}

/// Dates in `from..=to` that carry at least one activity.
pub fn days_with_activities(
    activities: &[Activity],
    from: NaiveDate,
    to: NaiveDate,
) -> BTreeSet<NaiveDate> {
    activities
        .iter()
        .map(|a| a.date)
        .filter(|d| from <= *d && *d <= to)
        .collect()
}
