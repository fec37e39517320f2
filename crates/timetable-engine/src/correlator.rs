//! Recurring schedule × calendar date → concrete meeting time.
//!
//! A subject "occurs" on a date when one of its recurring intervals falls on
//! that date's weekday. Subjects normally meet at most once per weekday; when
//! they meet more than once, [`OccurrencePolicy`] decides what to return.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::model::{RecurringInterval, Subject, TimeWindow, WeekDay};

/// How to pick among several intervals of one subject on the same weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OccurrencePolicy {
    /// The interval with the earliest start time.
    #[default]
    EarliestStart,
    /// The first matching interval in the subject's own order.
    FirstListed,
    /// Fail with `TimetableError::AmbiguousOccurrence`.
    RejectAmbiguous,
}

/// A subject meeting pinned to a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedOccurrence {
    pub date: NaiveDate,
    pub subject_id: String,
    pub window: TimeWindow,
}

/// The time window `subject` meets in on `date`, if it meets that day.
///
/// # Errors
/// Returns `TimetableError::AmbiguousOccurrence` only under
/// [`OccurrencePolicy::RejectAmbiguous`] when more than one interval matches.
pub fn occurs_on(
    subject: &Subject,
    date: NaiveDate,
    policy: OccurrencePolicy,
) -> Result<Option<TimeWindow>> {
    let day = WeekDay::of_date(date);
    let matching: Vec<&RecurringInterval> = subject.intervals_on(day).collect();

    let chosen = match policy {
        OccurrencePolicy::EarliestStart => matching.iter().min_by_key(|i| i.start()).copied(),
        OccurrencePolicy::FirstListed => matching.first().copied(),
        OccurrencePolicy::RejectAmbiguous => {
            if matching.len() > 1 {
                return Err(TimetableError::AmbiguousOccurrence {
                    subject_id: subject.id.clone(),
                    day,
                    count: matching.len(),
                });
            }
            matching.first().copied()
        }
    };

    Ok(chosen.map(RecurringInterval::window))
}

/// [`occurs_on`] with the default policy, which never fails.
pub fn resolve_occurrence(subject: &Subject, date: NaiveDate) -> Option<TimeWindow> {
    let day = WeekDay::of_date(date);
    subject
        .intervals_on(day)
        .min_by_key(|i| i.start())
        .map(RecurringInterval::window)
}

/// Every dated meeting of `subject` in `from..=to`, in date order.
///
/// An empty range (`from > to`) yields nothing.
pub fn occurrences_between(
    subject: &Subject,
    from: NaiveDate,
    to: NaiveDate,
    policy: OccurrencePolicy,
) -> Result<Vec<DatedOccurrence>> {
    let mut occurrences = Vec::new();
    let mut date = from;
    while date <= to {
        if let Some(window) = occurs_on(subject, date, policy)? {
            occurrences.push(DatedOccurrence {
                date,
                subject_id: subject.id.clone(),
                window,
            });
        }
        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(occurrences)
}
