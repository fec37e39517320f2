//! Recurring intervals → slot-space coordinates.
//!
//! Each weekly meeting of a subject becomes a `(day, start_slot, span_slots)`
//! triple tagged with the subject it came from. Meetings on days the grid
//! doesn't show are skipped; the meeting itself stays in the subject.

use serde::Serialize;

use crate::config::GridConfig;
use crate::error::Result;
use crate::model::{Subject, SubjectColor, WeekDay};
use crate::slots::{self, SlotIndex};

/// One subject meeting placed in slot space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedInterval {
    pub day: WeekDay,
    pub subject_id: String,
    pub color: SubjectColor,
    pub title: String,
    pub start_slot: SlotIndex,
    pub span_slots: usize,
}

impl ProjectedInterval {
    /// One past the last slot this interval covers.
    pub fn end_slot(&self) -> SlotIndex {
        self.start_slot + self.span_slots
    }

    /// Whether this interval visually covers `slot` without starting there.
    pub fn covers_later(&self, slot: SlotIndex) -> bool {
        self.start_slot < slot && slot < self.end_slot()
    }
}

/// Project every meeting of `subject` onto the grid.
///
/// `start_slot = slot_index_of(start)` and `span_slots = span_of(start, end)`.
/// Output follows the subject's interval order.
///
/// # Errors
/// Returns `TimetableError::OutOfRange` if a visible meeting starts before the
/// grid's day start or ends after its last slot. Nothing is returned for the
/// subject in that case.
pub fn project(subject: &Subject, config: &GridConfig) -> Result<Vec<ProjectedInterval>> {
    let mut projected = Vec::with_capacity(subject.intervals.len());

    for interval in &subject.intervals {
        if !config.shows(interval.day()) {
            tracing::trace!(
                subject = %subject.id,
                day = %interval.day(),
                "meeting falls on a hidden day, skipping"
            );
            continue;
        }

        slots::ensure_within_window(interval.start(), interval.end(), config)?;
        let start_slot = slots::slot_index_of(interval.start(), config)?;
        let span_slots = slots::span_of(interval.start(), interval.end(), config)?;

        projected.push(ProjectedInterval {
            day: interval.day(),
            subject_id: subject.id.clone(),
            color: subject.color,
            title: subject.title.clone(),
            start_slot,
            span_slots,
        });
    }

    Ok(projected)
}

/// Project several subjects, keeping subject insertion order.
///
/// The layout resolver relies on this order to break ties, so callers should
/// pass subjects in the order they were added to their schedule.
pub fn project_all(subjects: &[Subject], config: &GridConfig) -> Result<Vec<ProjectedInterval>> {
    let mut all = Vec::new();
    for subject in subjects {
        all.extend(project(subject, config)?);
    }
    Ok(all)
}
