//! Slot-space intervals → renderable, non-overlapping blocks.
//!
//! For every visible `(day, slot)` cell the resolver decides whether a block
//! **starts** there (some interval has `start_slot == slot`) or whether the
//! cell is **covered** (some interval has `start_slot < slot < end_slot`).
//! Blocks are emitted only for starting cells that are not covered.
//!
//! Two intervals starting in the same cell is a scheduling conflict: the one
//! that came first in the input wins and the other is recorded as a
//! [`ConflictDrop`]. A start inside a covered cell is dropped the same way.
//! Layout itself never fails.

use serde::Serialize;

use crate::config::GridConfig;
use crate::error::Result;
use crate::model::{Subject, SubjectColor, WeekDay};
use crate::projector::{self, ProjectedInterval};
use crate::slots::SlotIndex;

/// A resolved placement of one subject meeting in a day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub day: WeekDay,
    pub start_slot: SlotIndex,
    /// Always at least 1.
    pub span_slots: usize,
    pub subject_id: String,
    pub title: String,
    pub color: SubjectColor,
}

impl Block {
    /// One past the last slot the block covers.
    pub fn end_slot(&self) -> SlotIndex {
        self.start_slot + self.span_slots
    }
}

/// Why an interval got no block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DropReason {
    /// Another interval starts in the same cell and came first.
    SameStart,
    /// The cell is covered by an interval that started earlier that day.
    Occluded,
}

/// An interval that lost its cell to another one.
///
/// For `Occluded` drops the winner is the placed block covering the cell. If
/// only an interval that was itself dropped covers it, that interval's
/// subject is named and has no block of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDrop {
    pub day: WeekDay,
    pub slot: SlotIndex,
    pub dropped_subject_id: String,
    pub winner_subject_id: String,
    pub reason: DropReason,
}

/// What a renderer should draw at one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Empty,
    /// The block begins here and extends `span_slots` rows down.
    Start(&'a Block),
    /// Part of a block that began in an earlier row; draw nothing.
    Covered(&'a Block),
}

/// Output of [`resolve`]: blocks ordered by visible day then slot, plus every
/// interval that was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub blocks: Vec<Block>,
    pub drops: Vec<ConflictDrop>,
}

impl Layout {
    pub fn has_conflicts(&self) -> bool {
        !self.drops.is_empty()
    }

    /// Blocks in one day column, top to bottom.
    pub fn blocks_on(&self, day: WeekDay) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.day == day)
    }

    pub fn cell(&self, day: WeekDay, slot: SlotIndex) -> Cell<'_> {
        for block in self.blocks_on(day) {
            if block.start_slot == slot {
                return Cell::Start(block);
            }
            if block.start_slot < slot && slot < block.end_slot() {
                return Cell::Covered(block);
            }
        }
        Cell::Empty
    }
}

/// Resolve projected intervals from any number of subjects into blocks.
///
/// Input order is the tie-break order: pass intervals in subject insertion
/// order (as [`projector::project_all`] produces them). Intervals on hidden
/// days, or starting below the last visible row, are ignored.
pub fn resolve(projected: &[ProjectedInterval], config: &GridConfig) -> Layout {
    let rows = config.visible_slots;
    let mut layout = Layout::default();

    for &day in &config.visible_days {
        let day_intervals: Vec<&ProjectedInterval> =
            projected.iter().filter(|p| p.day == day).collect();
        if day_intervals.is_empty() {
            continue;
        }

        // Index the day by starting row; the first interval claims the cell.
        let mut starts: Vec<Option<&ProjectedInterval>> = vec![None; rows];
        let mut covered = vec![false; rows];
        for &interval in &day_intervals {
            if interval.start_slot >= rows {
                tracing::trace!(
                    subject = %interval.subject_id,
                    %day,
                    slot = interval.start_slot,
                    "interval starts below the grid, ignoring"
                );
                continue;
            }
            match starts[interval.start_slot] {
                None => starts[interval.start_slot] = Some(interval),
                Some(winner) => layout.drops.push(drop_for(
                    interval,
                    &winner.subject_id,
                    interval.start_slot,
                    DropReason::SameStart,
                )),
            }
            for row in covered
                .iter_mut()
                .take(interval.end_slot())
                .skip(interval.start_slot + 1)
            {
                *row = true;
            }
        }

        let day_blocks = layout.blocks.len();
        for (slot, start) in starts.iter().enumerate() {
            let Some(interval) = *start else { continue };
            if covered[slot] {
                // Name a placed block when one covers the cell, else the
                // dropped interval that still covers it.
                let occluder = layout.blocks[day_blocks..]
                    .iter()
                    .find(|b| b.start_slot < slot && slot < b.end_slot())
                    .map(|b| b.subject_id.as_str())
                    .or_else(|| {
                        day_intervals
                            .iter()
                            .find(|p| p.covers_later(slot))
                            .map(|p| p.subject_id.as_str())
                    })
                    .unwrap_or(interval.subject_id.as_str());
                let lost = drop_for(interval, occluder, slot, DropReason::Occluded);
                layout.drops.push(lost);
                continue;
            }
            layout.blocks.push(Block {
                day,
                start_slot: interval.start_slot,
                span_slots: interval.span_slots.max(1),
                subject_id: interval.subject_id.clone(),
                title: interval.title.clone(),
                color: interval.color,
            });
        }
    }

    layout
}

fn drop_for(
    dropped: &ProjectedInterval,
    winner_subject_id: &str,
    slot: SlotIndex,
    reason: DropReason,
) -> ConflictDrop {
    tracing::warn!(
        day = %dropped.day,
        slot,
        dropped = %dropped.subject_id,
        winner = %winner_subject_id,
        ?reason,
        "scheduling conflict, interval not placed"
    );
    ConflictDrop {
        day: dropped.day,
        slot,
        dropped_subject_id: dropped.subject_id.clone(),
        winner_subject_id: winner_subject_id.to_string(),
        reason,
    }
}

/// Project `subjects` and resolve them in one step.
///
/// # Errors
/// Propagates projection errors; see [`projector::project`]. No layout is
/// produced if any subject fails to project.
pub fn layout_subjects(subjects: &[Subject], config: &GridConfig) -> Result<Layout> {
    let projected = projector::project_all(subjects, config)?;
    Ok(resolve(&projected, config))
}

/// The blocks the weekly view renders for `subjects`.
pub fn project_subjects_to_grid(subjects: &[Subject], config: &GridConfig) -> Result<Vec<Block>> {
    layout_subjects(subjects, config).map(|layout| layout.blocks)
}
