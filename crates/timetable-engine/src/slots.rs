//! Time-of-day ↔ slot index mapping.
//!
//! The grid divides the day window `[day_start, day_start + visible_slots *
//! slot_minutes)` into fixed-length rows. Slot `n` begins at
//! `day_start + n * slot_minutes`.

use chrono::NaiveTime;

use crate::config::GridConfig;
use crate::error::{Result, TimetableError};
use crate::model::TimeOfDay;

/// Zero-based row of the weekly grid.
pub type SlotIndex = usize;

const MINUTES_PER_DAY: u64 = 24 * 60;

/// The slot containing `time`: `floor((time - day_start) / slot_minutes)`.
///
/// # Errors
/// Returns `TimetableError::OutOfRange` if `time` is before `day_start` or
/// lands past the last visible slot.
pub fn slot_index_of(time: TimeOfDay, config: &GridConfig) -> Result<SlotIndex> {
    let slot_minutes = slot_minutes(config)?;
    if time < config.day_start {
        return Err(out_of_range(time, config));
    }
    let offset = time.minutes() - config.day_start.minutes();
    let index = (offset / slot_minutes) as SlotIndex;
    if index >= config.visible_slots {
        return Err(out_of_range(time, config));
    }
    Ok(index)
}

/// Number of slots needed to cover `[start, end)`:
/// `ceil((end - start) / slot_minutes)`.
///
/// Rounds up, so a 50-minute class in 45-minute slots takes two rows. A range
/// ending exactly on a slot boundary gets no extra row.
///
/// # Errors
/// Returns `TimetableError::InvalidInterval` if `start >= end`.
pub fn span_of(start: TimeOfDay, end: TimeOfDay, config: &GridConfig) -> Result<usize> {
    let slot_minutes = slot_minutes(config)?;
    if start >= end {
        return Err(TimetableError::InvalidInterval { start, end });
    }
    Ok((end.minutes() - start.minutes()).div_ceil(slot_minutes) as usize)
}

/// Wall-clock time at which `slot` begins, if that is still within the day.
pub fn slot_start(slot: SlotIndex, config: &GridConfig) -> Option<TimeOfDay> {
    let minutes = slot_start_minutes(slot, config);
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    TimeOfDay::from_minutes(minutes as u32).ok()
}

/// Row header for `slot`, e.g. `"8:45 am"`.
///
/// Labels are unique across the visible slots. Slots starting past midnight
/// wrap around the clock.
pub fn label_of(slot: SlotIndex, config: &GridConfig) -> String {
    let minutes = slot_start_minutes(slot, config) % MINUTES_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt(minutes as u32 * 60, 0)
        .unwrap_or_default()
        .format("%-I:%M %P")
        .to_string()
}

/// Row header for `slot`. Same as [`label_of`]; this is the name the
/// rendering layer uses.
pub fn format_slot_label(slot: SlotIndex, config: &GridConfig) -> String {
    label_of(slot, config)
}

/// Row headers for every visible slot, top to bottom.
pub fn labels(config: &GridConfig) -> Vec<String> {
    (0..config.visible_slots)
        .map(|slot| label_of(slot, config))
        .collect()
}

/// Check that `[start, end)` lies inside the grid's day window.
///
/// # Errors
/// Returns `TimetableError::OutOfRange` naming whichever bound falls outside.
pub fn ensure_within_window(start: TimeOfDay, end: TimeOfDay, config: &GridConfig) -> Result<()> {
    if start < config.day_start {
        return Err(out_of_range(start, config));
    }
    if u64::from(end.minutes()) > config.window_end_minutes() {
        return Err(out_of_range(end, config));
    }
    Ok(())
}

/// The day window as `"HH:MM-HH:MM"`. The end may read `24:00`.
pub fn window_label(config: &GridConfig) -> String {
    let end = config.window_end_minutes();
    format!("{}-{:02}:{:02}", config.day_start, end / 60, end % 60)
}

fn slot_start_minutes(slot: SlotIndex, config: &GridConfig) -> u64 {
    u64::from(config.day_start.minutes())
        .saturating_add((slot as u64).saturating_mul(u64::from(config.slot_minutes)))
}

fn slot_minutes(config: &GridConfig) -> Result<u32> {
    if config.slot_minutes == 0 {
        return Err(TimetableError::InvalidConfig(
            "slotMinutes must be positive".to_string(),
        ));
    }
    Ok(config.slot_minutes)
}

fn out_of_range(time: TimeOfDay, config: &GridConfig) -> TimetableError {
    TimetableError::OutOfRange {
        time,
        window: window_label(config),
    }
}
