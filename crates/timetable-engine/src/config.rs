//! Grid configuration.
//!
//! The defaults describe the reference deployment: twelve 45-minute rows from
//! 08:00 to 17:00, Monday through Friday.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::model::{TimeOfDay, WeekDay};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Shape of the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Wall-clock time at which slot 0 begins.
    pub day_start: TimeOfDay,
    /// Length of one slot in minutes.
    pub slot_minutes: u32,
    /// Day columns shown by the grid, in display order.
    pub visible_days: Vec<WeekDay>,
    /// Number of rows in the grid.
    pub visible_slots: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            day_start: TimeOfDay::at(8, 0),
            slot_minutes: 45,
            visible_days: WeekDay::WORKWEEK.to_vec(),
            visible_slots: 12,
        }
    }
}

impl GridConfig {
    /// Parse a JSON config document. Missing fields take their defaults, and
    /// the result is validated.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the grid is non-empty and fits inside one day.
    ///
    /// # Errors
    /// Returns `TimetableError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.slot_minutes == 0 {
            return Err(TimetableError::InvalidConfig(
                "slotMinutes must be positive".to_string(),
            ));
        }
        if self.visible_slots == 0 {
            return Err(TimetableError::InvalidConfig(
                "visibleSlots must be positive".to_string(),
            ));
        }
        if self.window_end_minutes() > u64::from(MINUTES_PER_DAY) {
            return Err(TimetableError::InvalidConfig(format!(
                "{} slots of {} minutes from {} run past midnight",
                self.visible_slots, self.slot_minutes, self.day_start
            )));
        }
        if self.visible_days.is_empty() {
            return Err(TimetableError::InvalidConfig(
                "visibleDays must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(day) = self.visible_days.iter().find(|d| !seen.insert(**d)) {
            return Err(TimetableError::InvalidConfig(format!(
                "{} is listed twice in visibleDays",
                day
            )));
        }
        Ok(())
    }

    /// Minutes since midnight at which the last slot ends. May equal 1440.
    pub(crate) fn window_end_minutes(&self) -> u64 {
        u64::from(self.day_start.minutes()) + self.visible_slots as u64 * u64::from(self.slot_minutes)
    }

    /// Whether `day` has a column in the grid.
    pub fn shows(&self, day: WeekDay) -> bool {
        self.visible_days.contains(&day)
    }

    /// Column position of `day`, if visible.
    pub fn column_of(&self, day: WeekDay) -> Option<usize> {
        self.visible_days.iter().position(|d| *d == day)
    }
}
