//! Error types for timetable-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{TimeOfDay, WeekDay};

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: TimeOfDay, end: TimeOfDay },

    /// `window` is rendered as `"HH:MM-HH:MM"`; its end may be `24:00`.
    #[error("Time {time} is outside the grid window {window}")]
    OutOfRange { time: TimeOfDay, window: String },

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekDay(String),

    #[error("Invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    #[error("Invalid activity: {0}")]
    InvalidActivity(String),

    /// More than one interval of a subject falls on the same weekday and the
    /// caller asked for ambiguity to be rejected.
    #[error("Subject {subject_id} has {count} intervals on {day}")]
    AmbiguousOccurrence {
        subject_id: String,
        day: WeekDay,
        count: usize,
    },

    #[error("Subject {subject_id} does not meet on {date}")]
    NoOccurrence { subject_id: String, date: NaiveDate },

    #[error("Unknown schedule: {0}")]
    UnknownSchedule(String),

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
