//! # timetable-engine
//!
//! Weekly timetable layout engine for a personal class/activity planner.
//!
//! Converts recurring weekly class meetings into a discrete, non-overlapping
//! grid of 45-minute slots (by default), and correlates recurring schedules
//! with concrete calendar dates so that activities can be stamped with the
//! time a class actually meets.
//!
//! ## Quick start
//!
//! ```rust
//! use timetable_engine::{project_subjects_to_grid, GridConfig, RecurringInterval, Subject, SubjectColor, WeekDay};
//!
//! let math = Subject::new(
//!     "1",
//!     "Math",
//!     SubjectColor::Cyan,
//!     vec![RecurringInterval::parse(WeekDay::Tuesday, "08:00", "09:30").unwrap()],
//! );
//!
//! let blocks = project_subjects_to_grid(&[math], &GridConfig::default()).unwrap();
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].start_slot, 0);
//! assert_eq!(blocks[0].span_slots, 2);
//! ```
//!
//! ## Modules
//!
//! - [`slots`] — time-of-day ↔ slot index mapping and row labels
//! - [`projector`] — recurring intervals → slot-space coordinates
//! - [`layout`] — slot-space intervals → renderable, non-overlapping blocks
//! - [`correlator`] — does a subject meet on a given date, and when
//! - [`calendar`] — week navigation and "has activity" day markers
//! - [`store`] — owned application state (schedules, subjects, activities)
//! - [`render`] — plain-text rendering of a resolved layout
//! - [`config`] — grid configuration
//! - [`model`] — data model types
//! - [`error`] — Error types

pub mod calendar;
pub mod config;
pub mod correlator;
pub mod error;
pub mod layout;
pub mod model;
pub mod projector;
pub mod render;
pub mod slots;
pub mod store;

pub use config::GridConfig;
pub use correlator::{occurs_on, resolve_occurrence, OccurrencePolicy};
pub use error::TimetableError;
pub use layout::{layout_subjects, project_subjects_to_grid, resolve, Block, Layout};
pub use model::{
    Activity, RecurringInterval, Schedule, Subject, SubjectColor, TimeOfDay, TimeWindow, WeekDay,
};
pub use projector::{project, project_all, ProjectedInterval};
pub use slots::{format_slot_label, SlotIndex};
pub use store::Planner;
