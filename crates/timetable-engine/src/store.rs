//! Owned application state: schedules, the active schedule, and activities.
//!
//! The engine functions are stateless; `Planner` is what collaborators mutate
//! and then hand to the engine as a snapshot (e.g. [`Planner::layout`]).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::correlator::{self, OccurrencePolicy};
use crate::error::{Result, TimetableError};
use crate::layout::{self, Layout};
use crate::model::{Activity, RecurringInterval, Schedule, Subject, SubjectColor};

/// What a new activity is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    /// Stands on its own; carries no time.
    Free,
    /// Tied to a subject of the active schedule; stamped with the time the
    /// subject meets on the activity's date.
    Subject { subject_id: String },
}

/// Input for [`Planner::add_activity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub kind: ActivityKind,
}

/// Portable copy of one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleExport {
    pub name: String,
    pub subjects: Vec<Subject>,
    pub export_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planner {
    #[serde(default)]
    schedules: Vec<Schedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_schedule_id: Option<String>,
    #[serde(default)]
    activities: Vec<Activity>,
    #[serde(default)]
    occurrence_policy: OccurrencePolicy,
    #[serde(default)]
    next_id: u64,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a planner snapshot. Every subject is validated.
    pub fn from_json(json: &str) -> Result<Self> {
        let planner: Planner = serde_json::from_str(json)?;
        for schedule in &planner.schedules {
            for subject in &schedule.subjects {
                subject.validate()?;
            }
        }
        if let Some(id) = &planner.active_schedule_id {
            planner.schedule(id)?;
        }
        Ok(planner)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn occurrence_policy(&self) -> OccurrencePolicy {
        self.occurrence_policy
    }

    pub fn set_occurrence_policy(&mut self, policy: OccurrencePolicy) {
        self.occurrence_policy = policy;
    }

    pub fn schedule(&self, id: &str) -> Result<&Schedule> {
        self.schedules
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| TimetableError::UnknownSchedule(id.to_string()))
    }

    /// The selected schedule, falling back to the first one.
    pub fn active_schedule(&self) -> Option<&Schedule> {
        match &self.active_schedule_id {
            Some(id) => self.schedules.iter().find(|s| &s.id == id),
            None => self.schedules.first(),
        }
    }

    pub fn set_active_schedule(&mut self, id: &str) -> Result<()> {
        self.schedule(id)?;
        self.active_schedule_id = Some(id.to_string());
        Ok(())
    }

    /// Create an empty schedule and make it active. Returns its id.
    ///
    /// # Errors
    /// `InvalidSchedule` if the name is blank. Surrounding whitespace is
    /// trimmed.
    pub fn add_schedule(&mut self, name: impl Into<String>) -> Result<String> {
        let name = schedule_name(name.into())?;
        let id = self.fresh_id();
        tracing::debug!(%id, %name, "adding schedule");
        self.schedules.push(Schedule {
            id: id.clone(),
            name,
            subjects: Vec::new(),
        });
        self.active_schedule_id = Some(id.clone());
        Ok(id)
    }

    /// # Errors
    /// `InvalidSchedule` if the name is blank; `UnknownSchedule` if `id` is
    /// not in the planner.
    pub fn rename_schedule(&mut self, id: &str, name: impl Into<String>) -> Result<()> {
        let name = schedule_name(name.into())?;
        let schedule = self
            .schedules
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| TimetableError::UnknownSchedule(id.to_string()))?;
        schedule.name = name;
        tracing::debug!(%id, name = %schedule.name, "renamed schedule");
        Ok(())
    }

    /// Append a subject to the active schedule. Returns its id.
    ///
    /// # Errors
    /// `InvalidSubject` for a blank title or no meetings; `UnknownSchedule`
    /// when there is no schedule to add to.
    pub fn add_subject(
        &mut self,
        title: impl Into<String>,
        color: SubjectColor,
        intervals: Vec<RecurringInterval>,
    ) -> Result<String> {
        let id = self.fresh_id();
        let subject = Subject::new(id.clone(), title, color, intervals);
        subject.validate()?;
        warn_on_self_overlap(&subject);
        tracing::debug!(%id, title = %subject.title, "adding subject");
        self.active_schedule_mut()?.subjects.push(subject);
        Ok(id)
    }

    /// Replace title, color and meetings of a subject in the active schedule.
    pub fn update_subject(
        &mut self,
        id: &str,
        title: impl Into<String>,
        color: SubjectColor,
        intervals: Vec<RecurringInterval>,
    ) -> Result<()> {
        let updated = Subject::new(id, title, color, intervals);
        updated.validate()?;
        warn_on_self_overlap(&updated);
        let schedule = self.active_schedule_mut()?;
        let subject = schedule
            .subjects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| TimetableError::UnknownSubject(id.to_string()))?;
        tracing::debug!(%id, "updating subject");
        *subject = updated;
        Ok(())
    }

    /// Remove a subject from the active schedule.
    ///
    /// Activities linked to it are kept, with their stamped times.
    pub fn delete_subject(&mut self, id: &str) -> Result<Subject> {
        let schedule = self.active_schedule_mut()?;
        let index = schedule
            .subjects
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| TimetableError::UnknownSubject(id.to_string()))?;
        tracing::debug!(%id, "deleting subject");
        Ok(schedule.subjects.remove(index))
    }

    /// Record a new activity. Subject-linked activities are stamped with the
    /// subject's meeting time on that date, resolved with the planner's
    /// occurrence policy.
    ///
    /// # Errors
    /// `InvalidActivity` for a blank title; `UnknownSubject` if the subject
    /// isn't in the active schedule; `NoOccurrence` if it doesn't meet that
    /// day; `AmbiguousOccurrence` under the rejecting policy.
    pub fn add_activity(&mut self, draft: ActivityDraft) -> Result<&Activity> {
        if draft.title.trim().is_empty() {
            return Err(TimetableError::InvalidActivity(
                "title must not be empty".to_string(),
            ));
        }

        let (subject_id, time) = match draft.kind {
            ActivityKind::Free => (None, None),
            ActivityKind::Subject { subject_id } => {
                let subject = self
                    .active_schedule()
                    .and_then(|s| s.subject(&subject_id))
                    .ok_or_else(|| TimetableError::UnknownSubject(subject_id.clone()))?;
                let window = correlator::occurs_on(subject, draft.date, self.occurrence_policy)?
                    .ok_or_else(|| TimetableError::NoOccurrence {
                        subject_id: subject_id.clone(),
                        date: draft.date,
                    })?;
                (Some(subject_id), Some(window))
            }
        };

        let id = self.fresh_id();
        tracing::debug!(%id, date = %draft.date, "adding activity");
        self.activities.push(Activity {
            id,
            date: draft.date,
            title: draft.title,
            description: draft.description,
            subject_id,
            time,
        });
        Ok(&self.activities[self.activities.len() - 1])
    }

    pub fn delete_activity(&mut self, id: &str) -> Result<Activity> {
        let index = self
            .activities
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| TimetableError::UnknownActivity(id.to_string()))?;
        tracing::debug!(%id, "deleting activity");
        Ok(self.activities.remove(index))
    }

    /// Lay out the active schedule's subjects. An empty planner lays out an
    /// empty grid.
    pub fn layout(&self, config: &GridConfig) -> Result<Layout> {
        let subjects = self
            .active_schedule()
            .map(|s| s.subjects.as_slice())
            .unwrap_or_default();
        layout::layout_subjects(subjects, config)
    }

    pub fn export_schedule(&self, id: &str, exported_at: DateTime<Utc>) -> Result<ScheduleExport> {
        let schedule = self.schedule(id)?;
        Ok(ScheduleExport {
            name: schedule.name.clone(),
            subjects: schedule.subjects.clone(),
            export_date: exported_at,
        })
    }

    /// Add an exported schedule as a new, active schedule. Subjects get fresh
    /// ids so they can't clash with existing ones. Returns the schedule id.
    pub fn import_schedule(&mut self, export: ScheduleExport) -> Result<String> {
        for subject in &export.subjects {
            subject.validate()?;
        }
        let schedule_id = self.add_schedule(export.name)?;
        let subjects: Vec<Subject> = export
            .subjects
            .into_iter()
            .map(|mut subject| {
                subject.id = self.fresh_id();
                subject
            })
            .collect();
        self.active_schedule_mut()?.subjects = subjects;
        Ok(schedule_id)
    }

    fn active_schedule_mut(&mut self) -> Result<&mut Schedule> {
        let index = match &self.active_schedule_id {
            Some(id) => self.schedules.iter().position(|s| &s.id == id),
            None if self.schedules.is_empty() => None,
            None => Some(0),
        };
        let missing = self.active_schedule_id.clone().unwrap_or_default();
        index
            .and_then(|i| self.schedules.get_mut(i))
            .ok_or(TimetableError::UnknownSchedule(missing))
    }

    /// Next numeric id not already used by a schedule, subject or activity.
    fn fresh_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = self.next_id.to_string();
            if !self.id_in_use(&id) {
                return id;
            }
        }
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.schedules.iter().any(|s| {
            s.id == id || s.subjects.iter().any(|subject| subject.id == id)
        }) || self.activities.iter().any(|a| a.id == id)
    }
}

fn schedule_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TimetableError::InvalidSchedule(
            "schedule name is empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn warn_on_self_overlap(subject: &Subject) {
    for (a, b) in subject.find_overlaps() {
        tracing::warn!(
            subject = %subject.id,
            first = a,
            second = b,
            "subject has overlapping meetings"
        );
    }
}
