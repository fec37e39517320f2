//! Tests for the planner store and the calendar helpers that read from it.

use chrono::{NaiveDate, TimeZone, Utc};
use timetable_engine::calendar::{activities_in_week, activities_on, days_with_activities, WeekRange};
use timetable_engine::store::{ActivityDraft, ActivityKind, ScheduleExport};
use timetable_engine::{
    GridConfig, OccurrencePolicy, Planner, RecurringInterval, SubjectColor, TimeOfDay,
    TimetableError, WeekDay,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn meeting(day: WeekDay, start: &str, end: &str) -> RecurringInterval {
    RecurringInterval::parse(day, start, end).unwrap()
}

fn free(on: NaiveDate, title: &str) -> ActivityDraft {
    ActivityDraft {
        date: on,
        title: title.to_string(),
        description: String::new(),
        kind: ActivityKind::Free,
    }
}

fn linked(on: NaiveDate, title: &str, subject_id: &str) -> ActivityDraft {
    ActivityDraft {
        date: on,
        title: title.to_string(),
        description: "bring notes".to_string(),
        kind: ActivityKind::Subject {
            subject_id: subject_id.to_string(),
        },
    }
}

/// A planner with one schedule holding Math (Mon 10:00-11:30) and
/// Simulation (Tue/Thu 08:00-09:30). Returns the planner and the two ids.
fn planner() -> (Planner, String, String) {
    let mut planner = Planner::new();
    planner.add_schedule("Semester 6").unwrap();
    let math = planner
        .add_subject(
            "Math",
            SubjectColor::Cyan,
            vec![meeting(WeekDay::Monday, "10:00", "11:30")],
        )
        .unwrap();
    let sim = planner
        .add_subject(
            "Systems Simulation",
            SubjectColor::Yellow,
            vec![
                meeting(WeekDay::Tuesday, "08:00", "09:30"),
                meeting(WeekDay::Thursday, "08:00", "09:30"),
            ],
        )
        .unwrap();
    (planner, math, sim)
}

// ── Schedules and subjects ──────────────────────────────────────────────────

#[test]
fn new_schedule_becomes_active() {
    let mut planner = Planner::new();
    assert!(planner.active_schedule().is_none());

    let first = planner.add_schedule("v1").unwrap();
    let second = planner.add_schedule("v2").unwrap();
    assert_ne!(first, second);
    assert_eq!(planner.active_schedule().unwrap().id, second);

    planner.set_active_schedule(&first).unwrap();
    assert_eq!(planner.active_schedule().unwrap().name, "v1");
    assert!(matches!(
        planner.set_active_schedule("nope"),
        Err(TimetableError::UnknownSchedule(_))
    ));
}

#[test]
fn rename_schedule_keeps_subjects() {
    let (mut planner, _, _) = planner();
    let id = planner.active_schedule().unwrap().id.clone();
    planner.rename_schedule(&id, "Semester 6 (final)").unwrap();

    let schedule = planner.schedule(&id).unwrap();
    assert_eq!(schedule.name, "Semester 6 (final)");
    assert_eq!(schedule.subjects.len(), 2);
    assert!(matches!(
        planner.rename_schedule("nope", "x"),
        Err(TimetableError::UnknownSchedule(_))
    ));
}

#[test]
fn schedule_names_are_trimmed_and_must_not_be_blank() {
    let mut planner = Planner::new();
    assert!(matches!(
        planner.add_schedule("   "),
        Err(TimetableError::InvalidSchedule(_))
    ));
    assert!(planner.schedules().is_empty());

    let id = planner.add_schedule("  Semester 7 ").unwrap();
    assert_eq!(planner.schedule(&id).unwrap().name, "Semester 7");

    assert!(matches!(
        planner.rename_schedule(&id, "\t"),
        Err(TimetableError::InvalidSchedule(_))
    ));
    assert_eq!(planner.schedule(&id).unwrap().name, "Semester 7");
}

#[test]
fn subject_without_meetings_is_rejected() {
    let (mut planner, _, _) = planner();
    let err = planner
        .add_subject("Empty", SubjectColor::Blue, vec![])
        .unwrap_err();
    assert!(matches!(err, TimetableError::InvalidSubject(_)));

    let err = planner
        .add_subject("  ", SubjectColor::Blue, vec![meeting(WeekDay::Friday, "08:00", "09:00")])
        .unwrap_err();
    assert!(matches!(err, TimetableError::InvalidSubject(_)));
}

#[test]
fn adding_subject_without_schedule_fails() {
    let mut planner = Planner::new();
    let err = planner
        .add_subject("Math", SubjectColor::Blue, vec![meeting(WeekDay::Monday, "08:00", "09:00")])
        .unwrap_err();
    assert!(matches!(err, TimetableError::UnknownSchedule(_)));
}

#[test]
fn update_and_delete_subject() {
    let (mut planner, math, sim) = planner();

    planner
        .update_subject(
            &math,
            "Calculus",
            SubjectColor::Purple,
            vec![meeting(WeekDay::Friday, "11:00", "12:30")],
        )
        .unwrap();
    let schedule = planner.active_schedule().unwrap();
    let updated = schedule.subject(&math).unwrap();
    assert_eq!(updated.title, "Calculus");
    assert_eq!(updated.intervals[0].day(), WeekDay::Friday);
    // Order within the schedule is preserved.
    assert_eq!(schedule.subjects[0].id, math);

    let removed = planner.delete_subject(&sim).unwrap();
    assert_eq!(removed.title, "Systems Simulation");
    assert!(matches!(
        planner.delete_subject(&sim),
        Err(TimetableError::UnknownSubject(_))
    ));
}

#[test]
fn layout_uses_active_schedule() {
    let (planner, math, _) = planner();
    let layout = planner.layout(&GridConfig::default()).unwrap();
    assert_eq!(layout.blocks.len(), 3);
    assert!(layout.blocks.iter().any(|b| b.subject_id == math && b.start_slot == 2));

    let empty = Planner::new().layout(&GridConfig::default()).unwrap();
    assert!(empty.blocks.is_empty());
}

// ── Activities ──────────────────────────────────────────────────────────────

#[test]
fn linked_activity_is_stamped_with_class_time() {
    let (mut planner, math, _) = planner();
    let activity = planner
        .add_activity(linked(date(2025, 10, 13), "Quiz", &math))
        .unwrap();

    let window = activity.time.expect("linked activity has a time");
    assert_eq!(window.start, "10:00".parse::<TimeOfDay>().unwrap());
    assert_eq!(window.end, "11:30".parse::<TimeOfDay>().unwrap());
    assert_eq!(activity.subject_id.as_deref(), Some(math.as_str()));
}

#[test]
fn linked_activity_on_non_class_day_is_rejected() {
    let (mut planner, math, _) = planner();
    let err = planner
        .add_activity(linked(date(2025, 10, 14), "Quiz", &math))
        .unwrap_err();
    assert!(matches!(err, TimetableError::NoOccurrence { .. }));
    assert!(planner.activities().is_empty());
}

#[test]
fn linked_activity_to_unknown_subject_is_rejected() {
    let (mut planner, _, _) = planner();
    let err = planner
        .add_activity(linked(date(2025, 10, 13), "Quiz", "404"))
        .unwrap_err();
    assert!(matches!(err, TimetableError::UnknownSubject(_)));
}

#[test]
fn activity_time_is_not_refreshed_after_schedule_change() {
    let (mut planner, math, _) = planner();
    planner
        .add_activity(linked(date(2025, 10, 13), "Quiz", &math))
        .unwrap();
    planner
        .update_subject(
            &math,
            "Math",
            SubjectColor::Cyan,
            vec![meeting(WeekDay::Monday, "13:00", "14:30")],
        )
        .unwrap();

    let stamped = planner.activities()[0].time.unwrap();
    assert_eq!(stamped.start.to_string(), "10:00");
}

#[test]
fn planner_policy_applies_to_linked_activities() {
    let mut planner = Planner::new();
    planner.add_schedule("Labs").unwrap();
    let lab = planner
        .add_subject(
            "Lab",
            SubjectColor::Green,
            vec![
                meeting(WeekDay::Wednesday, "14:00", "15:30"),
                meeting(WeekDay::Wednesday, "09:00", "10:30"),
            ],
        )
        .unwrap();

    planner.set_occurrence_policy(OccurrencePolicy::RejectAmbiguous);
    let err = planner
        .add_activity(linked(date(2025, 10, 15), "Report", &lab))
        .unwrap_err();
    assert!(matches!(err, TimetableError::AmbiguousOccurrence { .. }));

    planner.set_occurrence_policy(OccurrencePolicy::FirstListed);
    let activity = planner
        .add_activity(linked(date(2025, 10, 15), "Report", &lab))
        .unwrap();
    assert_eq!(activity.time.unwrap().start.to_string(), "14:00");
}

#[test]
fn free_activity_needs_a_title_and_has_no_time() {
    let (mut planner, _, _) = planner();
    assert!(matches!(
        planner.add_activity(free(date(2025, 10, 13), "")),
        Err(TimetableError::InvalidActivity(_))
    ));
    let activity = planner
        .add_activity(free(date(2025, 10, 18), "Team meeting"))
        .unwrap();
    assert!(activity.time.is_none());
    assert!(activity.subject_id.is_none());
}

#[test]
fn delete_activity_by_id() {
    let (mut planner, _, _) = planner();
    let id = planner
        .add_activity(free(date(2025, 10, 13), "Exam"))
        .unwrap()
        .id
        .clone();
    assert_eq!(planner.delete_activity(&id).unwrap().title, "Exam");
    assert!(matches!(
        planner.delete_activity(&id),
        Err(TimetableError::UnknownActivity(_))
    ));
}

#[test]
fn ids_are_unique_across_kinds() {
    let (mut planner, math, sim) = planner();
    let activity = planner
        .add_activity(free(date(2025, 10, 13), "Exam"))
        .unwrap()
        .id
        .clone();
    let schedule = planner.active_schedule().unwrap().id.clone();
    let mut ids = vec![schedule, math, sim, activity];
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

// ── Calendar views ──────────────────────────────────────────────────────────

#[test]
fn markers_and_day_lists_come_from_activities() {
    let (mut planner, math, sim) = planner();
    planner.add_activity(free(date(2025, 10, 13), "Exam")).unwrap();
    planner.add_activity(linked(date(2025, 10, 13), "Quiz", &math)).unwrap();
    planner.add_activity(linked(date(2025, 10, 16), "Lab report", &sim)).unwrap();
    planner.add_activity(free(date(2025, 11, 3), "Holiday trip")).unwrap();

    let marked = days_with_activities(planner.activities(), date(2025, 10, 1), date(2025, 10, 31));
    assert_eq!(
        marked.into_iter().collect::<Vec<_>>(),
        vec![date(2025, 10, 13), date(2025, 10, 16)]
    );
    // Math meets every Monday, but only dated activities mark a day.
    assert!(!days_with_activities(planner.activities(), date(2025, 10, 20), date(2025, 10, 20))
        .contains(&date(2025, 10, 20)));

    let monday = activities_on(planner.activities(), date(2025, 10, 13));
    assert_eq!(monday.len(), 2);

    let week = WeekRange::containing(date(2025, 10, 15));
    let titles: Vec<&str> = activities_in_week(planner.activities(), week)
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Exam", "Quiz", "Lab report"]);
    assert!(activities_in_week(planner.activities(), week.next()).is_empty());
}

// ── Snapshots, import and export ────────────────────────────────────────────

#[test]
fn snapshot_roundtrips_through_json() {
    let (mut planner, math, _) = planner();
    planner.add_activity(linked(date(2025, 10, 13), "Quiz", &math)).unwrap();

    let json = planner.to_json_pretty().unwrap();
    let restored = Planner::from_json(&json).unwrap();
    assert_eq!(restored, planner);
}

#[test]
fn snapshot_with_invalid_interval_is_rejected() {
    let json = r#"{
        "schedules": [{
            "id": "1", "name": "Broken",
            "subjects": [{
                "id": "1", "title": "Backwards", "color": "blue",
                "intervals": [{"day": "monday", "startTime": "10:00", "endTime": "09:00"}]
            }]
        }]
    }"#;
    assert!(Planner::from_json(json).is_err());
}

#[test]
fn snapshot_accepts_legacy_field_names() {
    let json = r#"{
        "schedules": [{
            "id": "1", "name": "6th semester",
            "subjects": [{
                "id": "1", "title": "Software Development II", "color": "bg-pink-500",
                "schedules": [
                    {"day": "Lunes", "startTime": "08:00", "endTime": "09:30"},
                    {"day": "Miércoles", "startTime": "08:00", "endTime": "09:30"}
                ]
            }]
        }]
    }"#;
    let planner = Planner::from_json(json).unwrap();
    let subject = &planner.schedules()[0].subjects[0];
    assert_eq!(subject.color, SubjectColor::Pink);
    let days: Vec<WeekDay> = subject.intervals.iter().map(|i| i.day()).collect();
    assert_eq!(days, vec![WeekDay::Monday, WeekDay::Wednesday]);
}

#[test]
fn import_accepts_exports_from_older_planner_versions() {
    let json = r#"{
      "name": "6th semester v1",
      "subjects": [
        {
          "id": "1728400000000",
          "title": "Systems Simulation",
          "schedules": [
            { "day": "Martes", "startTime": "08:00", "endTime": "09:30" },
            { "day": "Jueves", "startTime": "08:00", "endTime": "09:30" }
          ],
          "color": "bg-yellow-400"
        },
        {
          "id": "1728400000001",
          "title": "Computer Architecture",
          "schedules": [
            { "day": "Sabado", "startTime": "14:00", "endTime": "16:00" }
          ],
          "color": "bg-green-600"
        }
      ],
      "exportDate": "2025-10-13T15:04:05.123Z"
    }"#;
    let export: ScheduleExport = serde_json::from_str(json).unwrap();
    assert_eq!(export.export_date.timestamp_subsec_millis(), 123);

    let mut planner = Planner::new();
    let id = planner.import_schedule(export).unwrap();
    let schedule = planner.schedule(&id).unwrap();
    assert_eq!(schedule.name, "6th semester v1");
    assert_eq!(schedule.subjects[0].color, SubjectColor::Yellow);
    assert_eq!(schedule.subjects[0].intervals[1].day(), WeekDay::Thursday);
    assert_eq!(schedule.subjects[1].intervals[0].day(), WeekDay::Saturday);
    assert_eq!(
        schedule.subjects[1].intervals[0].start(),
        TimeOfDay::from_hm(14, 0).unwrap()
    );
}

#[test]
fn export_then_import_creates_a_copy() {
    let (mut planner, _, _) = planner();
    let original = planner.active_schedule().unwrap().clone();
    let at = Utc.with_ymd_and_hms(2025, 10, 13, 12, 0, 0).unwrap();

    let export = planner.export_schedule(&original.id, at).unwrap();
    assert_eq!(export.name, "Semester 6");
    assert_eq!(export.export_date, at);

    let json = serde_json::to_string(&export).unwrap();
    assert!(json.contains("\"exportDate\""));
    let parsed: ScheduleExport = serde_json::from_str(&json).unwrap();

    let copy_id = planner.import_schedule(parsed).unwrap();
    assert_ne!(copy_id, original.id);
    let copy = planner.schedule(&copy_id).unwrap();
    assert_eq!(copy.subjects.len(), original.subjects.len());
    for (a, b) in copy.subjects.iter().zip(&original.subjects) {
        assert_ne!(a.id, b.id);
        assert_eq!(a.intervals, b.intervals);
    }
    assert_eq!(planner.active_schedule().unwrap().id, copy_id);
}
