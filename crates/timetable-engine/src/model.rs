//! Data model: weekdays, wall-clock times, recurring intervals, subjects,
//! schedules and activities.
//!
//! All times are naive local wall-clock times with minute resolution. Nothing
//! in this module knows about the grid; see [`crate::slots`] for that.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

const MINUTES_PER_DAY: u32 = 24 * 60;

// ---------------------------------------------------------------------------
// WeekDay
// ---------------------------------------------------------------------------

/// A day of the week, ordered by occurrence with Monday first.
///
/// Serialized as a lowercase English name; deserialization accepts anything
/// [`FromStr`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    /// All seven days, Monday first.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    /// Monday through Friday.
    pub const WORKWEEK: [WeekDay; 5] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
    ];

    /// Zero-based position in the week (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<WeekDay> {
        Self::ALL.get(index).copied()
    }

    /// Three-letter English abbreviation, used for grid column headers.
    pub fn short_name(self) -> &'static str {
        match self {
            WeekDay::Monday => "Mon",
            WeekDay::Tuesday => "Tue",
            WeekDay::Wednesday => "Wed",
            WeekDay::Thursday => "Thu",
            WeekDay::Friday => "Fri",
            WeekDay::Saturday => "Sat",
            WeekDay::Sunday => "Sun",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeekDay::Monday => "Monday",
            WeekDay::Tuesday => "Tuesday",
            WeekDay::Wednesday => "Wednesday",
            WeekDay::Thursday => "Thursday",
            WeekDay::Friday => "Friday",
            WeekDay::Saturday => "Saturday",
            WeekDay::Sunday => "Sunday",
        }
    }

    /// Lowercase, unaccented Spanish name.
    fn spanish_name(self) -> &'static str {
        match self {
            WeekDay::Monday => "lunes",
            WeekDay::Tuesday => "martes",
            WeekDay::Wednesday => "miercoles",
            WeekDay::Thursday => "jueves",
            WeekDay::Friday => "viernes",
            WeekDay::Saturday => "sabado",
            WeekDay::Sunday => "domingo",
        }
    }

    /// The weekday a calendar date falls on.
    pub fn of_date(date: NaiveDate) -> WeekDay {
        use chrono::Datelike;
        WeekDay::from(date.weekday())
    }
}

impl From<Weekday> for WeekDay {
    fn from(day: Weekday) -> Self {
        // chrono numbers Monday as 0 as well.
        WeekDay::ALL[day.num_days_from_monday() as usize]
    }
}

impl From<WeekDay> for Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Monday => Weekday::Mon,
            WeekDay::Tuesday => Weekday::Tue,
            WeekDay::Wednesday => Weekday::Wed,
            WeekDay::Thursday => Weekday::Thu,
            WeekDay::Friday => Weekday::Fri,
            WeekDay::Saturday => Weekday::Sat,
            WeekDay::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeekDay {
    type Err = TimetableError;

    /// Accepts full English names, three-letter abbreviations and the Spanish
    /// names older planner exports use (`"Miércoles"` or `"Miercoles"`), in
    /// any case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                _ => c,
            })
            .collect();
        WeekDay::ALL
            .into_iter()
            .find(|day| {
                day.name().eq_ignore_ascii_case(&wanted)
                    || day.short_name().eq_ignore_ascii_case(&wanted)
                    || day.spanish_name() == wanted
            })
            .ok_or_else(|| TimetableError::InvalidWeekDay(s.to_string()))
    }
}

impl TryFrom<String> for WeekDay {
    type Error = TimetableError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// TimeOfDay
// ---------------------------------------------------------------------------

/// A wall-clock time in `[00:00, 24:00)` with minute resolution.
///
/// Serialized as an `"HH:MM"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };

    /// Constant constructor for literal times inside the crate; panics if
    /// `hour >= 24` or `minute >= 60`. Callers outside use
    /// [`TimeOfDay::from_hm`].
    pub(crate) const fn at(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60, "invalid time of day");
        TimeOfDay {
            minutes: hour * 60 + minute,
        }
    }

    /// Build a time from hour and minute.
    ///
    /// # Errors
    /// Returns `TimetableError::InvalidTime` if `hour >= 24` or `minute >= 60`.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        if hour >= 24 || minute >= 60 {
            return Err(TimetableError::InvalidTime(format!(
                "{:02}:{:02}",
                hour, minute
            )));
        }
        Self::from_minutes(hour * 60 + minute)
    }

    /// Build a time from minutes since midnight.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes >= MINUTES_PER_DAY {
            return Err(TimetableError::InvalidTime(format!(
                "{} minutes past midnight",
                minutes
            )));
        }
        Ok(TimeOfDay {
            minutes: minutes as u16,
        })
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.minutes)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or_default()
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Seconds are truncated.
    fn from(time: NaiveTime) -> Self {
        TimeOfDay {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(TimeOfDay::from)
            .map_err(|_| TimetableError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimetableError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

// ---------------------------------------------------------------------------
// Intervals
// ---------------------------------------------------------------------------

/// One weekly meeting of a subject. Always satisfies `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct RecurringInterval {
    day: WeekDay,
    #[serde(rename = "startTime")]
    start: TimeOfDay,
    #[serde(rename = "endTime")]
    end: TimeOfDay,
}

/// Unvalidated wire form of [`RecurringInterval`].
#[derive(Deserialize)]
struct RawInterval {
    day: WeekDay,
    #[serde(rename = "startTime")]
    start: TimeOfDay,
    #[serde(rename = "endTime")]
    end: TimeOfDay,
}

impl TryFrom<RawInterval> for RecurringInterval {
    type Error = TimetableError;

    fn try_from(raw: RawInterval) -> Result<Self> {
        RecurringInterval::new(raw.day, raw.start, raw.end)
    }
}

impl RecurringInterval {
    /// # Errors
    /// Returns `TimetableError::InvalidInterval` if `start >= end`.
    pub fn new(day: WeekDay, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if start >= end {
            return Err(TimetableError::InvalidInterval { start, end });
        }
        Ok(RecurringInterval { day, start, end })
    }

    /// Convenience constructor from `"HH:MM"` strings.
    pub fn parse(day: WeekDay, start: &str, end: &str) -> Result<Self> {
        Self::new(day, start.parse()?, end.parse()?)
    }

    pub fn day(&self) -> WeekDay {
        self.day
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes() - self.start.minutes()
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// Two intervals overlap iff they share a day and
    /// `a.start < b.end && b.start < a.end`. Back-to-back meetings don't.
    pub fn overlaps(&self, other: &RecurringInterval) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

/// A concrete start/end pair on some day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeWindow {
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Subjects and schedules
// ---------------------------------------------------------------------------

/// The closed palette a subject can be drawn with.
///
/// Input also accepts the utility class names the palette was originally
/// expressed as (e.g. `"bg-blue-600"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectColor {
    #[serde(alias = "bg-blue-600")]
    Blue,
    #[default]
    #[serde(alias = "bg-green-600")]
    Green,
    #[serde(alias = "bg-pink-500")]
    Pink,
    #[serde(alias = "bg-yellow-600")]
    Amber,
    #[serde(alias = "bg-purple-600", alias = "bg-purple-500")]
    Purple,
    #[serde(alias = "bg-orange-600")]
    Orange,
    #[serde(alias = "bg-yellow-400")]
    Yellow,
    #[serde(alias = "bg-cyan-500")]
    Cyan,
}

impl SubjectColor {
    pub const ALL: [SubjectColor; 8] = [
        SubjectColor::Blue,
        SubjectColor::Green,
        SubjectColor::Pink,
        SubjectColor::Amber,
        SubjectColor::Purple,
        SubjectColor::Orange,
        SubjectColor::Yellow,
        SubjectColor::Cyan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SubjectColor::Blue => "blue",
            SubjectColor::Green => "green",
            SubjectColor::Pink => "pink",
            SubjectColor::Amber => "amber",
            SubjectColor::Purple => "purple",
            SubjectColor::Orange => "orange",
            SubjectColor::Yellow => "yellow",
            SubjectColor::Cyan => "cyan",
        }
    }
}

impl fmt::Display for SubjectColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A class that meets on one or more recurring weekly intervals.
///
/// Intervals of the same subject are expected not to overlap each other; this
/// is not enforced, see [`Subject::find_overlaps`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: SubjectColor,
    #[serde(alias = "schedules")]
    pub intervals: Vec<RecurringInterval>,
}

impl Subject {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        color: SubjectColor,
        intervals: Vec<RecurringInterval>,
    ) -> Self {
        Subject {
            id: id.into(),
            title: title.into(),
            color,
            intervals,
        }
    }

    /// Intervals falling on `day`, in the subject's own order.
    pub fn intervals_on(&self, day: WeekDay) -> impl Iterator<Item = &RecurringInterval> {
        self.intervals.iter().filter(move |i| i.day() == day)
    }

    /// Index pairs of this subject's intervals that overlap each other.
    pub fn find_overlaps(&self) -> Vec<(usize, usize)> {
        let mut overlaps = Vec::new();
        for (i, a) in self.intervals.iter().enumerate() {
            for (j, b) in self.intervals.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    overlaps.push((i, j));
                }
            }
        }
        overlaps
    }

    /// A subject needs a non-blank title and at least one meeting.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(TimetableError::InvalidSubject(format!(
                "subject {} has an empty title",
                self.id
            )));
        }
        if self.intervals.is_empty() {
            return Err(TimetableError::InvalidSubject(format!(
                "subject {} has no meetings",
                self.id
            )));
        }
        Ok(())
    }
}

/// A named collection of subjects, e.g. one semester's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Schedule {
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }
}

/// A dated to-do, either free-standing or linked to a subject.
///
/// `time` is stamped once, when a subject-linked activity is created, and is
/// not refreshed if the subject's schedule changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeWindow>,
}
