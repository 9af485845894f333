use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Everything extracted from one timetable page: the weekly lesson grid
/// plus the one-off exam sittings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub lessons: Vec<Lesson>,
    pub exams: Vec<Exam>,
}

/// A recurring weekly class, before expansion into dated events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Course code, e.g. `CS2040`.
    pub name: String,
    /// Session type, e.g. `LEC` or `TUT`. May be empty.
    pub kind: String,
    pub room: String,
    /// Raw cell content with line breaks preserved.
    pub note: String,
    /// Minutes since local midnight.
    pub start_mins: u32,
    pub end_mins: u32,
    /// 1-based weekday column, Monday = 1.
    pub day: u32,
    /// Semester weeks this lesson runs in, in source order.
    pub weeks: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub name: String,
    /// Unknown from the source, always empty for now.
    pub room: String,
    pub note: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A single dated occurrence, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}
