//! Turns an NTU-published HTML timetable and exam schedule into an
//! RFC 5545 calendar.

mod expand;
mod ics;
mod parser;
mod structs;

pub use expand::{assert_monday, expand, Config, ScheduleError};
pub use ics::{format_utc, to_ics};
pub use parser::parse_timetable;
pub use structs::{CalendarEvent, Exam, Lesson, Timetable};
