use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use thiserror::Error;

use crate::structs::{CalendarEvent, Exam, Lesson, Timetable};

/// Host part of every generated UID.
const UID_DOMAIN: &str = "ntu-timetable";

/// Semester layout and output offset, fixed for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// First Monday of the teaching semester.
    pub semester_start: NaiveDate,
    /// Monday of the one-week recess; weeks landing on or after it are
    /// pushed back by one calendar week.
    pub recess_week: NaiveDate,
    /// Offset of the timetable's wall clock from UTC, in hours.
    pub utc_offset_hours: i64,
}

impl Config {
    pub fn new(semester_start: NaiveDate, recess_week: NaiveDate) -> Self {
        Self {
            semester_start,
            recess_week,
            // NTU runs on Singapore time.
            utc_offset_hours: 8,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("semester start {0} is not a Monday")]
    SemesterStartNotMonday(NaiveDate),
}

/// Fails when the configured semester start is not a Monday. Weekday
/// arithmetic during expansion assumes Mondays throughout, so this runs
/// before any event is built.
pub fn assert_monday(date: NaiveDate) -> Result<(), ScheduleError> {
    if date.weekday() == Weekday::Mon {
        Ok(())
    } else {
        Err(ScheduleError::SemesterStartNotMonday(date))
    }
}

/// Expands the timetable into concrete calendar events: one event per
/// (lesson, active week) pair, then one per exam. UIDs come from a single
/// counter threaded through both loops, so the sequence is deterministic
/// for a given input order.
pub fn expand(timetable: &Timetable, config: &Config) -> Result<Vec<CalendarEvent>, ScheduleError> {
    assert_monday(config.semester_start)?;

    let mut events = Vec::new();
    let mut uid = 0usize;

    for lesson in &timetable.lessons {
        expand_lesson(lesson, config, &mut uid, &mut events);
    }

    for exam in &timetable.exams {
        events.push(exam_event(exam, &mut uid));
    }

    Ok(events)
}

fn expand_lesson(lesson: &Lesson, config: &Config, uid: &mut usize, out: &mut Vec<CalendarEvent>) {
    for &week in &lesson.weeks {
        let mut monday = config.semester_start + Duration::weeks(i64::from(week) - 1);

        if past_recess(monday, config.recess_week) {
            monday += Duration::weeks(1);
        }

        let day = monday + Duration::days(i64::from(lesson.day) - 1);
        let midnight = day.and_time(NaiveTime::MIN);

        out.push(CalendarEvent {
            uid: format!("uid{uid}@{UID_DOMAIN}"),
            summary: format!("{} ({})", lesson.name, lesson.kind),
            description: lesson.note.clone(),
            location: lesson.room.clone(),
            start: midnight + Duration::minutes(i64::from(lesson.start_mins)),
            end: midnight + Duration::minutes(i64::from(lesson.end_mins)),
        });

        *uid += 1;
    }
}

/// The recess check compares month and day-of-month only, each week
/// independently; weeks past the recess are each shifted by exactly one
/// week, never cumulatively.
fn past_recess(monday: NaiveDate, recess: NaiveDate) -> bool {
    (monday.month() == recess.month() && monday.day() >= recess.day())
        || monday.month() > recess.month()
}

fn exam_event(exam: &Exam, uid: &mut usize) -> CalendarEvent {
    let event = CalendarEvent {
        uid: format!("uidEXAM{uid}@{UID_DOMAIN}"),
        summary: format!("{} (Exam)", exam.name),
        description: exam.note.clone(),
        location: exam.room.clone(),
        start: exam.start,
        end: exam.end,
    };

    *uid += 1;
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(date(2022, 8, 8), date(2022, 9, 26))
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn lesson(weeks: Vec<u32>) -> Lesson {
        Lesson {
            name: "CS101".into(),
            kind: "LEC".into(),
            room: "LT1".into(),
            note: "CS101 LEC LT1\n0900to1000\n".into(),
            start_mins: 9 * 60,
            end_mins: 10 * 60,
            day: 1,
            weeks,
        }
    }

    fn timetable(weeks: Vec<u32>) -> Timetable {
        Timetable {
            lessons: vec![lesson(weeks)],
            exams: Vec::new(),
        }
    }

    #[test]
    fn monday_check() {
        assert!(assert_monday(date(2022, 8, 8)).is_ok());
        assert_eq!(
            assert_monday(date(2022, 8, 9)),
            Err(ScheduleError::SemesterStartNotMonday(date(2022, 8, 9)))
        );
    }

    #[test]
    fn non_monday_start_aborts_expansion() {
        let config = Config::new(date(2022, 8, 9), date(2022, 9, 26));
        assert!(expand(&timetable(vec![1]), &config).is_err());
    }

    #[test]
    fn week_before_recess_is_not_shifted() {
        // Week 7's Monday is 2022-09-19, one week short of the recess.
        let events = expand(&timetable(vec![7]), &config()).unwrap();
        assert_eq!(events[0].start, date(2022, 9, 19).and_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn week_on_recess_marker_is_shifted() {
        // Week 8's Monday lands exactly on the recess marker.
        let events = expand(&timetable(vec![8]), &config()).unwrap();
        assert_eq!(events[0].start, date(2022, 10, 3).and_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn weeks_past_recess_shift_independently() {
        let events = expand(&timetable(vec![8, 9]), &config()).unwrap();
        assert_eq!(events[0].start.date(), date(2022, 10, 3));
        assert_eq!(events[1].start.date(), date(2022, 10, 10));
    }

    #[test]
    fn day_column_offsets_from_monday() {
        let mut timetable = timetable(vec![1]);
        timetable.lessons[0].day = 3;

        let events = expand(&timetable, &config()).unwrap();
        assert_eq!(events[0].start.date(), date(2022, 8, 10));
    }

    #[test]
    fn expansion_is_deterministic() {
        let timetable = timetable(vec![1, 5, 13]);
        let first = expand(&timetable, &config()).unwrap();
        let second = expand(&timetable, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn uid_counter_spans_lessons_and_exams() {
        let mut timetable = timetable(vec![1, 2]);
        timetable.exams.push(Exam {
            name: "CS101".into(),
            room: String::new(),
            note: "Algorithms exam, starting at 0900".into(),
            start: date(2022, 11, 26).and_hms_opt(9, 0, 0).unwrap(),
            end: date(2022, 11, 26).and_hms_opt(11, 30, 0).unwrap(),
        });

        let events = expand(&timetable, &config()).unwrap();
        let uids: Vec<&str> = events.iter().map(|event| event.uid.as_str()).collect();

        assert_eq!(
            uids,
            vec![
                "uid0@ntu-timetable",
                "uid1@ntu-timetable",
                "uidEXAM2@ntu-timetable"
            ]
        );

        assert_eq!(events[2].summary, "CS101 (Exam)");
        assert_eq!(events[2].start, timetable.exams[0].start);
        assert_eq!(events[2].end, timetable.exams[0].end);
    }
}
