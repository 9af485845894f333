use chrono::NaiveDate;
use ntu_timetable_ics::{expand, parse_timetable, to_ics, Config};

// Page furniture table, a minimal lesson grid with one two-slot lecture,
// and an exam table with one sitting plus one unscheduled row.
const PAGE: &str = r#"
<html><body>
<table><tr><td>Academic year 2022</td></tr></table>
<table>
    <tr><td>Time</td><td>Mon</td><td>Tue</td></tr>
    <tr>
        <td>0900</td>
        <td rowspan="2"><b>CS101 LEC<br>0900to1000<br></b></td>
    </tr>
    <tr>
        <td>0930</td>
    </tr>
</table>
<table>
    <tr><td>heading</td></tr>
    <tr><td>heading</td></tr>
    <tr>
        <td>1</td><td>CS101</td><td>Algorithms</td>
        <td>x</td><td>x</td><td>26-Nov-2022 0900to1130</td>
    </tr>
    <tr>
        <td>2</td><td>CS102</td><td>Databases</td>
        <td>x</td><td>x</td><td>Not Applicable</td>
    </tr>
    <tr><td>footer</td></tr>
</table>
</body></html>
"#;

fn config() -> Config {
    Config::new(
        NaiveDate::from_ymd_opt(2022, 8, 8).unwrap(),
        NaiveDate::from_ymd_opt(2022, 9, 26).unwrap(),
    )
}

#[test]
fn page_expands_to_thirteen_lesson_events_plus_one_exam() {
    let timetable = parse_timetable(PAGE).unwrap();
    assert_eq!(timetable.lessons.len(), 1);
    assert_eq!(timetable.exams.len(), 1);

    let events = expand(&timetable, &config()).unwrap();
    assert_eq!(events.len(), 14);

    let output = to_ics(&events, config().utc_offset_hours).to_string();
    assert_eq!(output.matches("BEGIN:VEVENT").count(), 14);
    assert_eq!(output.matches("SUMMARY:CS101 (LEC)").count(), 13);

    // With a two-token header the room falls back to the last token.
    assert_eq!(output.matches("LOCATION:LEC").count(), 13);

    // Week 1, Monday 09:00 Singapore time.
    assert!(output.contains("DTSTART:20220808T010000Z"));

    // Week 8's Monday lands on the recess marker and moves out a week.
    assert!(!output.contains("DTSTART:20220926T010000Z"));
    assert!(output.contains("DTSTART:20221003T010000Z"));

    // The exam keeps its own instants and continues the UID sequence.
    assert!(output.contains("UID:uidEXAM13@ntu-timetable"));
    assert!(output.contains("SUMMARY:CS101 (Exam)"));
    assert!(output.contains("DTSTART:20221126T010000Z"));
    assert!(output.contains("DTEND:20221126T033000Z"));
}

#[test]
fn skipped_exam_rows_do_not_consume_uids() {
    let timetable = parse_timetable(PAGE).unwrap();
    let events = expand(&timetable, &config()).unwrap();

    assert!(events.iter().all(|event| !event.uid.contains("EXAM14")));
    assert_eq!(
        events.iter().filter(|event| event.uid.contains("EXAM")).count(),
        1
    );
}

#[test]
fn non_monday_semester_start_produces_no_calendar() {
    let timetable = parse_timetable(PAGE).unwrap();
    let config = Config::new(
        NaiveDate::from_ymd_opt(2022, 8, 9).unwrap(),
        NaiveDate::from_ymd_opt(2022, 9, 26).unwrap(),
    );

    assert!(expand(&timetable, &config).is_err());
}
