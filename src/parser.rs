use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::structs::{Exam, Lesson, Timetable};

macro_rules! selector {
    ($query:expr) => {{
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($query).unwrap());
        &SELECTOR
    }};
}

/// Weeks a lesson defaults to when its cell carries no week spec.
const ALL_WEEKS: std::ops::RangeInclusive<u32> = 1..=13;

/// Extracts lessons and exams from a timetable page.
///
/// The page is expected to carry at least three tables: the second one is
/// the weekly lesson grid, the third one the exam schedule. Returns `None`
/// when the tables are missing entirely; individual cells or rows that fail
/// to parse are skipped with a warning instead.
pub fn parse_timetable<S: AsRef<str>>(s: S) -> Option<Timetable> {
    let html = Html::parse_document(s.as_ref());

    let mut tables = html.select(selector!("table"));
    tables.next()?;
    let grid = tables.next()?;
    let exam_table = tables.next()?;

    Some(Timetable {
        lessons: parse_lessons(grid),
        exams: parse_exams(exam_table),
    })
}

/// A spanning cell as it appears in the raw markup, before its true
/// weekday column is known.
struct RawCell {
    row: usize,
    col: usize,
    rowspan: usize,
    content: String,
}

/// Grid position of a cell whose weekday has been resolved. Kept separate
/// from [`Lesson`] so the records carry only semantic fields.
struct PlacedCell {
    row: usize,
    rowspan: usize,
    day: u32,
}

fn parse_lessons(grid: ElementRef) -> Vec<Lesson> {
    let mut placed: Vec<PlacedCell> = Vec::new();
    let mut lessons = Vec::new();

    // First pass collected the raw cells in row-major order; resolving a
    // cell's weekday only ever looks at cells placed from earlier rows.
    for cell in collect_spanning_cells(grid) {
        let day = effective_day(&placed, cell.row, cell.col);

        // Even a cell whose text is malformed still occupies grid columns.
        placed.push(PlacedCell {
            row: cell.row,
            rowspan: cell.rowspan,
            day,
        });

        match parse_lesson_cell(&cell.content, day) {
            Some(lesson) => {
                debug!(
                    "{} ({}) at raw column {} + {} hidden",
                    lesson.name,
                    lesson.kind,
                    cell.col,
                    day as usize - cell.col
                );
                lessons.push(lesson);
            }
            None => warn!(
                "skipping malformed lesson cell at row {}, column {}",
                cell.row, cell.col
            ),
        }
    }

    lessons
}

/// Walks the grid top to bottom, left to right, and records every cell
/// that spans multiple rows. The first row (headings) and the first cell
/// of each row (the time label) are not part of the grid proper.
fn collect_spanning_cells(grid: ElementRef) -> Vec<RawCell> {
    let mut cells = Vec::new();

    for (row, tr) in grid.select(selector!("tr")).enumerate().skip(1) {
        for (col, td) in tr.select(selector!("td")).enumerate().skip(1) {
            let Some(rowspan) = td.value().attr("rowspan") else {
                continue;
            };

            let Ok(rowspan) = rowspan.parse::<usize>() else {
                warn!("row {row}, column {col}: unparseable rowspan {rowspan:?}");
                continue;
            };

            let Some(inner) = td.children().filter_map(ElementRef::wrap).next() else {
                warn!("row {row}, column {col}: spanning cell has no content element");
                continue;
            };

            cells.push(RawCell {
                row,
                col,
                rowspan,
                content: inner.inner_html(),
            });
        }
    }

    cells
}

/// Computes a cell's true weekday column. Cells from earlier rows that
/// still span down to this row occupy a column slot each, which shifts
/// this cell's raw markup position left of its semantic position.
fn effective_day(placed: &[PlacedCell], row: usize, col: usize) -> u32 {
    let hidden = placed
        .iter()
        .filter(|cell| cell.day as usize <= col && cell.row < row && cell.row + cell.rowspan > row)
        .count();

    (col + hidden) as u32
}

/// Parses one spanning cell's content into a lesson.
///
/// The content is three `<br>`-separated lines: a header (`<code> <type>
/// ... <room>`), a time range (`HHMMtoHHMM`), and an optional week spec.
fn parse_lesson_cell(content: &str, day: u32) -> Option<Lesson> {
    let content = content.replace("<BR>", "<br>");

    let mut lines = content.split("<br>");
    let header = lines.next()?;
    let times = lines.next()?;
    let weeks_raw = lines.next().unwrap_or("");

    let tokens: Vec<&str> = header.split_whitespace().collect();
    let name = (*tokens.first()?).to_string();
    let kind = tokens.get(1).copied().unwrap_or("").to_string();
    let room = (*tokens.last()?).to_string();

    let (start_raw, end_raw) = times.split_once("to")?;
    let start_mins = parse_wall_minutes(start_raw.trim().trim_matches('-'))?;
    let end_mins = parse_wall_minutes(end_raw.replace('-', "").trim())?;
    (start_mins < end_mins).then_some(())?;

    let weeks = parse_week_spec(weeks_raw.trim())?;
    if weeks.is_empty() {
        return None;
    }

    Some(Lesson {
        name,
        kind,
        room,
        note: content.replace("<br>", "\n"),
        start_mins,
        end_mins,
        day,
        weeks,
    })
}

/// Parses a compact week spec into the list of active semester weeks.
///
/// An empty spec means every teaching week. A hyphen makes it an inclusive
/// range (`Wk1-13`), otherwise it is an explicit list (`Wk1,3,5`). A
/// reversed range yields an empty list.
fn parse_week_spec(spec: &str) -> Option<Vec<u32>> {
    if spec.is_empty() {
        return Some(ALL_WEEKS.collect());
    }

    let stripped = spec.replace("Wk", "").replace(';', "");

    if let Some((from, to)) = stripped.split_once('-') {
        let from = from.trim().parse::<u32>().ok()?;
        let to = to.trim().parse::<u32>().ok()?;
        return Some((from..=to).collect());
    }

    stripped
        .split(',')
        .map(|week| week.trim().parse::<u32>().ok())
        .collect()
}

/// Parses a 4-digit 24-hour wall time into minutes since midnight.
fn parse_wall_minutes(s: &str) -> Option<u32> {
    let hours = s.get(0..2)?.parse::<u32>().ok()?;
    let minutes = s.get(2..4)?.parse::<u32>().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Extracts exam sittings from the exam table. The first two rows are
/// headings and the last row is a footer; rows without a scheduled sitting
/// read `Not Applicable` and are skipped.
fn parse_exams(table: ElementRef) -> Vec<Exam> {
    let rows: Vec<ElementRef> = table.select(selector!("tr")).collect();
    let Some(data_rows) = rows.get(2..rows.len().saturating_sub(1)) else {
        return Vec::new();
    };

    let mut exams = Vec::new();

    for row in data_rows {
        let cells: Vec<String> = row
            .select(selector!("td"))
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        let (Some(code), Some(name), Some(time)) = (cells.get(1), cells.get(2), cells.get(5))
        else {
            warn!("skipping exam row with missing columns");
            continue;
        };

        if time == "Not Applicable" {
            continue;
        }

        match parse_exam_time(name, time) {
            Some((note, start, end)) => exams.push(Exam {
                name: code.clone(),
                room: String::new(),
                note,
                start,
                end,
            }),
            None => warn!("skipping exam row for {code}: unparseable time {time:?}"),
        }
    }

    exams
}

/// Parses an exam time cell of the shape `DD-Mon-YYYY HHMMtoHHMM` into a
/// note plus start/end instants.
fn parse_exam_time(
    course_name: &str,
    time: &str,
) -> Option<(String, chrono::NaiveDateTime, chrono::NaiveDateTime)> {
    let (date_raw, times_raw) = time.split_once(' ')?;
    let date = NaiveDate::parse_from_str(&date_raw.replace('-', " "), "%d %b %Y").ok()?;

    let (start_raw, end_raw) = times_raw.split_once("to")?;
    let start_raw = start_raw.trim().trim_matches('-');
    let start_mins = parse_wall_minutes(start_raw)?;
    let end_mins = parse_wall_minutes(end_raw.replace('-', "").trim())?;
    (start_mins < end_mins).then_some(())?;

    let midnight = date.and_time(chrono::NaiveTime::MIN);

    Some((
        format!("{course_name} exam, starting at {start_raw}"),
        midnight + Duration::minutes(i64::from(start_mins)),
        midnight + Duration::minutes(i64::from(end_mins)),
    ))
}
