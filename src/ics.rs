use chrono::{Duration, NaiveDateTime};
use ics::properties::{Description, DtEnd, DtStart, Location, Organizer, Summary};
use ics::{escape_text, parameters, ICalendar};

use crate::structs::CalendarEvent;

const PRODID: &str = "-//hacksw/handcal//NONSGML v1.0//EN";
const ORGANIZER_NAME: &str = "NTU Timetable";
const ORGANIZER_URI: &str = "MAILTO:timetable@ntu-timetable";

/// Renders the expanded events, in the order given, into a calendar with
/// the fixed header and organizer. The `ics` crate handles CRLF line
/// endings, folding and VCALENDAR framing.
pub fn to_ics(events: &[CalendarEvent], utc_offset_hours: i64) -> ICalendar<'_> {
    let mut calendar = ICalendar::new("2.0", PRODID);

    for event in events {
        calendar.add_event(event.to_ics(utc_offset_hours));
    }

    calendar
}

impl CalendarEvent {
    fn to_ics(&self, utc_offset_hours: i64) -> ics::Event<'_> {
        let start = format_utc(self.start, utc_offset_hours);
        let end = format_utc(self.end, utc_offset_hours);

        // No separate creation timestamp is tracked; the event's own start
        // doubles as DTSTAMP.
        let mut event = ics::Event::new(self.uid.as_str(), start.clone());

        let mut organizer = Organizer::new(ORGANIZER_URI);
        organizer.append(parameters!("CN" => ORGANIZER_NAME));
        event.push(organizer);

        event.push(DtStart::new(start));
        event.push(DtEnd::new(end));
        event.push(Summary::new(&self.summary));
        event.push(Description::new(escape_text(self.description.as_str())));
        event.push(Location::new(escape_text(self.location.as_str())));

        event
    }
}

/// Formats a timetable-local instant as a compact UTC timestamp by
/// subtracting the configured offset. The source markup stores wall times
/// with no offset of their own.
pub fn format_utc(instant: NaiveDateTime, utc_offset_hours: i64) -> String {
    (instant - Duration::hours(utc_offset_hours))
        .format("%Y%m%dT%H%M%SZ")
        .to_string()
}
