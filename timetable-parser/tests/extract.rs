use chrono::DateTime;
use timetable_parser::{extract_events, parse_calendar, ParseError, NO_LOCATION, UNTITLED};

const SEMESTER: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//University//Timetable//EN\r\n\
X-WR-CALNAME:Fall Semester\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:America/New_York\r\n\
BEGIN:STANDARD\r\n\
DTSTART:19701101T020000\r\n\
TZOFFSETFROM:-0400\r\n\
TZOFFSETTO:-0500\r\n\
END:STANDARD\r\n\
END:VTIMEZONE\r\n\
BEGIN:VEVENT\r\n\
UID:math201\r\n\
SUMMARY:MATH201\r\n\
DESCRIPTION:Linear Algebra\\nInstructor: Emmy Noether\r\n\
LOCATION:Science Building\\, Room 204\r\n\
DTSTART;TZID=America/New_York:20250902T131000\r\n\
DTEND;TZID=America/New_York:20250902T143000\r\n\
RRULE:FREQ=WEEKLY;BYDAY=TU,TH;UNTIL=20251209T235959Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:cs101\r\n\
SUMMARY:CS101\r\n\
DTSTART;TZID=America/New_York:20250901T090000\r\n\
DURATION:PT50M\r\n\
RRULE:FREQ=WEEKLY;BYDAY=MO,WE,FR;UNTIL=20251208T235959Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:lab\r\n\
SUMMARY:Physics Lab\r\n\
ORGANIZER;CN=Marie Curie:mailto:curie@example.edu\r\n\
LOCATION:Lab 3\r\n\
DTSTART:20250905T180000Z\r\n\
DTEND:20250905T200000Z\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-PT15M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

fn at(s: &str) -> DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

#[test]
fn extracts_every_event_in_source_order() {
    let events = extract_events(SEMESTER).unwrap();

    let titles = events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, ["MATH201", "CS101", "Physics Lab"]);
    assert!(events.iter().all(|event| event.end >= event.start));
}

#[test]
fn resolves_times_to_absolute_instants() {
    let events = extract_events(SEMESTER).unwrap();

    assert_eq!(events[0].start, at("2025-09-02T13:10:00-04:00"));
    assert_eq!(events[0].end, at("2025-09-02T14:30:00-04:00"));
    assert_eq!(events[1].end, at("2025-09-01T09:50:00-04:00"));
    assert_eq!(events[2].start, at("2025-09-05T14:00:00-04:00"));
    assert_eq!(events[1].duration(), chrono::Duration::minutes(50));
}

#[test]
fn keeps_recurrence_and_details_as_text() {
    let events = extract_events(SEMESTER).unwrap();

    assert_eq!(
        events[0].recurrence.as_deref(),
        Some("FREQ=WEEKLY;BYDAY=TU,TH;UNTIL=20251209T235959Z")
    );
    assert_eq!(
        events[0].description.as_deref(),
        Some("Linear Algebra\nInstructor: Emmy Noether")
    );
    assert_eq!(events[0].location, "Science Building, Room 204");
    assert_eq!(events[2].organizer.as_deref(), Some("Marie Curie"));
    assert_eq!(events[2].recurrence, None);
}

#[test]
fn missing_location_gets_placeholder() {
    let events = extract_events(SEMESTER).unwrap();
    assert_eq!(events[1].location, NO_LOCATION);
}

#[test]
fn reads_calendar_name() {
    let calendar = parse_calendar(SEMESTER).unwrap();
    assert_eq!(calendar.name.as_deref(), Some("Fall Semester"));
}

#[test]
fn calendar_without_events_is_empty() {
    let text = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//x//EN\r\nEND:VCALENDAR\r\n";
    assert_eq!(extract_events(text).unwrap(), vec![]);
}

#[test]
fn summary_and_blank_location_fall_back() {
    let text = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
LOCATION:   \r\n\
DTSTART;VALUE=DATE:20250915\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    let events = extract_events(text).unwrap();
    assert_eq!(events[0].title, UNTITLED);
    assert_eq!(events[0].location, NO_LOCATION);
    assert_eq!(events[0].start, at("2025-09-15T00:00:00-04:00"));
    assert_eq!(events[0].end, at("2025-09-16T00:00:00-04:00"));
}

#[test]
fn truncated_text_fails_without_partial_output() {
    let cut = SEMESTER.find("BEGIN:VALARM").unwrap();
    let truncated = &SEMESTER[..cut];

    assert!(matches!(
        extract_events(truncated),
        Err(ParseError::Unbalanced { .. })
    ));
}

#[test]
fn not_a_calendar() {
    assert_eq!(
        extract_events("just some notes\nabout class"),
        Err(ParseError::MissingCalendar)
    );
}

#[test]
fn missing_start_is_an_error() {
    let text = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nSUMMARY:CS101\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
    assert_eq!(
        extract_events(text),
        Err(ParseError::MissingProperty {
            index: 1,
            property: "DTSTART"
        })
    );
}

#[test]
fn end_before_start_is_an_error() {
    let text = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Backwards\r\n\
DTSTART:20250901T100000Z\r\n\
DTEND:20250901T090000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    assert!(matches!(
        extract_events(text),
        Err(ParseError::EndBeforeStart { index: 1, .. })
    ));
}

#[test]
fn bad_date_time_is_an_error() {
    let text = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:CS101\r\n\
DTSTART:next monday\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    assert!(matches!(
        extract_events(text),
        Err(ParseError::InvalidDateTime { index: 1, .. })
    ));
}

#[test]
fn events_across_calendars_keep_source_order() {
    let spring = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
X-WR-CALNAME:Spring Semester\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:CS102\r\n\
DTSTART;TZID=America/New_York:20260112T090000\r\n\
DTEND;TZID=America/New_York:20260112T095000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
    let text = format!("{SEMESTER}{spring}");

    let calendar = parse_calendar(&text).unwrap();

    let titles = calendar
        .events
        .iter()
        .map(|e| e.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, ["MATH201", "CS101", "Physics Lab", "CS102"]);
    assert_eq!(calendar.name.as_deref(), Some("Fall Semester"));
    assert_eq!(calendar.events[3].start, at("2026-01-12T09:00:00-05:00"));
}

#[test]
fn end_without_begin_is_a_syntax_error() {
    let text = "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\nEND:VEVENT\r\n";

    assert!(matches!(
        extract_events(text),
        Err(ParseError::Syntax(message)) if message.contains("END:VEVENT without BEGIN")
    ));
}

#[test]
fn out_of_range_duration_is_an_error() {
    let text = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Forever\r\n\
DTSTART:20250901T090000Z\r\n\
DURATION:P100000000W\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    assert_eq!(
        extract_events(text),
        Err(ParseError::InvalidDuration {
            index: 1,
            value: "P100000000W".to_string()
        })
    );
}
