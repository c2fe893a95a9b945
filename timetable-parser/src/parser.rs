use chrono::Duration;
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;
use ical::IcalParser;

use crate::time::{parse_duration, parse_instant, Instant};
use crate::{Calendar, CalendarEvent, ParseError, NO_LOCATION, UNTITLED};

/// Parses every VEVENT of every VCALENDAR in `s`, in source order.
///
/// The text is checked for balanced `BEGIN`/`END` pairs first, so a truncated
/// file fails as a whole instead of yielding the events read before the cut.
pub fn parse_calendar<S: AsRef<str>>(s: S) -> Result<Calendar, ParseError> {
    let text = s.as_ref();
    check_structure(text)?;

    let mut name = None;
    let mut events = Vec::new();

    for calendar in IcalParser::new(text.as_bytes()) {
        let calendar = calendar.map_err(|err| ParseError::Syntax(err.to_string()))?;

        if name.is_none() {
            name = text_value(&calendar.properties, "X-WR-CALNAME");
        }

        for event in &calendar.events {
            let index = events.len() + 1;
            events.push(parse_event(event, index)?);
        }
    }

    tracing::debug!(events = events.len(), "parsed calendar");

    Ok(Calendar { name, events })
}

pub fn extract_events<S: AsRef<str>>(s: S) -> Result<Vec<CalendarEvent>, ParseError> {
    parse_calendar(s).map(|calendar| calendar.events)
}

fn check_structure(text: &str) -> Result<(), ParseError> {
    let mut open: Vec<&str> = Vec::new();
    let mut calendars = 0;

    for (idx, line) in text.lines().enumerate() {
        // folded continuation lines
        if line.starts_with([' ', '\t']) {
            continue;
        }

        if let Some(component) = strip_keyword(line, "BEGIN:") {
            if open.is_empty() && component.eq_ignore_ascii_case("VCALENDAR") {
                calendars += 1;
            }
            open.push(component);
        } else if let Some(component) = strip_keyword(line, "END:") {
            match open.pop() {
                Some(expected) if expected.eq_ignore_ascii_case(component) => {}
                Some(expected) => {
                    return Err(ParseError::Mismatched {
                        line: idx + 1,
                        expected: expected.to_string(),
                        found: component.to_string(),
                    })
                }
                None => {
                    return Err(ParseError::Syntax(format!(
                        "line {}: END:{component} without BEGIN",
                        idx + 1
                    )))
                }
            }
        }
    }

    if let Some(component) = open.pop() {
        return Err(ParseError::Unbalanced {
            component: component.to_string(),
        });
    }

    if calendars == 0 {
        return Err(ParseError::MissingCalendar);
    }

    Ok(())
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| line[keyword.len()..].trim())
}

fn parse_event(event: &IcalEvent, index: usize) -> Result<CalendarEvent, ParseError> {
    let properties = &event.properties;

    let title = text_value(properties, "SUMMARY").unwrap_or_else(|| UNTITLED.to_string());
    let location = text_value(properties, "LOCATION").unwrap_or_else(|| NO_LOCATION.to_string());

    let start = find(properties, "DTSTART")
        .ok_or(ParseError::MissingProperty {
            index,
            property: "DTSTART",
        })
        .and_then(|property| instant(property, index))?;

    let end = match find(properties, "DTEND") {
        Some(property) => instant(property, index)?.at,
        None => match find(properties, "DURATION").and_then(|p| p.value.as_deref()) {
            Some(raw) => {
                let invalid = || ParseError::InvalidDuration {
                    index,
                    value: raw.to_string(),
                };
                let duration = parse_duration(raw).ok_or_else(invalid)?;
                start.at.checked_add_signed(duration).ok_or_else(invalid)?
            }
            None if start.all_day => start
                .at
                .checked_add_signed(Duration::days(1))
                .ok_or_else(|| ParseError::InvalidDuration {
                    index,
                    value: "P1D".to_string(),
                })?,
            None => start.at,
        },
    };

    if end < start.at {
        return Err(ParseError::EndBeforeStart { index, title });
    }

    Ok(CalendarEvent {
        title,
        location,
        start: start.at,
        end,
        description: text_value(properties, "DESCRIPTION"),
        organizer: find(properties, "ORGANIZER").and_then(organizer),
        recurrence: find(properties, "RRULE")
            .and_then(|p| p.value.as_deref())
            .map(|rule| rule.trim().to_string()),
        uid: text_value(properties, "UID"),
    })
}

fn find<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties
        .iter()
        .find(|property| property.name.eq_ignore_ascii_case(name))
}

fn param<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

fn text_value(properties: &[Property], name: &str) -> Option<String> {
    find(properties, name)
        .and_then(|property| property.value.as_deref())
        .map(unescape)
        .filter(|value| !value.trim().is_empty())
}

fn instant(property: &Property, index: usize) -> Result<Instant, ParseError> {
    let value = property.value.as_deref().unwrap_or_default();
    parse_instant(value, param(property, "TZID")).ok_or_else(|| ParseError::InvalidDateTime {
        index,
        value: value.to_string(),
    })
}

// Prefers the common name over the mailto address.
fn organizer(property: &Property) -> Option<String> {
    if let Some(name) = param(property, "CN") {
        return Some(name.trim_matches('"').to_string());
    }

    let value = property.value.as_deref()?.trim();
    let address = value
        .get(..7)
        .filter(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
        .map_or(value, |_| &value[7..]);

    (!address.is_empty()).then(|| address.to_string())
}

fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('n' | 'N') => unescaped.push('\n'),
            Some(escaped) => unescaped.push(escaped),
            None => unescaped.push('\\'),
        }
    }

    unescaped
}
