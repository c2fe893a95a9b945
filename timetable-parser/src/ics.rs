use chrono::{DateTime, FixedOffset, Utc};
use ics::{
    escape_text,
    properties::{Description, DtEnd, DtStart, Location, Organizer, RRule, Summary},
};

use crate::{Calendar, CalendarEvent};

const PRODUCT_ID: &str = "-//timetable-assistant//EN";

fn utc_stamp(at: &DateTime<FixedOffset>) -> String {
    at.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

impl Calendar {
    /// Renders the extracted events back to iCalendar text with UTC timestamps.
    #[must_use]
    pub fn to_ics(&self) -> ics::ICalendar<'_> {
        let mut icalendar = ics::ICalendar::new("2.0", PRODUCT_ID);

        for event in &self.events {
            icalendar.add_event(event.to_ics());
        }

        icalendar
    }
}

impl CalendarEvent {
    #[must_use]
    pub fn to_ics(&self) -> ics::Event<'_> {
        let start = utc_stamp(&self.start);
        let end = utc_stamp(&self.end);

        let id = self
            .uid
            .clone()
            .unwrap_or_else(|| format!("{}_{}", start, self.title.replace(' ', "-")));

        let mut ics_event = ics::Event::new(id, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(escape_text(self.title.as_str())));
        ics_event.push(Location::new(escape_text(self.location.as_str())));

        if let Some(recurrence) = &self.recurrence {
            ics_event.push(RRule::new(recurrence.as_str()));
        }

        if let Some(description) = &self.description {
            ics_event.push(Description::new(escape_text(description.as_str())));
        }

        if let Some(organizer) = &self.organizer {
            ics_event.push(Organizer::new(organizer.as_str()));
        }

        ics_event
    }
}
