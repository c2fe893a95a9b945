mod error;
mod parser;
mod structs;
mod time;

#[cfg(feature = "ics")]
mod ics;

pub use error::ParseError;
pub use parser::{extract_events, parse_calendar};
pub use structs::{Calendar, CalendarEvent, NO_LOCATION, UNTITLED};
pub use time::DEFAULT_TIMEZONE;
