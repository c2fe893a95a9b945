//! Answers questions about an uploaded class timetable.
//!
//! The uploaded iCalendar text is checked with [`timetable_parser`], turned into
//! a narrative by a completion service, and every question is answered from
//! that narrative plus the current Eastern-time day labels.

pub mod cli;
pub mod clock;
pub mod completion;
pub mod composer;
pub mod gemini;
pub mod prompt;
pub mod server;
pub mod session;

pub use clock::{Clock, DateContext, FixedClock, SystemClock, ASSISTANT_TIMEZONE};
pub use completion::{CompletionError, CompletionService};
pub use composer::{Composer, Narrative, FALLBACK_MESSAGE};
pub use prompt::TimetableSource;
pub use timetable_parser::{extract_events, CalendarEvent, ParseError};
