use thiserror::Error;

/// Calendar text that could not be turned into events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no VCALENDAR component found")]
    MissingCalendar,

    #[error("component {component} is never closed")]
    Unbalanced { component: String },

    #[error("line {line}: END:{found} does not close BEGIN:{expected}")]
    Mismatched {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("malformed calendar: {0}")]
    Syntax(String),

    #[error("event #{index} has no {property} property")]
    MissingProperty { index: usize, property: &'static str },

    #[error("event #{index}: invalid date-time `{value}`")]
    InvalidDateTime { index: usize, value: String },

    #[error("event #{index}: invalid duration `{value}`")]
    InvalidDuration { index: usize, value: String },

    #[error("event #{index} ({title}) ends before it starts")]
    EndBeforeStart { index: usize, title: String },
}
