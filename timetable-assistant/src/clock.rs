use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Every relative date ("today", "tomorrow") is computed in this zone.
pub const ASSISTANT_TIMEZONE: Tz = chrono_tz::America::New_York;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Eastern-time "now" plus the calendar days around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateContext {
    pub now: DateTime<Tz>,
    pub yesterday: NaiveDate,
    pub today: NaiveDate,
    pub tomorrow: NaiveDate,
}

impl DateContext {
    pub fn at(instant: DateTime<Utc>) -> Self {
        let now = instant.with_timezone(&ASSISTANT_TIMEZONE);
        let today = now.date_naive();

        Self {
            now,
            yesterday: today.pred_opt().unwrap_or(today),
            today,
            tomorrow: today.succ_opt().unwrap_or(today),
        }
    }

    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::at(clock.now())
    }

    /// e.g. "3/9/2025, 12:30:00 AM EST"
    pub fn timestamp(&self) -> String {
        self.now.format("%-m/%-d/%Y, %-I:%M:%S %p %Z").to_string()
    }

    /// e.g. "Sunday, March 9, 2025"
    pub fn long_date(&self) -> String {
        self.today.format("%A, %B %-d, %Y").to_string()
    }

    pub fn yesterday_name(&self) -> String {
        weekday_name(self.yesterday)
    }

    pub fn today_name(&self) -> String {
        weekday_name(self.today)
    }

    pub fn tomorrow_name(&self) -> String {
        weekday_name(self.tomorrow)
    }
}

fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
