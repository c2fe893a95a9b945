use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone assumed for floating times and unknown TZIDs.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Instant {
    pub at: DateTime<FixedOffset>,
    pub all_day: bool,
}

pub(crate) fn parse_instant(value: &str, tzid: Option<&str>) -> Option<Instant> {
    let value = value.trim();

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, DATE_TIME_FORMAT).ok()?;
        return Some(Instant {
            at: Utc.from_utc_datetime(&naive).fixed_offset(),
            all_day: false,
        });
    }

    let zone = resolve_zone(tzid);

    if value.len() == 8 {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        return Some(Instant {
            at: localize(zone, date.and_hms_opt(0, 0, 0)?)?,
            all_day: true,
        });
    }

    let naive = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).ok()?;
    Some(Instant {
        at: localize(zone, naive)?,
        all_day: false,
    })
}

fn resolve_zone(tzid: Option<&str>) -> Tz {
    let Some(tzid) = tzid else {
        return DEFAULT_TIMEZONE;
    };

    let id = tzid.trim_matches('"').trim_start_matches('/');
    id.parse::<Tz>().unwrap_or_else(|_| {
        tracing::debug!(tzid = id, "unknown TZID, falling back to {DEFAULT_TIMEZONE}");
        DEFAULT_TIMEZONE
    })
}

// Ambiguous wall times take the earlier instant, skipped ones move an hour forward.
fn localize(zone: Tz, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            zone.from_local_datetime(&(naive + Duration::try_hours(1)?))
                .earliest()
        })
        .map(|at| at.fixed_offset())
}

/// Parses `[+-]P[nW][nD][T[nH][nM][nS]]`.
pub(crate) fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (negative, rest) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };

    let mut total = Duration::zero();
    let mut number: Option<i64> = None;
    let mut in_time = false;
    let mut seen_unit = false;

    for c in rest.strip_prefix('P')?.chars() {
        match c {
            '0'..='9' => {
                let digit = i64::from(c.to_digit(10)?);
                number = Some(number.unwrap_or(0).checked_mul(10)?.checked_add(digit)?);
            }
            'T' if !in_time && number.is_none() => in_time = true,
            unit => {
                let n = number.take()?;
                let part = match (unit, in_time) {
                    ('W', false) => Duration::try_weeks(n)?,
                    ('D', false) => Duration::try_days(n)?,
                    ('H', true) => Duration::try_hours(n)?,
                    ('M', true) => Duration::try_minutes(n)?,
                    ('S', true) => Duration::try_seconds(n)?,
                    _ => return None,
                };
                total = total.checked_add(&part)?;
                seen_unit = true;
            }
        }
    }

    if number.is_some() || !seen_unit {
        return None;
    }

    Some(if negative { -total } else { total })
}
