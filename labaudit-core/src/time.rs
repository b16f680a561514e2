//! Timestamp parsing and display for Notion date values.
//!
//! Notion hands back `date.start` as ISO-8601 text in a few shapes: full
//! RFC 3339 with an offset or `Z`, a naive local-less datetime, or a bare
//! date. Either `T` or a space may separate date and time, and offsets may be
//! written `+02:00` or `+0200`. Naive values are taken as UTC. Everything is
//! then viewed in the report time zone, which is always passed in explicitly.

use std::borrow::Cow;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use chrono_tz::Tz;

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp into the given zone. Returns `None` for
/// anything unparseable.
pub fn parse_timestamp(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    parse_utc(value).map(|dt| dt.with_timezone(tz))
}

fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    // A trailing Z is an explicit zero offset
    let value: Cow<'_, str> = match value.strip_suffix(&['Z', 'z'][..]) {
        Some(rest) => Cow::Owned(format!("{rest}+00:00")),
        None => Cow::Borrowed(value),
    };
    let value = value.as_ref();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Whole minutes from `entry` to `exit`, floored and clamped at zero.
pub fn minutes_between<Z: TimeZone>(entry: &DateTime<Z>, exit: &DateTime<Z>) -> i64 {
    let seconds = exit.clone().signed_duration_since(entry.clone()).num_seconds();
    seconds.div_euclid(60).max(0)
}

/// 12-hour clock without a leading zero on the hour: `9:05 AM`, `12:30 PM`.
pub fn pretty_time<Z: TimeZone>(dt: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    dt.format("%-I:%M %p").to_string()
}

/// Today's calendar date in the report zone.
pub fn today(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> crate::Result<NaiveDate> {
    let back = Duration::days(i64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_signed(back)
        .ok_or(crate::AuditError::DateOutOfRange(date))
}

/// Inclusive calendar-day range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if start > end {
            return Err(crate::AuditError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The seven days starting at `start`.
    pub fn week_from(start: NaiveDate) -> crate::Result<Self> {
        let end = start
            .checked_add_signed(Duration::days(6))
            .ok_or(crate::AuditError::DateOutOfRange(start))?;
        Ok(Self { start, end })
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days() as i64).map(move |offset| start + Duration::days(offset))
    }
}
