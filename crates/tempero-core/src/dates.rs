//! Date normalization for sale records
//!
//! The backend has stored sale dates in three shapes over time: `YYYY-MM-DD`,
//! `DD/MM/YYYY` and full ISO timestamps. Everything downstream compares
//! calendar triples, so all of them are reduced to one here.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime};

/// Calendar day with a 0-based month, as used by the filters.
///
/// The all-zero value stands for "no usable date" and never equals a real day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub year: i32,
    /// 0 = January
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub const ZERO: Self = Self {
        year: 0,
        month: 0,
        day: 0,
    };

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
        }
    }

    /// Convert back to a chrono date. `None` for the zero value.
    pub fn to_naive(self) -> Option<NaiveDate> {
        if self.is_zero() {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.day)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Source of "today" for the time-window filters
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one day, for reports on a past date and for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Normalize a sale date string into a calendar triple.
///
/// - contains `T`: full timestamp, calendar fields taken in local time
/// - contains `/`: `DD/MM/YYYY`
/// - otherwise: `YYYY-MM-DD`
///
/// Empty or unparseable input gives [`CalendarDate::ZERO`].
pub fn normalize(raw: &str) -> CalendarDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return CalendarDate::ZERO;
    }

    let parsed = if raw.contains('T') {
        parse_timestamp(raw)
    } else if raw.contains('/') {
        parse_day_month_year(raw)
    } else {
        parse_year_month_day(raw)
    };

    parsed.map(CalendarDate::from_naive).unwrap_or_default()
}

/// Timestamps with an offset are moved to local time; naive ones already are.
fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }

    const NAIVE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|stamp| stamp.date())
}

fn parse_day_month_year(raw: &str) -> Option<NaiveDate> {
    let [day, month, year] = split_three(raw, '/')?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_year_month_day(raw: &str) -> Option<NaiveDate> {
    let [year, month, day] = split_three(raw, '-')?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn split_three(raw: &str, separator: char) -> Option<[&str; 3]> {
    let mut parts = raw.split(separator).map(str::trim);
    let fields = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

/// Sunday-to-Saturday week containing `today`, both ends inclusive
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(today.weekday().num_days_from_sunday());
    let start = today - Duration::days(offset);
    (start, start + Duration::days(6))
}

/// Today's date as the backend expects it on new sales
pub fn sale_date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
