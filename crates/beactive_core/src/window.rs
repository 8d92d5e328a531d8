//! Time windows that scope aggregation queries.
//!
//! # Responsibility
//! - Derive "today" and "this week" windows from a local wall clock.
//! - Provide an injectable clock so callers can pin "now".
//!
//! # Invariants
//! - A window is closed: `start <= end`, both ends inclusive.
//! - A sample belongs to a window when its start instant lies inside it.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Window construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Display for WindowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "window end {end} is earlier than start {start}")
            }
        }
    }
}

impl Error for WindowError {}

/// First day of the local week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// Closed time interval used to scope one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the local day containing `now`, through `now`.
    pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let start = start_of_local_date(now, now.date_naive());
        Self::clamped(start, now.with_timezone(&Utc))
    }

    /// Start of the local week containing `now`, through `now`.
    pub fn this_week<Tz: TimeZone>(now: &DateTime<Tz>, week_start: WeekStart) -> Self {
        let date = now.date_naive();
        let offset = match week_start {
            WeekStart::Monday => date.weekday().num_days_from_monday(),
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        };
        let first_day = date
            .checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(date);
        let start = start_of_local_date(now, first_day);
        Self::clamped(start, now.with_timezone(&Utc))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    fn clamped(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: start.min(end),
            end,
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Earliest existing local instant on `date`.
///
/// Midnight can be skipped by a DST transition; the first valid hour is used
/// instead, and `now` itself when the whole day is unresolvable.
fn start_of_local_date<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> DateTime<Utc> {
    let zone = now.timezone();
    (0..24)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|naive| zone.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Source of the current local time.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Local>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }
}
