// SPDX-License-Identifier: MIT

//!
//! The normalized point-in-time type
//!

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// The minimum year an [`Instant`] can hold
pub const MIN_YEAR: i64 = -50000;

/// The maximum year an [`Instant`] can hold
pub const MAX_YEAR: i64 = 10000;

/// Errors that can arise when constructing an [`Instant`]
#[derive(Error, Debug, Clone)]
pub enum InstantError {
    /// The year is not allowed (must be [`MIN_YEAR`] <= year <= [`MAX_YEAR`])
    #[error("Year `{0}` is not allowed")]
    InvalidYear(i64),

    /// The month number is not allowed (must be 1 <= month <= 12)
    #[error("Month `{0}` is not allowed")]
    InvalidMonth(i64),

    /// The day number is not allowed (must be 1 <= day <= 31)
    #[error("Day `{0}` is not allowed")]
    InvalidDay(i64),

    /// The hour is not allowed (must be 0 <= hour <= 23)
    #[error("Hour `{0}` is not allowed")]
    InvalidHour(i64),

    /// The minute is not allowed (must be 0 <= minute <= 59)
    #[error("Minute `{0}` is not allowed")]
    InvalidMinute(i64),

    /// The second is not allowed (must be 0 <= second <= 59)
    #[error("Second `{0}` is not allowed")]
    InvalidSecond(i64),
}

/// The year component of an [`Instant`]
///
/// Year 0 on this axis is 1 BC; earlier years are negative.  The minimum
/// year allowed is [`MIN_YEAR`].  The maximum year allowed is [`MAX_YEAR`]
#[rustfmt::skip]
#[derive(derive_more::Display, Serialize, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Year(i32);

/// The month component of an [`Instant`]
#[rustfmt::skip]
#[derive(derive_more::Display, Serialize, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Month(u8);

/// The day component of an [`Instant`]
#[rustfmt::skip]
#[derive(derive_more::Display, Serialize, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Day(u8);

impl Year {
    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn min() -> Self {
        Year(MIN_YEAR as i32)
    }

    pub fn max() -> Self {
        Year(MAX_YEAR as i32)
    }
}

impl Month {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Day {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Year {
    type Error = InstantError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (MIN_YEAR..=MAX_YEAR).contains(&value) {
            Ok(Year(value as i32))
        } else {
            Err(InstantError::InvalidYear(value))
        }
    }
}

impl TryFrom<i64> for Month {
    type Error = InstantError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=12).contains(&value) {
            Ok(Month(value as u8))
        } else {
            Err(InstantError::InvalidMonth(value))
        }
    }
}

impl TryFrom<i64> for Day {
    type Error = InstantError;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=31).contains(&value) {
            Ok(Day(value as u8))
        } else {
            Err(InstantError::InvalidDay(value))
        }
    }
}

/// The time-of-day component of an [`Instant`]
#[derive(Serialize, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// The default time-of-day for date-only and year-only input
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Create a new [`TimeOfDay`] if the result will be valid
    pub fn from(hour: i64, minute: i64, second: i64) -> Result<TimeOfDay, InstantError> {
        if !(0..=23).contains(&hour) {
            return Err(InstantError::InvalidHour(hour));
        }
        if !(0..=59).contains(&minute) {
            return Err(InstantError::InvalidMinute(minute));
        }
        if !(0..=59).contains(&second) {
            return Err(InstantError::InvalidSecond(second));
        }
        Ok(TimeOfDay {
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }
}

/// The display granularity of a formatted [`Instant`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// `YYYY`
    Year,

    /// `YYYY-MM-DD`
    Date,

    /// `YYYY-MM-DD HH:MM`
    Minutes,

    /// `YYYY-MM-DD HH:MM:SS`
    Seconds,
}

/// A normalized point in time, UTC-referenced
///
/// All fields are always concrete: year-only input normalizes the month and
/// day to Jan 1, and date-only input normalizes the time to midnight.  The
/// field order gives the derived ordering chronological meaning.
///
/// An `Instant` is a plain value: it carries no identity and no shared
/// state, so it can be compared, copied and formatted freely.
#[derive(Serialize, Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct Instant {
    year: Year,
    month: Month,
    day: Day,
    time: TimeOfDay,
}

impl Instant {
    /// Create an [`Instant`] with year-only granularity (Jan 1, midnight)
    pub fn from_year(year: i64) -> Result<Instant, InstantError> {
        Self::from_ymd(year, 1, 1)
    }

    /// Create an [`Instant`] with date granularity (midnight)
    pub fn from_ymd(year: i64, month: i64, day: i64) -> Result<Instant, InstantError> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    /// Create an [`Instant`] with full time-of-day granularity if the result
    /// will be valid
    pub fn from_ymd_hms(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
    ) -> Result<Instant, InstantError> {
        Ok(Instant {
            year: Year::try_from(year)?,
            month: Month::try_from(month)?,
            day: Day::try_from(day)?,
            time: TimeOfDay::from(hour, minute, second)?,
        })
    }

    /// Get the instant's year, negative for years before 1 AD (year 0 is
    /// 1 BC)
    pub fn year(&self) -> i32 {
        self.year.value()
    }

    /// Get the instant's month (1-12)
    pub fn month(&self) -> u8 {
        self.month.value()
    }

    /// Get the instant's day of month (1-31)
    pub fn day(&self) -> u8 {
        self.day.value()
    }

    pub fn hour(&self) -> u8 {
        self.time.hour()
    }

    pub fn minute(&self) -> u8 {
        self.time.minute()
    }

    pub fn second(&self) -> u8 {
        self.time.second()
    }

    /// Format the instant as a canonical display string at the requested
    /// granularity
    ///
    /// The `YYYY-MM-DD[ HH:MM[:SS]]` shapes this produces are the same ones
    /// [`crate::parse_iso8601`] accepts, so formatting and re-parsing an
    /// instant round-trips
    pub fn format(&self, granularity: Granularity) -> String {
        let year = self.year.value();
        match granularity {
            Granularity::Year => format!("{year:04}"),
            Granularity::Date => {
                format!("{year:04}-{:02}-{:02}", self.month.value(), self.day.value())
            }
            Granularity::Minutes => format!(
                "{year:04}-{:02}-{:02} {:02}:{:02}",
                self.month.value(),
                self.day.value(),
                self.time.hour(),
                self.time.minute()
            ),
            Granularity::Seconds => format!(
                "{year:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                self.month.value(),
                self.day.value(),
                self.time.hour(),
                self.time.minute(),
                self.time.second()
            ),
        }
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(Granularity::Seconds))
    }
}

#[derive(Deserialize)]
struct RawTimeOfDay {
    hour: i64,
    minute: Option<i64>,
    second: Option<i64>,
}

#[derive(Deserialize)]
struct RawInstant {
    year: i64,
    month: Option<i64>,
    day: Option<i64>,
    time: Option<RawTimeOfDay>,
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawInstant::deserialize(deserializer)?;
        let (hour, minute, second) = match raw.time {
            Some(time) => (time.hour, time.minute.unwrap_or(0), time.second.unwrap_or(0)),
            None => (0, 0, 0),
        };
        Instant::from_ymd_hms(
            raw.year,
            raw.month.unwrap_or(1),
            raw.day.unwrap_or(1),
            hour,
            minute,
            second,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from() {
        // Should return error
        assert!(Instant::from_year(999_999).is_err());
        assert!(Instant::from_year(-999_999).is_err());
        assert!(Instant::from_ymd(1980, 0, 1).is_err());
        assert!(Instant::from_ymd(1980, 13, 1).is_err());
        assert!(Instant::from_ymd(1980, 1, 32).is_err());
        assert!(Instant::from_ymd_hms(1980, 1, 2, 24, 0, 0).is_err());
        assert!(Instant::from_ymd_hms(1980, 1, 2, 10, 60, 0).is_err());
        assert!(Instant::from_ymd_hms(1980, 1, 2, 10, 20, 60).is_err());

        // Should be ok
        assert!(Instant::from_year(-199).is_ok());
        assert!(Instant::from_ymd_hms(1980, 1, 2, 10, 20, 30).is_ok());
    }

    #[test]
    fn cmp() {
        let year_200_bc = Instant::from_year(-199).unwrap();
        let year_1980 = Instant::from_year(1980).unwrap();
        assert!(year_200_bc < year_1980);

        let morning = Instant::from_ymd_hms(1980, 1, 2, 10, 20, 30).unwrap();
        let evening = Instant::from_ymd_hms(1980, 1, 2, 22, 0, 0).unwrap();
        let next_day = Instant::from_ymd(1980, 1, 3).unwrap();
        assert!(morning < evening);
        assert!(evening < next_day);

        // Year-only input normalizes to Jan 1, midnight
        assert_eq!(year_1980, Instant::from_ymd_hms(1980, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn format() {
        let instant = Instant::from_ymd_hms(1980, 1, 2, 10, 20, 30).unwrap();
        assert_eq!(instant.format(Granularity::Year), "1980");
        assert_eq!(instant.format(Granularity::Date), "1980-01-02");
        assert_eq!(instant.format(Granularity::Minutes), "1980-01-02 10:20");
        assert_eq!(instant.format(Granularity::Seconds), "1980-01-02 10:20:30");
        assert_eq!(instant.to_string(), "1980-01-02 10:20:30");

        let early = Instant::from_year(5).unwrap();
        assert_eq!(early.format(Granularity::Year), "0005");
    }

    #[test]
    fn serde_round_trip() {
        let instant = Instant::from_ymd_hms(1980, 1, 2, 10, 20, 30).unwrap();
        let json = serde_json::to_string(&instant).unwrap();
        let back: Instant = serde_json::from_str(&json).unwrap();
        assert_eq!(instant, back);

        // Missing components take the normalization defaults
        let year_only: Instant = serde_json::from_str(r#"{"year":-199}"#).unwrap();
        assert_eq!(year_only, Instant::from_year(-199).unwrap());

        // Out-of-range fields are rejected
        assert!(serde_json::from_str::<Instant>(r#"{"year":1980,"month":13}"#).is_err());
    }
}
