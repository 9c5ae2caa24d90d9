// SPDX-License-Identifier: MIT

//!
//! The date parsing strategies
//!
//! Three interchangeable strategies turn a raw string into an [`Instant`]:
//!
//! - [`parse_iso8601`] - strict ISO-8601 shapes, with or without separators
//! - [`parse_gregorian`] - a bare year with an optional `AD`/`BC` era marker
//! - [`parse_hybrid`] - ISO-8601 first, falling back to the Gregorian parser
//!
//! Every strategy is total: malformed input is data, not a fault, so the
//! result is `None` rather than an error or a panic.  Callers processing
//! feed batches can skip or flag bad records without any unwinding.
//!

use crate::Instant;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can arise when looking up a [`Strategy`] by its config key
#[derive(Error, Debug, Clone)]
pub enum StrategyError {
    /// The string names no known strategy
    #[error("Unknown date parsing strategy `{0}`")]
    Unknown(String),
}

/// A date parsing strategy, selectable by a per-dataset config key
///
/// The closed set of variants means an unrecognized key fails loudly at
/// lookup time ([`StrategyError::Unknown`]) instead of silently parsing
/// nothing.
#[derive(derive_more::Display, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Strict ISO-8601 only
    #[display("iso8601")]
    Iso8601,

    /// Bare year with optional era marker only
    #[display("gregorian")]
    Gregorian,

    /// ISO-8601 with Gregorian fallback
    #[default]
    #[display("hybrid")]
    Hybrid,
}

impl Strategy {
    /// Parse `input` with this strategy
    pub fn parse(&self, input: &str) -> Option<Instant> {
        match self {
            Strategy::Iso8601 => parse_iso8601(input),
            Strategy::Gregorian => parse_gregorian(input),
            Strategy::Hybrid => parse_hybrid(input),
        }
    }
}

impl FromStr for Strategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso8601" => Ok(Strategy::Iso8601),
            "gregorian" => Ok(Strategy::Gregorian),
            "hybrid" => Ok(Strategy::Hybrid),
            _ => Err(StrategyError::Unknown(s.to_string())),
        }
    }
}

/// Parse a strict ISO-8601 date or date-time string
///
/// Accepted shapes: a 4-digit year, optionally followed by a 2-digit month
/// and a 2-digit day, either all hyphen-separated (`1980-01-02`) or all
/// concatenated (`19800102`).  A time-of-day may follow a complete date
/// after a space or `T`, either colon-separated (`10:20:30`) or
/// concatenated (`102030`), seconds optional; a trailing `Z` marks UTC.
/// Non-UTC offsets, mixed separator styles, out-of-range components and
/// trailing garbage all yield `None`.
pub fn parse_iso8601(input: &str) -> Option<Instant> {
    let s = input.trim();
    let (date, time) = match s.find(['T', ' ']) {
        Some(at) => (&s[..at], Some(&s[at + 1..])),
        None => (s, None),
    };
    let (year, month, day) = parse_iso_date(date)?;
    let (hour, minute, second) = match time {
        // time-of-day needs a complete date in front of it
        Some(time) if day.is_some() => parse_iso_time(time)?,
        Some(_) => return None,
        None => (0, 0, 0),
    };
    Instant::from_ymd_hms(
        year,
        month.unwrap_or(1),
        day.unwrap_or(1),
        hour,
        minute,
        second,
    )
    .ok()
}

/// Parse a Gregorian year with an optional era marker
///
/// Accepts a signed or unsigned integer year, optionally followed by
/// whitespace and `AD` or `BC` (case-insensitive).  There is no year zero
/// as far as the input is concerned: `BC` years map onto the zero-based
/// axis as `year = 1 - n`, so `1 BC` is year 0 and `200 BC` is year -199.
/// With `AD` or no marker the value is taken literally, including an
/// explicit leading `-`, which is never re-negated.  A sign combined with
/// an explicit `BC` marker is rejected.  The result always has year-only
/// granularity.
pub fn parse_gregorian(input: &str) -> Option<Instant> {
    let s = input.trim().to_ascii_uppercase();
    let year = if let Some(n) = s.strip_suffix("BC") {
        let n = n.trim_end();
        if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        1 - n.parse::<i64>().ok()?
    } else {
        let n = s.strip_suffix("AD").map(str::trim_end).unwrap_or(&s);
        n.parse::<i64>().ok()?
    };
    Instant::from_year(year).ok()
}

/// Parse with ISO-8601 priority and Gregorian fallback
///
/// A bare 4-digit year like `"1980"` is ambiguous between the two
/// strategies; ISO-8601 wins because it can express more precision, and the
/// Gregorian parser only sees input the ISO parser rejects (`"200 BC"`,
/// `"5 AD"`, `"-200"`).
pub fn parse_hybrid(input: &str) -> Option<Instant> {
    parse_iso8601(input).or_else(|| parse_gregorian(input))
}

/// Split an ISO date part into (year, month, day) numbers
fn parse_iso_date(s: &str) -> Option<(i64, Option<i64>, Option<i64>)> {
    if let Some((year, rest)) = s.split_once('-') {
        match rest.split_once('-') {
            Some((month, day)) => Some((
                digits(year, 4)?,
                Some(digits(month, 2)?),
                Some(digits(day, 2)?),
            )),
            None => Some((digits(year, 4)?, Some(digits(rest, 2)?), None)),
        }
    } else {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match s.len() {
            4 => Some((digits(s, 4)?, None, None)),
            6 => Some((digits(&s[..4], 4)?, Some(digits(&s[4..], 2)?), None)),
            8 => Some((
                digits(&s[..4], 4)?,
                Some(digits(&s[4..6], 2)?),
                Some(digits(&s[6..], 2)?),
            )),
            _ => None,
        }
    }
}

/// Split an ISO time part into (hour, minute, second) numbers, with seconds
/// defaulting to 0
fn parse_iso_time(s: &str) -> Option<(i64, i64, i64)> {
    let s = s.strip_suffix('Z').unwrap_or(s);
    if let Some((hour, rest)) = s.split_once(':') {
        match rest.split_once(':') {
            Some((minute, second)) => {
                Some((digits(hour, 2)?, digits(minute, 2)?, digits(second, 2)?))
            }
            None => Some((digits(hour, 2)?, digits(rest, 2)?, 0)),
        }
    } else {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match s.len() {
            4 => Some((digits(&s[..2], 2)?, digits(&s[2..], 2)?, 0)),
            6 => Some((
                digits(&s[..2], 2)?,
                digits(&s[2..4], 2)?,
                digits(&s[4..], 2)?,
            )),
            _ => None,
        }
    }
}

/// Parse a fixed-width run of ASCII digits
fn digits(s: &str, len: usize) -> Option<i64> {
    if s.len() == len && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Granularity;

    #[test]
    fn iso8601_separator_styles_are_equal() {
        let hyphenated = parse_iso8601("1980-01-02").unwrap();
        let concatenated = parse_iso8601("19800102").unwrap();
        assert_eq!(hyphenated, concatenated);
        assert_eq!(hyphenated.year(), 1980);
        assert_eq!(hyphenated.month(), 1);
        assert_eq!(hyphenated.day(), 2);
    }

    #[test]
    fn iso8601_date_time() {
        let expected = Instant::from_ymd_hms(1980, 1, 2, 10, 20, 30).unwrap();
        assert_eq!(parse_iso8601("1980-01-02 10:20:30Z").unwrap(), expected);
        assert_eq!(parse_iso8601("1980-01-02T10:20:30Z").unwrap(), expected);
        assert_eq!(parse_iso8601("1980-01-02T10:20:30").unwrap(), expected);
        assert_eq!(parse_iso8601("19800102T102030Z").unwrap(), expected);
    }

    #[test]
    fn iso8601_seconds_default_to_zero() {
        assert_eq!(
            parse_iso8601("1980-01-02T10:20").unwrap(),
            parse_iso8601("1980-01-02T10:20:00").unwrap()
        );
        assert_eq!(
            parse_iso8601("19800102T1020").unwrap(),
            parse_iso8601("1980-01-02 10:20:00Z").unwrap()
        );
    }

    #[test]
    fn iso8601_partial_dates_normalize() {
        let year_only = parse_iso8601("1980").unwrap();
        assert_eq!(year_only, Instant::from_year(1980).unwrap());
        assert_eq!(parse_iso8601("1980-06").unwrap(), parse_iso8601("198006").unwrap());
        assert_eq!(
            parse_iso8601("1980-06").unwrap(),
            Instant::from_ymd(1980, 6, 1).unwrap()
        );
    }

    #[test]
    fn iso8601_rejects_malformed_input() {
        for input in [
            "",
            "test",
            "80-01-02",       // 2-digit year
            "1980-13-01",     // month out of range
            "1980-00-01",
            "1980-01-32",     // day out of range
            "1980-0102",      // mixed separator styles
            "198001-02",
            "1980-01-02x",    // trailing garbage
            "1980-01-02T25:00",
            "1980-01-02T10:2030",
            "1980-01-02T10:20:30+01:00", // non-UTC offset
            "1980T10:20",     // time without a complete date
            "-200",
            "200 BC",
            "5 AD",
        ] {
            assert!(parse_iso8601(input).is_none(), "accepted {input:?}");
        }
    }

    #[test]
    fn gregorian_years_and_eras() {
        assert_eq!(parse_gregorian("1980").unwrap().year(), 1980);
        assert_eq!(parse_gregorian("200").unwrap().year(), 200);
        assert_eq!(parse_gregorian("5 AD").unwrap().year(), 5);
        assert_eq!(parse_gregorian("200 BC").unwrap().year(), -199);
        assert_eq!(parse_gregorian("1 BC").unwrap().year(), 0);
        assert_eq!(parse_gregorian("-200").unwrap().year(), -200);
        assert_eq!(parse_gregorian("200 bc").unwrap().year(), -199);
        assert_eq!(parse_gregorian("200BC").unwrap().year(), -199);
    }

    #[test]
    fn gregorian_is_year_only() {
        let instant = parse_gregorian("200 BC").unwrap();
        assert_eq!(instant.month(), 1);
        assert_eq!(instant.day(), 1);
        assert_eq!(instant.hour(), 0);
    }

    #[test]
    fn gregorian_rejects_malformed_input() {
        for input in ["", "test", "-5 BC", "+5 BC", "BC", "99999", "1980-01-02"] {
            assert!(parse_gregorian(input).is_none(), "accepted {input:?}");
        }
    }

    #[test]
    fn hybrid_gives_iso_priority() {
        for input in ["1980-01-02", "19800102", "1980", "1980-01-02T10:20:30Z"] {
            assert_eq!(parse_hybrid(input), parse_iso8601(input));
            assert!(parse_hybrid(input).is_some());
        }
    }

    #[test]
    fn hybrid_falls_back_to_gregorian() {
        for input in ["200 BC", "5 AD", "-200", "200"] {
            assert!(parse_iso8601(input).is_none());
            assert_eq!(parse_hybrid(input), parse_gregorian(input));
            assert!(parse_hybrid(input).is_some());
        }
    }

    #[test]
    fn hybrid_rejects_malformed_input() {
        for input in ["", "test", "-5 BC"] {
            assert!(parse_hybrid(input).is_none(), "accepted {input:?}");
        }
    }

    #[test]
    fn format_round_trips_through_iso8601() {
        for input in [
            "1980-01-02 10:20:30Z",
            "19800102T102030Z",
            "1980-01-02T23:59:59",
        ] {
            let instant = parse_iso8601(input).unwrap();
            let formatted = instant.format(Granularity::Seconds);
            assert_eq!(parse_iso8601(&formatted).unwrap(), instant);
        }
    }

    #[test]
    fn strategy_lookup() {
        assert_eq!("iso8601".parse::<Strategy>().unwrap(), Strategy::Iso8601);
        assert_eq!("ISO8601".parse::<Strategy>().unwrap(), Strategy::Iso8601);
        assert_eq!("gregorian".parse::<Strategy>().unwrap(), Strategy::Gregorian);
        assert_eq!("Hybrid".parse::<Strategy>().unwrap(), Strategy::Hybrid);
        assert!("unknown".parse::<Strategy>().is_err());
        assert_eq!(Strategy::default(), Strategy::Hybrid);
        assert_eq!(Strategy::Iso8601.to_string(), "iso8601");
    }

    #[test]
    fn strategy_dispatch() {
        let input = "1980-01-02 10:20:30Z";
        assert_eq!(Strategy::Iso8601.parse(input), parse_iso8601(input));
        assert_eq!(Strategy::Hybrid.parse(input), parse_hybrid(input));
        assert!(Strategy::Gregorian.parse(input).is_none());
        assert_eq!(
            Strategy::Gregorian.parse("200 BC").unwrap().year(),
            -199
        );
    }
}
