//! Point-in-time inputs accepted by range construction and splicing.

use std::fmt::{self, Write};

use chrono::format::{Item, ParseErrorKind, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{KronosError, Result};
use crate::timezone::{localize, Fold};

/// A bound or splice point, before it has been placed in a range's timezone.
///
/// Zone-naive variants are read as wall-clock time in the range's zone;
/// zone-aware variants keep their absolute instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Moment {
    /// Text parsed with the range's format, or an explicit pattern.
    Text(String),
    /// A calendar date, read as midnight.
    Date(NaiveDate),
    /// A wall-clock date and time without a zone.
    Naive(NaiveDateTime),
    /// An absolute instant in any zone.
    Aware(DateTime<FixedOffset>),
}

impl From<&str> for Moment {
    fn from(s: &str) -> Self {
        Moment::Text(s.to_string())
    }
}

impl From<String> for Moment {
    fn from(s: String) -> Self {
        Moment::Text(s)
    }
}

impl From<NaiveDate> for Moment {
    fn from(d: NaiveDate) -> Self {
        Moment::Date(d)
    }
}

impl From<NaiveDateTime> for Moment {
    fn from(dt: NaiveDateTime) -> Self {
        Moment::Naive(dt)
    }
}

impl From<DateTime<FixedOffset>> for Moment {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Moment::Aware(dt)
    }
}

impl From<DateTime<Utc>> for Moment {
    fn from(dt: DateTime<Utc>) -> Self {
        Moment::Aware(dt.fixed_offset())
    }
}

impl From<DateTime<Tz>> for Moment {
    fn from(dt: DateTime<Tz>) -> Self {
        Moment::Aware(dt.fixed_offset())
    }
}

/// A moment with its text form parsed.
enum Parsed {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl Moment {
    fn parse(&self, format: &str) -> Result<Parsed> {
        match self {
            Moment::Text(s) => parse_with_format(s, format),
            Moment::Date(d) => Ok(Parsed::Naive(d.and_time(NaiveTime::MIN))),
            Moment::Naive(dt) => Ok(Parsed::Naive(*dt)),
            Moment::Aware(dt) => Ok(Parsed::Aware(*dt)),
        }
    }

    /// The wall-clock reading of this moment in `tz`.
    pub(crate) fn wall_clock(&self, tz: &Tz, format: &str) -> Result<NaiveDateTime> {
        Ok(match self.parse(format)? {
            Parsed::Naive(naive) => naive,
            Parsed::Aware(dt) => dt.with_timezone(tz).naive_local(),
        })
    }

    /// The absolute instant of this moment, expressed in `tz`.
    pub(crate) fn instant(&self, tz: &Tz, format: &str) -> Result<DateTime<Tz>> {
        Ok(match self.parse(format)? {
            Parsed::Naive(naive) => localize(tz, naive, Fold::Earliest),
            Parsed::Aware(dt) => dt.with_timezone(tz),
        })
    }
}

/// Parse `input` with a strftime pattern.
///
/// Patterns carrying an offset (`%z`) yield an aware instant; patterns
/// without a time component yield midnight of the parsed date.
fn parse_with_format(input: &str, format: &str) -> Result<Parsed> {
    let parse_error = |source: chrono::ParseError| KronosError::Parse {
        input: input.to_string(),
        format: format.to_string(),
        source,
    };

    if let Ok(dt) = DateTime::parse_from_str(input, format) {
        return Ok(Parsed::Aware(dt));
    }
    match NaiveDateTime::parse_from_str(input, format) {
        Ok(naive) => Ok(Parsed::Naive(naive)),
        Err(e) if e.kind() == ParseErrorKind::NotEnough => NaiveDate::parse_from_str(input, format)
            .map(|d| Parsed::Naive(d.and_time(NaiveTime::MIN)))
            .map_err(parse_error),
        Err(e) => Err(parse_error(e)),
    }
}

/// Reject patterns chrono cannot render.
pub(crate) fn validate_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(KronosError::InvalidFormat(format.to_string()));
    }
    Ok(())
}

/// Render a datetime with a caller-supplied pattern.
pub(crate) fn render<T: TimeZone>(dt: &DateTime<T>, format: &str) -> Result<String>
where
    T::Offset: fmt::Display,
{
    validate_format(format)?;
    write_formatted(dt.format(format), format)
}

/// Re-render a date string from `in_format` into `out_format`.
pub(crate) fn convert_date(input: &str, in_format: &str, out_format: &str) -> Result<String> {
    validate_format(out_format)?;
    match parse_with_format(input, in_format)? {
        Parsed::Naive(naive) => write_formatted(naive.format(out_format), out_format),
        Parsed::Aware(dt) => write_formatted(dt.format(out_format), out_format),
    }
}

// chrono reports items it cannot render (e.g. `%z` on a naive value) as a
// `fmt::Error`, which `to_string` would turn into a panic.
fn write_formatted(value: impl fmt::Display, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{value}").map_err(|_| KronosError::InvalidFormat(format.to_string()))?;
    Ok(out)
}
