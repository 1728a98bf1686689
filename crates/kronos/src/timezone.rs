//! Timezone arguments and wall-clock localization.
//!
//! Every public entry point that takes a timezone accepts a [`TimezoneArg`],
//! so callers may pass either an IANA name (`"America/New_York"`) or a `Tz`
//! they already resolved. [`localize`] turns a wall-clock reading into a
//! zone-aware instant without ever failing on DST transitions.

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::error::{KronosError, Result};

/// A timezone given by name or already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimezoneArg {
    /// An IANA timezone name, resolved on use.
    Name(String),
    /// A pre-built timezone.
    Resolved(Tz),
}

impl TimezoneArg {
    /// Resolve to a `Tz`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::InvalidTimezone`] if a name is not a valid IANA timezone.
    pub fn resolve(&self) -> Result<Tz> {
        match self {
            TimezoneArg::Name(name) => parse_timezone(name),
            TimezoneArg::Resolved(tz) => Ok(*tz),
        }
    }
}

impl From<&str> for TimezoneArg {
    fn from(name: &str) -> Self {
        TimezoneArg::Name(name.to_string())
    }
}

impl From<String> for TimezoneArg {
    fn from(name: String) -> Self {
        TimezoneArg::Name(name)
    }
}

impl From<&String> for TimezoneArg {
    fn from(name: &String) -> Self {
        TimezoneArg::Name(name.clone())
    }
}

impl From<Tz> for TimezoneArg {
    fn from(tz: Tz) -> Self {
        TimezoneArg::Resolved(tz)
    }
}

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| KronosError::InvalidTimezone(format!("'{}'", s)))
}

/// Which instant to pick when a wall-clock time occurs twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fold {
    Earliest,
    Latest,
}

/// Attach `tz` to a wall-clock reading.
///
/// Ambiguous readings (DST fall back) resolve per `fold`. Readings inside a
/// DST gap are interpreted with the offset in effect before the gap, which
/// lands on the first valid wall-clock time after it.
pub(crate) fn localize(tz: &Tz, naive: NaiveDateTime, fold: Fold) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(early, late) => match fold {
            Fold::Earliest => early,
            Fold::Latest => late,
        },
        LocalResult::None => {
            let earlier = naive
                .checked_sub_signed(TimeDelta::days(1))
                .unwrap_or(naive);
            let before = tz.offset_from_utc_datetime(&earlier).fix();
            tz.from_utc_datetime(&(naive - before))
        }
    }
}
