//! Derived ranges that keep the caller's concrete type.
//!
//! Applications often wrap [`DateRange`] to add behavior (a fiscal calendar,
//! a reporting window). Implementing [`DateRangeKind`] for the wrapper gives
//! it `day_range`, `splice`, `shift` and `last_x_days`, and each of those
//! returns the wrapper rather than a bare `DateRange`.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use kronos::{DateRange, DateRangeKind, KronosConfig, Shift};
//!
//! struct Billing(DateRange);
//!
//! impl DateRangeKind for Billing {
//!     fn from_range(range: DateRange) -> Self {
//!         Billing(range)
//!     }
//!
//!     fn range(&self) -> &DateRange {
//!         &self.0
//!     }
//! }
//!
//! let now = Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
//! let period: Billing = Billing::last_x_days_with(7, &KronosConfig::default(), now).unwrap();
//! let next: Billing = period.shift(Shift::weeks(1)).unwrap();
//! assert_eq!(next.range().end_date(), "2026-02-25");
//! ```

use std::iter::FusedIterator;
use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::config::KronosConfig;
use crate::error::{KronosError, Result};
use crate::moment::{validate_format, Moment};
use crate::range::DateRange;
use crate::shift::Shift;
use crate::timezone::parse_timezone;

/// A type that is, or wraps, a [`DateRange`].
pub trait DateRangeKind: Sized {
    /// Wrap a freshly derived range.
    fn from_range(range: DateRange) -> Self;

    /// The underlying range.
    fn range(&self) -> &DateRange;

    /// One single-day range per calendar day from start's date through
    /// end's date, inclusive, in the same zone and format.
    fn day_range(&self) -> DayRange<Self> {
        DayRange::new(self.range())
    }

    /// Split at `point` into `[start, point]` and `[point, end]`.
    ///
    /// Text points are parsed with `pattern`, or the range's format when
    /// `None`. Zone-naive points are read in the range's zone.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::SpliceDomain`] if `point` is outside the range,
    /// or [`KronosError::Parse`] if text does not match the pattern.
    fn splice<M: Into<Moment>>(&self, point: M, pattern: Option<&str>) -> Result<(Self, Self)> {
        let (before, after) = self.range().splice_bounds(&point.into(), pattern)?;
        Ok((Self::from_range(before), Self::from_range(after)))
    }

    /// Move both boundaries by `delta`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::OutOfRange`] if a boundary leaves the
    /// representable calendar.
    fn shift(&self, delta: Shift) -> Result<Self> {
        self.range().shifted(delta).map(Self::from_range)
    }

    /// `days` days ago through today, in the process-wide default zone.
    ///
    /// # Errors
    ///
    /// See [`DateRangeKind::last_x_days_with`].
    fn last_x_days(days: i64) -> Result<Self> {
        Self::last_x_days_with(days, KronosConfig::global(), Utc::now())
    }

    /// `days` days ago through today, evaluated at `now` in `config`'s zone.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::InvalidTimezone`] for a bad configured zone,
    /// [`KronosError::InvalidFormat`] for a bad configured format,
    /// [`KronosError::RangeOrder`] for negative `days`, or
    /// [`KronosError::OutOfRange`] if the start cannot be represented.
    fn last_x_days_with(days: i64, config: &KronosConfig, now: DateTime<Utc>) -> Result<Self> {
        let tz = parse_timezone(&config.timezone)?;
        validate_format(&config.format)?;
        let today = now.with_timezone(&tz).date_naive();
        let start = TimeDelta::try_days(days)
            .and_then(|delta| today.checked_sub_signed(delta))
            .ok_or_else(|| KronosError::OutOfRange(format!("{days} days before {today}")))?;
        DateRange::for_dates(start, today, tz, config.format.clone()).map(Self::from_range)
    }
}

/// Lazy iterator over the single-day ranges of a range.
///
/// Created by [`DateRangeKind::day_range`].
#[derive(Debug, Clone)]
pub struct DayRange<K> {
    next: Option<NaiveDate>,
    last: NaiveDate,
    tz: Tz,
    format: String,
    kind: PhantomData<fn() -> K>,
}

impl<K> DayRange<K> {
    fn new(range: &DateRange) -> Self {
        Self {
            next: Some(range.start().date_naive()),
            last: range.end().date_naive(),
            tz: range.timezone(),
            format: range.format().to_string(),
            kind: PhantomData,
        }
    }

    fn remaining(&self) -> usize {
        match self.next {
            Some(next) if next <= self.last => (self.last - next).num_days() as usize + 1,
            _ => 0,
        }
    }
}

impl<K: DateRangeKind> Iterator for DayRange<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let day = self.next.filter(|day| *day <= self.last)?;
        self.next = day.succ_opt();
        Some(K::from_range(DateRange::for_day(
            day,
            self.tz,
            self.format.clone(),
        )))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<K: DateRangeKind> ExactSizeIterator for DayRange<K> {}

impl<K: DateRangeKind> FusedIterator for DayRange<K> {}
