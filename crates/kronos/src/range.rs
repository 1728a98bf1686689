//! The [`DateRange`] value object and its builder.
//!
//! A range is two zone-aware instants plus the timezone and format they are
//! read and rendered with. Construction resolves calendar dates from explicit
//! bounds, a named preset, or the configured default preset, then pins the
//! start to 00:00:00.000000 and the end to 23:59:59.999999 in the range's
//! zone. That normalization happens once; derived ranges (splice, shift) keep
//! whatever instants they are given.
//!
//! Every clock-dependent entry point has an `_at` form taking the "now"
//! anchor explicitly, so results are reproducible in tests.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::config::KronosConfig;
use crate::error::{KronosError, Result};
use crate::kind::DateRangeKind;
use crate::moment::{self, Moment};
use crate::preset::NamedRange;
use crate::shift::Shift;
use crate::timezone::{localize, parse_timezone, Fold, TimezoneArg};

/// An inclusive, timezone-aware date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    tz: Tz,
    format: String,
}

impl DateRange {
    /// Start building a range. Unset options fall back to [`KronosConfig::global`].
    pub fn builder() -> DateRangeBuilder {
        DateRangeBuilder::default()
    }

    /// A range over explicit bounds, using the configured timezone and format.
    ///
    /// # Errors
    ///
    /// See [`DateRangeBuilder::build`].
    pub fn new(start: impl Into<Moment>, end: impl Into<Moment>) -> Result<Self> {
        Self::builder().start(start).end(end).build()
    }

    /// Normalize calendar dates to day boundaries in `tz`.
    pub(crate) fn for_dates(
        start: NaiveDate,
        end: NaiveDate,
        tz: Tz,
        format: String,
    ) -> Result<Self> {
        let start = start_of_day(&tz, start);
        let end = end_of_day(&tz, end);
        Self::with_bounds(start, end, tz, format)
    }

    /// The single-day range covering `date` in `tz`.
    pub(crate) fn for_day(date: NaiveDate, tz: Tz, format: String) -> Self {
        Self {
            start: start_of_day(&tz, date),
            end: end_of_day(&tz, date),
            tz,
            format,
        }
    }

    /// Wrap exact instants, checking only their order.
    pub(crate) fn with_bounds(
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        tz: Tz,
        format: String,
    ) -> Result<Self> {
        if start > end {
            return Err(KronosError::RangeOrder {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self {
            start: start.with_timezone(&tz),
            end: end.with_timezone(&tz),
            tz,
            format,
        })
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The default pattern for rendering and parsing.
    pub fn format(&self) -> &str {
        &self.format
    }

    // ── Formatting ──────────────────────────────────────────────────────

    /// The start rendered with the range's format.
    pub fn start_date(&self) -> String {
        // The format was validated at construction, so rendering cannot fail.
        self.start.format(&self.format).to_string()
    }

    /// The end rendered with the range's format.
    pub fn end_date(&self) -> String {
        self.end.format(&self.format).to_string()
    }

    /// The start rendered with `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::InvalidFormat`] if `pattern` cannot be rendered.
    pub fn format_start(&self, pattern: &str) -> Result<String> {
        moment::render(&self.start, pattern)
    }

    /// The end rendered with `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::InvalidFormat`] if `pattern` cannot be rendered.
    pub fn format_end(&self, pattern: &str) -> Result<String> {
        moment::render(&self.end, pattern)
    }

    /// Seconds since the Unix epoch, with microsecond precision.
    pub fn start_ts(&self) -> f64 {
        epoch_seconds(&self.start)
    }

    pub fn end_ts(&self) -> f64 {
        epoch_seconds(&self.end)
    }

    // ── Time-of-day setters ─────────────────────────────────────────────

    /// Overwrite the clock time of the start, keeping its date and zone.
    ///
    /// The range order is not re-checked afterwards; keeping `start <= end`
    /// is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::OutOfRange`] for an invalid clock time.
    pub fn set_start_time(
        &mut self,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: Option<u32>,
    ) -> Result<()> {
        let time = clock_time(hour, minute, second, microsecond)?;
        self.start = localize(&self.tz, self.start.date_naive().and_time(time), Fold::Earliest);
        Ok(())
    }

    /// Overwrite the clock time of the end, keeping its date and zone.
    ///
    /// Like [`DateRange::set_start_time`], this does not re-check the order.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::OutOfRange`] for an invalid clock time.
    pub fn set_end_time(
        &mut self,
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: Option<u32>,
    ) -> Result<()> {
        let time = clock_time(hour, minute, second, microsecond)?;
        self.end = localize(&self.tz, self.end.date_naive().and_time(time), Fold::Latest);
        Ok(())
    }

    // ── Timezone reprojection ───────────────────────────────────────────

    /// The start instant expressed in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::InvalidTimezone`] if `target` is not a valid IANA name.
    pub fn shift_start_tz(&self, target: impl Into<TimezoneArg>) -> Result<DateTime<Tz>> {
        let tz = target.into().resolve()?;
        Ok(self.start.with_timezone(&tz))
    }

    /// The end instant expressed in `target`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::InvalidTimezone`] if `target` is not a valid IANA name.
    pub fn shift_end_tz(&self, target: impl Into<TimezoneArg>) -> Result<DateTime<Tz>> {
        let tz = target.into().resolve()?;
        Ok(self.end.with_timezone(&tz))
    }

    // ── Clock helpers ───────────────────────────────────────────────────

    /// The current time in the range's timezone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// The current time in `timezone`.
    pub fn now_in(&self, timezone: impl Into<TimezoneArg>) -> Result<DateTime<Tz>> {
        let tz = timezone.into().resolve()?;
        Ok(Utc::now().with_timezone(&tz))
    }

    /// Today rendered with the range's format.
    pub fn today(&self) -> String {
        self.now().format(&self.format).to_string()
    }

    /// This time yesterday, rendered with the range's format.
    pub fn yesterday(&self) -> Result<String> {
        let yesterday = Shift::days(-1).apply(&self.now(), Fold::Earliest)?;
        Ok(yesterday.format(&self.format).to_string())
    }

    /// Every day in the range, as instants at the start's clock time.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::OutOfRange`] if a day cannot be represented.
    pub fn list_date_range(&self) -> Result<Vec<DateTime<Tz>>> {
        let mut days = Vec::new();
        let mut offset = 0;
        loop {
            let day = Shift::days(offset).apply(&self.start, Fold::Earliest)?;
            if day > self.end {
                break;
            }
            days.push(day);
            offset += 1;
        }
        Ok(days)
    }

    // ── Associated utilities ────────────────────────────────────────────

    /// Re-render `text` from `in_format` into `out_format`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::Parse`] if `text` does not match `in_format`,
    /// or [`KronosError::InvalidFormat`] if `out_format` cannot be rendered.
    pub fn convert_date(text: &str, in_format: &str, out_format: &str) -> Result<String> {
        moment::convert_date(text, in_format, out_format)
    }

    /// Convert epoch seconds to a datetime.
    ///
    /// Epoch seconds name one instant regardless of zone, so neither argument
    /// changes the instant returned. The result is expressed in `out_timezone`
    /// when given, otherwise in `in_timezone` (default UTC). With both given,
    /// `in_timezone` is only resolved and validated.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::OutOfRange`] for timestamps chrono cannot
    /// represent, or [`KronosError::InvalidTimezone`] for unknown zone names.
    ///
    /// # Examples
    ///
    /// ```
    /// use kronos::DateRange;
    ///
    /// let dt = DateRange::from_timestamp(0.0, None, Some("Asia/Tokyo".into())).unwrap();
    /// assert_eq!(dt.to_rfc3339(), "1970-01-01T09:00:00+09:00");
    /// ```
    pub fn from_timestamp(
        unix_seconds: f64,
        in_timezone: Option<TimezoneArg>,
        out_timezone: Option<TimezoneArg>,
    ) -> Result<DateTime<Tz>> {
        let out_of_range = || KronosError::OutOfRange(format!("timestamp {unix_seconds}"));
        if !unix_seconds.is_finite() {
            return Err(out_of_range());
        }
        let micros = (unix_seconds * 1_000_000.0).round();
        if micros.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }
        let utc = DateTime::<Utc>::from_timestamp_micros(micros as i64).ok_or_else(out_of_range)?;

        let in_tz = match in_timezone {
            Some(arg) => arg.resolve()?,
            None => Tz::UTC,
        };
        let local = utc.with_timezone(&in_tz);
        match out_timezone {
            Some(arg) => Ok(local.with_timezone(&arg.resolve()?)),
            None => Ok(local),
        }
    }

    // ── Derived-range primitives ────────────────────────────────────────

    pub(crate) fn splice_bounds(
        &self,
        point: &Moment,
        pattern: Option<&str>,
    ) -> Result<(DateRange, DateRange)> {
        let pattern = pattern.unwrap_or(&self.format);
        let point = point.instant(&self.tz, pattern)?;
        if point < self.start || point > self.end {
            return Err(KronosError::SpliceDomain {
                point: point.to_rfc3339(),
                start: self.start.to_rfc3339(),
                end: self.end.to_rfc3339(),
            });
        }
        let before = Self::with_bounds(self.start, point, self.tz, self.format.clone())?;
        let after = Self::with_bounds(point, self.end, self.tz, self.format.clone())?;
        Ok((before, after))
    }

    pub(crate) fn shifted(&self, delta: Shift) -> Result<DateRange> {
        let start = delta.apply(&self.start, Fold::Earliest)?;
        let end = delta.apply(&self.end, Fold::Latest)?;
        Self::with_bounds(start, end, self.tz, self.format.clone())
    }
}

impl DateRangeKind for DateRange {
    fn from_range(range: DateRange) -> Self {
        range
    }

    fn range(&self) -> &DateRange {
        self
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DateRange(start_date='{}', end_date='{}', format='{}', timezone='{}')",
            self.start_date(),
            self.end_date(),
            self.format,
            self.tz.name()
        )
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DateRange", 4)?;
        state.serialize_field("start", &self.start.to_rfc3339())?;
        state.serialize_field("end", &self.end.to_rfc3339())?;
        state.serialize_field("timezone", self.tz.name())?;
        state.serialize_field("format", &self.format)?;
        state.end()
    }
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// Options for constructing a [`DateRange`].
///
/// | start | end | result |
/// |---|---|---|
/// | unset | unset | named range, else the configured default range |
/// | set | unset | start through today |
/// | unset | set | [`KronosError::InvalidCombination`] |
/// | set | set | start through end |
#[derive(Debug, Clone, Default)]
pub struct DateRangeBuilder {
    start: Option<Moment>,
    end: Option<Moment>,
    timezone: Option<TimezoneArg>,
    format: Option<String>,
    named_range: Option<String>,
    config: Option<KronosConfig>,
}

impl DateRangeBuilder {
    pub fn start(mut self, start: impl Into<Moment>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<Moment>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn timezone(mut self, timezone: impl Into<TimezoneArg>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Pattern used to parse text bounds and to render the range.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// A preset name such as `"MTD"`, matched case-insensitively at build time.
    pub fn named_range(mut self, name: impl Into<String>) -> Self {
        self.named_range = Some(name.into());
        self
    }

    pub fn preset(self, preset: NamedRange) -> Self {
        self.named_range(preset.to_string())
    }

    /// Use `config` for unset options instead of the process-wide config.
    pub fn config(mut self, config: KronosConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build against the system clock.
    ///
    /// # Errors
    ///
    /// - [`KronosError::InvalidTimezone`] for an unknown zone name
    /// - [`KronosError::InvalidFormat`] for an unrenderable format
    /// - [`KronosError::Config`] for an unknown named range
    /// - [`KronosError::InvalidCombination`] for an end without a start
    /// - [`KronosError::Parse`] for text bounds that do not match the format
    /// - [`KronosError::RangeOrder`] if start falls after end
    pub fn build(self) -> Result<DateRange> {
        self.build_at(Utc::now())
    }

    /// Build with `now` as the anchor for "today".
    ///
    /// # Errors
    ///
    /// See [`DateRangeBuilder::build`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use kronos::{DateRange, KronosConfig};
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
    /// let range = DateRange::builder()
    ///     .config(KronosConfig::default())
    ///     .named_range("mtd")
    ///     .build_at(now)
    ///     .unwrap();
    /// assert_eq!(range.start_date(), "2026-02-01");
    /// assert_eq!(range.end_date(), "2026-02-18");
    /// ```
    pub fn build_at(self, now: DateTime<Utc>) -> Result<DateRange> {
        let config = match self.config {
            Some(config) => config,
            None => KronosConfig::global().clone(),
        };
        let tz = match &self.timezone {
            Some(arg) => arg.resolve()?,
            None => parse_timezone(&config.timezone)?,
        };
        let format = self.format.unwrap_or_else(|| config.format.clone());
        moment::validate_format(&format)?;

        let today = now.with_timezone(&tz).date_naive();
        let (start, end) = match (&self.start, &self.end) {
            (None, None) => {
                let preset = match &self.named_range {
                    Some(name) => name.parse::<NamedRange>()?,
                    None => config.named_range()?,
                };
                preset.resolve(today)?
            }
            (None, Some(end)) => {
                return Err(KronosError::InvalidCombination(format!(
                    "end {:?} given without a start; supply a start, or neither bound",
                    end
                )));
            }
            (Some(start), None) => (start.wall_clock(&tz, &format)?.date(), today),
            (Some(start), Some(end)) => (
                start.wall_clock(&tz, &format)?.date(),
                end.wall_clock(&tz, &format)?.date(),
            ),
        };

        let range = DateRange::for_dates(start, end, tz, format)?;
        tracing::trace!(%range, "constructed date range");
        Ok(range)
    }

    /// Build a specialized kind against the system clock.
    ///
    /// # Errors
    ///
    /// See [`DateRangeBuilder::build`].
    pub fn build_as<K: DateRangeKind>(self) -> Result<K> {
        self.build().map(K::from_range)
    }

    /// Build a specialized kind with `now` as the anchor.
    ///
    /// # Errors
    ///
    /// See [`DateRangeBuilder::build`].
    pub fn build_as_at<K: DateRangeKind>(self, now: DateTime<Utc>) -> Result<K> {
        self.build_at(now).map(K::from_range)
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn start_of_day(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    localize(tz, date.and_time(NaiveTime::MIN), Fold::Earliest)
}

fn end_of_day(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    // 23:59:59.999999
    let (last, _) = NaiveTime::MIN.overflowing_sub_signed(TimeDelta::microseconds(1));
    localize(tz, date.and_time(last), Fold::Latest)
}

fn clock_time(hour: u32, minute: u32, second: u32, microsecond: Option<u32>) -> Result<NaiveTime> {
    let micro = microsecond.unwrap_or(0);
    // chrono admits micro >= 1_000_000 as a leap second; a clock setter should not
    if micro >= 1_000_000 {
        return Err(KronosError::OutOfRange(format!(
            "microsecond {micro} must be in 0..1000000"
        )));
    }
    NaiveTime::from_hms_micro_opt(hour, minute, second, micro).ok_or_else(|| {
        KronosError::OutOfRange(format!(
            "time {hour:02}:{minute:02}:{second:02}.{micro:06} is not a valid clock time"
        ))
    })
}

fn epoch_seconds(dt: &DateTime<Tz>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_micros()) / 1_000_000.0
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeDelta, TimeZone, Timelike};

    const ISO_FMT: &str = "%Y-%m-%d %H:%M:%S";

    fn anchor() -> DateTime<Utc> {
        // Wednesday, February 18, 2026, 14:30:00 UTC
        Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap()
    }

    fn builder() -> DateRangeBuilder {
        DateRange::builder().config(KronosConfig::default())
    }

    fn explicit(start: &str, end: &str) -> DateRange {
        builder().start(start).end(end).build_at(anchor()).unwrap()
    }

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn test_default_preset_is_yesterday_today() {
        let range = builder().build_at(anchor()).unwrap();
        assert_eq!(range.start_date(), "2026-02-17");
        assert_eq!(range.end_date(), "2026-02-18");
        assert_eq!(range.start().time(), NaiveTime::MIN);
        assert_eq!(
            range.end().time(),
            NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap()
        );
        assert_eq!(range.timezone(), Tz::UTC);
    }

    #[test]
    fn test_configured_default_preset() {
        let config = KronosConfig {
            daterange: "last_month".to_string(),
            ..Default::default()
        };
        let range = DateRange::builder()
            .config(config)
            .build_at(anchor())
            .unwrap();
        assert_eq!(range.start_date(), "2026-01-01");
        assert_eq!(range.end_date(), "2026-01-31");
    }

    #[test]
    fn test_invalid_configured_preset_returns_config_error() {
        let config = KronosConfig {
            daterange: "FORTNIGHT".to_string(),
            ..Default::default()
        };
        let err = DateRange::builder()
            .config(config)
            .build_at(anchor())
            .unwrap_err();
        assert!(matches!(err, KronosError::Config(_)), "got: {err}");
    }

    #[test]
    fn test_explicit_named_range_wins_over_config() {
        let range = builder().named_range("MTD").build_at(anchor()).unwrap();
        assert_eq!(range.start().day(), 1);
        assert_eq!(range.end_date(), "2026-02-18");
    }

    #[test]
    fn test_named_range_ignored_with_explicit_bounds() {
        let range = builder()
            .named_range("MTD")
            .start("2026-02-10")
            .end("2026-02-12")
            .build_at(anchor())
            .unwrap();
        assert_eq!(range.start_date(), "2026-02-10");
    }

    #[test]
    fn test_last_month_end_is_month_end() {
        let range = builder()
            .preset(NamedRange::LastMonth)
            .build_at(anchor())
            .unwrap();
        assert_eq!(range.start().day(), 1);
        let next = *range.end() + TimeDelta::days(1);
        assert_eq!(next.day(), 1);
    }

    #[test]
    fn test_explicit_bounds_are_normalized() {
        let range = explicit("2023-03-01", "2023-03-08");
        assert_eq!(range.format_start(ISO_FMT).unwrap(), "2023-03-01 00:00:00");
        assert_eq!(range.format_end(ISO_FMT).unwrap(), "2023-03-08 23:59:59");
        assert_eq!(range.end().nanosecond(), 999_999_000);
    }

    #[test]
    fn test_datetime_text_is_normalized_to_day_boundaries() {
        let range = builder()
            .format(ISO_FMT)
            .start("2026-02-17 14:30:00")
            .end("2026-02-18 09:15:00")
            .build_at(anchor())
            .unwrap();
        assert_eq!(range.start_date(), "2026-02-17 00:00:00");
        assert_eq!(range.end_date(), "2026-02-18 23:59:59");
    }

    #[test]
    fn test_start_only_ends_today() {
        let range = builder().start("2026-02-01").build_at(anchor()).unwrap();
        assert_eq!(range.start_date(), "2026-02-01");
        assert_eq!(range.end_date(), "2026-02-18");
    }

    #[test]
    fn test_end_without_start_is_invalid_combination() {
        let err = builder().end("2026-02-18").build_at(anchor()).unwrap_err();
        assert!(matches!(err, KronosError::InvalidCombination(_)), "got: {err}");
    }

    #[test]
    fn test_start_after_end_is_range_order_error() {
        let err = builder()
            .start("2026-02-19")
            .end("2026-02-18")
            .build_at(anchor())
            .unwrap_err();
        assert!(matches!(err, KronosError::RangeOrder { .. }), "got: {err}");
    }

    #[test]
    fn test_unparseable_bound_is_parse_error() {
        let err = builder()
            .start("Feb 1 2026")
            .end("2026-02-18")
            .build_at(anchor())
            .unwrap_err();
        assert!(matches!(err, KronosError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn test_invalid_format_rejected_at_construction() {
        let err = builder().format("%Y-%").build_at(anchor()).unwrap_err();
        assert!(matches!(err, KronosError::InvalidFormat(_)), "got: {err}");
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let err = builder()
            .timezone("Mars/Olympus_Mons")
            .build_at(anchor())
            .unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_today_follows_target_timezone() {
        // 14:30 UTC on Feb 18 is already Feb 19 in Auckland (UTC+13)
        let range = builder()
            .timezone("Pacific/Auckland")
            .preset(NamedRange::Today)
            .build_at(anchor())
            .unwrap();
        assert_eq!(range.start_date(), "2026-02-19");
    }

    #[test]
    fn test_aware_bound_is_reprojected_before_normalizing() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 20, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 6, 2, 1, 0, 0).unwrap();
        let range = builder()
            .timezone(chrono_tz::Asia::Tokyo)
            .start(start)
            .end(end)
            .build_at(anchor())
            .unwrap();
        assert_eq!(range.start().to_rfc3339(), "2026-06-02T00:00:00+09:00");
        assert_eq!(range.end_date(), "2026-06-02");
    }

    #[test]
    fn test_naive_bound_is_wall_clock_in_zone() {
        let naive = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let range = builder()
            .timezone("America/New_York")
            .start(naive)
            .end(naive)
            .build_at(anchor())
            .unwrap();
        assert_eq!(range.start().to_rfc3339(), "2026-06-01T00:00:00-04:00");
    }

    #[test]
    fn test_new_uses_global_defaults() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        )
        .unwrap();
        assert_eq!(range.start().date_naive().year(), 2020);
    }

    // ── Formatting ──────────────────────────────────────────────────────

    #[test]
    fn test_format_accessors_do_not_mutate() {
        let range = explicit("2023-03-01", "2023-03-08");
        let before = range.clone();
        let _ = range.format_start("%d/%m/%Y").unwrap();
        let _ = range.format_end("%H").unwrap();
        assert_eq!(range, before);
        assert_eq!(range.start_date(), "2023-03-01");
    }

    #[test]
    fn test_format_with_invalid_pattern_returns_error() {
        let range = explicit("2023-03-01", "2023-03-08");
        assert!(matches!(
            range.format_start("%Y-%"),
            Err(KronosError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_timestamps() {
        let range = explicit("1970-01-01", "1970-01-01");
        assert_eq!(range.start_ts(), 0.0);
        assert!((range.end_ts() - 86_399.999_999).abs() < 1e-6);
    }

    #[test]
    fn test_display() {
        let range = explicit("2023-03-01", "2023-03-08");
        assert_eq!(
            range.to_string(),
            "DateRange(start_date='2023-03-01', end_date='2023-03-08', format='%Y-%m-%d', timezone='UTC')"
        );
    }

    #[test]
    fn test_serialize() {
        let range = explicit("2023-03-01", "2023-03-01");
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(json["start"], "2023-03-01T00:00:00+00:00");
        assert_eq!(json["end"], "2023-03-01T23:59:59.999999+00:00");
        assert_eq!(json["timezone"], "UTC");
        assert_eq!(json["format"], "%Y-%m-%d");
    }

    // ── Time-of-day setters ─────────────────────────────────────────────

    #[test]
    fn test_set_start_time_keeps_date_and_zone() {
        let mut range = builder()
            .timezone("America/New_York")
            .start("2026-03-01")
            .end("2026-03-03")
            .build_at(anchor())
            .unwrap();
        range.set_start_time(9, 30, 0, None).unwrap();
        assert_eq!(range.start().to_rfc3339(), "2026-03-01T09:30:00-05:00");
    }

    #[test]
    fn test_set_end_time_with_microseconds() {
        let mut range = explicit("2026-03-01", "2026-03-03");
        range.set_end_time(17, 0, 0, Some(250)).unwrap();
        assert_eq!(range.format_end("%H:%M:%S%.6f").unwrap(), "17:00:00.000250");
    }

    #[test]
    fn test_set_time_out_of_range() {
        let mut range = explicit("2026-03-01", "2026-03-03");
        assert!(matches!(
            range.set_start_time(24, 0, 0, None),
            Err(KronosError::OutOfRange(_))
        ));
        assert!(matches!(
            range.set_end_time(12, 60, 0, None),
            Err(KronosError::OutOfRange(_))
        ));
        assert!(matches!(
            range.set_end_time(23, 59, 59, Some(1_000_000)),
            Err(KronosError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_set_time_does_not_revalidate_order() {
        let mut range = explicit("2026-03-01", "2026-03-01");
        range.set_start_time(23, 0, 0, None).unwrap();
        range.set_end_time(1, 0, 0, None).unwrap();
        assert!(range.start() > range.end());
    }

    // ── Timezone reprojection ───────────────────────────────────────────

    #[test]
    fn test_shift_tz_preserves_instant() {
        let range = explicit("2026-01-15", "2026-01-16");
        let start = range.shift_start_tz("America/Los_Angeles").unwrap();
        assert_eq!(start.to_rfc3339(), "2026-01-14T16:00:00-08:00");
        assert_eq!(start, *range.start());
        let end = range.shift_end_tz(chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(end, *range.end());
        assert_eq!(range.start().timezone(), Tz::UTC);
    }

    #[test]
    fn test_shift_tz_invalid_target() {
        let range = explicit("2026-01-15", "2026-01-16");
        assert!(range.shift_start_tz("Nowhere/City").is_err());
    }

    // ── Utilities ───────────────────────────────────────────────────────

    #[test]
    fn test_from_timestamp_defaults_to_utc() {
        let dt = DateRange::from_timestamp(1_773_669_600.0, None, None).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-16T14:00:00+00:00");
    }

    #[test]
    fn test_from_timestamp_in_and_out_zones() {
        let dt = DateRange::from_timestamp(
            1_773_669_600.5,
            Some("America/New_York".into()),
            Some(chrono_tz::Europe::Berlin.into()),
        )
        .unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-16T15:00:00.500+01:00");
        let in_only =
            DateRange::from_timestamp(1_773_669_600.0, Some("America/New_York".into()), None)
                .unwrap();
        assert_eq!(in_only.to_rfc3339(), "2026-03-16T10:00:00-04:00");
    }

    #[test]
    fn test_from_timestamp_in_zone_does_not_move_instant() {
        let ts = 1_773_669_600.0;
        let berlin = || Some(TimezoneArg::from(chrono_tz::Europe::Berlin));
        let from_ny = DateRange::from_timestamp(ts, Some("America/New_York".into()), berlin())
            .unwrap();
        let from_utc = DateRange::from_timestamp(ts, None, berlin()).unwrap();
        assert_eq!(from_ny, from_utc);
        assert_eq!(from_ny.timestamp(), 1_773_669_600);
        let err = DateRange::from_timestamp(ts, Some("Mars/Base".into()), berlin()).unwrap_err();
        assert!(matches!(err, KronosError::InvalidTimezone(_)), "got: {err}");
    }

    #[test]
    fn test_from_timestamp_rejects_non_finite() {
        assert!(DateRange::from_timestamp(f64::NAN, None, None).is_err());
        assert!(DateRange::from_timestamp(f64::INFINITY, None, None).is_err());
        assert!(DateRange::from_timestamp(1e300, None, None).is_err());
    }

    #[test]
    fn test_for_day_at_calendar_edges() {
        let range = DateRange::for_day(NaiveDate::MAX, Tz::UTC, "%Y-%m-%d".to_string());
        assert_eq!(range.start().date_naive(), NaiveDate::MAX);
        assert_eq!(range.end().date_naive(), NaiveDate::MAX);
        assert_eq!(range.end().time().to_string(), "23:59:59.999999");
        let fall_back = DateRange::for_day(
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            chrono_tz::America::New_York,
            "%Y-%m-%d".to_string(),
        );
        assert!((fall_back.end_ts() - fall_back.start_ts() - 25.0 * 3600.0).abs() < 1.0);
    }

    #[test]
    fn test_convert_date() {
        let out = DateRange::convert_date("2026-02-18", "%Y-%m-%d", "%B %-d, %Y").unwrap();
        assert_eq!(out, "February 18, 2026");
    }

    #[test]
    fn test_list_date_range() {
        let range = explicit("2026-02-27", "2026-03-02");
        let days: Vec<String> = range
            .list_date_range()
            .unwrap()
            .iter()
            .map(|d| d.format("%m-%d").to_string())
            .collect();
        assert_eq!(days, ["02-27", "02-28", "03-01", "03-02"]);
    }

    #[test]
    fn test_today_and_yesterday_render_in_format() {
        let range = explicit("2026-02-27", "2026-03-02");
        let today = Utc::now().date_naive();
        let rendered = range.today();
        // Tolerate a midnight rollover between the two clock reads
        assert!(
            rendered == today.to_string() || rendered == today.succ_opt().unwrap().to_string(),
            "got: {rendered}"
        );
        assert!(range.yesterday().unwrap() < rendered);
    }

    #[test]
    fn test_now_in_other_zone() {
        let range = explicit("2026-02-27", "2026-03-02");
        let tokyo = range.now_in("Asia/Tokyo").unwrap();
        assert_eq!(tokyo.timezone(), chrono_tz::Asia::Tokyo);
        assert_eq!(range.now().timezone(), Tz::UTC);
    }
}
