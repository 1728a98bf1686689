//! Named date range presets.
//!
//! A preset is a symbolic range such as `MTD` or `LAST_WEEK__MON` that
//! resolves to concrete calendar dates relative to a "today" anchor.
//! Like the rest of the crate, resolution never reads the clock: the caller
//! supplies today's date in the target timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

use crate::error::{KronosError, Result};

/// Weekday suffixes accepted by `LAST_WEEK__<DAY>`, in Sunday-first order.
const WEEKDAY_ABBREVIATIONS: [(&str, Weekday); 7] = [
    ("SUN", Weekday::Sun),
    ("MON", Weekday::Mon),
    ("TUES", Weekday::Tue),
    ("WED", Weekday::Wed),
    ("THURS", Weekday::Thu),
    ("FRI", Weekday::Fri),
    ("SAT", Weekday::Sat),
];

const LAST_WEEK_PREFIX: &str = "LAST_WEEK__";

/// A registered named range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedRange {
    /// Yesterday through today.
    Latest,
    /// Alias of [`NamedRange::Latest`].
    YesterdayToday,
    /// Today only.
    Today,
    /// First day of the current month through today (`MTD`).
    MonthToDate,
    /// The whole previous calendar month.
    LastMonth,
    /// Seven days ago through today.
    Last7Days,
    /// Thirty days ago through today.
    Last30Days,
    /// The seven-day window starting at the most recent given weekday
    /// strictly before today.
    LastWeek(Weekday),
}

impl NamedRange {
    /// Every accepted preset name, in canonical upper case.
    pub fn valid_names() -> Vec<String> {
        let mut names: Vec<String> = [
            "LATEST",
            "YESTERDAY_TODAY",
            "TODAY",
            "MTD",
            "LAST_MONTH",
            "LAST_7_DAYS",
            "LAST_30_DAYS",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        names.extend(
            WEEKDAY_ABBREVIATIONS
                .iter()
                .map(|(abbr, _)| format!("{LAST_WEEK_PREFIX}{abbr}")),
        );
        names
    }

    /// Resolve to inclusive `(start, end)` calendar dates relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::OutOfRange`] if the dates fall outside the
    /// representable calendar.
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let resolved = match self {
            NamedRange::Latest | NamedRange::YesterdayToday => {
                today.pred_opt().map(|yesterday| (yesterday, today))
            }
            NamedRange::Today => Some((today, today)),
            NamedRange::MonthToDate => {
                NaiveDate::from_ymd_opt(today.year(), today.month(), 1).map(|first| (first, today))
            }
            NamedRange::LastMonth => {
                let (y, m) = if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                };
                // Last day of prev month = day before 1st of current month
                NaiveDate::from_ymd_opt(y, m, 1).and_then(|first| {
                    let last = today.with_day(1)?.pred_opt()?;
                    Some((first, last))
                })
            }
            NamedRange::Last7Days => days_back(today, 7).map(|start| (start, today)),
            NamedRange::Last30Days => days_back(today, 30).map(|start| (start, today)),
            NamedRange::LastWeek(weekday) => {
                // Always past: if today is the same weekday, go to last week
                let days_since = (today.weekday().num_days_from_monday() as i64
                    - weekday.num_days_from_monday() as i64
                    + 7)
                    % 7;
                let days_since = if days_since == 0 { 7 } else { days_since };
                days_back(today, days_since).and_then(|start| {
                    let end = start.checked_add_signed(TimeDelta::days(6))?;
                    Some((start, end))
                })
            }
        };

        let (start, end) = resolved.ok_or_else(|| {
            KronosError::OutOfRange(format!("cannot resolve {self} relative to {today}"))
        })?;
        tracing::debug!(preset = %self, %today, %start, %end, "resolved named range");
        Ok((start, end))
    }
}

fn days_back(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    today.checked_sub_signed(TimeDelta::try_days(days)?)
}

impl fmt::Display for NamedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedRange::Latest => f.write_str("LATEST"),
            NamedRange::YesterdayToday => f.write_str("YESTERDAY_TODAY"),
            NamedRange::Today => f.write_str("TODAY"),
            NamedRange::MonthToDate => f.write_str("MTD"),
            NamedRange::LastMonth => f.write_str("LAST_MONTH"),
            NamedRange::Last7Days => f.write_str("LAST_7_DAYS"),
            NamedRange::Last30Days => f.write_str("LAST_30_DAYS"),
            NamedRange::LastWeek(weekday) => {
                let abbr = WEEKDAY_ABBREVIATIONS
                    .iter()
                    .find(|(_, w)| w == weekday)
                    .map(|(abbr, _)| *abbr)
                    .unwrap_or("SUN");
                write!(f, "{LAST_WEEK_PREFIX}{abbr}")
            }
        }
    }
}

impl FromStr for NamedRange {
    type Err = KronosError;

    /// Parse a preset name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_uppercase();
        let preset = match name.as_str() {
            "LATEST" => NamedRange::Latest,
            "YESTERDAY_TODAY" => NamedRange::YesterdayToday,
            "TODAY" => NamedRange::Today,
            "MTD" => NamedRange::MonthToDate,
            "LAST_MONTH" => NamedRange::LastMonth,
            "LAST_7_DAYS" => NamedRange::Last7Days,
            "LAST_30_DAYS" => NamedRange::Last30Days,
            other => other
                .strip_prefix(LAST_WEEK_PREFIX)
                .and_then(|abbr| {
                    WEEKDAY_ABBREVIATIONS
                        .iter()
                        .find(|(a, _)| *a == abbr)
                        .map(|(_, weekday)| NamedRange::LastWeek(*weekday))
                })
                .ok_or_else(|| {
                    KronosError::Config(format!(
                        "unknown named range '{}'. Accepted values: {}",
                        s.trim(),
                        NamedRange::valid_names().join(", ")
                    ))
                })?,
        };
        Ok(preset)
    }
}
