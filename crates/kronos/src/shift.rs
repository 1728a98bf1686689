//! Calendar deltas applied to range boundaries.

use std::str::FromStr;

use chrono::{DateTime, Months, TimeDelta};
use chrono_tz::Tz;

use crate::error::{KronosError, Result};
use crate::timezone::{localize, Fold};

/// A signed calendar delta.
///
/// Month, week and day components move the wall-clock date in the range's
/// timezone (so midnight stays midnight across DST). Hour, minute and second
/// components are exact elapsed time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shift {
    pub months: i32,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Shift {
    pub fn months(n: i32) -> Self {
        Self {
            months: n,
            ..Default::default()
        }
    }

    pub fn weeks(n: i64) -> Self {
        Self {
            weeks: n,
            ..Default::default()
        }
    }

    pub fn days(n: i64) -> Self {
        Self {
            days: n,
            ..Default::default()
        }
    }

    pub fn hours(n: i64) -> Self {
        Self {
            hours: n,
            ..Default::default()
        }
    }

    /// The same delta in the opposite direction.
    pub fn negate(self) -> Self {
        Self {
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
        }
    }

    pub(crate) fn apply(&self, dt: &DateTime<Tz>, fold: Fold) -> Result<DateTime<Tz>> {
        let overflow =
            || KronosError::OutOfRange(format!("shifting {} by {:?}", dt.to_rfc3339(), self));
        let tz = dt.timezone();

        let mut local = dt.naive_local();
        if self.months > 0 {
            local = local
                .checked_add_months(Months::new(self.months.unsigned_abs()))
                .ok_or_else(overflow)?;
        } else if self.months < 0 {
            local = local
                .checked_sub_months(Months::new(self.months.unsigned_abs()))
                .ok_or_else(overflow)?;
        }

        let total_days = self
            .weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(self.days))
            .and_then(TimeDelta::try_days)
            .ok_or_else(overflow)?;
        local = local.checked_add_signed(total_days).ok_or_else(overflow)?;

        let calendar_moved = self.months != 0 || total_days != TimeDelta::zero();
        let shifted = if calendar_moved {
            localize(&tz, local, fold)
        } else {
            *dt
        };

        let sub_day = self
            .hours
            .checked_mul(3600)
            .zip(self.minutes.checked_mul(60))
            .and_then(|(h, m)| h.checked_add(m))
            .and_then(|hm| hm.checked_add(self.seconds))
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(overflow)?;
        shifted.checked_add_signed(sub_day).ok_or_else(overflow)
    }
}

impl FromStr for Shift {
    type Err = KronosError;

    /// Parse a duration string (e.g., "+2h", "-1d30m", "+1w2d").
    ///
    /// Must start with `+` or `-`, followed by one or more `N<unit>`
    /// components where unit is `w`, `d`, `h`, `m` or `s`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KronosError::InvalidDuration("empty duration".to_string()));
        }

        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1i64, &s[1..]),
            Some(b'-') => (-1i64, &s[1..]),
            _ => {
                return Err(KronosError::InvalidDuration(format!(
                    "duration must start with '+' or '-': '{s}'"
                )));
            }
        };

        if rest.is_empty() {
            return Err(KronosError::InvalidDuration(format!(
                "duration has no components: '{s}'"
            )));
        }

        let mut parsed = Shift::default();
        let mut num_buf = String::new();

        for ch in rest.chars() {
            if ch.is_ascii_digit() {
                num_buf.push(ch);
                continue;
            }
            if num_buf.is_empty() {
                return Err(KronosError::InvalidDuration(format!(
                    "expected number before '{ch}' in '{s}'"
                )));
            }
            let n: i64 = num_buf
                .parse()
                .map_err(|_| KronosError::InvalidDuration(format!("invalid number in '{s}'")))?;
            num_buf.clear();

            let slot = match ch {
                'w' | 'W' => &mut parsed.weeks,
                'd' | 'D' => &mut parsed.days,
                'h' | 'H' => &mut parsed.hours,
                'm' | 'M' => &mut parsed.minutes,
                's' | 'S' => &mut parsed.seconds,
                _ => {
                    return Err(KronosError::InvalidDuration(format!(
                        "unknown unit '{ch}' in '{s}'"
                    )));
                }
            };
            *slot = slot
                .checked_add(sign * n)
                .ok_or_else(|| KronosError::InvalidDuration(format!("overflow in '{s}'")))?;
        }

        // Trailing number without unit
        if !num_buf.is_empty() {
            return Err(KronosError::InvalidDuration(format!(
                "number without unit at end of '{s}'"
            )));
        }

        Ok(parsed)
    }
}
