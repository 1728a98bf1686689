//! # kronos
//!
//! Timezone-aware inclusive date ranges.
//!
//! A [`DateRange`] runs from the start of one calendar day to the end of
//! another (00:00:00.000000 through 23:59:59.999999) in a chosen timezone.
//! Ranges come from explicit bounds, from named presets such as `MTD` or
//! `LAST_WEEK__MON`, or from environment defaults, and can be split, shifted,
//! reprojected and walked day by day.
//!
//! ## Modules
//!
//! - [`range`]: The `DateRange` value object and its builder
//! - [`kind`]: Derived ranges (`day_range`, `splice`, `shift`, `last_x_days`) generic over wrapper types
//! - [`preset`]: Named range presets
//! - [`shift`]: Calendar deltas
//! - [`moment`]: Accepted bound inputs (text, dates, naive and aware datetimes)
//! - [`timezone`]: Timezone arguments
//! - [`config`]: `KRONOS_*` environment defaults
//! - [`error`]: Error types
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use kronos::{DateRange, DateRangeKind, KronosConfig};
//!
//! let now = Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap();
//! let range = DateRange::builder()
//!     .config(KronosConfig::default())
//!     .build_at(now)
//!     .unwrap();
//! assert_eq!(range.start_date(), "2026-02-17");
//! assert_eq!(range.end_date(), "2026-02-18");
//! assert_eq!(range.day_range().count(), 2);
//! ```

pub mod config;
pub mod error;
pub mod kind;
pub mod moment;
pub mod preset;
pub mod range;
pub mod shift;
pub mod timezone;

pub use config::KronosConfig;
pub use error::{KronosError, Result};
pub use kind::{DateRangeKind, DayRange};
pub use moment::Moment;
pub use preset::NamedRange;
pub use range::{DateRange, DateRangeBuilder};
pub use shift::Shift;
pub use timezone::TimezoneArg;
