//! Calendar-aware stepping and lazy time ranges.
//!
//! This crate generates recurring schedules ("every 2 weeks from X",
//! "every quarter until Y") with calendar-correct semantics. A month or
//! a year is not a fixed duration, so points are produced by repeatedly
//! advancing a calendar date rather than adding a constant offset:
//! - [`CalendarAdvance`]: "point + N calendar units" across month and
//!   year boundaries, leap years and DST transitions, for
//!   [`chrono::NaiveDate`] and [`chrono::DateTime`].
//! - [`SteppedRange`]: a bounded or unbounded interval plus a [`Step`],
//!   producing a lazy, restartable sequence of points.
//!
//! ```
//! use cadence_range::{Step, SteppedRange};
//! use chrono::NaiveDate;
//!
//! let jan = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
//! let range = SteppedRange::inclusive(jan(1), jan(10))
//!     .with_step(Step::days(3))?;
//! let points: Vec<_> = range.iter()?.collect();
//! assert_eq!(points, vec![jan(1), jan(4), jan(7), jan(10)]);
//! # Ok::<(), cadence_range::RangeError>(())
//! ```

pub mod advance;
pub mod error;
mod iterate;
pub mod range;

pub use advance::{CalendarAdvance, DstPolicy};
pub use error::{AdvanceError, RangeError, RangeResult};
pub use iterate::iterate;
pub use range::{Iter, PointCount, SteppedRange};

// Re-export the core vocabulary so callers need one import.
pub use cadence_core::{Step, StepError, Unit};
