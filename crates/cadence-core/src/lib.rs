//! Core vocabulary for calendar-aware stepping.
//!
//! This crate defines the unit and step types shared by the cadence
//! workspace:
//! - [`Unit`]: the closed set of calendar and clock units.
//! - [`Step`]: a set of signed unit amounts, compared and hashed by
//!   configuration.
//! - [`calendar`]: proleptic Gregorian helpers.
//!
//! It deliberately depends on no time library; the arithmetic lives in
//! `cadence-range`.

pub mod calendar;
pub mod error;
pub mod step;
pub mod unit;

pub use error::{CoreResult, StepError, UnitError};
pub use step::{NormalizedStep, Step};
pub use unit::Unit;
