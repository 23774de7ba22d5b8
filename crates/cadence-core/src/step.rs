//! Step configuration: how far apart consecutive points in a sequence are.
//!
//! A [`Step`] is a set of signed calendar-unit amounts, e.g. "2 weeks"
//! or "1 month and 12 hours". Steps are compared and hashed by
//! configuration, not by semantic distance: `{weeks: 1}` and `{days: 7}`
//! advance a point by the same distance but are distinct steps. This is
//! deliberate, so that two ranges stepped differently never compare
//! equal.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::StepError;
use crate::unit::Unit;

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// A set of calendar-unit amounts describing the distance between
/// consecutive points.
///
/// Amounts may be fractional for weeks and below; months, quarters and
/// years must be whole (validated by [`Step::validate`], not at
/// insertion). Quarters normalize to three months as soon as they are
/// added, so a step never stores quarters internally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Unit, f64>", into = "BTreeMap<Unit, f64>")]
pub struct Step {
    amounts: BTreeMap<Unit, f64>,
}

impl Step {
    /// Creates an empty step. Empty steps fail validation; add amounts
    /// with [`Step::with`] or use a unit constructor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this step with `amount` of `unit` set, replacing any
    /// previous amount for that unit.
    ///
    /// Quarters are stored as three months each. Negative zero is
    /// canonicalized to zero so that equality and hashing agree.
    #[must_use]
    pub fn with(mut self, unit: Unit, amount: impl Into<f64>) -> Self {
        let (unit, factor) = unit.canonical();
        let mut amount = amount.into() * factor;
        if amount == 0.0 {
            amount = 0.0;
        }
        self.amounts.insert(unit, amount);
        self
    }

    /// A step of whole or fractional seconds.
    #[must_use]
    pub fn seconds(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Seconds, amount)
    }

    /// A step of whole or fractional minutes.
    #[must_use]
    pub fn minutes(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Minutes, amount)
    }

    /// A step of whole or fractional hours.
    #[must_use]
    pub fn hours(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Hours, amount)
    }

    /// A step of days. Fractional days decompose into hours when the
    /// step is normalized.
    #[must_use]
    pub fn days(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Days, amount)
    }

    /// A step of weeks. Fractional weeks decompose into days when the
    /// step is normalized.
    #[must_use]
    pub fn weeks(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Weeks, amount)
    }

    /// A step of whole months.
    #[must_use]
    pub fn months(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Months, amount)
    }

    /// A step of whole quarters, stored as three months each.
    #[must_use]
    pub fn quarters(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Quarters, amount)
    }

    /// A step of whole years.
    #[must_use]
    pub fn years(amount: impl Into<f64>) -> Self {
        Self::new().with(Unit::Years, amount)
    }

    /// Returns the configured amount for `unit`, if any.
    ///
    /// Quarters are never stored; ask for months instead.
    #[must_use]
    pub fn get(&self, unit: Unit) -> Option<f64> {
        self.amounts.get(&unit).copied()
    }

    /// Returns whether no units are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Returns the configured `(unit, amount)` pairs, smallest unit
    /// first.
    pub fn amounts(&self) -> impl Iterator<Item = (Unit, f64)> + '_ {
        self.amounts.iter().map(|(&unit, &amount)| (unit, amount))
    }

    /// Returns whether applying this step touches the time of day.
    ///
    /// True when any of hours/minutes/seconds is configured (even with
    /// a zero amount), or when a fractional day or week remainder would
    /// decompose into hours.
    #[must_use]
    pub fn has_time_component(&self) -> bool {
        self.amounts.keys().any(|unit| unit.is_time_unit())
            || self
                .amounts
                .get(&Unit::Days)
                .is_some_and(|days| days.fract() != 0.0)
            || self
                .amounts
                .get(&Unit::Weeks)
                .is_some_and(|weeks| (weeks * 7.0).fract() != 0.0)
    }

    /// Checks the step invariants: at least one unit, all amounts
    /// finite, months/years amounts whole.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::EmptyStep`], [`StepError::NonFiniteAmount`]
    /// or [`StepError::NonIntegerAmount`].
    pub fn validate(&self) -> Result<(), StepError> {
        if self.amounts.is_empty() {
            return Err(StepError::EmptyStep);
        }
        for (unit, amount) in self.amounts() {
            if !amount.is_finite() {
                return Err(StepError::NonFiniteAmount { unit, amount });
            }
            if unit.requires_whole_amount() && amount.fract() != 0.0 {
                return Err(StepError::NonIntegerAmount { unit, amount });
            }
        }
        Ok(())
    }

    /// Reduces the step to whole months, whole days and elapsed
    /// nanoseconds.
    ///
    /// Fractional weeks fold into days (1 week = 7 days) and fractional
    /// days fold into hours (1 day = 24 hours); whole parts stay on
    /// their own key. Months and years are never decomposed into days,
    /// because calendar months have variable length.
    ///
    /// The caller is expected to have run [`Step::validate`] first;
    /// non-finite amounts saturate rather than panic.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "whole parts of validated finite amounts fit i64"
    )]
    pub fn normalized(&self) -> NormalizedStep {
        let months = self.get(Unit::Years).unwrap_or(0.0) * 12.0 + self.get(Unit::Months).unwrap_or(0.0);

        let weeks = self.get(Unit::Weeks).unwrap_or(0.0);
        let days = weeks.fract() * 7.0 + self.get(Unit::Days).unwrap_or(0.0);
        let whole_days = weeks.trunc() * 7.0 + days.trunc();

        let hours = days.fract() * 24.0 + self.get(Unit::Hours).unwrap_or(0.0);
        let seconds =
            hours * 3600.0 + self.get(Unit::Minutes).unwrap_or(0.0) * 60.0 + self.get(Unit::Seconds).unwrap_or(0.0);

        NormalizedStep {
            months: months as i64,
            days: whole_days as i64,
            nanos: (seconds * NANOS_PER_SECOND).round() as i64,
        }
    }
}

impl From<BTreeMap<Unit, f64>> for Step {
    fn from(amounts: BTreeMap<Unit, f64>) -> Self {
        // Rebuild through `with` so quarters and negative zero are
        // canonicalized on the serde path too.
        amounts
            .into_iter()
            .fold(Self::new(), |step, (unit, amount)| step.with(unit, amount))
    }
}

impl From<Step> for BTreeMap<Unit, f64> {
    fn from(step: Step) -> Self {
        step.amounts
    }
}

// Amounts are compared and hashed bit-for-bit. Negative zero is
// canonicalized at insertion, so bit equality matches value equality
// for every finite amount a valid step can hold.
impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.amounts.len() == other.amounts.len()
            && self
                .amounts()
                .zip(other.amounts())
                .all(|((ua, aa), (ub, ab))| ua == ub && aa.to_bits() == ab.to_bits())
    }
}

impl Eq for Step {}

impl Hash for Step {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (unit, amount) in self.amounts() {
            unit.hash(state);
            amount.to_bits().hash(state);
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (unit, amount)) in self.amounts.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{unit}: {amount}")?;
        }
        f.write_str("}")
    }
}

/// A step reduced to whole months, whole days and elapsed nanoseconds.
///
/// This is the form the advance algorithm consumes: months first (with
/// day-of-month clamping), then days, then a flat elapsed-time
/// addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedStep {
    /// Whole months, years already folded in (1 year = 12 months).
    pub months: i64,
    /// Whole days, whole weeks already folded in (1 week = 7 days).
    pub days: i64,
    /// Elapsed time in nanoseconds: hours, minutes, seconds and the
    /// fractional day/week remainders.
    pub nanos: i64,
}

impl NormalizedStep {
    /// Returns whether this step moves the point at all.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.months == 0 && self.days == 0 && self.nanos == 0
    }

    /// Returns whether this step carries an elapsed-time component.
    #[must_use]
    pub const fn has_time(&self) -> bool {
        self.nanos != 0
    }
}
