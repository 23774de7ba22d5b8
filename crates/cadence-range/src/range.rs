//! Stepped ranges over calendar points.
//!
//! A [`SteppedRange`] is an interval with an explicit step: membership
//! is plain interval containment, but iteration, successor and count
//! all go through the configured [`Step`]. Equality and hashing include
//! the step, so two ranges over identical bounds stepped differently
//! never compare equal.

use std::fmt;
use std::iter::StepBy;
use std::num::NonZeroUsize;

use cadence_core::Step;

use crate::advance::CalendarAdvance;
use crate::error::RangeError;

/// Number of points a range produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCount {
    Finite(usize),
    /// Reported whenever either bound is absent.
    Infinite,
}

/// An interval over calendar points with an explicit step.
///
/// Either bound may be absent (open-ended on that side). Bounds are
/// fixed at construction; the step is configured once with
/// [`SteppedRange::with_step`] and stepping operations fail with
/// [`RangeError::StepNotConfigured`] until then. An inverted range
/// (lower past upper) is not an error; it is simply empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SteppedRange<P> {
    lower: Option<P>,
    upper: Option<P>,
    upper_inclusive: bool,
    step: Option<Step>,
}

impl<P> SteppedRange<P>
where
    P: CalendarAdvance + PartialOrd + Clone,
{
    /// Creates a range with the given bounds. `lower <= upper` is not
    /// required.
    #[must_use]
    pub const fn new(lower: Option<P>, upper: Option<P>, upper_inclusive: bool) -> Self {
        Self {
            lower,
            upper,
            upper_inclusive,
            step: None,
        }
    }

    /// A bounded range including its upper endpoint.
    #[must_use]
    pub const fn inclusive(lower: P, upper: P) -> Self {
        Self::new(Some(lower), Some(upper), true)
    }

    /// A bounded range excluding its upper endpoint.
    #[must_use]
    pub const fn exclusive(lower: P, upper: P) -> Self {
        Self::new(Some(lower), Some(upper), false)
    }

    /// Configures the step. Calling again replaces the previous step.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Step`] when the step is empty, non-finite
    /// or has fractional months/years; [`RangeError::NegativeStep`] for
    /// negative amounts (a negative step would walk away from the upper
    /// bound and never terminate); [`RangeError::ZeroStep`] when the
    /// step makes no progress; [`RangeError::Advance`] with
    /// [`TimeUnitsOnDate`](crate::AdvanceError::TimeUnitsOnDate) when a
    /// time-of-day step is configured for a pure-date range.
    pub fn with_step(mut self, step: Step) -> Result<Self, RangeError> {
        step.validate()?;
        if let Some((unit, amount)) = step.amounts().find(|&(_, amount)| amount < 0.0) {
            return Err(RangeError::NegativeStep { unit, amount });
        }
        if step.normalized().is_zero() {
            return Err(RangeError::ZeroStep(step.to_string()));
        }
        if !P::HAS_TIME_OF_DAY && step.has_time_component() {
            return Err(RangeError::Advance(crate::AdvanceError::TimeUnitsOnDate));
        }
        self.step = Some(step);
        Ok(self)
    }

    /// Returns the lower bound, if any.
    #[must_use]
    pub const fn lower(&self) -> Option<&P> {
        self.lower.as_ref()
    }

    /// Returns the upper bound, if any.
    #[must_use]
    pub const fn upper(&self) -> Option<&P> {
        self.upper.as_ref()
    }

    /// Returns whether the upper bound is part of the range.
    #[must_use]
    pub const fn is_upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    /// Returns the configured step, if any.
    #[must_use]
    pub const fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    /// Returns whether `point` lies inside the bounds.
    ///
    /// This is plain interval containment: the step is irrelevant, and
    /// a point between two generated steps is still contained. An
    /// absent bound contains everything on its side.
    #[must_use]
    pub fn contains(&self, point: &P) -> bool {
        let above = self.lower.as_ref().is_none_or(|lower| point >= lower);
        let below = self.upper.as_ref().is_none_or(|upper| {
            if self.upper_inclusive {
                point <= upper
            } else {
                point < upper
            }
        });
        above && below
    }

    /// Returns the point one step after `point`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::StepNotConfigured`] before
    /// [`SteppedRange::with_step`], or [`RangeError::Advance`] when the
    /// advance itself fails.
    pub fn succ(&self, point: &P) -> Result<P, RangeError> {
        let step = self.step.as_ref().ok_or(RangeError::StepNotConfigured)?;
        Ok(point.advance(step)?)
    }

    /// Returns a lazy sequence of points: the lower bound, then one
    /// step at a time until past the upper bound (forever when there is
    /// no upper bound).
    ///
    /// Each call builds an independent cursor, so iterating twice
    /// yields the same sequence and never mutates the range.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::NoLowerBound`] when the range has no lower
    /// bound (the bound is still fine for [`SteppedRange::contains`]),
    /// or [`RangeError::StepNotConfigured`] before
    /// [`SteppedRange::with_step`].
    pub fn iter(&self) -> Result<Iter<P>, RangeError> {
        let step = self
            .step
            .clone()
            .ok_or(RangeError::StepNotConfigured)?;
        let lower = self
            .lower
            .clone()
            .ok_or(RangeError::NoLowerBound)?;
        Ok(Iter {
            cursor: Some(lower),
            upper: self.upper.clone(),
            upper_inclusive: self.upper_inclusive,
            step,
        })
    }

    /// Returns every `n`-th point of the sequence: indices 0, n, 2n, …
    ///
    /// This re-steps the generated sequence; it does not change the
    /// step itself.
    ///
    /// # Errors
    ///
    /// Same as [`SteppedRange::iter`].
    pub fn every_nth(&self, n: NonZeroUsize) -> Result<StepBy<Iter<P>>, RangeError> {
        Ok(self.iter()?.step_by(n.get()))
    }

    /// Counts the points the sequence produces, by stepping. Calendar
    /// steps have no fixed duration, so there is no closed form.
    ///
    /// Reports [`PointCount::Infinite`] whenever either bound is
    /// absent, without requiring a step.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::StepNotConfigured`] for a bounded range
    /// without a step.
    pub fn count_points(&self) -> Result<PointCount, RangeError> {
        match (&self.lower, &self.upper) {
            (Some(_), Some(_)) => Ok(PointCount::Finite(self.iter()?.count())),
            _ => Ok(PointCount::Infinite),
        }
    }
}

impl<P: fmt::Display> fmt::Display for SteppedRange<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lower) = &self.lower {
            write!(f, "{lower}")?;
        }
        f.write_str(if self.upper_inclusive { "..=" } else { ".." })?;
        if let Some(upper) = &self.upper {
            write!(f, "{upper}")?;
        }
        match &self.step {
            Some(step) => write!(f, " by {step}"),
            None => f.write_str(" by (no step)"),
        }
    }
}

/// Lazy sequence of points produced by a [`SteppedRange`].
///
/// Owns its cursor; dropping it early releases nothing and iterating
/// it never touches the range it came from.
#[derive(Debug, Clone)]
pub struct Iter<P> {
    cursor: Option<P>,
    upper: Option<P>,
    upper_inclusive: bool,
    step: Step,
}

impl<P> Iter<P>
where
    P: PartialOrd,
{
    fn in_bounds(&self, point: &P) -> bool {
        self.upper.as_ref().is_none_or(|upper| {
            if self.upper_inclusive {
                point <= upper
            } else {
                point < upper
            }
        })
    }
}

impl<P> Iterator for Iter<P>
where
    P: CalendarAdvance + PartialOrd + Clone,
{
    type Item = P;

    fn next(&mut self) -> Option<P> {
        let current = self.cursor.take()?;
        if !self.in_bounds(&current) {
            return None;
        }
        match current.advance(&self.step) {
            Ok(next) => self.cursor = Some(next),
            Err(error) => {
                // Validated steps only fail on range overflow; fuse
                // rather than cycle on a stuck cursor.
                tracing::warn!(error = %error, "stopping iteration: advance failed");
            }
        }
        Some(current)
    }
}

impl<P> std::iter::FusedIterator for Iter<P> where P: CalendarAdvance + PartialOrd + Clone {}
