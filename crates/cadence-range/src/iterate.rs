//! Convenience iteration from a starting point.

use cadence_core::{Step, Unit};

use crate::advance::CalendarAdvance;
use crate::error::RangeError;
use crate::range::{Iter, SteppedRange};

/// Returns an unbounded sequence starting at `start`, stepping by
/// `every` times `by` ("every 2 weeks", "every quarter").
///
/// Sugar for a lower-bounded [`SteppedRange`] with no upper bound; take
/// or bound the result to make it finite.
///
/// # Errors
///
/// Returns [`RangeError::Step`] / [`RangeError::NegativeStep`] /
/// [`RangeError::ZeroStep`] when `every × by` is not a valid positive
/// step for `P`.
#[tracing::instrument(skip(start))]
pub fn iterate<P>(start: P, by: Unit, every: f64) -> Result<Iter<P>, RangeError>
where
    P: CalendarAdvance + PartialOrd + Clone,
{
    SteppedRange::new(Some(start), None, false)
        .with_step(Step::new().with(by, every))?
        .iter()
}
