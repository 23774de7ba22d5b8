//! Calendar-advance over dates and zoned instants.
//!
//! The algorithm applies a [`Step`] in a fixed order:
//! 1. Normalize the step (fractional weeks fold into days, fractional
//!    days into hours; see [`Step::normalized`]).
//! 2. Advance the date: whole months first, clamping the day of month
//!    to the end of the target month, then whole days.
//! 3. For a pure date, stop there.
//! 4. For an instant, reattach the original wall-clock time to the new
//!    date, resolve it in the instant's zone, then add the elapsed-time
//!    component flat. Elapsed time crosses DST transitions with
//!    real-duration semantics, not civil-time semantics.
//!
//! Zone resolution goes through [`chrono::TimeZone`], so any zone
//! implementation works; `chrono-tz` is only a dev-dependency.

use cadence_core::step::NormalizedStep;
use cadence_core::Step;
use chrono::{
    DateTime, Days, FixedOffset, LocalResult, Months, NaiveDate, NaiveDateTime, Offset, TimeDelta,
    TimeZone,
};

use crate::error::AdvanceError;

/// International Date Line changes can skip an entire civil day, so
/// gaps up to 24 hours are searched before giving up.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// How DST folds and gaps are resolved when reattaching civil time to
/// an advanced date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Ambiguous civil time (fall-back fold): prefer the later
    /// occurrence when it keeps the instant's original UTC offset,
    /// otherwise take the earliest. Nonexistent civil time
    /// (spring-forward gap): skip forward, minute by minute, to the
    /// first civil time that exists, preserving sub-minute fields.
    #[default]
    Compatible,
    /// Ambiguous or nonexistent civil times are errors.
    Strict,
}

/// A point that calendar steps can be applied to.
///
/// Implemented for [`NaiveDate`] (pure calendar date) and
/// [`DateTime<Tz>`] (zoned instant). `advance` never mutates its
/// receiver and is deterministic: same inputs, same output.
pub trait CalendarAdvance: Sized {
    /// Whether this point type carries a time of day. Steps with a
    /// time-of-day component are rejected for point types without one.
    const HAS_TIME_OF_DAY: bool;

    /// Advances this point by `step` under the given DST policy.
    ///
    /// # Errors
    ///
    /// Returns [`AdvanceError::Step`] for an invalid step,
    /// [`AdvanceError::TimeUnitsOnDate`] for a time-of-day step on a
    /// pure date, [`AdvanceError::OutOfRange`] when the result is not
    /// representable, and [`AdvanceError::AmbiguousCivilTime`] /
    /// [`AdvanceError::NonexistentCivilTime`] under
    /// [`DstPolicy::Strict`].
    fn advance_with(&self, step: &Step, policy: DstPolicy) -> Result<Self, AdvanceError>;

    /// Advances this point by `step` under [`DstPolicy::Compatible`].
    ///
    /// # Errors
    ///
    /// See [`CalendarAdvance::advance_with`].
    fn advance(&self, step: &Step) -> Result<Self, AdvanceError> {
        self.advance_with(step, DstPolicy::default())
    }
}

impl CalendarAdvance for NaiveDate {
    const HAS_TIME_OF_DAY: bool = false;

    fn advance_with(&self, step: &Step, _policy: DstPolicy) -> Result<Self, AdvanceError> {
        step.validate()?;
        if step.has_time_component() {
            return Err(AdvanceError::TimeUnitsOnDate);
        }
        advance_date(*self, &step.normalized())
    }
}

impl<Tz: TimeZone> CalendarAdvance for DateTime<Tz> {
    const HAS_TIME_OF_DAY: bool = true;

    fn advance_with(&self, step: &Step, policy: DstPolicy) -> Result<Self, AdvanceError> {
        step.validate()?;
        let normalized = step.normalized();

        // Date part first, then the same wall-clock time on the new
        // date, resolved in the instant's own zone.
        let date = advance_date(self.date_naive(), &normalized)?;
        let civil = date.and_time(self.time());
        let reattached = resolve_civil(&self.timezone(), civil, self.offset().fix(), policy)?;

        if !normalized.has_time() {
            return Ok(reattached);
        }
        reattached
            .checked_add_signed(TimeDelta::nanoseconds(normalized.nanos))
            .ok_or(AdvanceError::OutOfRange)
    }
}

/// Advances the date component: whole months (day of month clamped to
/// the target month's length), then whole days.
fn advance_date(date: NaiveDate, step: &NormalizedStep) -> Result<NaiveDate, AdvanceError> {
    let months =
        u32::try_from(step.months.unsigned_abs()).map_err(|_| AdvanceError::OutOfRange)?;
    let date = if step.months >= 0 {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    }
    .ok_or(AdvanceError::OutOfRange)?;

    let days = Days::new(step.days.unsigned_abs());
    if step.days >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
    .ok_or(AdvanceError::OutOfRange)
}

/// Resolves a civil date/time in `tz`, applying the DST policy.
fn resolve_civil<Tz: TimeZone>(
    tz: &Tz,
    civil: NaiveDateTime,
    original_offset: FixedOffset,
    policy: DstPolicy,
) -> Result<DateTime<Tz>, AdvanceError> {
    match tz.from_local_datetime(&civil) {
        LocalResult::Single(resolved) => Ok(resolved),
        LocalResult::Ambiguous(earliest, latest) => match policy {
            DstPolicy::Strict => Err(AdvanceError::AmbiguousCivilTime(civil.to_string())),
            DstPolicy::Compatible => {
                if latest.offset().fix() == original_offset {
                    tracing::debug!(civil = %civil, "ambiguous civil time, keeping original offset");
                    Ok(latest)
                } else {
                    tracing::debug!(civil = %civil, "ambiguous civil time, taking earliest occurrence");
                    Ok(earliest)
                }
            }
        },
        LocalResult::None => match policy {
            DstPolicy::Strict => Err(AdvanceError::NonexistentCivilTime(civil.to_string())),
            DstPolicy::Compatible => skip_gap(tz, civil),
        },
    }
}

/// Finds the first civil minute at or after `civil` that exists in
/// `tz`, preserving sub-minute fields.
fn skip_gap<Tz: TimeZone>(tz: &Tz, civil: NaiveDateTime) -> Result<DateTime<Tz>, AdvanceError> {
    if resolve_at(tz, civil, MAX_GAP_MINUTES).is_none() {
        return Err(AdvanceError::NonexistentCivilTime(civil.to_string()));
    }

    // Within a single gap, "minute exists" is monotone, so binary
    // search for the first one that resolves.
    let (mut lo, mut hi) = (1_i64, MAX_GAP_MINUTES);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if resolve_at(tz, civil, mid).is_some() {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    let resolved = resolve_at(tz, civil, lo)
        .ok_or_else(|| AdvanceError::NonexistentCivilTime(civil.to_string()))?;
    tracing::warn!(civil = %civil, skipped_minutes = lo, "civil time falls in a DST gap, skipping forward");
    Ok(resolved)
}

fn resolve_at<Tz: TimeZone>(tz: &Tz, civil: NaiveDateTime, minutes: i64) -> Option<DateTime<Tz>> {
    let probe = civil.checked_add_signed(TimeDelta::minutes(minutes))?;
    tz.from_local_datetime(&probe).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::Unit;
    use chrono_tz::America::New_York;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn nyc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<chrono_tz::Tz> {
        New_York
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn month_end_clamps_instead_of_rolling_over() {
        let advanced = date(2021, 1, 31).advance(&Step::months(1)).unwrap();
        assert_eq!(advanced, date(2021, 2, 28));
    }

    #[test]
    fn leap_day_plus_one_year_clamps() {
        let advanced = date(2020, 2, 29).advance(&Step::years(1)).unwrap();
        assert_eq!(advanced, date(2021, 2, 28));
    }

    #[test]
    fn month_addition_carries_into_the_next_year() {
        let advanced = date(2021, 11, 15).advance(&Step::months(3)).unwrap();
        assert_eq!(advanced, date(2022, 2, 15));
    }

    #[test]
    fn quarters_equal_three_months() {
        let point = date(2021, 5, 14);
        assert_eq!(
            point.advance(&Step::quarters(1)).unwrap(),
            point.advance(&Step::months(3)).unwrap()
        );
    }

    #[test]
    fn weeks_and_days_combine() {
        let advanced = date(2024, 2, 20)
            .advance(&Step::weeks(2).with(Unit::Days, 3))
            .unwrap();
        assert_eq!(advanced, date(2024, 3, 8));
    }

    #[test]
    fn negative_amounts_step_backwards() {
        let advanced = date(2024, 3, 31).advance(&Step::months(-1)).unwrap();
        assert_eq!(advanced, date(2024, 2, 29));
    }

    #[test]
    fn time_units_on_a_date_are_rejected() {
        let err = date(2024, 1, 1).advance(&Step::hours(1)).unwrap_err();
        assert_eq!(err, AdvanceError::TimeUnitsOnDate);
    }

    #[test]
    fn fractional_days_on_a_date_are_rejected() {
        let err = date(2024, 1, 1).advance(&Step::days(1.5)).unwrap_err();
        assert_eq!(err, AdvanceError::TimeUnitsOnDate);
    }

    #[test]
    fn empty_step_is_rejected() {
        let err = date(2024, 1, 1).advance(&Step::new()).unwrap_err();
        assert_eq!(err, AdvanceError::Step(cadence_core::StepError::EmptyStep));
    }

    #[test]
    fn advance_is_deterministic() {
        let point = nyc(2024, 2, 20, 9, 30);
        let step = Step::weeks(1).with(Unit::Hours, 2.5);
        assert_eq!(point.advance(&step).unwrap(), point.advance(&step).unwrap());
    }

    #[test]
    fn instants_keep_their_wall_clock_time_across_months() {
        let advanced = nyc(2024, 1, 31, 9, 30).advance(&Step::months(1)).unwrap();
        assert_eq!(advanced, nyc(2024, 2, 29, 9, 30));
    }

    #[test]
    fn day_step_keeps_civil_time_across_spring_forward() {
        // 2024-03-10 02:00 is when New York springs forward.
        let before = nyc(2024, 3, 9, 12, 0);
        let advanced = before.advance(&Step::days(1)).unwrap();
        assert_eq!(advanced, nyc(2024, 3, 10, 12, 0));
        // Same civil time, but only 23 elapsed hours.
        assert_eq!(advanced.timestamp() - before.timestamp(), 23 * 3600);
    }

    #[test]
    fn hour_step_is_elapsed_time_across_spring_forward() {
        let before = nyc(2024, 3, 10, 1, 30);
        let advanced = before.advance(&Step::hours(1)).unwrap();
        // 01:30 EST + 1h elapsed lands at 03:30 EDT, skipping the gap.
        assert_eq!(advanced, nyc(2024, 3, 10, 3, 30));
        assert_eq!(advanced.timestamp() - before.timestamp(), 3600);
    }

    #[test]
    fn fall_back_prefers_the_earliest_occurrence_by_default() {
        // 2024-11-03 01:30 happens twice in New York; starting from EDT
        // the earliest (still-EDT) occurrence matches the original
        // offset.
        let before = nyc(2024, 11, 2, 1, 30);
        let advanced = before.advance(&Step::days(1)).unwrap();
        assert_eq!(advanced.offset().fix(), before.offset().fix());
        assert_eq!(advanced.timestamp() - before.timestamp(), 24 * 3600);
    }

    #[test]
    fn fall_back_keeps_the_original_offset_when_stepping_backwards() {
        // Starting after the fold (EST) and stepping back a day lands in
        // the fold; the later occurrence keeps the EST offset.
        let after = nyc(2024, 11, 4, 1, 30);
        let advanced = after.advance(&Step::days(-1)).unwrap();
        assert_eq!(advanced.offset().fix(), after.offset().fix());
    }

    #[test]
    fn gap_skips_forward_to_the_first_valid_minute() {
        // 02:30 does not exist on 2024-03-10 in New York; the first
        // existing civil minute is 03:00 EDT.
        let before = nyc(2024, 3, 9, 2, 30);
        let advanced = before.advance(&Step::days(1)).unwrap();
        assert_eq!(advanced, nyc(2024, 3, 10, 3, 0));
    }

    #[test]
    fn strict_policy_rejects_nonexistent_civil_time() {
        let before = nyc(2024, 3, 9, 2, 30);
        let err = before
            .advance_with(&Step::days(1), DstPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, AdvanceError::NonexistentCivilTime(_)));
    }

    #[test]
    fn strict_policy_rejects_ambiguous_civil_time() {
        let before = nyc(2024, 11, 2, 1, 30);
        let err = before
            .advance_with(&Step::days(1), DstPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, AdvanceError::AmbiguousCivilTime(_)));
    }

    #[test]
    fn fractional_weeks_flow_into_the_time_of_day() {
        // 0.5 weeks = 3 days 12 hours.
        let advanced = nyc(2024, 6, 1, 6, 0).advance(&Step::weeks(0.5)).unwrap();
        assert_eq!(advanced, nyc(2024, 6, 4, 18, 0));
    }

    #[test]
    fn out_of_range_advance_is_an_error() {
        let err = date(2024, 1, 1)
            .advance(&Step::years(300_000))
            .unwrap_err();
        assert_eq!(err, AdvanceError::OutOfRange);
    }
}
