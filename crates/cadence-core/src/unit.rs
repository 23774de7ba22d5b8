//! Calendar and clock units used for stepping.

use serde::{Deserialize, Serialize};

use crate::error::UnitError;

/// A calendar or clock unit.
///
/// The set is closed: every stepping operation dispatches on this enum,
/// never on unit names. `Quarters` is surface sugar and always
/// normalizes to three months before any arithmetic (see
/// [`Unit::canonical`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Clock seconds (fractional amounts allowed).
    Seconds,
    /// Clock minutes.
    Minutes,
    /// Clock hours.
    Hours,
    /// Calendar days.
    Days,
    /// Calendar weeks (1 week = 7 days).
    Weeks,
    /// Calendar months (variable length, whole amounts only).
    Months,
    /// Calendar quarters (1 quarter = 3 months, whole amounts only).
    Quarters,
    /// Calendar years (1 year = 12 months, whole amounts only).
    Years,
}

impl Unit {
    /// All units, smallest first.
    pub const ALL: [Self; 8] = [
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Quarters,
        Self::Years,
    ];

    /// Returns the lowercase plural name for this unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Quarters => "quarters",
            Self::Years => "years",
        }
    }

    /// Parses a unit from its singular or plural name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "second" | "seconds" => Some(Self::Seconds),
            "minute" | "minutes" => Some(Self::Minutes),
            "hour" | "hours" => Some(Self::Hours),
            "day" | "days" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            "month" | "months" => Some(Self::Months),
            "quarter" | "quarters" => Some(Self::Quarters),
            "year" | "years" => Some(Self::Years),
            _ => None,
        }
    }

    /// Returns the unit arithmetic actually runs on, with a conversion
    /// factor for amounts.
    ///
    /// `Quarters` maps to `(Months, 3.0)`; every other unit maps to
    /// itself with factor 1.
    #[must_use]
    pub const fn canonical(self) -> (Self, f64) {
        match self {
            Self::Quarters => (Self::Months, 3.0),
            unit => (unit, 1.0),
        }
    }

    /// Returns whether this is a time-of-day unit.
    ///
    /// Time-of-day units cannot be applied to pure calendar dates.
    #[must_use]
    pub const fn is_time_unit(self) -> bool {
        matches!(self, Self::Seconds | Self::Minutes | Self::Hours)
    }

    /// Returns whether this is a calendar-date unit.
    #[must_use]
    pub const fn is_date_unit(self) -> bool {
        !self.is_time_unit()
    }

    /// Returns whether amounts for this unit must be whole numbers.
    ///
    /// Months have variable length, so fractional months (and therefore
    /// fractional quarters and years) cannot be converted to smaller
    /// units without picking an arbitrary month length.
    #[must_use]
    pub const fn requires_whole_amount(self) -> bool {
        matches!(self, Self::Months | Self::Quarters | Self::Years)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnitError::InvalidUnit(s.to_string()))
    }
}
