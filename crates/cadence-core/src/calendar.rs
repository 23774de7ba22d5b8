//! Proleptic Gregorian calendar helpers.
//!
//! Free functions rather than methods on a date type, so they stay
//! usable from any time library.

/// Returns whether `year` is a leap year (proleptic Gregorian).
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days in `year`.
#[must_use]
pub const fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Returns the number of days in `month` of `year`, or `None` when
/// `month` is outside `1..=12`.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => return None,
    };
    Some(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rules() {
        assert!(is_leap_year(2020));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2021));
    }

    #[test]
    fn year_lengths() {
        assert_eq!(days_in_year(2020), 366);
        assert_eq!(days_in_year(2021), 365);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2021, 1), Some(31));
        assert_eq!(days_in_month(2021, 2), Some(28));
        assert_eq!(days_in_month(2020, 2), Some(29));
        assert_eq!(days_in_month(2021, 4), Some(30));
        assert_eq!(days_in_month(2021, 13), None);
        assert_eq!(days_in_month(2021, 0), None);
    }
}
