//! Calendar months used to filter projections and records, and month arithmetic.

use time::{Date, Month};

use crate::{Error, owner::OwnerId};

/// A calendar month that a listing is filtered by.
///
/// Entries match when their scheduled date falls between the first and last
/// day of the month (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    first_day: Date,
    last_day: Date,
}

impl MonthPeriod {
    /// Create a period for `month` (1-12) of `year` (1-9999).
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] or [Error::InvalidYear] if either is out of range.
    pub fn new(month: u8, year: i32) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

        if !(1..=9999).contains(&year) {
            return Err(Error::InvalidYear(year));
        }

        let first_day =
            Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year))?;
        let last_day = Date::from_calendar_date(year, month, month.length(year))
            .map_err(|_| Error::InvalidYear(year))?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.first_day
    }

    /// The last day of the month.
    pub fn last_day(&self) -> Date {
        self.last_day
    }

    /// Whether `date` falls inside the month.
    pub fn contains(&self, date: Date) -> bool {
        self.first_day <= date && date <= self.last_day
    }
}

/// The slice of a filtered collection that a store should return.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodQuery {
    /// Only entries scheduled in this month.
    pub period: MonthPeriod,
    /// Only entries belonging to this owner.
    pub owner: OwnerId,
    /// How many matching entries to skip.
    pub offset: u64,
    /// The maximum number of entries to return.
    pub limit: u64,
}

/// Add `months` calendar months to `date`.
///
/// The day of the month is kept where possible and clamped to the last day of
/// the target month otherwise, e.g. 2024-01-31 plus one month is 2024-02-29.
///
/// # Errors
/// Returns [Error::DateOutOfRange] if the result is not a representable date.
pub fn add_months(date: Date, months: u32) -> Result<Date, Error> {
    let month_index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1;
    let target_index = month_index + i64::from(months);

    let year = i32::try_from(target_index.div_euclid(12))
        .map_err(|_| Error::DateOutOfRange(date, months))?;
    let month = Month::try_from((target_index.rem_euclid(12) + 1) as u8)
        .map_err(|_| Error::DateOutOfRange(date, months))?;
    let day = date.day().min(month.length(year));

    Date::from_calendar_date(year, month, day).map_err(|_| Error::DateOutOfRange(date, months))
}


#[cfg(test)]
mod add_months_tests {
    use time::macros::date;

    use crate::Error;

    use super::add_months;

    #[test]
    fn zero_months_is_identity() {
        assert_eq!(add_months(date!(2024 - 01 - 15), 0), Ok(date!(2024 - 01 - 15)));
    }

    #[test]
    fn keeps_day_of_month() {
        assert_eq!(add_months(date!(2024 - 01 - 15), 1), Ok(date!(2024 - 02 - 15)));
        assert_eq!(add_months(date!(2024 - 01 - 15), 2), Ok(date!(2024 - 03 - 15)));
    }

    #[test]
    fn rolls_over_year() {
        assert_eq!(add_months(date!(2024 - 11 - 30), 3), Ok(date!(2025 - 02 - 28)));
        assert_eq!(add_months(date!(2024 - 12 - 01), 12), Ok(date!(2025 - 12 - 01)));
    }

    #[test]
    fn clamps_to_end_of_month() {
        assert_eq!(add_months(date!(2024 - 01 - 31), 1), Ok(date!(2024 - 02 - 29)));
        assert_eq!(add_months(date!(2024 - 03 - 31), 1), Ok(date!(2024 - 04 - 30)));
    }

    #[test]
    fn clamps_february_in_century_years() {
        assert_eq!(add_months(date!(1900 - 01 - 31), 1), Ok(date!(1900 - 02 - 28)));
        assert_eq!(add_months(date!(2000 - 01 - 31), 1), Ok(date!(2000 - 02 - 29)));
    }

    #[test]
    fn fails_past_supported_range() {
        let date = date!(9999 - 12 - 01);

        assert_eq!(add_months(date, 1), Err(Error::DateOutOfRange(date, 1)));
    }
}
