//! Internal helpers for validation and calendar arithmetic.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every entry point enforces the same invariants.

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, Money, RecurrenceInterval, ResultEngine};

/// Amounts are magnitudes: the kind carries the sign.
pub(crate) fn validate_amount(label: &str, amount: Money) -> ResultEngine<()> {
    if amount.is_negative() {
        tracing::warn!(label, %amount, "rejecting negative amount");
        return Err(EngineError::InvalidAmount(format!(
            "amount for '{label}' must be >= 0, got {amount}"
        )));
    }
    Ok(())
}

/// Error for a sum or product that does not fit in a [`Money`].
pub(crate) fn overflow(what: &str) -> EngineError {
    tracing::warn!(what, "amount overflow");
    EngineError::InvalidAmount(format!("{what} overflows the supported amount range"))
}

/// A recurring transaction must name its interval; no default is guessed.
pub(crate) fn validate_recurrence(
    label: &str,
    recurring: bool,
    interval: Option<RecurrenceInterval>,
) -> ResultEngine<()> {
    if recurring && interval.is_none() {
        tracing::warn!(label, "rejecting recurring transaction without interval");
        return Err(EngineError::InvalidRecurrence(format!(
            "recurring transaction '{label}' has no interval"
        )));
    }
    Ok(())
}

/// First day of the month containing `date`.
pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `date + months`, clamped to the end of shorter months.
pub(crate) fn add_months(date: NaiveDate, months: u32) -> ResultEngine<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| EngineError::InvalidDate(format!("{date} + {months} months overflows")))
}

/// Signed number of calendar months from `from`'s month to `to`'s month.
pub(crate) fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (i64::from(to.year()) - i64::from(from.year())) * 12 + i64::from(to.month())
        - i64::from(from.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2026, 1, 31), 1).unwrap(), date(2026, 2, 28));
        assert_eq!(add_months(date(2028, 1, 31), 1).unwrap(), date(2028, 2, 29));
        assert_eq!(add_months(date(2026, 11, 15), 3).unwrap(), date(2027, 2, 15));
    }

    #[test]
    fn months_between_spans_years() {
        assert_eq!(months_between(date(2026, 11, 1), date(2027, 2, 20)), 3);
        assert_eq!(months_between(date(2026, 3, 1), date(2026, 1, 31)), -2);
        assert_eq!(months_between(date(2026, 3, 1), date(2026, 3, 31)), 0);
    }

    #[test]
    fn first_of_month_truncates_day() {
        assert_eq!(first_of_month(date(2026, 7, 19)), date(2026, 7, 1));
    }
}
