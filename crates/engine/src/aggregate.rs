//! Monthly aggregation of occurrences into a running cash balance.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Horizon, Money, Occurrence, ResultEngine, TransactionKind, util::overflow};

/// Totals for one calendar month of the horizon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// First day of the month.
    pub month: NaiveDate,
    pub inflow: Money,
    pub outflow: Money,
    /// `inflow - outflow`.
    pub net: Money,
    /// Balance at the end of the month.
    pub cumulative: Money,
    /// Occurrences counted in this month.
    pub occurrences: usize,
}

impl MonthBucket {
    fn empty(month: NaiveDate) -> Self {
        Self {
            month,
            inflow: Money::ZERO,
            outflow: Money::ZERO,
            net: Money::ZERO,
            cumulative: Money::ZERO,
            occurrences: 0,
        }
    }

    /// Short month label, e.g. `Jan 2026`.
    #[must_use]
    pub fn label(&self) -> String {
        month_label(self.month)
    }

    /// Balance carried into the month.
    #[must_use]
    pub fn opening(&self) -> Money {
        Money::new(self.cumulative.amount().saturating_sub(self.net.amount()))
    }
}

pub(crate) fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}

/// Buckets `occurrences` by the calendar month of their effective date.
///
/// Produces one bucket per month of `horizon`, in calendar order, whatever the
/// order of `occurrences`. Occurrences whose effective date falls outside the
/// horizon are ignored. The running balance starts at `starting_balance`, so
/// `cumulative[i] == starting_balance + sum(net[0..=i])`.
///
/// Fails with [`EngineError::InvalidAmount`](crate::EngineError::InvalidAmount)
/// when a total does not fit in a [`Money`]; no bucket is returned then.
pub fn aggregate(
    occurrences: &[Occurrence<'_>],
    starting_balance: Money,
    horizon: &Horizon,
) -> ResultEngine<Vec<MonthBucket>> {
    let mut buckets: Vec<MonthBucket> = horizon.month_starts().map(MonthBucket::empty).collect();

    let mut dropped = 0usize;
    for occurrence in occurrences {
        let Some(bucket) = horizon
            .month_index(occurrence.effective_date)
            .and_then(|index| buckets.get_mut(index))
        else {
            dropped += 1;
            continue;
        };
        let total = match occurrence.kind() {
            TransactionKind::Inflow => &mut bucket.inflow,
            TransactionKind::Outflow => &mut bucket.outflow,
        };
        *total = total
            .checked_add(occurrence.amount())
            .ok_or_else(|| overflow("monthly total"))?;
        bucket.occurrences += 1;
    }

    let mut balance = starting_balance;
    for bucket in &mut buckets {
        bucket.net = bucket
            .inflow
            .checked_sub(bucket.outflow)
            .ok_or_else(|| overflow("monthly net"))?;
        balance = balance
            .checked_add(bucket.net)
            .ok_or_else(|| overflow("cumulative balance"))?;
        bucket.cumulative = balance;
    }

    tracing::trace!(
        months = buckets.len(),
        counted = occurrences.len() - dropped,
        dropped,
        "aggregated occurrences"
    );
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecurrenceInterval, Transaction, expand};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets_follow_effective_date() {
        let horizon = Horizon::new(date(2026, 1, 1), 3).unwrap();
        let salary = Transaction::new(
            TransactionKind::Inflow,
            "Invoice",
            Money::from(1000),
            date(2026, 1, 20),
        )
        .unwrap()
        .delayed_by(30);
        let occurrences = expand(&salary, &horizon).unwrap();
        let buckets = aggregate(&occurrences, Money::ZERO, &horizon).unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].inflow, Money::ZERO);
        assert_eq!(buckets[1].inflow, Money::from(1000));
        assert_eq!(buckets[1].occurrences, 1);
        assert_eq!(buckets[2].cumulative, Money::from(1000));
    }

    #[test]
    fn cumulative_threads_starting_balance() {
        let horizon = Horizon::new(date(2026, 1, 1), 4).unwrap();
        let rent = Transaction::new(
            TransactionKind::Outflow,
            "Rent",
            Money::from(300),
            date(2026, 1, 1),
        )
        .unwrap()
        .every(RecurrenceInterval::Monthly);
        let occurrences = expand(&rent, &horizon).unwrap();
        let buckets = aggregate(&occurrences, Money::from(1000), &horizon).unwrap();

        let cumulative: Vec<_> = buckets.iter().map(|b| b.cumulative).collect();
        assert_eq!(
            cumulative,
            vec![
                Money::from(700),
                Money::from(400),
                Money::from(100),
                Money::from(-200)
            ]
        );
        assert_eq!(buckets[0].opening(), Money::from(1000));
        assert_eq!(buckets[3].net, Money::from(-300));
    }

    #[test]
    fn order_of_occurrences_does_not_matter() {
        let horizon = Horizon::new(date(2026, 1, 1), 2).unwrap();
        let a = Transaction::new(TransactionKind::Inflow, "A", Money::from(10), date(2026, 1, 5))
            .unwrap()
            .every(RecurrenceInterval::Weekly);
        let b = Transaction::new(TransactionKind::Outflow, "B", Money::from(7), date(2026, 2, 9))
            .unwrap();
        let mut occurrences = expand(&a, &horizon).unwrap();
        occurrences.extend(expand(&b, &horizon).unwrap());
        let forward = aggregate(&occurrences, Money::ZERO, &horizon).unwrap();
        occurrences.reverse();
        let backward = aggregate(&occurrences, Money::ZERO, &horizon).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward[0].month, date(2026, 1, 1));
        assert_eq!(forward[1].month, date(2026, 2, 1));
    }

    #[test]
    fn empty_horizon_produces_no_buckets() {
        let horizon = Horizon::new(date(2026, 1, 1), 0).unwrap();
        let one = Transaction::new(TransactionKind::Inflow, "A", Money::from(10), date(2026, 1, 5))
            .unwrap();
        let occurrences = expand(&one, &horizon).unwrap();
        assert!(aggregate(&occurrences, Money::from(5), &horizon).unwrap().is_empty());
    }

    #[test]
    fn overflowing_month_is_an_error() {
        let horizon = Horizon::new(date(2026, 1, 1), 1).unwrap();
        let huge = |label| {
            Transaction::new(
                TransactionKind::Inflow,
                label,
                Money::new(rust_decimal::Decimal::MAX),
                date(2026, 1, 10),
            )
            .unwrap()
        };
        let (a, b) = (huge("A"), huge("B"));
        let mut occurrences = expand(&a, &horizon).unwrap();
        occurrences.extend(expand(&b, &horizon).unwrap());
        assert!(matches!(
            aggregate(&occurrences, Money::ZERO, &horizon),
            Err(crate::EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn overflowing_balance_is_an_error() {
        let horizon = Horizon::new(date(2026, 1, 1), 1).unwrap();
        let sale = Transaction::new(TransactionKind::Inflow, "A", Money::from(1), date(2026, 1, 2))
            .unwrap();
        let occurrences = expand(&sale, &horizon).unwrap();
        let start = Money::new(rust_decimal::Decimal::MAX);
        assert!(aggregate(&occurrences, start, &horizon).is_err());
    }

    #[test]
    fn label_uses_short_month_and_year() {
        let bucket = MonthBucket::empty(date(2026, 9, 1));
        assert_eq!(bucket.label(), "Sep 2026");
    }
}
