//! Recurrence expansion.
//!
//! Turns a [`Transaction`] into the dated [`Occurrence`]s relevant to a
//! [`Horizon`]. Each nominal date is one interval after the previous one,
//! clamped to the end of shorter months. Clamping carries over: a monthly
//! rule anchored on Jan 31 continues with Feb 28, Mar 28, Apr 28.
//!
//! Expansion does not filter by the month an occurrence is *counted* in: a
//! payment delay may push the effective date past the horizon, and a
//! one-time transaction may sit anywhere. The aggregator drops what does not
//! belong to a month of the horizon.

use std::fmt;

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, Horizon, Money, RecurrenceInterval, ResultEngine, Transaction, TransactionKind};

impl RecurrenceInterval {
    /// The nominal date one interval after `date`.
    ///
    /// Returns `None` when the date is not representable.
    #[must_use]
    pub fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Quarterly => date.checked_add_months(Months::new(3)),
            Self::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

/// Identifier of a single occurrence, traceable to its transaction.
///
/// Rendered as `<transaction id>-<nominal date>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct OccurrenceId {
    pub transaction_id: Uuid,
    pub nominal_date: NaiveDate,
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.transaction_id, self.nominal_date)
    }
}

/// One concrete, dated instance of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub id: OccurrenceId,
    pub transaction: &'a Transaction,
    pub nominal_date: NaiveDate,
    /// `nominal_date + payment delay`; decides the month it is counted in.
    pub effective_date: NaiveDate,
}

impl Occurrence<'_> {
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        self.transaction.kind
    }

    #[must_use]
    pub fn amount(&self) -> Money {
        self.transaction.amount
    }
}

/// Lazy generator of nominal dates.
///
/// Owns its own cursor, so every call to [`nominal_dates`] starts over and
/// independent generators never interfere.
#[derive(Clone, Debug)]
pub struct NominalDates {
    interval: Option<RecurrenceInterval>,
    start: NaiveDate,
    end: NaiveDate,
    until: Option<NaiveDate>,
    /// Next candidate date; `None` once exhausted.
    cursor: Option<NaiveDate>,
}

impl Iterator for NominalDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(interval) = self.interval else {
            return self.cursor.take();
        };

        loop {
            let date = self.cursor?;
            if date >= self.end || self.until.is_some_and(|until| date > until) {
                self.cursor = None;
                return None;
            }
            self.cursor = interval.step(date);
            if date >= self.start {
                return Some(date);
            }
        }
    }
}

/// Nominal (pre-delay) dates of `transaction` for `horizon`.
///
/// A one-time transaction always yields its anchor date. A recurring one
/// steps from the anchor one interval at a time and yields the dates that
/// are inside the horizon and not after the recurrence end date.
pub fn nominal_dates(transaction: &Transaction, horizon: &Horizon) -> ResultEngine<NominalDates> {
    transaction.validate()?;
    Ok(NominalDates {
        interval: if transaction.recurring {
            transaction.interval
        } else {
            None
        },
        start: horizon.start(),
        end: horizon.end(),
        until: transaction.end_date,
        cursor: Some(transaction.anchor_date),
    })
}

/// Expands `transaction` into its occurrences for `horizon`, in date order.
pub fn expand<'a>(transaction: &'a Transaction, horizon: &Horizon) -> ResultEngine<Vec<Occurrence<'a>>> {
    let delay = Days::new(u64::from(transaction.payment_delay_days));
    let occurrences = nominal_dates(transaction, horizon)?
        .map(|nominal_date| {
            let effective_date = nominal_date.checked_add_days(delay).ok_or_else(|| {
                EngineError::InvalidDate(format!(
                    "{nominal_date} + {} days overflows",
                    transaction.payment_delay_days
                ))
            })?;
            Ok(Occurrence {
                id: OccurrenceId {
                    transaction_id: transaction.id,
                    nominal_date,
                },
                transaction,
                nominal_date,
                effective_date,
            })
        })
        .collect::<ResultEngine<Vec<_>>>()?;

    tracing::trace!(
        transaction = %transaction.id,
        occurrences = occurrences.len(),
        "expanded transaction"
    );
    Ok(occurrences)
}
