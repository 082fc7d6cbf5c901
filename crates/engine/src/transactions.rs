//! Transaction primitives.
//!
//! A `Transaction` is the definition of a cash movement: either a one-time
//! event or a recurring rule. The engine never stores them; it expands them
//! into [`Occurrence`](crate::Occurrence)s for a single projection run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[serde(alias = "revenue")]
    Inflow,
    #[serde(alias = "expense")]
    Outflow,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "inflow" | "revenue" => Ok(Self::Inflow),
            "outflow" | "expense" => Ok(Self::Outflow),
            other => Err(EngineError::InvalidKind(format!(
                "expected inflow or outflow, got '{other}'"
            ))),
        }
    }
}

/// Step between two nominal dates of a recurring transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceInterval {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl RecurrenceInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for RecurrenceInterval {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidRecurrence(format!(
                "unsupported interval: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub label: String,
    /// Magnitude of every occurrence, never negative.
    pub amount: Money,
    /// Date of the first occurrence.
    pub anchor_date: NaiveDate,
    pub recurring: bool,
    /// Required when `recurring` is set, ignored otherwise.
    pub interval: Option<RecurrenceInterval>,
    /// Last nominal date that may still produce an occurrence (inclusive).
    pub end_date: Option<NaiveDate>,
    /// Days added to each nominal date before it is counted.
    pub payment_delay_days: u32,
    pub category: Option<String>,
}

impl Transaction {
    /// One-time transaction with a fresh id.
    pub fn new(
        kind: TransactionKind,
        label: impl Into<String>,
        amount: Money,
        anchor_date: NaiveDate,
    ) -> ResultEngine<Self> {
        let tx = Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            amount,
            anchor_date,
            recurring: false,
            interval: None,
            end_date: None,
            payment_delay_days: 0,
            category: None,
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Turns the transaction into a recurring rule.
    #[must_use]
    pub fn every(mut self, interval: RecurrenceInterval) -> Self {
        self.recurring = true;
        self.interval = Some(interval);
        self
    }

    #[must_use]
    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    #[must_use]
    pub fn delayed_by(mut self, days: u32) -> Self {
        self.payment_delay_days = days;
        self
    }

    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Signed contribution of one occurrence to the balance.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Inflow => self.amount,
            TransactionKind::Outflow => -self.amount,
        }
    }

    /// Checks the invariants a projection relies on.
    pub fn validate(&self) -> ResultEngine<()> {
        crate::util::validate_amount(&self.label, self.amount)?;
        crate::util::validate_recurrence(&self.label, self.recurring, self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn kind_accepts_legacy_names() {
        assert_eq!(
            TransactionKind::try_from("revenue").unwrap(),
            TransactionKind::Inflow
        );
        assert_eq!(
            TransactionKind::try_from("expense").unwrap(),
            TransactionKind::Outflow
        );
        assert!(matches!(
            TransactionKind::try_from("transfer"),
            Err(EngineError::InvalidKind(_))
        ));
    }

    #[test]
    fn kind_deserializes_aliases() {
        let kind: TransactionKind = serde_json::from_str("\"revenue\"").unwrap();
        assert_eq!(kind, TransactionKind::Inflow);
        let kind: TransactionKind = serde_json::from_str("\"outflow\"").unwrap();
        assert_eq!(kind, TransactionKind::Outflow);
    }

    #[test]
    fn new_rejects_negative_amount() {
        let err = Transaction::new(
            TransactionKind::Outflow,
            "Rent",
            Money::from(-10),
            date(2026, 1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn recurring_without_interval_is_invalid() {
        let mut tx = Transaction::new(
            TransactionKind::Inflow,
            "Subscription",
            Money::from(10),
            date(2026, 1, 1),
        )
        .unwrap();
        tx.recurring = true;
        assert!(matches!(
            tx.validate(),
            Err(EngineError::InvalidRecurrence(_))
        ));
    }

    #[test]
    fn signed_amount_follows_kind() {
        let tx = Transaction::new(
            TransactionKind::Outflow,
            "Rent",
            Money::from(900),
            date(2026, 1, 1),
        )
        .unwrap();
        assert_eq!(tx.signed_amount(), Money::from(-900));
    }
}
