//! What-if scenarios: uniform percentage adjustments of inflows and outflows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ResultEngine, Transaction, TransactionKind, util::overflow};

/// Growth rates, in percent, applied to every inflow or outflow amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub inflow_growth_rate_percent: Decimal,
    #[serde(default)]
    pub outflow_growth_rate_percent: Decimal,
}

impl Scenario {
    /// No adjustment.
    pub const BASE: Scenario = Scenario {
        inflow_growth_rate_percent: Decimal::ZERO,
        outflow_growth_rate_percent: Decimal::ZERO,
    };

    /// Revenue +20 %, costs -10 %.
    pub const OPTIMISTIC: Scenario = Scenario {
        inflow_growth_rate_percent: Decimal::from_parts(20, 0, 0, false, 0),
        outflow_growth_rate_percent: Decimal::from_parts(10, 0, 0, true, 0),
    };

    /// Revenue -15 %, costs +10 %.
    pub const PESSIMISTIC: Scenario = Scenario {
        inflow_growth_rate_percent: Decimal::from_parts(15, 0, 0, true, 0),
        outflow_growth_rate_percent: Decimal::from_parts(10, 0, 0, false, 0),
    };

    #[must_use]
    pub fn new(inflow_growth_rate_percent: Decimal, outflow_growth_rate_percent: Decimal) -> Self {
        Self {
            inflow_growth_rate_percent,
            outflow_growth_rate_percent,
        }
    }

    /// Multiplier applied to amounts of `kind`: `1 + rate / 100`.
    #[must_use]
    pub fn factor(&self, kind: TransactionKind) -> Decimal {
        let rate = match kind {
            TransactionKind::Inflow => self.inflow_growth_rate_percent,
            TransactionKind::Outflow => self.outflow_growth_rate_percent,
        };
        Decimal::ONE + rate / Decimal::ONE_HUNDRED
    }

    /// Returns a copy of `transactions` with scaled amounts.
    ///
    /// Nothing but the amount changes and the input is left untouched. A rate
    /// below -100 % produces negative amounts, which the projection rejects.
    /// A scaled amount that does not fit in a [`Money`](crate::Money) is an
    /// error.
    pub fn apply(&self, transactions: &[Transaction]) -> ResultEngine<Vec<Transaction>> {
        transactions
            .iter()
            .map(|tx| {
                let amount = tx
                    .amount
                    .checked_scale(self.factor(tx.kind))
                    .ok_or_else(|| overflow("scenario amount"))?;
                Ok(Transaction {
                    amount,
                    ..tx.clone()
                })
            })
            .collect()
    }
}

/// Named scenario, as compared side by side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    #[serde(flatten)]
    pub scenario: Scenario,
}

impl NamedScenario {
    pub fn new(name: impl Into<String>, scenario: Scenario) -> Self {
        Self {
            name: name.into(),
            scenario,
        }
    }

    /// Base, optimistic and pessimistic presets.
    #[must_use]
    pub fn presets() -> Vec<NamedScenario> {
        vec![
            NamedScenario::new("base", Scenario::BASE),
            NamedScenario::new("optimistic", Scenario::OPTIMISTIC),
            NamedScenario::new("pessimistic", Scenario::PESSIMISTIC),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{Money, RecurrenceInterval};

    fn book() -> Vec<Transaction> {
        let anchor = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        vec![
            Transaction::new(TransactionKind::Inflow, "Sales", Money::from(1000), anchor)
                .unwrap()
                .every(RecurrenceInterval::Monthly),
            Transaction::new(TransactionKind::Outflow, "Payroll", Money::from(800), anchor)
                .unwrap()
                .every(RecurrenceInterval::Monthly)
                .delayed_by(15),
        ]
    }

    #[test]
    fn zero_rates_are_identity() {
        let original = book();
        let adjusted = Scenario::BASE.apply(&original).unwrap();
        assert_eq!(adjusted, original);
    }

    #[test]
    fn rates_follow_kind() {
        let original = book();
        let adjusted = Scenario::OPTIMISTIC.apply(&original).unwrap();
        assert_eq!(adjusted[0].amount, Money::from(1200));
        assert_eq!(adjusted[1].amount, Money::from(720));
        assert_eq!(adjusted[1].payment_delay_days, 15);
        assert_eq!(adjusted[1].id, original[1].id);
        assert_eq!(original[0].amount, Money::from(1000));
    }

    #[test]
    fn pessimistic_preset() {
        let adjusted = Scenario::PESSIMISTIC.apply(&book()).unwrap();
        assert_eq!(adjusted[0].amount, Money::from(850));
        assert_eq!(adjusted[1].amount, Money::from(880));
    }

    #[test]
    fn fractional_rates_keep_precision() {
        let scenario = Scenario::new(Decimal::new(125, 1), Decimal::ZERO);
        let adjusted = scenario.apply(&book()).unwrap();
        assert_eq!(adjusted[0].amount, Money::from(1125));
    }

    #[test]
    fn overflowing_scaled_amount_is_an_error() {
        let anchor = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let huge = Transaction::new(TransactionKind::Inflow, "Sales", Money::new(Decimal::MAX), anchor)
            .unwrap();
        assert!(matches!(
            Scenario::OPTIMISTIC.apply(&[huge]),
            Err(crate::EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn presets_are_named() {
        let names: Vec<_> = NamedScenario::presets().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["base", "optimistic", "pessimistic"]);
    }
}
