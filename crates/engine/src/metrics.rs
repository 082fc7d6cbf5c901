//! Metrics and alerts derived from a monthly series.
//!
//! Notes:
//! - the burn rate only looks at the first [`BURN_WINDOW`] months;
//! - runway is capped at the horizon length, there is no "indefinite" value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Money, MonthBucket, ResultEngine, aggregate::month_label, util::overflow};

/// Months looked at by the burn rate and the negative-quarter alert.
pub const BURN_WINDOW: usize = 3;
/// Runway at or below this many months is critical.
pub const CRITICAL_RUNWAY: usize = 3;
/// Runway at or below this many months (and above critical) is a warning.
pub const WARNING_RUNWAY: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    /// First day of the month the alert refers to, if any.
    pub month: Option<NaiveDate>,
}

impl Alert {
    fn new(severity: Severity, message: String) -> Self {
        Self {
            severity,
            message,
            month: None,
        }
    }
}

/// Horizon-wide figures computed from the monthly buckets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_in: Money,
    pub total_out: Money,
    pub average_burn_rate: Money,
    /// Leading months with a strictly positive balance.
    pub runway: usize,
    /// First month whose balance is above the starting balance.
    pub break_even_month: Option<NaiveDate>,
    pub alerts: Vec<Alert>,
}

/// Computes totals, burn rate, runway, break-even and alerts.
///
/// An empty series yields zeroed metrics and no alerts. Totals that do not fit
/// in a [`Money`] are reported as an error.
pub fn summarize(buckets: &[MonthBucket]) -> ResultEngine<Summary> {
    let total_in = Money::checked_sum(buckets.iter().map(|b| b.inflow))
        .ok_or_else(|| overflow("total inflow"))?;
    let total_out = Money::checked_sum(buckets.iter().map(|b| b.outflow))
        .ok_or_else(|| overflow("total outflow"))?;
    let average_burn_rate = average_burn_rate(buckets)?;
    let runway = runway(buckets);
    let break_even_month = break_even_month(buckets);
    let alerts = alerts(buckets, runway);

    Ok(Summary {
        total_in,
        total_out,
        average_burn_rate,
        runway,
        break_even_month,
        alerts,
    })
}

/// Mean magnitude of the negative nets among the first [`BURN_WINDOW`] months.
pub fn average_burn_rate(buckets: &[MonthBucket]) -> ResultEngine<Money> {
    let negatives: Vec<Money> = buckets
        .iter()
        .take(BURN_WINDOW)
        .filter(|b| b.net.is_negative())
        .map(|b| b.net.abs())
        .collect();

    if negatives.is_empty() {
        return Ok(Money::ZERO);
    }
    let total = Money::checked_sum(negatives.iter().copied()).ok_or_else(|| overflow("burn total"))?;
    Ok(Money::new(total.amount() / Decimal::from(negatives.len())))
}

/// Leading consecutive months with a strictly positive cumulative balance.
pub fn runway(buckets: &[MonthBucket]) -> usize {
    buckets
        .iter()
        .take_while(|b| b.cumulative.is_positive())
        .count()
}

/// First month whose cumulative balance exceeds the balance the series
/// started from.
pub fn break_even_month(buckets: &[MonthBucket]) -> Option<NaiveDate> {
    let starting_balance = buckets.first()?.opening();
    buckets
        .iter()
        .find(|b| b.cumulative > starting_balance)
        .map(|b| b.month)
}

fn alerts(buckets: &[MonthBucket], runway: usize) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if runway > 0 && runway <= CRITICAL_RUNWAY {
        alerts.push(Alert::new(
            Severity::Danger,
            format!("Critical: Only {runway} months of runway remaining"),
        ));
    }
    if runway > CRITICAL_RUNWAY && runway <= WARNING_RUNWAY {
        alerts.push(Alert::new(
            Severity::Warning,
            format!("Warning: {runway} months of runway remaining"),
        ));
    }

    let negative_months = buckets
        .iter()
        .take(BURN_WINDOW)
        .filter(|b| b.net.is_negative())
        .count();
    if negative_months >= 2 {
        alerts.push(Alert::new(
            Severity::Warning,
            "Multiple negative cashflow months in the next quarter".to_string(),
        ));
    }

    if let Some(bucket) = buckets.iter().find(|b| b.cumulative.is_negative()) {
        alerts.push(Alert {
            severity: Severity::Danger,
            message: format!("Cash runs out in {}", month_label(bucket.month)),
            month: Some(bucket.month),
        });
    }

    alerts
}
