//! Positional monthly grid used by the spreadsheet view.
//!
//! Unlike the projection, the grid has no dates: every row carries a fixed
//! array of [`GRID_MONTHS`] amounts addressed by index, grouped under revenue
//! or cost categories. The helpers here compute the subtotals, totals and
//! dashboard figures shown around the grid.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, util::overflow};

/// Slots in a grid row (two years).
pub const GRID_MONTHS: usize = 24;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Revenue,
    #[serde(alias = "expense")]
    Cost,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCategory {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
}

/// Exactly [`GRID_MONTHS`] amounts.
///
/// Shorter inputs are padded with zeros, longer ones truncated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Money>", into = "Vec<Money>")]
pub struct MonthlyValues([Money; GRID_MONTHS]);

impl Default for MonthlyValues {
    fn default() -> Self {
        Self([Money::ZERO; GRID_MONTHS])
    }
}

impl MonthlyValues {
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = Money>) -> Self {
        let mut slots = [Money::ZERO; GRID_MONTHS];
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = value;
        }
        Self(slots)
    }

    /// Amount at `month` (0-based), zero when out of range.
    #[must_use]
    pub fn get(&self, month: usize) -> Money {
        self.0.get(month).copied().unwrap_or(Money::ZERO)
    }

    pub fn set(&mut self, month: usize, value: Money) -> ResultEngine<()> {
        let slot = self.0.get_mut(month).ok_or_else(|| {
            EngineError::InvalidGrid(format!(
                "month index {month} out of range 0..{GRID_MONTHS}"
            ))
        })?;
        *slot = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = Money> + '_ {
        self.0.iter().copied()
    }

    pub fn total(&self) -> ResultEngine<Money> {
        Money::checked_sum(self.iter()).ok_or_else(|| overflow("row total"))
    }
}

impl From<Vec<Money>> for MonthlyValues {
    fn from(values: Vec<Money>) -> Self {
        Self::from_values(values)
    }
}

impl From<MonthlyValues> for Vec<Money> {
    fn from(values: MonthlyValues) -> Self {
        values.0.to_vec()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub monthly_values: MonthlyValues,
}

/// One column of the grid after aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMonth {
    /// 1-based month number.
    pub month: usize,
    pub revenue: Money,
    pub costs: Money,
    pub net: Money,
    pub cash: Money,
}

/// Column header for a 0-based month index: `Jan Y1`, ..., `Dec Y2`.
#[must_use]
pub fn month_name(index: usize) -> String {
    format!("{} Y{}", MONTH_NAMES[index % 12], index / 12 + 1)
}

/// Sum of the rows of `category_id` at `month`.
pub fn category_subtotal(rows: &[GridRow], category_id: Uuid, month: usize) -> ResultEngine<Money> {
    Money::checked_sum(
        rows.iter()
            .filter(|row| row.category_id == category_id)
            .map(|row| row.monthly_values.get(month)),
    )
    .ok_or_else(|| overflow("category subtotal"))
}

/// Sum of a row over all months.
pub fn row_total(row: &GridRow) -> ResultEngine<Money> {
    row.monthly_values.total()
}

fn revenue_and_costs(
    categories: &[GridCategory],
    rows: &[GridRow],
    month: usize,
) -> ResultEngine<(Money, Money)> {
    let mut revenue = Money::ZERO;
    let mut costs = Money::ZERO;
    for category in categories {
        let subtotal = category_subtotal(rows, category.id, month)?;
        let total = match category.kind {
            CategoryKind::Revenue => &mut revenue,
            CategoryKind::Cost => &mut costs,
        };
        *total = total
            .checked_add(subtotal)
            .ok_or_else(|| overflow("grid column total"))?;
    }
    Ok((revenue, costs))
}

/// Revenue minus costs at `month`. Rows without a known category are ignored.
pub fn grand_total(categories: &[GridCategory], rows: &[GridRow], month: usize) -> ResultEngine<Money> {
    let (revenue, costs) = revenue_and_costs(categories, rows, month)?;
    revenue.checked_sub(costs).ok_or_else(|| overflow("grid net"))
}

/// All [`GRID_MONTHS`] columns with a running cash balance.
pub fn monthly_series(
    categories: &[GridCategory],
    rows: &[GridRow],
    starting_cash: Money,
) -> ResultEngine<Vec<GridMonth>> {
    let mut cash = starting_cash;
    (0..GRID_MONTHS)
        .map(|month| {
            let (revenue, costs) = revenue_and_costs(categories, rows, month)?;
            let net = revenue.checked_sub(costs).ok_or_else(|| overflow("grid net"))?;
            cash = cash.checked_add(net).ok_or_else(|| overflow("grid cash"))?;
            Ok(GridMonth {
                month: month + 1,
                revenue,
                costs,
                net,
                cash,
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "months", rename_all = "snake_case")]
pub enum Runway {
    Months(i64),
    Indefinite,
}

/// Dashboard figures derived from the grid columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridKpis {
    /// Cash at the end of the first month.
    pub cash_position: Money,
    /// Average negative net over the first three months (positive months
    /// count as zero).
    pub burn_rate: Money,
    pub runway: Runway,
    /// Net of the first month.
    pub net_cashflow: Money,
    /// Percentage changes of the first month against the second:
    /// `(first - second) / |second| * 100`.
    pub cash_change_percent: Decimal,
    pub burn_change_percent: Decimal,
    pub net_change_percent: Decimal,
}

const KPI_BURN_WINDOW: usize = 3;

fn burn(net: Money) -> Money {
    if net.is_negative() { net.abs() } else { Money::ZERO }
}

/// `(current - previous) / |previous| * 100`, zero when `previous` is zero.
fn change_percent(current: Money, previous: Money) -> ResultEngine<Decimal> {
    if previous.is_zero() {
        return Ok(Decimal::ZERO);
    }
    current
        .checked_sub(previous)
        .and_then(|delta| delta.amount().checked_div(previous.abs().amount()))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| overflow("change percentage"))
}

impl GridKpis {
    /// Dashboard figures for `series`. The first column is the current month
    /// and the second the one it is compared against.
    pub fn from_series(series: &[GridMonth]) -> ResultEngine<Self> {
        let first = series.first().copied();
        let second = series.get(1).copied();
        let cash_position = first.map_or(Money::ZERO, |m| m.cash);
        let net_cashflow = first.map_or(Money::ZERO, |m| m.net);

        let window = Money::checked_sum(
            (0..KPI_BURN_WINDOW).map(|i| series.get(i).map_or(Money::ZERO, |m| burn(m.net))),
        )
        .ok_or_else(|| overflow("burn total"))?;
        let burn_rate = Money::new(window.amount() / Decimal::from(KPI_BURN_WINDOW));

        let runway = if burn_rate.is_positive() {
            cash_position
                .amount()
                .checked_div(burn_rate.amount())
                .and_then(|months| months.floor().to_i64())
                .map_or(Runway::Indefinite, Runway::Months)
        } else {
            Runway::Indefinite
        };

        let (cash_change_percent, burn_change_percent, net_change_percent) = match (first, second) {
            (Some(first), Some(second)) => (
                change_percent(first.cash, second.cash)?,
                change_percent(burn(first.net), burn(second.net))?,
                change_percent(first.net, second.net)?,
            ),
            _ => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        Ok(Self {
            cash_position,
            burn_rate,
            runway,
            net_cashflow,
            cash_change_percent,
            burn_change_percent,
            net_change_percent,
        })
    }
}
