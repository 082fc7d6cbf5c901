//! Conversion from wire records to engine types.
//!
//! This is the validation boundary: non-finite or unparsable amounts, negative
//! delays and recurring records without a frequency are rejected here or by
//! the engine's own checks, before any projection runs.

use api_types::{
    Amount,
    analysis::{AnalysisKind, AnalysisRequest, CategoryName, MonthlyPoint},
    grid::{CategoryType, Sheet},
    transaction::{RecurrenceFrequency, TransactionRecord, TransactionType},
};
use engine::{
    EngineError, Money, RecurrenceInterval, ResultEngine, Transaction, TransactionKind,
    grid::{CategoryKind, GridCategory, GridMonth, GridRow, MonthlyValues},
};
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

pub fn amount(value: &Amount) -> ResultEngine<Money> {
    match value {
        Amount::Number(number) => Money::try_from_f64(*number),
        Amount::Text(text) => text.parse(),
    }
}

fn kind(value: TransactionType) -> TransactionKind {
    match value {
        TransactionType::Revenue => TransactionKind::Inflow,
        TransactionType::Expense => TransactionKind::Outflow,
    }
}

fn interval(value: RecurrenceFrequency) -> RecurrenceInterval {
    match value {
        RecurrenceFrequency::Weekly => RecurrenceInterval::Weekly,
        RecurrenceFrequency::Monthly => RecurrenceInterval::Monthly,
        RecurrenceFrequency::Quarterly => RecurrenceInterval::Quarterly,
        RecurrenceFrequency::Yearly => RecurrenceInterval::Yearly,
    }
}

pub fn transaction(record: &TransactionRecord) -> ResultEngine<Transaction> {
    let payment_delay_days = u32::try_from(record.payment_delay_days).map_err(|_| {
        EngineError::InvalidDate(format!(
            "payment delay for '{}' must be between 0 and {} days, got {}",
            record.name,
            u32::MAX,
            record.payment_delay_days
        ))
    })?;

    let tx = Transaction {
        id: record.id.unwrap_or_else(Uuid::new_v4),
        kind: kind(record.kind),
        label: record.name.clone(),
        amount: amount(&record.amount)?,
        anchor_date: record.date,
        recurring: record.is_recurring,
        interval: record.recurrence_frequency.map(interval),
        end_date: record.recurrence_end_date,
        payment_delay_days,
        category: record.category_id.clone(),
    };
    tx.validate()?;
    Ok(tx)
}

pub fn transactions(records: &[TransactionRecord]) -> ResultEngine<Vec<Transaction>> {
    records.iter().map(transaction).collect()
}

/// Month count for the engine; non-positive values mean an empty horizon.
pub fn months(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Grid cells behave like the spreadsheet: empty or unreadable cells are 0.
fn cell(value: Option<&Amount>) -> Money {
    match value.map(amount) {
        None => Money::ZERO,
        Some(Ok(money)) => money,
        Some(Err(err)) => {
            tracing::warn!("treating unreadable grid cell as zero: {err}");
            Money::ZERO
        }
    }
}

pub struct GridSheet {
    pub starting_cash: Money,
    pub categories: Vec<GridCategory>,
    pub rows: Vec<GridRow>,
}

pub fn sheet(sheet: &Sheet) -> ResultEngine<GridSheet> {
    let starting_cash = match &sheet.starting_cash {
        Some(value) => amount(value)?,
        None => Money::ZERO,
    };
    let categories = sheet
        .categories
        .iter()
        .map(|category| GridCategory {
            id: category.id,
            name: category.name.clone(),
            kind: match category.kind {
                CategoryType::Revenue => CategoryKind::Revenue,
                CategoryType::Cost => CategoryKind::Cost,
            },
        })
        .collect();
    let rows = sheet
        .rows
        .iter()
        .map(|row| GridRow {
            id: row.id,
            category_id: row.category_id,
            name: row.name.clone(),
            monthly_values: MonthlyValues::from_values(
                row.monthly_values.iter().map(|value| cell(value.as_ref())),
            ),
        })
        .collect();

    Ok(GridSheet {
        starting_cash,
        categories,
        rows,
    })
}

fn to_f64(money: Money) -> f64 {
    money.amount().to_f64().unwrap_or_default()
}

/// Request body for the analysis service.
pub fn analysis_request(
    kind: AnalysisKind,
    series: &[GridMonth],
    categories: &[GridCategory],
) -> AnalysisRequest {
    AnalysisRequest {
        kind,
        monthly_data: series
            .iter()
            .map(|month| MonthlyPoint {
                month: month.month,
                revenue: to_f64(month.revenue),
                costs: to_f64(month.costs),
                net: to_f64(month.net),
                cash: to_f64(month.cash),
            })
            .collect(),
        categories: categories
            .iter()
            .map(|category| CategoryName {
                name: category.name.clone(),
            })
            .collect(),
    }
}
