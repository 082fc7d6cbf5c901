//! Wire types shared by the CLI and the external collaborators (record store
//! exports, the analysis service).
//!
//! These mirror the loosely typed records the planning app stores: amounts may
//! arrive as JSON numbers or numeric strings, recurrence is a flag plus an
//! optional frequency. Validation happens when they are turned into engine
//! types, not here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An amount as found in stored records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Default for Amount {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        #[serde(alias = "inflow")]
        Revenue,
        #[serde(alias = "outflow")]
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RecurrenceFrequency {
        Weekly,
        Monthly,
        Quarterly,
        Yearly,
    }

    /// A transaction record.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionRecord {
        /// Transaction id (UUID). A fresh one is generated when missing.
        #[serde(default)]
        pub id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub name: String,
        pub amount: Amount,
        pub date: NaiveDate,
        #[serde(default)]
        pub is_recurring: bool,
        #[serde(default)]
        pub recurrence_frequency: Option<RecurrenceFrequency>,
        #[serde(default)]
        pub recurrence_end_date: Option<NaiveDate>,
        /// Signed so that bad records can be reported instead of failing to
        /// parse.
        #[serde(default)]
        pub payment_delay_days: i64,
        #[serde(default)]
        pub category_id: Option<String>,
    }
}

pub mod projection {
    use super::*;

    /// Input file for a projection run.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ProjectionRequest {
        #[serde(default)]
        pub starting_balance: Option<Amount>,
        /// Months to project; non-positive values produce an empty forecast.
        #[serde(default)]
        pub months: Option<i64>,
        /// Any date in the first month. Defaults to the current month.
        #[serde(default)]
        pub start: Option<NaiveDate>,
        #[serde(default)]
        pub transactions: Vec<transaction::TransactionRecord>,
    }
}

pub mod grid {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryType {
        Revenue,
        #[serde(alias = "expense")]
        Cost,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryType,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Row {
        pub id: Uuid,
        pub category_id: Uuid,
        pub name: String,
        /// Missing or null cells count as zero.
        #[serde(default)]
        pub monthly_values: Vec<Option<Amount>>,
    }

    /// A whole cashflow sheet.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct Sheet {
        #[serde(default)]
        pub starting_cash: Option<Amount>,
        #[serde(default)]
        pub categories: Vec<Category>,
        #[serde(default)]
        pub rows: Vec<Row>,
    }
}

pub mod analysis {
    use super::*;

    /// What the analysis service is asked to draft.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AnalysisKind {
        /// Risks, opportunities and recommendations.
        Analyze,
        /// Month-by-month outlook.
        Forecast,
        /// Cost-cutting and revenue ideas.
        Suggest,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct MonthlyPoint {
        /// 1-based month number.
        pub month: usize,
        pub revenue: f64,
        pub costs: f64,
        pub net: f64,
        pub cash: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryName {
        pub name: String,
    }

    /// Request body sent to the analysis service.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AnalysisRequest {
        #[serde(rename = "type")]
        pub kind: AnalysisKind,
        #[serde(rename = "monthlyData")]
        pub monthly_data: Vec<MonthlyPoint>,
        pub categories: Vec<CategoryName>,
    }

    /// Response body: free text drafted by the service.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AnalysisResponse {
        pub analysis: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_record_accepts_stored_shape() {
        let record: transaction::TransactionRecord = serde_json::from_str(
            r#"{
                "type": "expense",
                "name": "Rent",
                "amount": "1200.50",
                "date": "2026-01-15",
                "is_recurring": true,
                "recurrence_frequency": "monthly",
                "payment_delay_days": 30
            }"#,
        )
        .unwrap();
        assert_eq!(record.kind, transaction::TransactionType::Expense);
        assert_eq!(record.amount, Amount::Text("1200.50".to_string()));
        assert_eq!(
            record.recurrence_frequency,
            Some(transaction::RecurrenceFrequency::Monthly)
        );
        assert_eq!(record.id, None);
        assert_eq!(record.recurrence_end_date, None);
    }

    #[test]
    fn amount_accepts_numbers() {
        let amount: Amount = serde_json::from_str("1500").unwrap();
        assert_eq!(amount, Amount::Number(1500.0));
    }

    #[test]
    fn grid_rows_tolerate_null_cells() {
        let row: grid::Row = serde_json::from_str(
            r#"{
                "id": "6f1c1d1e-2f4b-4a5e-9c55-0c1d2e3f4a5b",
                "category_id": "0d9b1a72-6a0e-4c5b-8a8f-5b7e1f0e2c3d",
                "name": "Hosting",
                "monthly_values": [10, null, "12"]
            }"#,
        )
        .unwrap();
        assert_eq!(row.monthly_values.len(), 3);
        assert_eq!(row.monthly_values[1], None);
    }

    #[test]
    fn analysis_request_uses_service_field_names() {
        let request = analysis::AnalysisRequest {
            kind: analysis::AnalysisKind::Forecast,
            monthly_data: vec![],
            categories: vec![analysis::CategoryName {
                name: "Payroll".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "forecast");
        assert!(json["monthlyData"].as_array().unwrap().is_empty());
    }

    #[test]
    fn analysis_response_reads_service_reply() {
        let response: analysis::AnalysisResponse = serde_json::from_str(
            r#"{"analysis": "Costs grow faster than revenue from month 4."}"#,
        )
        .unwrap();
        assert_eq!(
            response.analysis,
            "Costs grow faster than revenue from month 4."
        );
        assert!(serde_json::from_str::<analysis::AnalysisResponse>("{}").is_err());
    }
}
