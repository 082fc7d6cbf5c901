//! Flat CSV rendering of a monthly series.

use csv::{Terminator, WriterBuilder};
use serde::Serialize;

use crate::{EngineError, MonthBucket, ResultEngine};

#[derive(Serialize)]
struct ExportRow {
    #[serde(rename = "Month")]
    month: String,
    #[serde(rename = "Cash In")]
    cash_in: String,
    #[serde(rename = "Cash Out")]
    cash_out: String,
    #[serde(rename = "Net Cashflow")]
    net_cashflow: String,
    #[serde(rename = "Cumulative Cash")]
    cumulative_cash: String,
}

impl From<&MonthBucket> for ExportRow {
    fn from(bucket: &MonthBucket) -> Self {
        Self {
            month: bucket.label(),
            cash_in: bucket.inflow.to_string(),
            cash_out: bucket.outflow.to_string(),
            net_cashflow: bucket.net.to_string(),
            cumulative_cash: bucket.cumulative.to_string(),
        }
    }
}

const HEADER: [&str; 5] = [
    "Month",
    "Cash In",
    "Cash Out",
    "Net Cashflow",
    "Cumulative Cash",
];

/// Renders `buckets` as comma separated text.
///
/// One header line, then one line per bucket in input order. Amounts carry
/// exactly two decimals and no thousands separators.
pub fn to_delimited_text(buckets: &[MonthBucket]) -> ResultEngine<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    // Written by hand so an empty series still gets a header.
    writer.write_record(HEADER)?;
    for bucket in buckets {
        writer.serialize(ExportRow::from(bucket))?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))?;
    String::from_utf8(data).map_err(|err| EngineError::Export(err.to_string()))
}
