//! The module contains the errors the engine can return.
//!
//! Every error is raised before any [`MonthBucket`] is built: a projection
//! either succeeds completely or fails with one of these.
//!
//!  [`MonthBucket`]: super::aggregate::MonthBucket
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid transaction kind: {0}")]
    InvalidKind(String),
    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    #[error("Export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}
