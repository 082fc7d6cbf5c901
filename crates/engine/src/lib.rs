//! Recurring cashflow projection engine.
//!
//! Given one-time and recurring [`Transaction`]s, a starting balance and a
//! [`Horizon`], the engine produces a month-by-month cash trajectory
//! ([`MonthBucket`]s) together with burn rate, runway, break-even and
//! [`Alert`]s.
//!
//! The pipeline is pure and synchronous:
//!
//! 1. [`expand`] turns each transaction into dated [`Occurrence`]s;
//! 2. [`aggregate`] buckets occurrences by calendar month and threads the
//!    running balance;
//! 3. [`summarize`] derives the metrics and alerts.
//!
//! [`Engine`] wires the three together. [`Scenario`] rescales a transaction
//! set for what-if comparisons and [`export::to_delimited_text`] renders the
//! series as CSV. The [`grid`] module holds the simpler positional model used
//! by the spreadsheet view.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use engine::{Engine, Money, RecurrenceInterval, Transaction, TransactionKind};
//!
//! let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let sales = Transaction::new(TransactionKind::Inflow, "Sales", Money::from(1000), start)
//!     .unwrap()
//!     .every(RecurrenceInterval::Monthly);
//!
//! let engine = Engine::builder().start(start).months(3).build().unwrap();
//! let projection = engine.project(&[sales]).unwrap();
//! assert_eq!(projection.ending_balance(), Money::from(3000));
//! assert_eq!(projection.summary.runway, 3);
//! ```

pub use aggregate::{MonthBucket, aggregate};
pub use error::EngineError;
pub use horizon::{DEFAULT_MONTHS, Horizon};
pub use metrics::{Alert, Severity, Summary, summarize};
pub use money::Money;
pub use projection::{Engine, EngineBuilder, Projection, ScenarioProjection};
pub use recurrence::{NominalDates, Occurrence, OccurrenceId, expand, nominal_dates};
pub use scenario::{NamedScenario, Scenario};
pub use transactions::{RecurrenceInterval, Transaction, TransactionKind};

mod aggregate;
mod error;
pub mod export;
pub mod grid;
mod horizon;
pub mod metrics;
mod money;
mod projection;
mod recurrence;
mod scenario;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
