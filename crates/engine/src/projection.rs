//! Engine entry point: validation, expansion, aggregation and metrics in one
//! call.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    Horizon, Money, MonthBucket, NamedScenario, ResultEngine, Summary, Transaction, aggregate,
    expand, export, horizon::DEFAULT_MONTHS, summarize,
};

/// Stateless projection engine.
///
/// Holds only the run parameters; every call to [`Engine::project`] builds its
/// result from scratch, so one engine can serve concurrent callers.
#[derive(Clone, Debug)]
pub struct Engine {
    horizon: Horizon,
    starting_balance: Money,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }

    pub fn starting_balance(&self) -> Money {
        self.starting_balance
    }

    /// Projects `transactions` over the engine's horizon.
    ///
    /// Every transaction is validated before anything is computed: on error no
    /// partial projection is produced.
    pub fn project(&self, transactions: &[Transaction]) -> ResultEngine<Projection> {
        for tx in transactions {
            tx.validate()?;
        }

        let mut occurrences = Vec::new();
        for tx in transactions {
            occurrences.extend(expand(tx, &self.horizon)?);
        }

        let months = aggregate(&occurrences, self.starting_balance, &self.horizon)?;
        let summary = summarize(&months)?;

        tracing::debug!(
            transactions = transactions.len(),
            occurrences = occurrences.len(),
            months = months.len(),
            runway = summary.runway,
            alerts = summary.alerts.len(),
            "projection computed"
        );

        Ok(Projection {
            horizon: self.horizon,
            starting_balance: self.starting_balance,
            months,
            summary,
        })
    }

    /// Projects `transactions` adjusted by one named scenario.
    pub fn project_scenario(
        &self,
        transactions: &[Transaction],
        named: &NamedScenario,
    ) -> ResultEngine<ScenarioProjection> {
        let adjusted = named.scenario.apply(transactions)?;
        Ok(ScenarioProjection {
            name: named.name.clone(),
            projection: self.project(&adjusted)?,
        })
    }

    /// Projects `transactions` once per scenario, in the given order.
    pub fn compare(
        &self,
        transactions: &[Transaction],
        scenarios: &[NamedScenario],
    ) -> ResultEngine<Vec<ScenarioProjection>> {
        scenarios
            .iter()
            .map(|named| self.project_scenario(transactions, named))
            .collect()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    start: Option<NaiveDate>,
    months: Option<u32>,
    starting_balance: Money,
}

impl EngineBuilder {
    /// Any date of the first projected month. Defaults to the current month.
    pub fn start(mut self, start: NaiveDate) -> EngineBuilder {
        self.start = Some(start);
        self
    }

    /// Number of projected months. Defaults to 24.
    pub fn months(mut self, months: u32) -> EngineBuilder {
        self.months = Some(months);
        self
    }

    /// Cash available before the first month. Defaults to zero.
    pub fn starting_balance(mut self, balance: Money) -> EngineBuilder {
        self.starting_balance = balance;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let months = self.months.unwrap_or(DEFAULT_MONTHS);
        let horizon = match self.start {
            Some(start) => Horizon::new(start, months)?,
            None => Horizon::from_current_month(months)?,
        };
        Ok(Engine {
            horizon,
            starting_balance: self.starting_balance,
        })
    }
}

/// Result of one projection run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub horizon: Horizon,
    pub starting_balance: Money,
    pub months: Vec<MonthBucket>,
    #[serde(flatten)]
    pub summary: Summary,
}

impl Projection {
    /// Balance after the last month, or the starting balance for an empty
    /// horizon.
    pub fn ending_balance(&self) -> Money {
        self.months
            .last()
            .map_or(self.starting_balance, |m| m.cumulative)
    }

    /// CSV rendering of the monthly series.
    pub fn to_delimited_text(&self) -> ResultEngine<String> {
        export::to_delimited_text(&self.months)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioProjection {
    pub name: String,
    pub projection: Projection,
}
