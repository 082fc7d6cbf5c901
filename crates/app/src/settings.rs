//! Handles settings for the application. Configuration is read from
//! `cashplan.toml` (or the file given with `--config`) and from `CASHPLAN_*`
//! environment variables, e.g. `CASHPLAN_APP__LEVEL=debug`.
use config::{Config, ConfigError, Environment, File};
use engine::{NamedScenario, Scenario};
use rust_decimal::Decimal;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "cashplan";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub months: i64,
    pub starting_balance: Decimal,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            months: i64::from(engine::DEFAULT_MONTHS),
            starting_balance: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Scenarios {
    pub optimistic: Scenario,
    pub pessimistic: Scenario,
}

impl Default for Scenarios {
    fn default() -> Self {
        Self {
            optimistic: Scenario::OPTIMISTIC,
            pessimistic: Scenario::PESSIMISTIC,
        }
    }
}

impl Scenarios {
    /// Base plus the configured optimistic and pessimistic cases.
    pub fn named(&self) -> Vec<NamedScenario> {
        vec![
            NamedScenario::new("base", Scenario::BASE),
            NamedScenario::new("optimistic", self.optimistic),
            NamedScenario::new("pessimistic", self.pessimistic),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub projection: Projection,
    pub scenarios: Scenarios,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(path.is_some()))
            .add_source(
                Environment::with_prefix("CASHPLAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
