use std::{path::Path, sync::Arc};

use api_types::{grid::Sheet, projection::ProjectionRequest};
use clap::Parser;
use engine::{Engine, Money, ScenarioProjection, Transaction, grid::GridKpis};

use crate::{
    cli::{Cli, Command, GridArgs, ProjectionArgs},
    error::Result,
    settings::Settings,
};

mod cli;
mod convert;
mod error;
mod report;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cashplan={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Project(args) => {
            let (engine, transactions) = load_projection(&args.projection, &settings)?;
            let projection = engine.project(&transactions)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                print!("{}", report::ProjectionReport(&projection));
            }
        }
        Command::Export(args) => {
            let (engine, transactions) = load_projection(&args.projection, &settings)?;
            let text = engine.project(&transactions)?.to_delimited_text()?;
            match args.output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    tracing::info!("projection written to {}", path.display());
                }
                None => print!("{text}"),
            }
        }
        Command::Scenarios(args) => {
            let (engine, transactions) = load_projection(&args, &settings)?;
            let results = run_scenarios(engine, transactions, &settings).await?;
            print!("{}", report::ScenarioReport(&results));
        }
        Command::Grid(args) => run_grid(&args)?,
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Builds the engine from the input file, with command line options taking
/// precedence over the file and the file over the settings.
fn load_projection(
    args: &ProjectionArgs,
    settings: &Settings,
) -> Result<(Engine, Vec<Transaction>)> {
    let request: ProjectionRequest = read_json(&args.input)?;
    let transactions = convert::transactions(&request.transactions)?;

    let months = args
        .months
        .or(request.months)
        .unwrap_or(settings.projection.months);
    let starting_balance = match (&args.starting_balance, &request.starting_balance) {
        (Some(text), _) => text.parse::<Money>()?,
        (None, Some(amount)) => convert::amount(amount)?,
        (None, None) => Money::new(settings.projection.starting_balance),
    };

    let mut builder = Engine::builder()
        .months(convert::months(months))
        .starting_balance(starting_balance);
    if let Some(start) = args.start.or(request.start) {
        builder = builder.start(start);
    }
    let engine = builder.build()?;

    tracing::debug!(
        "loaded {} transactions from {}",
        transactions.len(),
        args.input.display()
    );
    Ok((engine, transactions))
}

/// Projects every configured scenario on the blocking pool and returns them
/// in configuration order.
async fn run_scenarios(
    engine: Engine,
    transactions: Vec<Transaction>,
    settings: &Settings,
) -> Result<Vec<ScenarioProjection>> {
    let engine = Arc::new(engine);
    let transactions = Arc::new(transactions);
    let mut tasks = tokio::task::JoinSet::new();

    for (index, named) in settings.scenarios.named().into_iter().enumerate() {
        let engine = Arc::clone(&engine);
        let transactions = Arc::clone(&transactions);
        tasks.spawn_blocking(move || {
            engine
                .project_scenario(&transactions, &named)
                .map(|result| (index, result))
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined??);
    }
    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}

fn run_grid(args: &GridArgs) -> Result<()> {
    let sheet: Sheet = read_json(&args.input)?;
    let grid = convert::sheet(&sheet)?;
    let series = engine::grid::monthly_series(&grid.categories, &grid.rows, grid.starting_cash)?;

    match args.analysis {
        Some(kind) => {
            let request = convert::analysis_request(kind.into(), &series, &grid.categories);
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        None => {
            let kpis = GridKpis::from_series(&series)?;
            print!(
                "{}",
                report::GridReport {
                    series: &series,
                    kpis: &kpis,
                }
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{RecurrenceInterval, TransactionKind};

    use super::*;

    #[tokio::test]
    async fn scenarios_run_in_configured_order() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let engine = Engine::builder()
            .start(start)
            .months(6)
            .starting_balance(Money::from(1000))
            .build()
            .unwrap();
        let book = vec![
            Transaction::new(TransactionKind::Inflow, "Sales", Money::from(500), start)
                .unwrap()
                .every(RecurrenceInterval::Monthly),
            Transaction::new(TransactionKind::Outflow, "Rent", Money::from(400), start)
                .unwrap()
                .every(RecurrenceInterval::Monthly),
        ];
        let settings = Settings::default();
        let expected = engine.compare(&book, &settings.scenarios.named()).unwrap();

        let results = run_scenarios(engine, book, &settings).await.unwrap();

        assert_eq!(results, expected);
    }
}
