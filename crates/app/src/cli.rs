use std::path::PathBuf;

use api_types::analysis::AnalysisKind;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "cashplan")]
#[command(about = "Forecast monthly cash positions from recurring transactions")]
pub struct Cli {
    /// Optional config file path (TOML). Defaults to `cashplan.toml` if present.
    #[arg(long, env = "CASHPLAN_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the monthly projection, metrics and alerts.
    Project(ProjectArgs),
    /// Write the monthly projection as delimited text.
    Export(ExportArgs),
    /// Compare the base, optimistic and pessimistic scenarios.
    Scenarios(ProjectionArgs),
    /// Summarize a 24-month cashflow sheet.
    Grid(GridArgs),
}

/// Options shared by every command that runs a projection.
#[derive(Args, Debug)]
pub struct ProjectionArgs {
    /// JSON file with the transactions (and optionally balance, start, months).
    #[arg(long, short)]
    pub input: PathBuf,
    /// Any date in the first projected month. Defaults to the current month.
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Months to project.
    #[arg(long, allow_hyphen_values = true)]
    pub months: Option<i64>,
    /// Cash available before the first month.
    #[arg(long, allow_hyphen_values = true)]
    pub starting_balance: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub projection: ProjectionArgs,
    /// Print the projection as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub projection: ProjectionArgs,
    /// Destination file. Writes to stdout when omitted.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    /// JSON file with the sheet categories, rows and starting cash.
    #[arg(long, short)]
    pub input: PathBuf,
    /// Print the request body for the analysis service instead of the summary.
    #[arg(long, value_enum)]
    pub analysis: Option<Analysis>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Analysis {
    Analyze,
    Forecast,
    Suggest,
}

impl From<Analysis> for AnalysisKind {
    fn from(value: Analysis) -> Self {
        match value {
            Analysis::Analyze => AnalysisKind::Analyze,
            Analysis::Forecast => AnalysisKind::Forecast,
            Analysis::Suggest => AnalysisKind::Suggest,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_months() {
        let cli = Cli::parse_from([
            "cashplan",
            "project",
            "--input",
            "plan.json",
            "--months",
            "-2",
            "--json",
        ]);
        let Command::Project(args) = cli.command else {
            panic!("expected project command");
        };
        assert_eq!(args.projection.months, Some(-2));
        assert!(args.json);
    }

    #[test]
    fn parses_grid_analysis_kind() {
        let cli = Cli::parse_from(["cashplan", "grid", "-i", "sheet.json", "--analysis", "suggest"]);
        let Command::Grid(args) = cli.command else {
            panic!("expected grid command");
        };
        assert!(matches!(args.analysis, Some(Analysis::Suggest)));
    }
}
