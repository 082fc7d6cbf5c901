//! Plain-text rendering for the terminal.

use std::fmt;

use engine::{
    Projection, ScenarioProjection, Summary,
    grid::{GridKpis, GridMonth, Runway, month_name},
};
use rust_decimal::Decimal;

fn percent(value: Decimal) -> String {
    format!("{:+.1}%", value.round_dp(1))
}

fn write_summary(f: &mut fmt::Formatter<'_>, summary: &Summary) -> fmt::Result {
    writeln!(f, "Total in:        {}", summary.total_in)?;
    writeln!(f, "Total out:       {}", summary.total_out)?;
    writeln!(f, "Avg burn rate:   {}", summary.average_burn_rate)?;
    writeln!(f, "Runway:          {} months", summary.runway)?;
    match summary.break_even_month {
        Some(month) => writeln!(f, "Break-even:      {}", month.format("%b %Y")),
        None => writeln!(f, "Break-even:      not reached"),
    }
}

/// Monthly table, balances, metrics and alerts of one projection.
pub struct ProjectionReport<'a>(pub &'a Projection);

impl fmt::Display for ProjectionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let projection = self.0;
        writeln!(
            f,
            "{:<10} {:>14} {:>14} {:>14} {:>16}",
            "Month", "Cash In", "Cash Out", "Net", "Cumulative"
        )?;
        for bucket in &projection.months {
            writeln!(
                f,
                "{:<10} {:>14} {:>14} {:>14} {:>16}",
                bucket.label(),
                bucket.inflow.to_string(),
                bucket.outflow.to_string(),
                bucket.net.to_string(),
                bucket.cumulative.to_string()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Starting:        {}", projection.starting_balance)?;
        writeln!(f, "Ending:          {}", projection.ending_balance())?;
        write_summary(f, &projection.summary)?;

        if !projection.summary.alerts.is_empty() {
            writeln!(f)?;
            for alert in &projection.summary.alerts {
                writeln!(f, "[{}] {}", alert.severity.as_str(), alert.message)?;
            }
        }
        Ok(())
    }
}

/// One line per scenario.
pub struct ScenarioReport<'a>(pub &'a [ScenarioProjection]);

impl fmt::Display for ScenarioReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>16} {:>14} {:>8} {:>8}",
            "Scenario", "Ending", "Burn rate", "Runway", "Alerts"
        )?;
        for result in self.0 {
            let summary = &result.projection.summary;
            writeln!(
                f,
                "{:<12} {:>16} {:>14} {:>8} {:>8}",
                result.name,
                result.projection.ending_balance().to_string(),
                summary.average_burn_rate.to_string(),
                summary.runway,
                summary.alerts.len()
            )?;
        }
        Ok(())
    }
}

pub struct GridReport<'a> {
    pub series: &'a [GridMonth],
    pub kpis: &'a GridKpis,
}

impl fmt::Display for GridReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<8} {:>14} {:>14} {:>14} {:>16}",
            "Month", "Revenue", "Costs", "Net", "Cash"
        )?;
        for month in self.series {
            writeln!(
                f,
                "{:<8} {:>14} {:>14} {:>14} {:>16}",
                month_name(month.month.saturating_sub(1)),
                month.revenue.to_string(),
                month.costs.to_string(),
                month.net.to_string(),
                month.cash.to_string()
            )?;
        }
        let kpis = self.kpis;
        writeln!(f)?;
        writeln!(
            f,
            "Cash position:   {} ({})",
            kpis.cash_position,
            percent(kpis.cash_change_percent)
        )?;
        writeln!(
            f,
            "Burn rate:       {} ({})",
            kpis.burn_rate,
            percent(kpis.burn_change_percent)
        )?;
        writeln!(
            f,
            "Net cashflow:    {} ({})",
            kpis.net_cashflow,
            percent(kpis.net_change_percent)
        )?;
        match kpis.runway {
            Runway::Months(months) => writeln!(f, "Runway:          {months} months"),
            Runway::Indefinite => writeln!(f, "Runway:          indefinite"),
        }
    }
}
