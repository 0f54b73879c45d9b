//! Text rendering of engine results
//!
//! JSON output serializes the engine types directly; these functions only
//! build the human-readable form.

use std::fmt::Write;

use pacsim_core::config::AllocationReport;
use pacsim_core::{
    MetricsSummary, MonteCarloSummary, SimulationResult, SimulationWarning, StrategyComparison,
};
use serde::Serialize;

/// Outcome of the closed-form projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionReport {
    pub months: usize,
    pub annual_rate: f64,
    pub total_invested: f64,
    pub future_value: f64,
    /// Compound annual growth of the invested amount into the future value, in percent
    pub cagr: f64,
}

pub fn render_result(result: &SimulationResult, with_series: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Strategy: {}", result.strategy.name());
    let _ = writeln!(out, "Months:   {}", result.metrics.months);
    out.push('\n');
    render_metrics(&mut out, &result.metrics);

    if with_series {
        out.push('\n');
        let _ = writeln!(
            out,
            "{:>5}  {:>10}  {:>14}  {:>14}  {:>12}  {:>9}  {:>9}",
            "month", "date", "invested", "value", "contribution", "return %", "cum %"
        );
        for s in &result.series {
            let date = s.date.map(|d| d.to_string()).unwrap_or_default();
            let _ = writeln!(
                out,
                "{:>5}  {:>10}  {:>14.2}  {:>14.2}  {:>12.2}  {:>9.2}  {:>9.2}",
                s.month,
                date,
                s.total_invested,
                s.total_value,
                s.monthly_investment,
                s.monthly_return,
                s.cumulative_return
            );
        }
    }

    render_warnings(&mut out, &result.warnings);
    out
}

fn render_metrics(out: &mut String, m: &MetricsSummary) {
    let rows = [
        ("Total invested", format!("{:.2}", m.total_invested)),
        ("Final value", format!("{:.2}", m.final_value)),
        ("Total return", format!("{:.2}", m.total_return)),
        ("Cumulative return", format!("{:.2}%", m.cumulative_return)),
        ("Annualized return", format!("{:.2}%", m.annualized_return)),
        ("IRR", format!("{:.2}%", m.irr)),
        ("Volatility", format!("{:.2}%", m.volatility)),
        ("Max drawdown", format!("{:.2}%", m.max_drawdown)),
        ("Sharpe ratio", format!("{:.3}", m.sharpe_ratio)),
        ("Sortino ratio", format!("{:.3}", m.sortino_ratio)),
        ("Calmar ratio", format!("{:.3}", m.calmar_ratio)),
        ("Win rate", format!("{:.1}%", m.win_rate)),
        ("Best month", format!("{:.2}%", m.best_month)),
        ("Worst month", format!("{:.2}%", m.worst_month)),
        ("VaR 95%", format!("{:.2}%", m.value_at_risk_95)),
        ("CVaR 95%", format!("{:.2}%", m.conditional_value_at_risk_95)),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<20}{value:>14}");
    }
}

fn render_warnings(out: &mut String, warnings: &[SimulationWarning]) {
    if warnings.is_empty() {
        return;
    }
    out.push_str("\nWarnings:\n");
    for w in warnings {
        let _ = writeln!(out, "  - {}", w.message);
    }
}

pub fn render_comparison(comparison: &StrategyComparison) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28}{:>14}{:>12}{:>10}{:>12}",
        "strategy", "final value", "cum %", "sharpe", "drawdown %"
    );
    for r in &comparison.results {
        let marker = if r.strategy == comparison.best_strategy {
            "*"
        } else {
            " "
        };
        let m = &r.metrics;
        let _ = writeln!(
            out,
            "{marker}{:<27}{:>14.2}{:>12.2}{:>10.3}{:>12.2}",
            r.strategy.name(),
            m.final_value,
            m.cumulative_return,
            m.sharpe_ratio,
            m.max_drawdown
        );
    }
    let _ = writeln!(out, "\nBest: {}", comparison.best_strategy.name());
    if let Some(first) = comparison.results.first() {
        render_warnings(&mut out, &first.warnings);
    }
    out
}

pub fn render_monte_carlo(summary: &MonteCarloSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} runs of {}",
        summary.iterations,
        summary.strategy.name()
    );
    out.push('\n');
    for (p, value) in &summary.final_value_percentiles {
        let _ = writeln!(out, "P{:<19}{value:>14.2}", (p * 100.0).round());
    }
    let _ = writeln!(out, "{:<20}{:>14.2}", "Mean final value", summary.mean_final_value);
    let _ = writeln!(
        out,
        "{:<20}{:>14.2}",
        "Mean invested", summary.mean_total_invested
    );
    let _ = writeln!(
        out,
        "{:<20}{:>13.2}%",
        "Mean cum. return", summary.mean_cumulative_return
    );
    let _ = writeln!(
        out,
        "{:<20}{:>13.1}%",
        "Chance of loss", summary.probability_of_loss
    );
    out
}

pub fn render_allocation(report: &AllocationReport) -> String {
    let mut out = String::new();
    let status = if report.is_valid { "valid" } else { "invalid" };
    let _ = writeln!(out, "Allocation: {status} ({:.2}% allocated)", report.total_allocation);
    for asset in &report.assets {
        let risk = asset.risk.map_or("?", |r| r.label());
        let _ = writeln!(
            out,
            "  {:<14}{:>7.2}%  {:<10}{}",
            asset.asset_id.as_str(),
            asset.weight,
            risk,
            asset.name.as_deref().unwrap_or("(not in catalog)")
        );
    }
    for e in &report.errors {
        let _ = writeln!(out, "  error: {e}");
    }
    for w in &report.warnings {
        let _ = writeln!(out, "  warning: {w}");
    }
    out
}

pub fn render_projection(projection: &ProjectionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} months at {:.2}% a year",
        projection.months,
        projection.annual_rate * 100.0
    );
    let _ = writeln!(out, "{:<20}{:>14.2}", "Total invested", projection.total_invested);
    let _ = writeln!(out, "{:<20}{:>14.2}", "Future value", projection.future_value);
    let _ = writeln!(out, "{:<20}{:>13.2}%", "CAGR", projection.cagr);
    out
}
