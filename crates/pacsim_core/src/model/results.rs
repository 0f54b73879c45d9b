//! Simulation results and snapshots
//!
//! Everything here is produced once per run and never mutated afterwards.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::strategy::Strategy;

/// Portfolio state at the end of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub month: usize,
    /// Calendar label, only present when the config carries a start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    /// Sum over assets of shares held times current price
    pub total_value: f64,
    /// Cumulative cash contributed through this month
    pub total_invested: f64,
    /// Cash contributed this month
    pub monthly_investment: f64,
    /// Weight-blended month-over-month asset return, in percent
    pub monthly_return: f64,
    /// `(total_value - total_invested) / total_invested`, in percent
    pub cumulative_return: f64,
}

/// Summary risk/return statistics of a completed series.
///
/// Percent-valued fields use percent units (`12.5` means 12.5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_invested: f64,
    pub final_value: f64,
    /// Currency gain, `final_value - total_invested`
    pub total_return: f64,
    pub cumulative_return: f64,
    /// Sample standard deviation of monthly returns
    pub volatility: f64,
    /// Largest peak-to-trough decline of the compounded monthly returns, always <= 0
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub calmar_ratio: f64,
    pub win_rate: f64,
    pub best_month: f64,
    pub worst_month: f64,
    pub annualized_return: f64,
    pub sortino_ratio: f64,
    /// Money-weighted annual return of the contributions, in percent
    #[serde(default)]
    pub irr: f64,
    /// Historical 95% value at risk of a single month's return
    pub value_at_risk_95: f64,
    /// Mean of the monthly returns at or below the 95% VaR cutoff
    pub conditional_value_at_risk_95: f64,
    pub average_gain: f64,
    pub average_loss: f64,
    /// Number of monthly returns the statistics were computed from
    pub months: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Too few data points for a meaningful ratio; fallback values were reported
    DegenerateResult,
    /// Allocation weights do not add up to 100; contributions were scaled as given
    AllocationNotNormalized,
}

/// Non-fatal condition noticed during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl SimulationWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Output of a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub strategy: Strategy,
    pub series: Vec<PortfolioSnapshot>,
    pub metrics: MetricsSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SimulationWarning>,
}

impl SimulationResult {
    #[must_use]
    pub fn final_snapshot(&self) -> Option<&PortfolioSnapshot> {
        self.series.last()
    }

    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.final_snapshot().map_or(0.0, |s| s.total_value)
    }

    #[must_use]
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// Several strategies run against identical price paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// One result per requested strategy, in request order
    pub results: Vec<SimulationResult>,
    pub best_strategy: Strategy,
}

impl StrategyComparison {
    #[must_use]
    pub fn result_for(&self, strategy: Strategy) -> Option<&SimulationResult> {
        self.results.iter().find(|r| r.strategy == strategy)
    }
}

/// Distribution of outcomes across many independently seeded runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub iterations: usize,
    pub strategy: Strategy,
    /// `(percentile as 0-1, final value)` pairs, ascending
    pub final_value_percentiles: Vec<(f64, f64)>,
    pub mean_final_value: f64,
    pub mean_total_invested: f64,
    /// Mean of per-run cumulative returns, in percent
    pub mean_cumulative_return: f64,
    /// Share of runs finishing below their total invested, in percent
    pub probability_of_loss: f64,
}

impl MonteCarloSummary {
    #[must_use]
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.final_value_percentiles
            .iter()
            .find(|(q, _)| (q - p).abs() < 1e-9)
            .map(|(_, v)| *v)
    }
}
