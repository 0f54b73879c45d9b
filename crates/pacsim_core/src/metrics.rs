//! Risk and performance statistics of a completed series
//!
//! Pure reductions over `PortfolioSnapshot`s. Monthly returns are the
//! snapshots after month 0. Every division has a defined fallback of 0, so no
//! NaN or infinity ever reaches the caller.
//!
//! Drawdown is measured on a return index compounded from the monthly returns,
//! not on total value, so new contributions cannot hide market losses.

use crate::model::{MetricsSummary, PortfolioSnapshot};

/// Confidence level of the historical VaR/CVaR estimates
pub const VAR_CONFIDENCE: f64 = 0.95;
/// Starting level of the return index drawdown is measured on
pub const RETURN_INDEX_BASE: f64 = 100.0;

const IRR_MAX_ITERATIONS: usize = 200;
const IRR_TOLERANCE: f64 = 1e-12;

/// Tunables of the metrics reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSettings {
    /// Annual risk-free rate as a fraction (0.02 = 2%)
    pub risk_free_rate: f64,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.02,
        }
    }
}

impl MetricsSettings {
    /// Risk-free rate compounded down to one month, in percent, so it can be
    /// subtracted from percent monthly returns.
    #[must_use]
    pub fn monthly_risk_free_pct(&self) -> f64 {
        ((1.0 + self.risk_free_rate).powf(1.0 / 12.0) - 1.0) * 100.0
    }
}

/// Whether the series has enough monthly returns for dispersion-based ratios.
#[must_use]
pub fn has_enough_data(series: &[PortfolioSnapshot]) -> bool {
    series.len() > 2
}

/// Compute metrics with the default 2% annual risk-free rate.
#[must_use]
pub fn compute_metrics(series: &[PortfolioSnapshot]) -> MetricsSummary {
    compute_metrics_with(series, &MetricsSettings::default())
}

#[must_use]
pub fn compute_metrics_with(
    series: &[PortfolioSnapshot],
    settings: &MetricsSettings,
) -> MetricsSummary {
    let Some(last) = series.last() else {
        return MetricsSummary::default();
    };

    let returns: Vec<f64> = series.iter().skip(1).map(|s| s.monthly_return).collect();
    let risk_free = settings.monthly_risk_free_pct();
    let enough = has_enough_data(series);

    let volatility = sample_std_dev(&returns);
    let average = mean(&returns);
    let max_drawdown = max_drawdown(&return_index(&returns));

    let sharpe_ratio = if enough && volatility > 0.0 {
        (average - risk_free) / volatility
    } else {
        0.0
    };

    let calmar_ratio = if enough && max_drawdown < 0.0 {
        last.cumulative_return / max_drawdown.abs()
    } else {
        0.0
    };

    let sortino_ratio = if enough {
        sortino_ratio(&returns, risk_free)
    } else {
        0.0
    };

    let (value_at_risk_95, conditional_value_at_risk_95) =
        value_at_risk(&returns, VAR_CONFIDENCE);

    MetricsSummary {
        total_invested: last.total_invested,
        final_value: last.total_value,
        total_return: last.total_value - last.total_invested,
        cumulative_return: finite_or_zero(last.cumulative_return),
        volatility,
        max_drawdown,
        sharpe_ratio: finite_or_zero(sharpe_ratio),
        calmar_ratio: finite_or_zero(calmar_ratio),
        win_rate: win_rate(&returns),
        best_month: returns.iter().copied().reduce(f64::max).unwrap_or(0.0),
        worst_month: returns.iter().copied().reduce(f64::min).unwrap_or(0.0),
        annualized_return: annualized_return(
            last.total_value,
            last.total_invested,
            series.len() - 1,
        ),
        sortino_ratio,
        irr: irr(series),
        value_at_risk_95,
        conditional_value_at_risk_95,
        average_gain: mean_where(&returns, |r| r > 0.0),
        average_loss: mean_where(&returns, |r| r < 0.0),
        months: returns.len(),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_where(values: &[f64], keep: impl Fn(f64) -> bool) -> f64 {
    let selected: Vec<f64> = values.iter().copied().filter(|v| keep(*v)).collect();
    mean(&selected)
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than 2 values.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    finite_or_zero(variance.sqrt())
}

/// Growth of [`RETURN_INDEX_BASE`] compounded through percent `returns`.
/// The first element is the base itself.
#[must_use]
pub fn return_index(returns: &[f64]) -> Vec<f64> {
    let mut level = RETURN_INDEX_BASE;
    let mut index = Vec::with_capacity(returns.len() + 1);
    index.push(level);
    for r in returns {
        level *= 1.0 + r / 100.0;
        index.push(level);
    }
    index
}

/// Most negative peak-to-trough decline, in percent (`<= 0`).
#[must_use]
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in values {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            worst = worst.min((value - peak) / peak * 100.0);
        }
    }
    worst
}

/// Share of positive returns, in percent.
#[must_use]
pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let wins = returns.iter().filter(|r| **r > 0.0).count();
    wins as f64 / returns.len() as f64 * 100.0
}

/// Compound annual growth of `invested` into `final_value` over `months`,
/// in percent. 0 when there is no period or nothing invested.
#[must_use]
pub fn annualized_return(final_value: f64, invested: f64, months: usize) -> f64 {
    if months == 0 || invested <= 0.0 || final_value < 0.0 {
        return 0.0;
    }
    let growth = (final_value / invested).powf(12.0 / months as f64) - 1.0;
    finite_or_zero(growth * 100.0)
}

/// Excess mean return over downside deviation below `target` (both percent).
/// 0 when no month fell below the target.
#[must_use]
pub fn sortino_ratio(returns: &[f64], target: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let downside_sq: f64 = returns
        .iter()
        .filter(|r| **r < target)
        .map(|r| (r - target).powi(2))
        .sum();
    let downside = (downside_sq / returns.len() as f64).sqrt();
    if downside > 0.0 {
        finite_or_zero((mean(returns) - target) / downside)
    } else {
        0.0
    }
}

/// Money-weighted annual return of the plan, in percent.
///
/// Each month's contribution is an outflow and the final value closes the
/// series as an inflow. The monthly rate that balances the flows is found by
/// bisection and compounded to a year. 0 when nothing was invested or no
/// rate in the search range balances the flows.
#[must_use]
pub fn irr(series: &[PortfolioSnapshot]) -> f64 {
    let Some(last) = series.last() else {
        return 0.0;
    };
    if series.len() < 2 || last.total_invested <= 0.0 || !last.total_value.is_finite() {
        return 0.0;
    }

    let mut flows: Vec<f64> = series.iter().map(|s| -s.monthly_investment).collect();
    if let Some(terminal) = flows.last_mut() {
        *terminal += last.total_value;
    }

    // Compounded to the last month; discounting to month 0 overflows near -99%.
    let horizon = flows.len() - 1;
    let npv = |rate: f64| -> f64 {
        flows
            .iter()
            .enumerate()
            .map(|(m, flow)| flow * (1.0 + rate).powi((horizon - m) as i32))
            .sum()
    };

    let (mut low, mut high) = (-0.99, 0.5);
    let (npv_low, npv_high) = (npv(low), npv(high));
    if !npv_low.is_finite() || !npv_high.is_finite() || npv_low.signum() == npv_high.signum() {
        return 0.0;
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        if npv(mid).signum() == npv_low.signum() {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < IRR_TOLERANCE {
            break;
        }
    }

    let monthly = (low + high) / 2.0;
    finite_or_zero(((1.0 + monthly).powi(12) - 1.0) * 100.0)
}

/// Historical value at risk and conditional value at risk of `returns`.
///
/// VaR is the return at index `floor((1 - confidence) * n)` of the ascending
/// returns; CVaR is the mean of the returns up to and including that index.
#[must_use]
pub fn value_at_risk(returns: &[f64], confidence: f64) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);
    let last = sorted.len() - 1;
    let index = (((1.0 - confidence) * sorted.len() as f64).floor() as usize).min(last);
    (sorted[index], mean(&sorted[..=index]))
}
