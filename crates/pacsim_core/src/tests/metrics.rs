//! Risk statistics over hand-built series

use crate::metrics::{MetricsSettings, compute_metrics, compute_metrics_with, has_enough_data};
use crate::model::PortfolioSnapshot;

/// Series with constant invested capital so values and returns can be chosen freely
fn series(values: &[f64], returns: &[f64]) -> Vec<PortfolioSnapshot> {
    let invested = values[0];
    values
        .iter()
        .zip(std::iter::once(&0.0).chain(returns))
        .enumerate()
        .map(|(month, (value, ret))| PortfolioSnapshot {
            month,
            date: None,
            total_value: *value,
            total_invested: invested,
            monthly_investment: if month == 0 { invested } else { 0.0 },
            monthly_return: *ret,
            cumulative_return: (value - invested) / invested * 100.0,
        })
        .collect()
}

const NO_RISK_FREE: MetricsSettings = MetricsSettings {
    risk_free_rate: 0.0,
};

#[test]
fn test_basic_fields() {
    let s = series(&[100.0, 102.0, 100.0, 102.0, 100.0], &[2.0, 0.0, 2.0, 0.0]);
    let m = compute_metrics_with(&s, &NO_RISK_FREE);

    assert_eq!(m.months, 4);
    assert_eq!(m.final_value, 100.0);
    assert_eq!(m.total_return, 0.0);
    assert_eq!(m.best_month, 2.0);
    assert_eq!(m.worst_month, 0.0);
    assert_eq!(m.win_rate, 50.0);
    assert_eq!(m.average_gain, 2.0);
    assert_eq!(m.average_loss, 0.0);
}

#[test]
fn test_sharpe_ratio() {
    let s = series(&[100.0, 102.0, 100.0, 102.0, 100.0], &[2.0, 0.0, 2.0, 0.0]);
    let m = compute_metrics_with(&s, &NO_RISK_FREE);

    // mean 1, sample std sqrt(4 / 3)
    let std = (4.0f64 / 3.0).sqrt();
    assert!((m.volatility - std).abs() < 1e-12);
    assert!((m.sharpe_ratio - 1.0 / std).abs() < 1e-12);

    let with_rf = compute_metrics(&s);
    assert!(with_rf.sharpe_ratio < m.sharpe_ratio);
}

#[test]
fn test_drawdown_and_calmar() {
    let s = series(&[100.0, 120.0, 90.0, 110.0], &[20.0, -25.0, 22.2]);
    let m = compute_metrics_with(&s, &NO_RISK_FREE);

    assert!((m.max_drawdown + 25.0).abs() < 1e-12);
    // cumulative return is +10%
    assert!((m.calmar_ratio - 10.0 / 25.0).abs() < 1e-12);
    assert_eq!(m.worst_month, -25.0);
    assert!((m.average_loss + 25.0).abs() < 1e-12);
}

#[test]
fn test_tail_risk() {
    let returns: Vec<f64> = (0..20).map(|i| f64::from(i) - 5.0).collect();
    let values = vec![100.0; 21];
    let m = compute_metrics_with(&series(&values, &returns), &NO_RISK_FREE);

    // ascending returns -5..=14, cutoff index floor(0.05 * 20) = 1
    assert_eq!(m.value_at_risk_95, -4.0);
    assert_eq!(m.conditional_value_at_risk_95, -4.5);
    assert!(m.sortino_ratio > 0.0);
}

#[test]
fn test_annualized_return_over_two_years() {
    let mut values = vec![100.0; 25];
    values[24] = 121.0;
    let returns = vec![0.0; 24];
    let m = compute_metrics_with(&series(&values, &returns), &NO_RISK_FREE);

    assert!((m.annualized_return - 10.0).abs() < 1e-9);
}

#[test]
fn test_short_series_fallbacks() {
    let one = series(&[100.0], &[]);
    let m = compute_metrics(&one);
    assert_eq!(m.months, 0);
    assert_eq!(m.volatility, 0.0);
    assert_eq!(m.sharpe_ratio, 0.0);
    assert_eq!(m.annualized_return, 0.0);
    assert!(!has_enough_data(&one));

    let two = series(&[100.0, 90.0], &[-10.0]);
    let m = compute_metrics(&two);
    assert_eq!(m.volatility, 0.0);
    assert_eq!(m.sharpe_ratio, 0.0);
    assert!(!has_enough_data(&two));

    assert!(has_enough_data(&series(&[1.0, 1.0, 1.0], &[0.0, 0.0])));
}

#[test]
fn test_zero_value_series_is_finite() {
    let zeros = vec![
        PortfolioSnapshot {
            month: 0,
            date: None,
            total_value: 0.0,
            total_invested: 0.0,
            monthly_investment: 0.0,
            monthly_return: 0.0,
            cumulative_return: 0.0,
        };
        4
    ];
    let m = compute_metrics(&zeros);
    assert_eq!(m.max_drawdown, 0.0);
    assert_eq!(m.annualized_return, 0.0);
    assert_eq!(m.calmar_ratio, 0.0);
    assert!(m.sortino_ratio.is_finite());
}

#[test]
fn test_drawdown_ignores_contributions() {
    // value keeps rising on new cash while every month loses 1%
    let mut s = series(&[100.0, 150.0, 200.0, 250.0], &[-1.0, -1.0, -1.0]);
    for snapshot in &mut s[1..] {
        snapshot.monthly_investment = 50.0;
    }
    let m = compute_metrics_with(&s, &NO_RISK_FREE);

    let expected = (0.99f64.powi(3) - 1.0) * 100.0;
    assert!((m.max_drawdown - expected).abs() < 1e-9);
}

#[test]
fn test_ratios_need_two_returns() {
    let two = series(&[100.0, 90.0], &[-10.0]);
    let m = compute_metrics_with(&two, &NO_RISK_FREE);

    assert!(m.max_drawdown < 0.0);
    assert_eq!(m.calmar_ratio, 0.0);
    assert_eq!(m.sortino_ratio, 0.0);
    assert_eq!(m.sharpe_ratio, 0.0);
}

#[test]
fn test_irr_of_lump_sum() {
    // 100 grows to 121 over two months: 10% a month
    let s = series(&[100.0, 110.0, 121.0], &[10.0, 10.0]);
    let m = compute_metrics_with(&s, &NO_RISK_FREE);

    let expected = (1.1f64.powi(12) - 1.0) * 100.0;
    assert!((m.irr - expected).abs() < 1e-6);
}

#[test]
fn test_irr_falls_back_to_zero() {
    assert_eq!(compute_metrics(&series(&[100.0], &[])).irr, 0.0);

    let mut nothing = series(&[0.0, 0.0, 0.0], &[0.0, 0.0]);
    for snapshot in &mut nothing {
        snapshot.cumulative_return = 0.0;
    }
    assert_eq!(compute_metrics(&nothing).irr, 0.0);
}
