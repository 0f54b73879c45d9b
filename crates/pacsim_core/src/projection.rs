//! Closed-form projections without any randomness

/// Value after `months` of compounding `initial` plus end-of-month `monthly`
/// contributions at `annual_rate` (fraction), compounded monthly.
///
/// A zero rate is the plain sum of contributions.
#[must_use]
pub fn future_value(initial: f64, monthly: f64, annual_rate: f64, months: usize) -> f64 {
    let n = months as f64;
    let r = annual_rate / 12.0;
    if r.abs() < f64::EPSILON {
        return initial + monthly * n;
    }
    let growth = (1.0 + r).powf(n);
    initial * growth + monthly * (growth - 1.0) / r
}

/// Compound annual growth rate from `initial` to `final_value` over `years`,
/// as a fraction. 0 for non-positive inputs.
#[must_use]
pub fn cagr(initial: f64, final_value: f64, years: f64) -> f64 {
    if initial <= 0.0 || final_value <= 0.0 || years <= 0.0 {
        return 0.0;
    }
    let rate = (final_value / initial).powf(1.0 / years) - 1.0;
    if rate.is_finite() { rate } else { 0.0 }
}
