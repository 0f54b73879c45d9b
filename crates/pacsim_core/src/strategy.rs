//! Monthly contribution strategies
//!
//! Every strategy is a pure function of the month, the signal asset's price
//! history up to that month, the nominal amount and the portfolio state.
//! Smart beta additionally draws its perturbation from the caller's generator.
//! Contributions are never negative. A strategy that needs more history than
//! is available falls back to a neutral factor, i.e. plain DCA.

use rand::Rng;

use crate::model::Strategy;

/// Lookback (months) of the momentum signal
pub const MOMENTUM_LOOKBACK: usize = 3;
/// Window (monthly returns) of the tactical volatility estimate
pub const VOLATILITY_WINDOW: usize = 6;
/// Monthly volatility at which tactical invests exactly the nominal amount
pub const TACTICAL_TARGET_VOLATILITY: f64 = 0.05;
const TACTICAL_SENSITIVITY: f64 = 5.0;
const CONTRARIAN_SENSITIVITY: f64 = 2.0;
const SMART_BETA_MOMENTUM_WEIGHT: f64 = 2.0;
const SMART_BETA_FACTOR_WEIGHT: f64 = 0.5;
/// Full width of the uniform smart beta perturbation, centred on zero
const SMART_BETA_NOISE: f64 = 0.1;

/// Inputs available to a strategy when deciding month `month`'s contribution.
#[derive(Debug, Clone, Copy)]
pub struct ContributionContext<'a> {
    pub month: usize,
    /// Signal asset prices for months `0..=month`
    pub price_history: &'a [f64],
    /// Nominal periodic amount from the config
    pub nominal_amount: f64,
    /// Cash invested through the previous month
    pub cumulative_invested: f64,
    /// Portfolio value at this month's prices, before this month's contribution
    pub current_value: f64,
}

/// Cash to invest this month under `strategy`. Always finite and `>= 0`.
pub fn evaluate_contribution<R: Rng + ?Sized>(
    strategy: Strategy,
    ctx: &ContributionContext<'_>,
    rng: &mut R,
) -> f64 {
    let nominal = ctx.nominal_amount;
    let amount = match strategy {
        Strategy::Dca => nominal,
        Strategy::ValueAveraging => {
            let target = ctx.cumulative_invested + nominal * ctx.month as f64;
            target - ctx.current_value
        }
        Strategy::Momentum => {
            nominal * (1.0 + momentum(ctx.price_history, ctx.month, MOMENTUM_LOOKBACK))
        }
        Strategy::Contrarian => {
            let fall = decline(ctx.price_history, ctx.month).max(0.0);
            nominal * (1.0 + CONTRARIAN_SENSITIVITY * fall)
        }
        Strategy::SmartBeta => {
            let factor = if ctx.month > MOMENTUM_LOOKBACK {
                let noise = (rng.random::<f64>() - 0.5) * SMART_BETA_NOISE;
                SMART_BETA_MOMENTUM_WEIGHT
                    * momentum(ctx.price_history, ctx.month, MOMENTUM_LOOKBACK)
                    + noise
            } else {
                0.0
            };
            nominal * (1.0 + SMART_BETA_FACTOR_WEIGHT * factor)
        }
        Strategy::Tactical => {
            let factor = trailing_volatility(ctx.price_history, ctx.month, VOLATILITY_WINDOW)
                .map_or(0.0, |vol| {
                    TACTICAL_SENSITIVITY * (TACTICAL_TARGET_VOLATILITY - vol)
                });
            nominal * (1.0 + factor)
        }
    };

    if amount.is_finite() { amount.max(0.0) } else { 0.0 }
}

/// Relative price change over `lookback` months; 0 while `month <= lookback`.
#[must_use]
pub fn momentum(prices: &[f64], month: usize, lookback: usize) -> f64 {
    if month <= lookback {
        return 0.0;
    }
    match (prices.get(month), prices.get(month - lookback)) {
        (Some(now), Some(then)) if *then > 0.0 => (now - then) / then,
        _ => 0.0,
    }
}

/// Relative drop from the previous month (negative when the price rose);
/// 0 while `month <= 1`.
#[must_use]
pub fn decline(prices: &[f64], month: usize) -> f64 {
    if month <= 1 {
        return 0.0;
    }
    match (prices.get(month - 1), prices.get(month)) {
        (Some(previous), Some(now)) if *previous > 0.0 => (previous - now) / previous,
        _ => 0.0,
    }
}

/// Sample standard deviation of the last `window` monthly returns ending at
/// `month`, as a fraction. `None` while `month <= window`.
#[must_use]
pub fn trailing_volatility(prices: &[f64], month: usize, window: usize) -> Option<f64> {
    if window < 2 || month <= window || month >= prices.len() {
        return None;
    }
    let returns: Vec<f64> = prices[month - window..=month]
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_momentum_needs_history() {
        let prices = [100.0, 110.0, 120.0, 130.0, 150.0];
        assert_eq!(momentum(&prices, 3, 3), 0.0);
        assert!((momentum(&prices, 4, 3) - 40.0 / 110.0).abs() < 1e-12);
    }

    #[test]
    fn test_decline_sign() {
        let prices = [100.0, 100.0, 90.0, 99.0];
        assert_eq!(decline(&prices, 1), 0.0);
        assert!((decline(&prices, 2) - 0.1).abs() < 1e-12);
        assert!(decline(&prices, 3) < 0.0);
    }

    #[test]
    fn test_trailing_volatility_flat_is_zero() {
        let prices = [100.0; 10];
        assert_eq!(trailing_volatility(&prices, 6, 6), None);
        assert_eq!(trailing_volatility(&prices, 7, 6), Some(0.0));
    }

    #[test]
    fn test_contribution_never_negative() {
        let mut rng = SmallRng::seed_from_u64(0);
        let prices = [100.0, 100.0, 100.0, 100.0, 20.0];
        let ctx = ContributionContext {
            month: 4,
            price_history: &prices,
            nominal_amount: 500.0,
            cumulative_invested: 1_000.0,
            current_value: 1_000_000.0,
        };
        for strategy in Strategy::ALL {
            let amount = evaluate_contribution(strategy, &ctx, &mut rng);
            assert!(amount >= 0.0, "{strategy} produced {amount}");
        }
        // portfolio already far above target
        assert_eq!(
            evaluate_contribution(Strategy::ValueAveraging, &ctx, &mut rng),
            0.0
        );
        // -80% over three months scales the nominal amount down to 20%
        let momentum = evaluate_contribution(Strategy::Momentum, &ctx, &mut rng);
        assert!((momentum - 100.0).abs() < 1e-9);
        let contrarian = evaluate_contribution(Strategy::Contrarian, &ctx, &mut rng);
        assert!((contrarian - 1_300.0).abs() < 1e-9);
    }

    #[test]
    fn test_tactical_clamps_in_turbulent_markets() {
        let mut rng = SmallRng::seed_from_u64(0);
        let prices = [100.0, 150.0, 60.0, 140.0, 50.0, 160.0, 40.0, 170.0];
        let ctx = ContributionContext {
            month: 7,
            price_history: &prices,
            nominal_amount: 500.0,
            cumulative_invested: 0.0,
            current_value: 0.0,
        };
        assert_eq!(evaluate_contribution(Strategy::Tactical, &ctx, &mut rng), 0.0);
    }
}
