//! Synthetic monthly price paths
//!
//! `price[m] = max(price[m-1] * (1 + trend + shock), PRICE_FLOOR)` starting at
//! [`BASE_PRICE`]. The random source is always passed in by the caller so a
//! seeded generator reproduces the same paths.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::config::SimulationConfig;
use crate::error::ConfigurationError;
use crate::model::{
    AssetId, BASE_PRICE, MarketModel, MarketParams, PRICE_FLOOR, PricePath, RiskTier, ShockModel,
    YearlyRegime,
};

/// Price paths of every allocated asset, keyed and iterated in asset id order.
pub type PricePaths = BTreeMap<AssetId, PricePath>;

impl ShockModel {
    /// Draw one monthly shock scaled by `volatility`.
    pub fn sample<R: Rng + ?Sized>(self, volatility: f64, rng: &mut R) -> f64 {
        match self {
            ShockModel::Gaussian => {
                let z: f64 = StandardNormal.sample(rng);
                z * volatility
            }
            ShockModel::Uniform => (rng.random::<f64>() - 0.5) * volatility,
        }
    }
}

/// Generate a path of `months + 1` prices for a risk tier with a Gaussian shock.
pub fn generate_price_path<R: Rng + ?Sized>(
    months: usize,
    tier: RiskTier,
    rng: &mut R,
) -> PricePath {
    generate_with_params(months, tier.params(), ShockModel::Gaussian, rng)
}

/// Generate a path with explicit monthly trend and volatility.
pub fn generate_with_params<R: Rng + ?Sized>(
    months: usize,
    params: MarketParams,
    shock: ShockModel,
    rng: &mut R,
) -> PricePath {
    build_path(months, rng, |_, rng| {
        params.trend + shock.sample(params.volatility, rng)
    })
}

/// Generate a path following yearly regimes; month `m` uses regime `(m - 1) / 12`
/// and the last regime repeats once the list is exhausted.
pub fn generate_from_regimes<R: Rng + ?Sized>(
    months: usize,
    regimes: &[YearlyRegime],
    beta: f64,
    shock: ShockModel,
    rng: &mut R,
) -> PricePath {
    let monthly: Vec<MarketParams> = regimes.iter().map(|r| r.monthly_params(beta)).collect();
    build_path(months, rng, |month, rng| {
        let Some(last) = monthly.len().checked_sub(1) else {
            return 0.0;
        };
        let params = monthly[((month - 1) / 12).min(last)];
        params.trend + shock.sample(params.volatility, rng)
    })
}

fn build_path<R, F>(months: usize, rng: &mut R, mut monthly_return: F) -> PricePath
where
    R: Rng + ?Sized,
    F: FnMut(usize, &mut R) -> f64,
{
    let mut prices = Vec::with_capacity(months + 1);
    let mut price = BASE_PRICE;
    prices.push(price);
    for month in 1..=months {
        let r = monthly_return(month, &mut *rng);
        price = (price * (1.0 + r)).max(PRICE_FLOOR);
        prices.push(price);
    }
    PricePath::from_generated(prices)
}

/// Generate one path per allocated asset, in asset id order.
pub fn generate_price_paths<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<PricePaths, ConfigurationError> {
    let months = config.investment_period;
    let mut paths = PricePaths::new();

    for asset_id in config.etf_allocation.keys() {
        let resolved = config.resolve_asset(asset_id)?;
        let path = match &config.market {
            MarketModel::Synthetic => {
                generate_with_params(months, resolved.params, config.shock, rng)
            }
            MarketModel::Historical { periods } => {
                if periods.is_empty() {
                    return Err(ConfigurationError::EmptyScenario);
                }
                generate_from_regimes(months, periods, resolved.beta, config.shock, rng)
            }
        };
        paths.insert(asset_id.clone(), path);
    }

    Ok(paths)
}
