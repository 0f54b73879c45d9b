//! Month-by-month portfolio aggregation
//!
//! Month 0 invests `initial_amount`; every later month asks the configured
//! strategy for a contribution, keyed off the signal asset's price history.
//! Cash is split across assets by `weight / 100` and converted to shares at
//! that month's price. Shares are only sold when a scheduled rebalance moves
//! value between assets; the total value is unchanged by it.

use jiff::ToSpan;
use rand::Rng;

use crate::config::SimulationConfig;
use crate::config::validation::check_inputs;
use crate::error::ConfigurationError;
use crate::model::{AssetId, PortfolioSnapshot, PricePath, check_prices};
use crate::price_path::PricePaths;
use crate::strategy::{ContributionContext, evaluate_contribution};

struct Holding<'a> {
    /// Fraction of each contribution bought into this asset (`weight / 100`)
    share_of_cash: f64,
    /// Weight normalised by the allocation total, for blending returns
    blend_weight: f64,
    path: &'a PricePath,
    shares: f64,
}

/// Run the monthly loop over pre-generated price paths.
///
/// Fails before producing anything when an allocated asset has no path, one
/// shorter than `investment_period + 1`, or a non-positive price within the
/// simulated months, or when the inputs themselves are invalid.
pub fn run_portfolio<R: Rng + ?Sized>(
    config: &SimulationConfig,
    price_paths: &PricePaths,
    rng: &mut R,
) -> Result<Vec<PortfolioSnapshot>, ConfigurationError> {
    check_inputs(config)?;
    aggregate(config, price_paths, rng)
}

/// The monthly loop itself, for callers that already validated `config`.
pub(crate) fn aggregate<R: Rng + ?Sized>(
    config: &SimulationConfig,
    price_paths: &PricePaths,
    rng: &mut R,
) -> Result<Vec<PortfolioSnapshot>, ConfigurationError> {
    let months = config.investment_period;
    let total_weight = config.total_allocation();
    let invested_fraction = total_weight / 100.0;

    let mut holdings = Vec::with_capacity(config.etf_allocation.len());
    for (asset_id, weight) in &config.etf_allocation {
        let path = lookup_path(price_paths, asset_id, months)?;
        holdings.push(Holding {
            share_of_cash: weight / 100.0,
            blend_weight: weight / total_weight,
            path,
            shares: 0.0,
        });
    }

    let signal = match config.signal_asset() {
        Some(asset_id) => lookup_path(price_paths, asset_id, months)?,
        None => return Err(ConfigurationError::ZeroTotalAllocation),
    };

    let mut series = Vec::with_capacity(months + 1);
    let mut total_invested = 0.0;

    for month in 0..=months {
        let cash = if month == 0 {
            config.initial_amount
        } else {
            let ctx = ContributionContext {
                month,
                price_history: signal.history(month),
                nominal_amount: config.monthly_amount,
                cumulative_invested: total_invested,
                current_value: market_value(&holdings, month),
            };
            evaluate_contribution(config.strategy, &ctx, rng)
        };

        for holding in &mut holdings {
            let price = holding.path.prices()[month];
            holding.shares += cash * holding.share_of_cash / price;
        }

        let monthly_investment = cash * invested_fraction;
        total_invested += monthly_investment;
        let total_value = market_value(&holdings, month);

        if config.rebalance.is_due(month) && holdings.len() > 1 {
            rebalance(&mut holdings, month, total_value);
        }

        let monthly_return = 100.0
            * holdings
                .iter()
                .map(|h| h.blend_weight * h.path.monthly_return(month))
                .sum::<f64>();

        let cumulative_return = if total_invested > 0.0 {
            (total_value - total_invested) / total_invested * 100.0
        } else {
            0.0
        };

        series.push(PortfolioSnapshot {
            month,
            date: config
                .start_date
                .map(|start| start.saturating_add((month as i64).months())),
            total_value,
            total_invested,
            monthly_investment,
            monthly_return,
            cumulative_return,
        });
    }

    Ok(series)
}

fn lookup_path<'a>(
    price_paths: &'a PricePaths,
    asset_id: &AssetId,
    months: usize,
) -> Result<&'a PricePath, ConfigurationError> {
    let path = price_paths
        .get(asset_id)
        .ok_or_else(|| ConfigurationError::MissingPricePath(asset_id.clone()))?;
    if path.len() < months + 1 {
        return Err(ConfigurationError::PricePathTooShort {
            asset_id: asset_id.clone(),
            required: months + 1,
            available: path.len(),
        });
    }
    check_prices(&path.prices()[..=months])?;
    Ok(path)
}

/// Redistribute `total_value` by the normalised target weights at this
/// month's prices.
fn rebalance(holdings: &mut [Holding<'_>], month: usize, total_value: f64) {
    for holding in holdings {
        holding.shares = total_value * holding.blend_weight / holding.path.prices()[month];
    }
}

fn market_value(holdings: &[Holding<'_>], month: usize) -> f64 {
    holdings
        .iter()
        .map(|h| h.shares * h.path.prices()[month])
        .sum()
}
