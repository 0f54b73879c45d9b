//! Simulation configuration
//!
//! `SimulationConfig` holds everything one run needs. It is immutable for the
//! duration of a run; field defaults match the front-end's starting portfolio.
//!
//! # Builder DSL
//!
//! ```ignore
//! use pacsim_core::config::{AssetSpec, SimulationBuilder};
//! use pacsim_core::model::{RiskTier, Strategy};
//!
//! let config = SimulationBuilder::new()
//!     .initial_amount(10_000.0)
//!     .monthly_amount(500.0)
//!     .months(60)
//!     .strategy(Strategy::Momentum)
//!     .allocate("world_equity", 70.0)
//!     .allocate("bonds", 30.0)
//!     .asset("bonds", AssetSpec::tier(RiskTier::Low))
//!     .build();
//! ```

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::model::{
    AssetId, MarketModel, MarketParams, Rebalance, RiskTier, ShockModel, Strategy,
};

pub mod builder;
pub mod catalog;
pub mod validation;

pub use builder::SimulationBuilder;
pub use catalog::EtfInfo;
pub use validation::{AllocatedAsset, AllocationReport, validate, validate_allocation};

fn default_initial_amount() -> f64 {
    10_000.0
}

fn default_monthly_amount() -> f64 {
    500.0
}

fn default_investment_period() -> usize {
    60
}

fn default_risk_free_rate() -> f64 {
    0.02
}

fn default_allocation() -> BTreeMap<AssetId, f64> {
    BTreeMap::from([
        (AssetId::from("world_equity"), 60.0),
        (AssetId::from("bonds"), 20.0),
        (AssetId::from("emerging"), 15.0),
        (AssetId::from("real_estate"), 5.0),
    ])
}

/// Per-asset override of the market model.
///
/// An explicit `trend`/`volatility` wins over the tier; a missing half falls
/// back to the tier (own or catalog) value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl AssetSpec {
    #[must_use]
    pub fn tier(risk: RiskTier) -> Self {
        Self {
            risk: Some(risk),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn custom(trend: f64, volatility: f64) -> Self {
        Self {
            trend: Some(trend),
            volatility: Some(volatility),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Market parameters of one allocated asset after override/catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAsset {
    pub params: MarketParams,
    pub beta: f64,
}

/// Complete input of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Lump sum invested at month 0
    #[serde(default = "default_initial_amount")]
    pub initial_amount: f64,

    /// Nominal periodic contribution
    #[serde(default = "default_monthly_amount")]
    pub monthly_amount: f64,

    /// Months simulated after month 0
    #[serde(default = "default_investment_period")]
    pub investment_period: usize,

    #[serde(default)]
    pub strategy: Strategy,

    /// Asset id -> weight in percent. Totals other than 100 scale the invested
    /// cash accordingly and are reported as a warning.
    #[serde(default = "default_allocation")]
    pub etf_allocation: BTreeMap<AssetId, f64>,

    /// Overrides for allocated assets (custom ids or tweaked catalog entries)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<AssetId, AssetSpec>,

    #[serde(default)]
    pub market: MarketModel,

    #[serde(default)]
    pub shock: ShockModel,

    /// Trade holdings back to the allocation weights on this schedule
    #[serde(default)]
    pub rebalance: Rebalance,

    /// Annual risk-free rate as a fraction, used by Sharpe and Sortino
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Only used to label snapshots with calendar months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: None,
            initial_amount: default_initial_amount(),
            monthly_amount: default_monthly_amount(),
            investment_period: default_investment_period(),
            strategy: Strategy::default(),
            etf_allocation: default_allocation(),
            assets: BTreeMap::new(),
            market: MarketModel::default(),
            shock: ShockModel::default(),
            rebalance: Rebalance::default(),
            risk_free_rate: default_risk_free_rate(),
            start_date: None,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same config with a different strategy
    #[must_use]
    pub fn with_strategy(&self, strategy: Strategy) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    /// Sum of all allocation weights, in percent
    #[must_use]
    pub fn total_allocation(&self) -> f64 {
        self.etf_allocation.values().sum()
    }

    /// Asset whose price path drives the strategy signal: the largest weight,
    /// ties broken by asset id order.
    #[must_use]
    pub fn signal_asset(&self) -> Option<&AssetId> {
        self.etf_allocation
            .iter()
            .fold(None, |best: Option<(&AssetId, f64)>, (id, weight)| match best {
                Some((_, best_weight)) if *weight <= best_weight => best,
                _ => Some((id, *weight)),
            })
            .map(|(id, _)| id)
    }

    /// Look up the market parameters of an asset: config override first,
    /// then the built-in catalog.
    pub fn resolve_asset(&self, asset_id: &AssetId) -> Result<ResolvedAsset, ConfigurationError> {
        let spec = self.assets.get(asset_id);
        let listed = catalog::lookup(asset_id.as_str());

        let tier = spec
            .and_then(|s| s.risk)
            .or_else(|| listed.map(|etf| etf.risk));
        let explicit_trend = spec.and_then(|s| s.trend);
        let explicit_volatility = spec.and_then(|s| s.volatility);

        let params = match (tier, explicit_trend, explicit_volatility) {
            (_, Some(trend), Some(volatility)) => MarketParams::new(trend, volatility),
            (Some(tier), trend, volatility) => {
                let base = tier.params();
                MarketParams::new(
                    trend.unwrap_or(base.trend),
                    volatility.unwrap_or(base.volatility),
                )
            }
            (None, _, _) => return Err(ConfigurationError::UnknownAsset(asset_id.clone())),
        };

        if !params.trend.is_finite() || params.trend <= -1.0 {
            return Err(ConfigurationError::InvalidMarketParameters {
                asset_id: asset_id.clone(),
                trend: params.trend,
                volatility: params.volatility,
                reason: "trend must be finite and greater than -1",
            });
        }
        if !params.volatility.is_finite() || params.volatility < 0.0 {
            return Err(ConfigurationError::InvalidMarketParameters {
                asset_id: asset_id.clone(),
                trend: params.trend,
                volatility: params.volatility,
                reason: "volatility must be finite and non-negative",
            });
        }

        let beta = spec
            .and_then(|s| s.beta)
            .or_else(|| listed.map(|etf| etf.beta))
            .unwrap_or(1.0);

        Ok(ResolvedAsset { params, beta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_front_end_portfolio() {
        let config = SimulationConfig::default();
        assert_eq!(config.initial_amount, 10_000.0);
        assert_eq!(config.monthly_amount, 500.0);
        assert_eq!(config.investment_period, 60);
        assert_eq!(config.strategy, Strategy::Dca);
        assert_eq!(config.total_allocation(), 100.0);
    }

    #[test]
    fn test_signal_asset_is_largest_weight() {
        let config = SimulationConfig::default();
        assert_eq!(config.signal_asset(), Some(&AssetId::from("world_equity")));

        let tied = SimulationConfig {
            etf_allocation: BTreeMap::from([
                (AssetId::from("sp500"), 50.0),
                (AssetId::from("bonds"), 50.0),
            ]),
            ..Default::default()
        };
        assert_eq!(tied.signal_asset(), Some(&AssetId::from("bonds")));
    }

    #[test]
    fn test_resolve_asset_prefers_override() {
        let mut config = SimulationConfig::default();
        config
            .assets
            .insert(AssetId::from("bonds"), AssetSpec::custom(0.0, 0.0));
        let bonds = config.resolve_asset(&AssetId::from("bonds")).unwrap();
        assert_eq!(bonds.params, MarketParams::flat());
        assert_eq!(bonds.beta, 0.05);

        let world = config.resolve_asset(&AssetId::from("world_equity")).unwrap();
        assert_eq!(world.params, RiskTier::High.params());
    }

    #[test]
    fn test_resolve_asset_partial_override_keeps_tier() {
        let mut config = SimulationConfig::default();
        let spec = AssetSpec {
            volatility: Some(0.0),
            ..AssetSpec::tier(RiskTier::Medium)
        };
        config.assets.insert(AssetId::from("gold"), spec);

        let gold = config.resolve_asset(&AssetId::from("gold")).unwrap();
        assert_eq!(gold.params.trend, RiskTier::Medium.params().trend);
        assert_eq!(gold.params.volatility, 0.0);
        assert_eq!(gold.beta, 1.0);
    }

    #[test]
    fn test_resolve_unknown_asset() {
        let config = SimulationConfig::default();
        assert_eq!(
            config.resolve_asset(&AssetId::from("tulips")),
            Err(ConfigurationError::UnknownAsset(AssetId::from("tulips")))
        );
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let mut config = SimulationConfig::default();
        config
            .assets
            .insert(AssetId::from("odd"), AssetSpec::custom(0.01, -0.1));
        assert!(matches!(
            config.resolve_asset(&AssetId::from("odd")),
            Err(ConfigurationError::InvalidMarketParameters { .. })
        ));
    }
}
