//! Simulation Builder
//!
//! Fluent construction of a `SimulationConfig`. Starts from an empty
//! allocation, unlike `SimulationConfig::default()`.

use std::collections::BTreeMap;

use super::{AssetSpec, SimulationConfig};
use crate::model::{AssetId, MarketModel, Rebalance, ShockModel, Strategy, YearlyRegime};

pub struct SimulationBuilder {
    config: SimulationConfig,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SimulationConfig {
                etf_allocation: BTreeMap::new(),
                ..SimulationConfig::default()
            },
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn initial_amount(mut self, amount: f64) -> Self {
        self.config.initial_amount = amount;
        self
    }

    #[must_use]
    pub fn monthly_amount(mut self, amount: f64) -> Self {
        self.config.monthly_amount = amount;
        self
    }

    /// Number of months simulated after month 0
    #[must_use]
    pub fn months(mut self, months: usize) -> Self {
        self.config.investment_period = months;
        self
    }

    #[must_use]
    pub fn years(self, years: usize) -> Self {
        self.months(years * 12)
    }

    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Allocate `weight` percent of every contribution to `asset`
    #[must_use]
    pub fn allocate(mut self, asset: impl Into<AssetId>, weight: f64) -> Self {
        self.config.etf_allocation.insert(asset.into(), weight);
        self
    }

    /// Override (or define) the market behaviour of an asset
    #[must_use]
    pub fn asset(mut self, asset: impl Into<AssetId>, spec: AssetSpec) -> Self {
        self.config.assets.insert(asset.into(), spec);
        self
    }

    #[must_use]
    pub fn historical(mut self, periods: Vec<YearlyRegime>) -> Self {
        self.config.market = MarketModel::Historical { periods };
        self
    }

    #[must_use]
    pub fn shock(mut self, shock: ShockModel) -> Self {
        self.config.shock = shock;
        self
    }

    #[must_use]
    pub fn rebalance(mut self, rebalance: Rebalance) -> Self {
        self.config.rebalance = rebalance;
        self
    }

    #[must_use]
    pub fn risk_free_rate(mut self, rate: f64) -> Self {
        self.config.risk_free_rate = rate;
        self
    }

    /// Label snapshots starting from this calendar date
    #[must_use]
    pub fn start(mut self, year: i16, month: i8, day: i8) -> Self {
        self.config.start_date = Some(jiff::civil::date(year, month, day));
        self
    }

    #[must_use]
    pub fn build(self) -> SimulationConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskTier;

    #[test]
    fn test_builder_sets_fields() {
        let config = SimulationBuilder::new()
            .name("Balanced")
            .initial_amount(5_000.0)
            .monthly_amount(250.0)
            .years(2)
            .strategy(Strategy::Contrarian)
            .allocate("sp500", 70.0)
            .allocate("gold", 30.0)
            .asset("gold", AssetSpec::tier(RiskTier::Medium).beta(0.3))
            .start(2025, 1, 1)
            .build();

        assert_eq!(config.name.as_deref(), Some("Balanced"));
        assert_eq!(config.investment_period, 24);
        assert_eq!(config.strategy, Strategy::Contrarian);
        assert_eq!(config.total_allocation(), 100.0);
        assert_eq!(config.assets.len(), 1);
        assert!(config.start_date.is_some());
    }

    #[test]
    fn test_builder_starts_without_allocation() {
        let config = SimulationBuilder::new().build();
        assert!(config.etf_allocation.is_empty());
    }
}
