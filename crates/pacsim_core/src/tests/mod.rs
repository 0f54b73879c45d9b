//! Integration tests for the PAC simulation engine
//!
//! Tests are organized by topic:
//! - `scenarios` - End-to-end properties of single runs
//! - `strategies` - Contribution schedules of each strategy over known prices
//! - `portfolio` - Aggregation mechanics (weights, signal asset, dates)
//! - `metrics` - Risk statistics over hand-built series
//! - `historical` - Regime-driven markets and catalog lookups
//! - `comparison` - Strategy comparison over shared price paths
//! - `monte_carlo` - Distribution summaries and reproducibility
//! - `serialization` - Wire format of configs and results

mod metrics;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{SimulationBuilder, SimulationConfig};
use crate::model::{AssetId, PricePath, Strategy};
use crate::price_path::PricePaths;

/// 10 000 up front, 500 a month, everything into `assetA`
fn single_asset_config(months: usize, strategy: Strategy) -> SimulationConfig {
    SimulationBuilder::new()
        .initial_amount(10_000.0)
        .monthly_amount(500.0)
        .months(months)
        .strategy(strategy)
        .allocate("assetA", 100.0)
        .build()
}

fn paths(entries: Vec<(&str, PricePath)>) -> PricePaths {
    entries
        .into_iter()
        .map(|(id, path)| (AssetId::from(id), path))
        .collect()
}

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}
