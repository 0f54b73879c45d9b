//! PAC (periodic investment plan) simulation library
//!
//! Simulates a monthly contribution plan into a basket of ETFs over synthetic
//! or regime-driven price paths and reports the resulting portfolio series
//! with risk and performance metrics. It supports:
//! - Synthetic price paths per risk tier or explicit trend/volatility
//! - Yearly historical regimes scaled by asset beta
//! - Six contribution strategies (DCA, value averaging, momentum, contrarian,
//!   smart beta, tactical volatility targeting)
//! - Strategy comparison over identical price paths
//! - Monte Carlo distributions of final value
//!
//! Every entry point takes a seed or an explicit generator, so runs are
//! reproducible.
//!
//! # Builder DSL
//!
//! ```ignore
//! use pacsim_core::{SimulationBuilder, Strategy, simulate};
//!
//! let config = SimulationBuilder::new()
//!     .initial_amount(10_000.0)
//!     .monthly_amount(500.0)
//!     .years(5)
//!     .strategy(Strategy::ValueAveraging)
//!     .allocate("world_equity", 70.0)
//!     .allocate("bonds", 30.0)
//!     .build();
//!
//! let result = simulate(&config, 42)?;
//! println!("{:.2}", result.metrics.final_value);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod price_path;
pub mod projection;
pub mod simulation;
pub mod strategy;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{AssetSpec, SimulationBuilder, SimulationConfig};
pub use error::ConfigurationError;
pub use model::{
    AssetId, MetricsSummary, MonteCarloSummary, PortfolioSnapshot, PricePath, Rebalance,
    RiskTier, SimulationResult, SimulationWarning, Strategy, StrategyComparison, WarningKind,
};
pub use simulation::{
    compare_strategies, monte_carlo_simulate, simulate, simulate_with_paths, simulate_with_rng,
};
