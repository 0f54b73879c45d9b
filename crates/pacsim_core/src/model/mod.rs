mod ids;
mod market;
mod rebalance;
mod results;
mod strategy;

pub(crate) use market::check_prices;

pub use ids::AssetId;
pub use market::{
    BASE_PRICE, MarketModel, MarketParams, PRICE_FLOOR, PricePath, RiskTier, ShockModel,
    YearlyRegime, default_historical_regimes,
};
pub use rebalance::{ParseRebalanceError, Rebalance};
pub use results::{
    MetricsSummary, MonteCarloSummary, PortfolioSnapshot, SimulationResult, SimulationWarning,
    StrategyComparison, WarningKind,
};
pub use strategy::{ParseStrategyError, Strategy};
