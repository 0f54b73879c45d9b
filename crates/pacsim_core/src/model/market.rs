use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Price every generated path starts from.
pub const BASE_PRICE: f64 = 100.0;

/// Lowest price a generated path can reach. Keeps share purchases finite
/// when an extreme shock would otherwise push the price to or below zero.
pub const PRICE_FLOOR: f64 = 0.01;

/// Coarse riskiness of an asset class, mapped to fixed drift/volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskTier {
    /// Monthly trend and volatility for this tier.
    #[must_use]
    pub const fn params(self) -> MarketParams {
        match self {
            RiskTier::Low => MarketParams::new(0.003, 0.02),
            RiskTier::Medium => MarketParams::new(0.005, 0.04),
            RiskTier::High => MarketParams::new(0.007, 0.06),
            RiskTier::VeryHigh => MarketParams::new(0.009, 0.08),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::VeryHigh => "very_high",
        }
    }
}

/// Monthly drift and shock scale of a synthetic price path.
///
/// Both are fractions per month: `trend = 0.007` is +0.7% expected per month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    pub trend: f64,
    pub volatility: f64,
}

impl MarketParams {
    #[must_use]
    pub const fn new(trend: f64, volatility: f64) -> Self {
        Self { trend, volatility }
    }

    /// Zero drift, zero volatility. Produces a constant path.
    #[must_use]
    pub const fn flat() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Distribution of the per-month random shock added to the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockModel {
    /// `N(0, volatility)`
    #[default]
    Gaussian,
    /// `(U - 0.5) * volatility` with `U ~ Uniform[0, 1)`, bounded support
    Uniform,
}

/// One calendar year of a historical backtest scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRegime {
    pub label: String,
    /// Annual return in percent (e.g. `28.7`)
    pub annual_return_pct: f64,
    /// Annualized volatility in percent (e.g. `15.3`)
    pub annual_volatility_pct: f64,
}

impl YearlyRegime {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        annual_return_pct: f64,
        annual_volatility_pct: f64,
    ) -> Self {
        Self {
            label: label.into(),
            annual_return_pct,
            annual_volatility_pct,
        }
    }

    /// Monthly drift and shock scale equivalent to this regime, scaled by `beta`.
    #[must_use]
    pub fn monthly_params(&self, beta: f64) -> MarketParams {
        MarketParams::new(
            beta * self.annual_return_pct / 100.0 / 12.0,
            beta * self.annual_volatility_pct / 100.0 / 12f64.sqrt(),
        )
    }
}

/// Default backtest regimes, 2020 through 2024.
#[must_use]
pub fn default_historical_regimes() -> Vec<YearlyRegime> {
    vec![
        YearlyRegime::new("2020", -3.2, 22.1),
        YearlyRegime::new("2021", 28.7, 15.3),
        YearlyRegime::new("2022", -18.1, 19.8),
        YearlyRegime::new("2023", 24.2, 14.7),
        YearlyRegime::new("2024", 12.5, 16.2),
    ]
}

/// How per-asset price paths are produced for a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketModel {
    /// Each asset follows its risk tier (or explicit) trend and volatility
    #[default]
    Synthetic,
    /// Every asset follows the same sequence of yearly regimes, scaled by its beta
    Historical { periods: Vec<YearlyRegime> },
}

/// Monthly price series of one asset. Index `m` is the price at month `m`.
///
/// Deserializes from a plain list of prices through [`PricePath::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PricePath(Vec<f64>);

pub(crate) fn check_prices(prices: &[f64]) -> Result<(), ConfigurationError> {
    if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return Err(ConfigurationError::InvalidPricePath {
            reason: "prices must be finite and positive",
        });
    }
    Ok(())
}

impl PricePath {
    /// Wrap an explicit price series. Every price must be finite and positive.
    pub fn new(prices: Vec<f64>) -> Result<Self, ConfigurationError> {
        if prices.is_empty() {
            return Err(ConfigurationError::InvalidPricePath {
                reason: "price path is empty",
            });
        }
        check_prices(&prices)?;
        Ok(Self(prices))
    }

    /// Constant path at `price` covering months `0..=months`.
    pub fn flat(months: usize, price: f64) -> Result<Self, ConfigurationError> {
        Self::new(vec![price; months + 1])
    }

    /// Path starting at [`BASE_PRICE`] compounding at a fixed monthly rate.
    #[must_use]
    pub fn compounding(months: usize, monthly_rate: f64) -> Self {
        let mut prices = Vec::with_capacity(months + 1);
        let mut price = BASE_PRICE;
        prices.push(price);
        for _ in 0..months {
            price = (price * (1.0 + monthly_rate)).max(PRICE_FLOOR);
            prices.push(price);
        }
        Self(prices)
    }

    pub(crate) fn from_generated(prices: Vec<f64>) -> Self {
        Self(prices)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of months after month 0 covered by this path.
    #[must_use]
    pub fn months(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    #[must_use]
    pub fn prices(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn price(&self, month: usize) -> Option<f64> {
        self.0.get(month).copied()
    }

    /// Prices for months `0..=month`.
    #[must_use]
    pub fn history(&self, month: usize) -> &[f64] {
        &self.0[..=month.min(self.months())]
    }

    /// Month-over-month return as a fraction; 0 at month 0 or out of range.
    #[must_use]
    pub fn monthly_return(&self, month: usize) -> f64 {
        if month == 0 || month >= self.0.len() {
            return 0.0;
        }
        let previous = self.0[month - 1];
        (self.0[month] - previous) / previous
    }
}

impl TryFrom<Vec<f64>> for PricePath {
    type Error = ConfigurationError;

    fn try_from(prices: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(prices)
    }
}

impl From<PricePath> for Vec<f64> {
    fn from(path: PricePath) -> Self {
        path.0
    }
}
