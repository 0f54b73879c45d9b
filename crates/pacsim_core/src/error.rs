use std::fmt;

use crate::model::{AssetId, Strategy};

/// Invalid or inconsistent simulation input.
///
/// Always raised before the month-by-month loop starts, so a run either
/// produces a complete series or nothing at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    NegativeAmount {
        field: &'static str,
        value: f64,
    },
    NonFiniteAmount {
        field: &'static str,
    },
    InvalidWeight {
        asset_id: AssetId,
        weight: f64,
    },
    ZeroTotalAllocation,
    /// Allocation references an asset that is neither overridden in the
    /// config nor present in the built-in catalog
    UnknownAsset(AssetId),
    /// Allocation references an asset with no generated/supplied price path
    MissingPricePath(AssetId),
    PricePathTooShort {
        asset_id: AssetId,
        required: usize,
        available: usize,
    },
    InvalidPricePath {
        reason: &'static str,
    },
    InvalidMarketParameters {
        asset_id: AssetId,
        trend: f64,
        volatility: f64,
        reason: &'static str,
    },
    /// Historical market model with no yearly regimes
    EmptyScenario,
    InvalidStrategyCount {
        requested: Vec<Strategy>,
        reason: &'static str,
    },
    InvalidIterationCount(usize),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::NegativeAmount { field, value } => {
                write!(f, "{field} must be non-negative (got {value})")
            }
            ConfigurationError::NonFiniteAmount { field } => {
                write!(f, "{field} must be a finite number")
            }
            ConfigurationError::InvalidWeight { asset_id, weight } => {
                write!(
                    f,
                    "allocation weight for {asset_id} must be within 0..=100 (got {weight})"
                )
            }
            ConfigurationError::ZeroTotalAllocation => write!(
                f,
                "total allocation weight is zero, contributions would be invested nowhere"
            ),
            ConfigurationError::UnknownAsset(id) => write!(f, "asset {id} is not defined"),
            ConfigurationError::MissingPricePath(id) => {
                write!(f, "no price path available for allocated asset {id}")
            }
            ConfigurationError::PricePathTooShort {
                asset_id,
                required,
                available,
            } => write!(
                f,
                "price path for {asset_id} has {available} points, {required} required"
            ),
            ConfigurationError::InvalidPricePath { reason } => {
                write!(f, "invalid price path: {reason}")
            }
            ConfigurationError::InvalidMarketParameters {
                asset_id,
                trend,
                volatility,
                reason,
            } => write!(
                f,
                "invalid market parameters for {asset_id} (trend={trend}, volatility={volatility}): {reason}"
            ),
            ConfigurationError::EmptyScenario => {
                write!(f, "historical scenario contains no yearly regimes")
            }
            ConfigurationError::InvalidStrategyCount { requested, reason } => {
                write!(f, "cannot compare strategies {requested:?}: {reason}")
            }
            ConfigurationError::InvalidIterationCount(n) => {
                write!(f, "Monte Carlo needs at least one iteration (got {n})")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
