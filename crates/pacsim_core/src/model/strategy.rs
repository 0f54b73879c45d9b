use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Contribution strategy applied to every month after month 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Dollar cost averaging: the nominal amount every month
    #[default]
    Dca,
    /// Top up the portfolio towards a growing target value
    ValueAveraging,
    /// Invest more while the signal price is trending up
    Momentum,
    /// Invest more after the signal price drops
    Contrarian,
    /// Momentum factor blended with a small random perturbation
    SmartBeta,
    /// Invest more when trailing volatility is low
    Tactical,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Dca,
        Strategy::ValueAveraging,
        Strategy::Momentum,
        Strategy::Contrarian,
        Strategy::SmartBeta,
        Strategy::Tactical,
    ];

    /// Identifier used in configuration files
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Strategy::Dca => "dca",
            Strategy::ValueAveraging => "value_averaging",
            Strategy::Momentum => "momentum",
            Strategy::Contrarian => "contrarian",
            Strategy::SmartBeta => "smart_beta",
            Strategy::Tactical => "tactical",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Dca => "Dollar Cost Averaging",
            Strategy::ValueAveraging => "Value Averaging",
            Strategy::Momentum => "Momentum Strategy",
            Strategy::Contrarian => "Contrarian Strategy",
            Strategy::SmartBeta => "Smart Beta Strategy",
            Strategy::Tactical => "Tactical Asset Allocation",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(pub String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Strategy::ALL.iter().map(|s| s.id()).collect();
        write!(
            f,
            "unknown strategy '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.id() == normalized)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}
