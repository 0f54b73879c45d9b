use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How often holdings are traded back to their target weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rebalance {
    /// Holdings drift with prices; only new cash follows the weights
    #[default]
    Never,
    Monthly,
    Quarterly,
    Annual,
}

impl Rebalance {
    pub const ALL: [Rebalance; 4] = [
        Rebalance::Never,
        Rebalance::Monthly,
        Rebalance::Quarterly,
        Rebalance::Annual,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Rebalance::Never => "never",
            Rebalance::Monthly => "monthly",
            Rebalance::Quarterly => "quarterly",
            Rebalance::Annual => "annual",
        }
    }

    /// Months between two rebalances, `None` when holdings are never traded.
    #[must_use]
    pub const fn interval(self) -> Option<usize> {
        match self {
            Rebalance::Never => None,
            Rebalance::Monthly => Some(1),
            Rebalance::Quarterly => Some(3),
            Rebalance::Annual => Some(12),
        }
    }

    /// Whether holdings are rebalanced at the end of `month`. Never at month 0,
    /// where the initial purchase already matches the weights.
    #[must_use]
    pub fn is_due(self, month: usize) -> bool {
        match self.interval() {
            Some(interval) => month > 0 && month % interval == 0,
            None => false,
        }
    }
}

impl fmt::Display for Rebalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRebalanceError(pub String);

impl fmt::Display for ParseRebalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Rebalance::ALL.iter().map(|r| r.id()).collect();
        write!(
            f,
            "unknown rebalance frequency '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for ParseRebalanceError {}

impl FromStr for Rebalance {
    type Err = ParseRebalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Rebalance::ALL
            .into_iter()
            .find(|r| r.id() == normalized)
            .ok_or_else(|| ParseRebalanceError(s.to_string()))
    }
}
