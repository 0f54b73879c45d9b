//! Built-in ETF catalog
//!
//! Allocation ids that are not overridden in `SimulationConfig::assets`
//! resolve here for their risk tier and beta.

use crate::model::RiskTier;

/// Static description of an allocatable ETF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtfInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub risk: RiskTier,
    /// Sensitivity to the broad market, used to scale historical regimes
    pub beta: f64,
}

const CATALOG: [EtfInfo; 6] = [
    EtfInfo {
        id: "world_equity",
        name: "FTSE Developed World UCITS ETF",
        sector: "Global Equity",
        risk: RiskTier::High,
        beta: 0.98,
    },
    EtfInfo {
        id: "sp500",
        name: "S&P 500 UCITS ETF",
        sector: "US Large Cap",
        risk: RiskTier::High,
        beta: 1.00,
    },
    EtfInfo {
        id: "europe",
        name: "FTSE Developed Europe UCITS ETF",
        sector: "European Equity",
        risk: RiskTier::Medium,
        beta: 0.85,
    },
    EtfInfo {
        id: "bonds",
        name: "Global Aggregate Bond UCITS ETF",
        sector: "Fixed Income",
        risk: RiskTier::Low,
        beta: 0.05,
    },
    EtfInfo {
        id: "emerging",
        name: "FTSE Emerging Markets UCITS ETF",
        sector: "Emerging Markets",
        risk: RiskTier::VeryHigh,
        beta: 1.15,
    },
    EtfInfo {
        id: "real_estate",
        name: "Global Real Estate UCITS ETF",
        sector: "Real Estate",
        risk: RiskTier::Medium,
        beta: 0.75,
    },
];

#[must_use]
pub fn lookup(id: &str) -> Option<&'static EtfInfo> {
    CATALOG.iter().find(|etf| etf.id == id)
}
