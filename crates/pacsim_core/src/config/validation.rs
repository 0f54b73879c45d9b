//! Up-front configuration checks
//!
//! `validate` is the fail-fast gate used by the engine before any month is
//! simulated. `validate_allocation` is the lenient variant for form feedback:
//! it never fails and collects every problem it finds.

use serde::{Deserialize, Serialize};

use super::{SimulationConfig, catalog};
use crate::error::ConfigurationError;
use crate::model::{AssetId, MarketModel, RiskTier, SimulationWarning, WarningKind};

const ALLOCATION_TOLERANCE: f64 = 1e-9;

/// Check a config for fatal problems and collect non-fatal warnings.
///
/// Every allocated asset must resolve to market parameters, so this is the
/// gate for runs that generate their own price paths.
pub fn validate(config: &SimulationConfig) -> Result<Vec<SimulationWarning>, ConfigurationError> {
    let warnings = check_inputs(config)?;

    for asset_id in config.etf_allocation.keys() {
        config.resolve_asset(asset_id)?;
    }

    if let MarketModel::Historical { periods } = &config.market
        && periods.is_empty()
    {
        return Err(ConfigurationError::EmptyScenario);
    }

    Ok(warnings)
}

/// Amount, weight and allocation-total checks that apply whatever the
/// source of the price paths.
pub(crate) fn check_inputs(
    config: &SimulationConfig,
) -> Result<Vec<SimulationWarning>, ConfigurationError> {
    check_amount("initial_amount", config.initial_amount)?;
    check_amount("monthly_amount", config.monthly_amount)?;
    if !config.risk_free_rate.is_finite() {
        return Err(ConfigurationError::NonFiniteAmount {
            field: "risk_free_rate",
        });
    }

    for (asset_id, weight) in &config.etf_allocation {
        if !is_valid_weight(*weight) {
            return Err(ConfigurationError::InvalidWeight {
                asset_id: asset_id.clone(),
                weight: *weight,
            });
        }
    }

    let total = config.total_allocation();
    if total <= 0.0 {
        return Err(ConfigurationError::ZeroTotalAllocation);
    }

    let mut warnings = Vec::new();
    if (total - 100.0).abs() > ALLOCATION_TOLERANCE {
        tracing::warn!(total, "allocation does not sum to 100");
        warnings.push(SimulationWarning::new(
            WarningKind::AllocationNotNormalized,
            format!(
                "allocation totals {total}%, each contribution is invested at {total}% of its nominal amount"
            ),
        ));
    }
    Ok(warnings)
}

fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && (0.0..=100.0).contains(&weight)
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFiniteAmount { field });
    }
    if value < 0.0 {
        return Err(ConfigurationError::NegativeAmount { field, value });
    }
    Ok(())
}

/// One allocation entry with whatever the config or catalog knows about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedAsset {
    pub asset_id: AssetId,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskTier>,
}

/// Outcome of checking an allocation for display purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub is_valid: bool,
    pub total_allocation: f64,
    pub assets: Vec<AllocatedAsset>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

fn describe(config: &SimulationConfig, asset_id: &AssetId, weight: f64) -> AllocatedAsset {
    let spec = config.assets.get(asset_id);
    let listed = catalog::lookup(asset_id.as_str());
    AllocatedAsset {
        asset_id: asset_id.clone(),
        weight,
        name: spec
            .and_then(|s| s.name.clone())
            .or_else(|| listed.map(|etf| etf.name.to_string())),
        sector: listed.map(|etf| etf.sector.to_string()),
        risk: spec.and_then(|s| s.risk).or_else(|| listed.map(|etf| etf.risk)),
    }
}

/// Check the allocation of a config, reporting every problem at once.
#[must_use]
pub fn validate_allocation(config: &SimulationConfig) -> AllocationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut assets = Vec::with_capacity(config.etf_allocation.len());

    for (asset_id, weight) in &config.etf_allocation {
        assets.push(describe(config, asset_id, *weight));
        if !is_valid_weight(*weight) {
            errors.push(
                ConfigurationError::InvalidWeight {
                    asset_id: asset_id.clone(),
                    weight: *weight,
                }
                .to_string(),
            );
        }
        if let Err(e) = config.resolve_asset(asset_id) {
            errors.push(e.to_string());
        }
    }

    let total = config.total_allocation();
    if config.etf_allocation.is_empty() || total <= 0.0 {
        errors.push(ConfigurationError::ZeroTotalAllocation.to_string());
    } else if (total - 100.0).abs() > ALLOCATION_TOLERANCE {
        warnings.push(format!("allocation totals {total}% instead of 100%"));
    }

    AllocationReport {
        is_valid: errors.is_empty(),
        total_allocation: total,
        assets,
        errors,
        warnings,
    }
}
