//! Scenario files
//!
//! A scenario is a `SimulationConfig` serialized as YAML. Every field is
//! optional and falls back to the engine defaults.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use pacsim_core::SimulationConfig;

pub fn from_yaml(yaml: &str) -> Result<SimulationConfig, serde_saphyr::Error> {
    serde_saphyr::from_str(yaml)
}

pub fn to_yaml(config: &SimulationConfig) -> Result<String, serde_saphyr::ser::Error> {
    serde_saphyr::to_string(config)
}

/// Load a scenario file, or the default scenario when `path` is `None`.
pub fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        tracing::debug!("no scenario file given, using defaults");
        return Ok(SimulationConfig::default());
    };

    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read scenario {}", path.display()))?;
    let config = from_yaml(&content)
        .wrap_err_with(|| format!("failed to parse scenario {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        assets = config.etf_allocation.len(),
        months = config.investment_period,
        "loaded scenario"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pacsim_core::Strategy;
    use pacsim_core::model::{AssetId, MarketModel, RiskTier};
    use tempfile::tempdir;

    use super::*;

    const SCENARIO: &str = r"
name: Balanced plan
initial_amount: 5000
monthly_amount: 250
investment_period: 36
strategy: value_averaging
etf_allocation:
  sp500: 70
  my_fund: 30
assets:
  my_fund:
    risk: medium
    beta: 0.8
start_date: 2024-01-01
";

    #[test]
    fn test_parse_scenario() {
        let config = from_yaml(SCENARIO).unwrap();

        assert_eq!(config.name.as_deref(), Some("Balanced plan"));
        assert_eq!(config.initial_amount, 5_000.0);
        assert_eq!(config.monthly_amount, 250.0);
        assert_eq!(config.investment_period, 36);
        assert_eq!(config.strategy, Strategy::ValueAveraging);
        assert_eq!(config.total_allocation(), 100.0);
        assert_eq!(
            config.assets[&AssetId::from("my_fund")].risk,
            Some(RiskTier::Medium)
        );
        assert_eq!(config.start_date, Some(jiff::civil::date(2024, 1, 1)));
        assert_eq!(config.market, MarketModel::Synthetic);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = from_yaml("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = from_yaml(SCENARIO).unwrap();
        let yaml = to_yaml(&config).unwrap();
        assert_eq!(from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.yaml");
        fs::write(&path, SCENARIO).unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.investment_period, 36);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to read scenario"));
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "strategy: [not, a, strategy]\n").unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to parse scenario"));
    }

    #[test]
    fn test_load_defaults_without_path() {
        assert_eq!(load(None).unwrap(), SimulationConfig::default());
    }
}
