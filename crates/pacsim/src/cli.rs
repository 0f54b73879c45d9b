use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pacsim_core::{Rebalance, Strategy};

#[derive(Parser, Debug)]
#[command(name = "pacsim")]
#[command(about = "Simulate periodic ETF investment plans")]
pub struct Cli {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one simulation and print its metrics
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Also print the month-by-month series
        #[arg(long)]
        series: bool,
    },
    /// Run several strategies over the same price paths
    Compare {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Comma-separated strategies, 2 to 4 of them
        #[arg(short = 'S', long, value_delimiter = ',', required = true)]
        strategies: Vec<Strategy>,
    },
    /// Summarise the distribution of many independently seeded runs
    MonteCarlo {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[arg(short = 'n', long, default_value_t = 1000)]
        iterations: usize,
    },
    /// Check the allocation and inputs without simulating
    Validate {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Closed-form projection at a fixed annual rate
    Project {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Annual rate as a fraction
        #[arg(short, long, default_value_t = 0.07)]
        rate: f64,
    },
}

impl Command {
    #[must_use]
    pub fn scenario(&self) -> &ScenarioArgs {
        match self {
            Command::Run { scenario, .. }
            | Command::Compare { scenario, .. }
            | Command::MonteCarlo { scenario, .. }
            | Command::Validate { scenario }
            | Command::Project { scenario, .. } => scenario,
        }
    }
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Scenario YAML file (defaults are used when omitted)
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Override the scenario strategy
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// Override the investment period, in months
    #[arg(short, long)]
    pub months: Option<usize>,

    /// Override the rebalancing schedule (never, monthly, quarterly, annual)
    #[arg(long)]
    pub rebalance: Option<Rebalance>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from([
            "pacsim",
            "compare",
            "plan.yaml",
            "--strategies",
            "dca,value-averaging,tactical",
            "--seed",
            "7",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Compare {
            scenario,
            strategies,
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert_eq!(
            strategies,
            [Strategy::Dca, Strategy::ValueAveraging, Strategy::Tactical]
        );
        assert_eq!(scenario.seed, 7);
        assert_eq!(scenario.format, OutputFormat::Json);
        assert_eq!(scenario.config, Some(PathBuf::from("plan.yaml")));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pacsim", "run"]).unwrap();
        let scenario = cli.command.scenario();
        assert_eq!(scenario.seed, 42);
        assert_eq!(scenario.format, OutputFormat::Text);
        assert!(scenario.config.is_none());
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_parse_rebalance() {
        let cli = Cli::try_parse_from(["pacsim", "run", "--rebalance", "annual"]).unwrap();
        assert_eq!(cli.command.scenario().rebalance, Some(Rebalance::Annual));
        assert!(Cli::try_parse_from(["pacsim", "run", "--rebalance", "weekly"]).is_err());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(Cli::try_parse_from(["pacsim", "run", "--strategy", "yolo"]).is_err());
    }
}
