//! Subcommand execution
//!
//! Every command returns its rendered output instead of printing it, so the
//! binary decides where it goes and tests can inspect it.

use color_eyre::eyre::{Context, Result};
use pacsim_core::config::{validate, validate_allocation};
use pacsim_core::projection::{cagr, future_value};
use pacsim_core::{SimulationConfig, compare_strategies, monte_carlo_simulate, simulate};
use serde::Serialize;

use crate::cli::{Command, OutputFormat, ScenarioArgs};
use crate::report::{self, ProjectionReport};
use crate::scenario;

/// Rendered output of a command
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: String,
    /// False when the command completed but found the scenario unusable
    pub success: bool,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }
}

/// Load the scenario named by the command's arguments and apply CLI overrides.
pub fn prepare_config(args: &ScenarioArgs) -> Result<SimulationConfig> {
    let mut config = scenario::load(args.config.as_deref())?;
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(months) = args.months {
        config.investment_period = months;
    }
    if let Some(rebalance) = args.rebalance {
        config.rebalance = rebalance;
    }
    Ok(config)
}

pub fn execute(command: &Command) -> Result<Outcome> {
    let args = command.scenario();
    let config = prepare_config(args)?;
    tracing::info!(strategy = %config.strategy, seed = args.seed, "executing command");

    match command {
        Command::Run { series, .. } => {
            let result = simulate(&config, args.seed).wrap_err("simulation failed")?;
            render(args.format, &result, || report::render_result(&result, *series))
        }
        Command::Compare { strategies, .. } => {
            let comparison = compare_strategies(&config, strategies, args.seed)
                .wrap_err("strategy comparison failed")?;
            render(args.format, &comparison, || {
                report::render_comparison(&comparison)
            })
        }
        Command::MonteCarlo { iterations, .. } => {
            let summary = monte_carlo_simulate(&config, *iterations, args.seed)
                .wrap_err("Monte Carlo simulation failed")?;
            render(args.format, &summary, || report::render_monte_carlo(&summary))
        }
        Command::Validate { .. } => {
            let mut allocation = validate_allocation(&config);
            if let Err(e) = validate(&config) {
                let message = e.to_string();
                if !allocation.errors.contains(&message) {
                    allocation.errors.push(message);
                }
                allocation.is_valid = false;
            }
            let success = allocation.is_valid;
            let mut outcome = render(args.format, &allocation, || {
                report::render_allocation(&allocation)
            })?;
            outcome.success = success;
            Ok(outcome)
        }
        Command::Project { rate, .. } => {
            validate(&config).wrap_err("invalid scenario")?;
            let projection = project(&config, *rate);
            render(args.format, &projection, || {
                report::render_projection(&projection)
            })
        }
    }
}

fn project(config: &SimulationConfig, annual_rate: f64) -> ProjectionReport {
    let months = config.investment_period;
    let total_invested = config.initial_amount + config.monthly_amount * months as f64;
    let future_value = future_value(
        config.initial_amount,
        config.monthly_amount,
        annual_rate,
        months,
    );
    ProjectionReport {
        months,
        annual_rate,
        total_invested,
        future_value,
        cagr: cagr(total_invested, future_value, months as f64 / 12.0) * 100.0,
    }
}

fn render<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<Outcome> {
    let output = match format {
        OutputFormat::Text => text(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).wrap_err("failed to serialize output")?
        }
    };
    Ok(Outcome::ok(output))
}
