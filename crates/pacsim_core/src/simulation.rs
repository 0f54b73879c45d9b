//! Engine entry points
//!
//! A run validates the config, generates one price path per allocated asset,
//! aggregates the portfolio month by month and reduces the series to metrics.
//! Seeded entry points use `SmallRng`, so the same seed and config always give
//! bit-identical results.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::config::validation::{check_inputs, validate};
use crate::error::ConfigurationError;
use crate::metrics::{MetricsSettings, compute_metrics_with, has_enough_data};
use crate::model::{
    MonteCarloSummary, PortfolioSnapshot, SimulationResult, SimulationWarning, Strategy,
    StrategyComparison, WarningKind,
};
use crate::portfolio::aggregate;
use crate::price_path::{PricePaths, generate_price_paths};

/// Strategies a single comparison may hold
pub const COMPARISON_SIZE: std::ops::RangeInclusive<usize> = 2..=4;
/// Percentiles reported by [`monte_carlo_simulate`]
pub const MONTE_CARLO_PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];
const MAX_BATCH_SIZE: usize = 100;

/// Run a single simulation with a generator seeded from `seed`.
pub fn simulate(
    config: &SimulationConfig,
    seed: u64,
) -> Result<SimulationResult, ConfigurationError> {
    tracing::debug!(
        seed,
        months = config.investment_period,
        strategy = %config.strategy,
        "starting simulation"
    );
    let mut rng = SmallRng::seed_from_u64(seed);
    simulate_with_rng(config, &mut rng)
}

/// Run a single simulation drawing every random number from `rng`.
///
/// Price paths are generated first, in asset id order, then the strategy
/// draws (if any) continue from the same generator.
pub fn simulate_with_rng<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationResult, ConfigurationError> {
    let warnings = validate(config)?;
    let paths = generate_price_paths(config, rng)?;
    run_on_paths(config, config.strategy, &paths, rng, warnings)
}

/// Run a simulation over caller-supplied price paths.
///
/// Only amounts and weights are validated; asset ids need not exist in the
/// catalog since no market parameters are looked up.
pub fn simulate_with_paths<R: Rng + ?Sized>(
    config: &SimulationConfig,
    paths: &PricePaths,
    rng: &mut R,
) -> Result<SimulationResult, ConfigurationError> {
    let warnings = check_inputs(config)?;
    run_on_paths(config, config.strategy, paths, rng, warnings)
}

fn run_on_paths<R: Rng + ?Sized>(
    config: &SimulationConfig,
    strategy: Strategy,
    paths: &PricePaths,
    rng: &mut R,
    mut warnings: Vec<SimulationWarning>,
) -> Result<SimulationResult, ConfigurationError> {
    let config = config.with_strategy(strategy);
    let series = aggregate(&config, paths, rng)?;
    let metrics = compute_metrics_with(
        &series,
        &MetricsSettings {
            risk_free_rate: config.risk_free_rate,
        },
    );

    if !has_enough_data(&series) {
        tracing::warn!(
            months = config.investment_period,
            "too few monthly returns, ratio metrics reported as 0"
        );
        warnings.push(SimulationWarning::new(
            WarningKind::DegenerateResult,
            format!(
                "{} monthly return(s) is not enough for volatility based metrics",
                config.investment_period
            ),
        ));
    }

    tracing::debug!(
        strategy = %strategy,
        final_value = metrics.final_value,
        cumulative_return = metrics.cumulative_return,
        "simulation finished"
    );

    Ok(SimulationResult {
        strategy,
        series,
        metrics,
        warnings,
    })
}

/// Run several strategies against the same generated price paths.
///
/// Each strategy's own random draws start from the generator state right
/// after path generation, so `compare_strategies` reproduces exactly what
/// [`simulate`] gives for each strategy with the same seed.
pub fn compare_strategies(
    config: &SimulationConfig,
    strategies: &[Strategy],
    seed: u64,
) -> Result<StrategyComparison, ConfigurationError> {
    check_strategy_list(strategies)?;
    let warnings = validate(config)?;

    let mut rng = SmallRng::seed_from_u64(seed);
    let paths = generate_price_paths(config, &mut rng)?;

    let results = strategies
        .iter()
        .map(|&strategy| {
            let mut run_rng = rng.clone();
            run_on_paths(config, strategy, &paths, &mut run_rng, warnings.clone())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let best_strategy = best_of(&results).unwrap_or(strategies[0]);
    Ok(StrategyComparison {
        results,
        best_strategy,
    })
}

fn check_strategy_list(strategies: &[Strategy]) -> Result<(), ConfigurationError> {
    let reason = if !COMPARISON_SIZE.contains(&strategies.len()) {
        Some("between 2 and 4 strategies are required")
    } else if strategies
        .iter()
        .enumerate()
        .any(|(i, s)| strategies[..i].contains(s))
    {
        Some("each strategy may appear only once")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigurationError::InvalidStrategyCount {
            requested: strategies.to_vec(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Highest cumulative return wins; ties go to the higher Sharpe ratio, then
/// to the earlier entry.
fn best_of(results: &[SimulationResult]) -> Option<Strategy> {
    let mut iter = results.iter();
    let mut best = iter.next()?;
    for candidate in iter {
        let (c, b) = (&candidate.metrics, &best.metrics);
        if c.cumulative_return > b.cumulative_return
            || (c.cumulative_return == b.cumulative_return && c.sharpe_ratio > b.sharpe_ratio)
        {
            best = candidate;
        }
    }
    Some(best.strategy)
}

struct RunOutcome {
    final_value: f64,
    total_invested: f64,
    cumulative_return: f64,
}

impl RunOutcome {
    fn from_series(series: &[PortfolioSnapshot]) -> Self {
        series.last().map_or(
            RunOutcome {
                final_value: 0.0,
                total_invested: 0.0,
                cumulative_return: 0.0,
            },
            |s| RunOutcome {
                final_value: s.total_value,
                total_invested: s.total_invested,
                cumulative_return: s.cumulative_return,
            },
        )
    }
}

/// Run `iterations` independently seeded simulations and summarise the
/// distribution of outcomes.
///
/// Seeds are drawn from a generator seeded with `seed`, one per batch of up
/// to 100 runs, so the summary does not depend on how batches are scheduled.
pub fn monte_carlo_simulate(
    config: &SimulationConfig,
    iterations: usize,
    seed: u64,
) -> Result<MonteCarloSummary, ConfigurationError> {
    if iterations == 0 {
        return Err(ConfigurationError::InvalidIterationCount(iterations));
    }
    validate(config)?;

    let num_batches = iterations.div_ceil(MAX_BATCH_SIZE);
    let mut master = SmallRng::seed_from_u64(seed);
    let batch_seeds: Vec<u64> = (0..num_batches).map(|_| master.next_u64()).collect();

    let run_batch = |(i, batch_seed): (usize, u64)| {
        let mut rng = SmallRng::seed_from_u64(batch_seed);
        let batch_size = if i == num_batches - 1 {
            iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };
        (0..batch_size)
            .map(|_| -> Result<RunOutcome, ConfigurationError> {
                let mut run_rng = SmallRng::seed_from_u64(rng.next_u64());
                let paths = generate_price_paths(config, &mut run_rng)?;
                let series = aggregate(config, &paths, &mut run_rng)?;
                Ok(RunOutcome::from_series(&series))
            })
            .collect::<Result<Vec<_>, _>>()
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Vec<RunOutcome>> = batch_seeds
        .into_par_iter()
        .enumerate()
        .map(run_batch)
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Vec<RunOutcome>> = batch_seeds
        .into_iter()
        .enumerate()
        .map(run_batch)
        .collect::<Result<_, _>>()?;

    let outcomes: Vec<RunOutcome> = batches.into_iter().flatten().collect();
    let n = outcomes.len() as f64;

    let mut finals: Vec<f64> = outcomes.iter().map(|o| o.final_value).collect();
    finals.sort_by(f64::total_cmp);
    let final_value_percentiles = MONTE_CARLO_PERCENTILES
        .iter()
        .map(|&p| (p, nearest_rank(&finals, p)))
        .collect();

    let losses = outcomes
        .iter()
        .filter(|o| o.final_value < o.total_invested)
        .count();

    Ok(MonteCarloSummary {
        iterations,
        strategy: config.strategy,
        final_value_percentiles,
        mean_final_value: outcomes.iter().map(|o| o.final_value).sum::<f64>() / n,
        mean_total_invested: outcomes.iter().map(|o| o.total_invested).sum::<f64>() / n,
        mean_cumulative_return: outcomes.iter().map(|o| o.cumulative_return).sum::<f64>() / n,
        probability_of_loss: losses as f64 / n * 100.0,
    })
}

fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}
