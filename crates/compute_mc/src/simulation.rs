//! The three Monte Carlo simulation variants.
//!
//! Variant selection is by wire name; each variant builds a different
//! sample set for the shared 95% confidence-interval helper (checkpoint
//! estimates, discounted payoffs, or raw integrand values); that
//! difference is intentional and part of the contract.

use std::collections::BTreeMap;
use std::str::FromStr;

use compute_kernel::stats;
use compute_kernel::ComputeError;

use crate::rng::SimRng;

/// European call parameters fixed by the option_pricing variant.
const SPOT: f64 = 100.0;
const STRIKE: f64 = 100.0;
const RISK_FREE_RATE: f64 = 0.05;
const VOLATILITY: f64 = 0.20;
const MATURITY: f64 = 1.0;

/// z-score for a two-sided 95% normal-approximation interval.
const Z_95: f64 = 1.96;

/// Simulation variant, parsed from the wire name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationKind {
    PiEstimation,
    OptionPricing,
    Integration,
}

impl FromStr for SimulationKind {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pi_estimation" => Ok(SimulationKind::PiEstimation),
            "option_pricing" => Ok(SimulationKind::OptionPricing),
            "integration" => Ok(SimulationKind::Integration),
            other => Err(ComputeError::UnknownSimulationType(other.to_string())),
        }
    }
}

/// Result of one simulation run.
///
/// The auxiliary metric keys vary per variant (`actual_pi` / `strike` /
/// `dimensions` and friends).
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    pub result: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub iterations_completed: usize,
    pub additional_metrics: BTreeMap<String, f64>,
}

/// Two-sided 95% margin: `1.96 * stddev(samples) / sqrt(len)`.
fn confidence_margin(samples: &[f64]) -> f64 {
    let mean = stats::mean(samples);
    Z_95 * stats::stddev(samples, mean) / (samples.len() as f64).sqrt()
}

/// Runs the named simulation variant.
///
/// Fails with [`ComputeError::UnknownSimulationType`] for an
/// unrecognised name and [`ComputeError::InvalidArgument`] when
/// `iterations` is zero or a path-based variant is asked for zero
/// `dimensions`.
pub fn run(
    iterations: usize,
    dimensions: usize,
    seed: u64,
    kind: &str,
) -> Result<SimulationResult, ComputeError> {
    let kind = SimulationKind::from_str(kind)?;
    if iterations == 0 {
        return Err(ComputeError::InvalidArgument(
            "iterations must be at least 1".to_string(),
        ));
    }

    match kind {
        SimulationKind::PiEstimation => Ok(estimate_pi(iterations, seed)),
        SimulationKind::OptionPricing => {
            require_dimensions(dimensions)?;
            Ok(price_option(iterations, seed, dimensions))
        }
        SimulationKind::Integration => {
            require_dimensions(dimensions)?;
            Ok(integrate(iterations, seed, dimensions))
        }
    }
}

fn require_dimensions(dimensions: usize) -> Result<(), ComputeError> {
    if dimensions == 0 {
        return Err(ComputeError::InvalidArgument(
            "dimensions must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Quarter-circle hit counting with periodic checkpoint estimates.
///
/// A running estimate is recorded every `max(1, N/100)` draws; the
/// confidence interval is built from those checkpoints, centred on
/// their mean.
fn estimate_pi(iterations: usize, seed: u64) -> SimulationResult {
    let mut rng = SimRng::from_seed(seed);
    let mut inside_circle: usize = 0;
    let mut estimates = Vec::with_capacity(100);

    let checkpoint = (iterations / 100).max(1);

    for i in 0..iterations {
        let x = rng.uniform();
        let y = rng.uniform();
        if x * x + y * y <= 1.0 {
            inside_circle += 1;
        }
        if (i + 1) % checkpoint == 0 {
            estimates.push(4.0 * inside_circle as f64 / (i + 1) as f64);
        }
    }

    let result = 4.0 * inside_circle as f64 / iterations as f64;
    let estimate_mean = stats::mean(&estimates);
    let margin = confidence_margin(&estimates);

    let mut metrics = BTreeMap::new();
    metrics.insert("actual_pi".to_string(), std::f64::consts::PI);
    metrics.insert("error".to_string(), (result - std::f64::consts::PI).abs());
    metrics.insert(
        "error_percentage".to_string(),
        (result - std::f64::consts::PI).abs() / std::f64::consts::PI * 100.0,
    );

    SimulationResult {
        result,
        confidence_lower: estimate_mean - margin,
        confidence_upper: estimate_mean + margin,
        iterations_completed: iterations,
        additional_metrics: metrics,
    }
}

/// Prices a fixed at-the-money European call by GBM path simulation.
///
/// Each path is discretised into `steps` increments with
/// drift `(r - sigma^2/2) dt` and diffusion `sigma sqrt(dt)` per step
/// driven by standard-normal shocks. The confidence margin is the
/// standard error of the payoffs scaled by the discount factor.
fn price_option(iterations: usize, seed: u64, steps: usize) -> SimulationResult {
    let mut rng = SimRng::from_seed(seed);

    let dt = MATURITY / steps as f64;
    let drift = (RISK_FREE_RATE - 0.5 * VOLATILITY * VOLATILITY) * dt;
    let diffusion = VOLATILITY * dt.sqrt();

    let mut payoffs = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let mut price = SPOT;
        for _ in 0..steps {
            price *= (drift + diffusion * rng.normal()).exp();
        }
        payoffs.push((price - STRIKE).max(0.0));
    }

    let discount = (-RISK_FREE_RATE * MATURITY).exp();
    let payoff_mean = stats::mean(&payoffs);
    let option_price = discount * payoff_mean;
    let margin = discount * confidence_margin(&payoffs);

    let mut metrics = BTreeMap::new();
    metrics.insert("strike".to_string(), STRIKE);
    metrics.insert("spot".to_string(), SPOT);
    metrics.insert("volatility".to_string(), VOLATILITY);
    metrics.insert("time_steps".to_string(), steps as f64);

    SimulationResult {
        result: option_price,
        confidence_lower: option_price - margin,
        confidence_upper: option_price + margin,
        iterations_completed: iterations,
        additional_metrics: metrics,
    }
}

/// Estimates the integral of exp(-sum x_i^2) over the unit hypercube
/// by plain averaging of the sampled integrand.
fn integrate(iterations: usize, seed: u64, dimensions: usize) -> SimulationResult {
    let mut rng = SimRng::from_seed(seed);

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let mut sum_sq = 0.0;
        for _ in 0..dimensions {
            let x = rng.uniform();
            sum_sq += x * x;
        }
        samples.push((-sum_sq).exp());
    }

    let integral = stats::mean(&samples);
    let std_error = stats::stddev(&samples, integral) / (iterations as f64).sqrt();
    let margin = Z_95 * std_error;

    let mut metrics = BTreeMap::new();
    metrics.insert("dimensions".to_string(), dimensions as f64);
    metrics.insert("std_error".to_string(), std_error);

    SimulationResult {
        result: integral,
        confidence_lower: integral - margin,
        confidence_upper: integral + margin,
        iterations_completed: iterations,
        additional_metrics: metrics,
    }
}
