//! Descriptive statistics kernel.
//!
//! [`analyze`] drives the per-request computation: count, min, max and
//! mean are always produced, the remaining aggregates only when the
//! corresponding operation name is requested. The standalone functions
//! ([`percentile`], [`moving_average`], [`skewness`], [`kurtosis`]) are
//! exposed for callers that need a single aggregate.
//!
//! Variance and standard deviation use the population definition
//! (denominator `n`); kurtosis is reported as excess (raw fourth
//! standardised moment minus 3).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ComputeError;

/// Fixed percentile ranks computed by the `"percentiles"` operation.
const PERCENTILE_RANKS: [u8; 5] = [25, 50, 75, 95, 99];

/// Immutable aggregate produced by [`analyze`], fresh per call.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Rank -> value mapping; empty unless `"percentiles"` was requested.
    pub percentiles: BTreeMap<u8, f64>,
}

/// Runs the requested descriptive statistics over `data`.
///
/// Fails with [`ComputeError::EmptyInput`] on zero-length data. Unknown
/// operation names are ignored silently; `"stddev"` implies variance.
pub fn analyze(data: &[f64], operations: &[String]) -> Result<Statistics, ComputeError> {
    if data.is_empty() {
        return Err(ComputeError::EmptyInput);
    }

    let mut stats = Statistics {
        count: data.len(),
        min: data.iter().copied().fold(f64::INFINITY, f64::min),
        max: data.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean: mean(data),
        ..Statistics::default()
    };

    for op in operations {
        match op.as_str() {
            // Always computed above.
            "mean" => {}
            "median" => stats.median = median(data),
            "stddev" => {
                stats.variance = variance(data, stats.mean);
                stats.stddev = stats.variance.sqrt();
            }
            "variance" => stats.variance = variance(data, stats.mean),
            "percentiles" => {
                for rank in PERCENTILE_RANKS {
                    stats
                        .percentiles
                        .insert(rank, percentile(data, f64::from(rank))?);
                }
            }
            _ => {}
        }
    }

    Ok(stats)
}

/// Arithmetic mean. Callers must pass non-empty data.
pub fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Selection-based median, O(n) expected.
///
/// Even-length input averages two independent selections of the central
/// order statistics rather than sorting the whole slice.
pub fn median(data: &[f64]) -> f64 {
    let n = data.len();
    let mut scratch = data.to_vec();
    let (_, upper, _) = scratch.select_nth_unstable_by(n / 2, f64::total_cmp);
    let upper = *upper;

    if n % 2 == 0 {
        let (_, lower, _) = scratch.select_nth_unstable_by(n / 2 - 1, f64::total_cmp);
        (upper + *lower) / 2.0
    } else {
        upper
    }
}

/// Population variance given a precomputed mean.
pub fn variance(data: &[f64], mean: f64) -> f64 {
    data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation given a precomputed mean.
pub fn stddev(data: &[f64], mean: f64) -> f64 {
    variance(data, mean).sqrt()
}

/// Linearly interpolated percentile of rank `p`.
///
/// Fails with [`ComputeError::InvalidArgument`] unless `0 <= p <= 100`,
/// and with [`ComputeError::EmptyInput`] on empty data. Sorts a copy
/// and interpolates between the floor/ceil index of `p/100 * (n-1)`.
pub fn percentile(data: &[f64], p: f64) -> Result<f64, ComputeError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(ComputeError::InvalidArgument(format!(
            "percentile rank {p} must be between 0 and 100"
        )));
    }
    if data.is_empty() {
        return Err(ComputeError::EmptyInput);
    }

    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }

    let weight = index - lower as f64;
    Ok(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Third standardised moment. Callers must pass non-empty data.
pub fn skewness(data: &[f64]) -> f64 {
    let m = mean(data);
    let s = stddev(data, m);
    data.iter()
        .map(|v| {
            let d = (v - m) / s;
            d * d * d
        })
        .sum::<f64>()
        / data.len() as f64
}

/// Excess kurtosis (fourth standardised moment minus 3).
pub fn kurtosis(data: &[f64]) -> f64 {
    let m = mean(data);
    let s = stddev(data, m);
    data.iter()
        .map(|v| {
            let d = (v - m) / s;
            d * d * d * d
        })
        .sum::<f64>()
        / data.len() as f64
        - 3.0
}

/// Sliding-window moving average, O(n).
///
/// Fails with [`ComputeError::InvalidArgument`] if `window` is zero or
/// exceeds the data length. Output length is `n - window + 1`.
pub fn moving_average(data: &[f64], window: usize) -> Result<Vec<f64>, ComputeError> {
    if window == 0 || window > data.len() {
        return Err(ComputeError::InvalidArgument(format!(
            "window size {window} invalid for {} data points",
            data.len()
        )));
    }

    let mut result = Vec::with_capacity(data.len() - window + 1);
    let mut sum: f64 = data[..window].iter().sum();
    result.push(sum / window as f64);

    for i in window..data.len() {
        sum = sum - data[i - window] + data[i];
        result.push(sum / window as f64);
    }

    Ok(result)
}
