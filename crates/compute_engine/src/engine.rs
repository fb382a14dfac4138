//! The [`ComputeEngine`] façade.

use std::sync::atomic::{AtomicU64, Ordering};

use compute_kernel::{matrix, stats, ComputeError, Matrix, Statistics};
use compute_mc::{simulation, SimulationResult};
use compute_pool::WorkerPool;

use crate::vector;

/// Both operand dimensions must exceed this for the parallel multiply
/// path; below it the fan-out overhead outweighs the benefit.
const PARALLEL_THRESHOLD: usize = 100;

/// Composes the matrix, statistics and simulation kernels over a shared
/// worker pool.
///
/// Holds no cross-call mutable state besides the operation counter, so
/// concurrent calls are fully independent. The counter increments once
/// per successful top-level call.
pub struct ComputeEngine {
    pool: WorkerPool,
    total_operations: AtomicU64,
}

impl ComputeEngine {
    /// Creates an engine backed by a pool of `pool_size` workers.
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool: WorkerPool::new(pool_size),
            total_operations: AtomicU64::new(0),
        }
    }

    /// Number of workers in the owned pool.
    pub fn pool_size(&self) -> usize {
        self.pool.size()
    }

    /// Total successful top-level operations since construction.
    pub fn total_operations(&self) -> u64 {
        self.total_operations.load(Ordering::Relaxed)
    }

    fn count_op<T>(&self, result: Result<T, ComputeError>) -> Result<T, ComputeError> {
        if result.is_ok() {
            self.total_operations.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// Multiplies two matrices, taking the parallel row-partitioned
    /// path when both operand dimensions exceed the size threshold.
    pub fn multiply_matrices(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, ComputeError> {
        let result = if a.rows() > PARALLEL_THRESHOLD && b.cols() > PARALLEL_THRESHOLD {
            matrix::multiply_parallel(a, b, &self.pool, self.pool.size())
        } else {
            matrix::multiply(a, b)
        };
        self.count_op(result)
    }

    /// Runs the requested descriptive statistics over `data`.
    pub fn analyze_statistics(
        &self,
        data: &[f64],
        operations: &[String],
    ) -> Result<Statistics, ComputeError> {
        self.count_op(stats::analyze(data, operations))
    }

    /// Runs the named Monte Carlo simulation variant.
    ///
    /// The simulation executes single-threaded on this call's seeded
    /// generator; the pool is not involved (determinism contract).
    pub fn run_monte_carlo(
        &self,
        iterations: usize,
        dimensions: usize,
        seed: u64,
        simulation_type: &str,
    ) -> Result<SimulationResult, ComputeError> {
        self.count_op(simulation::run(iterations, dimensions, seed, simulation_type))
    }

    pub fn dot_product(&self, a: &[f64], b: &[f64]) -> Result<f64, ComputeError> {
        self.count_op(vector::dot_product(a, b))
    }

    pub fn cross_product(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>, ComputeError> {
        self.count_op(vector::cross_product(a, b))
    }

    pub fn vector_norm(&self, v: &[f64]) -> Result<f64, ComputeError> {
        self.count_op(Ok(vector::norm(v)))
    }

    pub fn euclidean_distance(&self, a: &[f64], b: &[f64]) -> Result<f64, ComputeError> {
        self.count_op(vector::euclidean_distance(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn engine() -> ComputeEngine {
        ComputeEngine::new(4)
    }

    #[test]
    fn test_small_multiply_uses_sequential_path() {
        let engine = engine();
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let result = engine.multiply_matrices(&a, &Matrix::identity(2)).unwrap();
        assert_eq!(result, a);
    }

    #[test]
    fn test_large_multiply_matches_sequential() {
        // 120x120 crosses the parallel threshold on both dimensions.
        let n = 120;
        let data: Vec<f64> = (0..n * n).map(|i| ((i % 17) as f64) - 8.0).collect();
        let a = Matrix::from_vec(n, n, data.clone()).unwrap();
        let b = Matrix::from_vec(n, n, data).unwrap();

        let engine = engine();
        let via_engine = engine.multiply_matrices(&a, &b).unwrap();
        let sequential = matrix::multiply(&a, &b).unwrap();

        for (x, y) in via_engine.data().iter().zip(sequential.data()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_operation_counter_counts_only_successes() {
        let engine = engine();
        assert_eq!(engine.total_operations(), 0);

        engine.dot_product(&[1.0, 2.0], &[3.0, 4.0]).unwrap();
        assert_eq!(engine.total_operations(), 1);

        // Failed call must not count.
        engine.dot_product(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(engine.total_operations(), 1);

        engine.vector_norm(&[3.0, 4.0]).unwrap();
        engine
            .analyze_statistics(&[1.0, 2.0, 3.0], &["median".to_string()])
            .unwrap();
        assert_eq!(engine.total_operations(), 3);
    }

    #[test]
    fn test_vector_operations_through_facade() {
        let engine = engine();
        assert_eq!(engine.dot_product(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert_eq!(
            engine
                .cross_product(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0])
                .unwrap(),
            vec![0.0, 0.0, 1.0]
        );
        assert_relative_eq!(
            engine.vector_norm(&[3.0, 4.0]).unwrap(),
            5.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            engine
                .euclidean_distance(&[1.0, 1.0], &[4.0, 5.0])
                .unwrap(),
            5.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_cross_product_rejects_non_3d() {
        let engine = engine();
        assert!(matches!(
            engine.cross_product(&[1.0, 2.0], &[3.0, 4.0]),
            Err(ComputeError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_monte_carlo_through_facade_is_deterministic() {
        let engine = engine();
        let first = engine
            .run_monte_carlo(10_000, 1, 42, "pi_estimation")
            .unwrap();
        let second = engine
            .run_monte_carlo(10_000, 1, 42, "pi_estimation")
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.total_operations(), 2);
    }

    #[test]
    fn test_unknown_simulation_propagates() {
        let engine = engine();
        assert!(matches!(
            engine.run_monte_carlo(10, 1, 0, "nope"),
            Err(ComputeError::UnknownSimulationType(_))
        ));
        assert_eq!(engine.total_operations(), 0);
    }
}
