//! Dense row-major matrix type and its kernel operations.
//!
//! Every operation produces a fresh [`Matrix`]; inputs are never
//! mutated in place. The parallel multiply partitions the result rows
//! into contiguous ranges and routes each range through the shared
//! [`WorkerPool`] as an independent task, so no synchronisation is
//! needed beyond waiting for all ranges to finish.

use std::sync::Arc;

use compute_pool::WorkerPool;

use crate::error::ComputeError;

/// Dense row-major matrix of `f64` entries.
///
/// Invariant: `rows * cols == data.len()`, upheld by every constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a zero-filled matrix of the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from a row-major buffer.
    ///
    /// Fails with [`ComputeError::InvalidArgument`] if the buffer length
    /// does not equal `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ComputeError> {
        if data.len() != rows * cols {
            return Err(ComputeError::InvalidArgument(format!(
                "matrix buffer holds {} values, expected {}x{} = {}",
                data.len(),
                rows,
                cols,
                rows * cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// The identity matrix of order `n`.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at row `i`, column `j`.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    /// Row-major view of the underlying buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the matrix and yields its row-major buffer.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }
}

fn require_multiplicable(a: &Matrix, b: &Matrix) -> Result<(), ComputeError> {
    if a.cols != b.rows {
        return Err(ComputeError::DimensionMismatch(format!(
            "cannot multiply {}x{} by {}x{}",
            a.rows, a.cols, b.rows, b.cols
        )));
    }
    Ok(())
}

/// Computes the rows `[start, end)` of `a * b` into a fresh buffer.
///
/// The (i, k, j) loop order keeps the inner loop walking both the `b`
/// row and the output row contiguously (row-major cache locality).
fn multiply_rows(a: &Matrix, b: &Matrix, start: usize, end: usize) -> Vec<f64> {
    let mut block = vec![0.0; (end - start) * b.cols];
    for i in start..end {
        let out = &mut block[(i - start) * b.cols..(i - start + 1) * b.cols];
        for k in 0..a.cols {
            let a_ik = a.at(i, k);
            let b_row = &b.data[k * b.cols..(k + 1) * b.cols];
            for (o, &b_kj) in out.iter_mut().zip(b_row) {
                *o += a_ik * b_kj;
            }
        }
    }
    block
}

/// Sequential dense multiply, O(rows_a * cols_a * cols_b).
///
/// Requires `a.cols == b.rows`, else [`ComputeError::DimensionMismatch`].
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, ComputeError> {
    require_multiplicable(a, b)?;
    let data = multiply_rows(a, b, 0, a.rows);
    Ok(Matrix {
        rows: a.rows,
        cols: b.cols,
        data,
    })
}

/// Parallel dense multiply partitioned by row ranges over the pool.
///
/// The result rows are split into `threads` contiguous ranges (the
/// final range absorbs any remainder); each range is an independent
/// pool task producing its own output rows, so the stitched result is
/// numerically equivalent to [`multiply`] for any thread count from 1
/// to `a.rows`: each output row is computed entirely by one worker.
pub fn multiply_parallel(
    a: &Matrix,
    b: &Matrix,
    pool: &WorkerPool,
    threads: usize,
) -> Result<Matrix, ComputeError> {
    require_multiplicable(a, b)?;
    if a.rows == 0 {
        return Ok(Matrix::new(0, b.cols));
    }

    let threads = threads.clamp(1, a.rows);
    let rows_per_range = a.rows / threads;
    let a = Arc::new(a.clone());
    let b = Arc::new(b.clone());

    let mut handles = Vec::with_capacity(threads);
    for t in 0..threads {
        let start = t * rows_per_range;
        let end = if t == threads - 1 {
            a.rows
        } else {
            (t + 1) * rows_per_range
        };
        let a = Arc::clone(&a);
        let b = Arc::clone(&b);
        handles.push(pool.submit(move || multiply_rows(&a, &b, start, end))?);
    }

    // Ranges are contiguous and submitted in order; stitching is a
    // straight concatenation of the per-range blocks.
    let mut data = Vec::with_capacity(a.rows * b.cols);
    for handle in handles {
        data.extend(handle.wait()?);
    }

    Ok(Matrix {
        rows: a.rows,
        cols: b.cols,
        data,
    })
}

/// Elementwise sum; requires equal dimensions.
pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, ComputeError> {
    if a.rows != b.rows || a.cols != b.cols {
        return Err(ComputeError::DimensionMismatch(format!(
            "cannot add {}x{} and {}x{}",
            a.rows, a.cols, b.rows, b.cols
        )));
    }
    let data = a.data.iter().zip(&b.data).map(|(x, y)| x + y).collect();
    Ok(Matrix {
        rows: a.rows,
        cols: a.cols,
        data,
    })
}

/// Transpose, O(rows * cols); swaps the dimensions.
pub fn transpose(m: &Matrix) -> Matrix {
    let mut result = Matrix::new(m.cols, m.rows);
    for i in 0..m.rows {
        for j in 0..m.cols {
            result.set(j, i, m.at(i, j));
        }
    }
    result
}

/// Elementwise scale by `scalar`.
pub fn scalar_multiply(m: &Matrix, scalar: f64) -> Matrix {
    Matrix {
        rows: m.rows,
        cols: m.cols,
        data: m.data.iter().map(|x| x * scalar).collect(),
    }
}
