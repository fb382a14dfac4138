//! Shared error taxonomy for the compute kernels.
//!
//! All variants are synchronous, call-scoped failures: they never
//! corrupt shared state and never propagate across calls.

use compute_pool::PoolError;
use thiserror::Error;

/// Failure modes of the kernel operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ComputeError {
    /// A shape precondition was violated (matrix or vector dimensions).
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An out-of-range parameter (percentile rank, window size,
    /// unknown operation name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Statistics requested on zero-length data.
    #[error("cannot analyze empty dataset")]
    EmptyInput,

    /// Simulation variant name not recognised.
    #[error("unknown simulation type: {0}")]
    UnknownSimulationType(String),

    /// Unexpected failure inside the worker pool.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PoolError> for ComputeError {
    fn from(err: PoolError) -> Self {
        ComputeError::Internal(err.to_string())
    }
}
