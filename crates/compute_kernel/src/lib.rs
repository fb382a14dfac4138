//! Numerical kernels: dense matrix algebra and descriptive statistics.
//!
//! The kernels are self-contained algorithm modules with no knowledge of
//! the request/response layer. They hold no cross-call mutable state, so
//! concurrent calls are fully independent; every operation returns a new
//! value and fails fast on the offending call only.

pub mod error;
pub mod matrix;
pub mod stats;

pub use error::ComputeError;
pub use matrix::Matrix;
pub use stats::Statistics;
