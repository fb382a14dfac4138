//! Compute engine façade.
//!
//! [`ComputeEngine`] is the single composing entry point through which
//! the service layer invokes the kernels. It owns the shared
//! [`WorkerPool`](compute_pool::WorkerPool), selects the sequential or
//! parallel matrix path by size threshold, exposes the vector geometry
//! operations, and counts successful top-level operations.

pub mod engine;
pub mod inference;
pub mod vector;

pub use compute_kernel::{ComputeError, Matrix, Statistics};
pub use compute_mc::SimulationResult;
pub use engine::ComputeEngine;
pub use inference::InferenceBackend;
