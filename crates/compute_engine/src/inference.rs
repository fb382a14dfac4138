//! Contract for the external model-inference collaborator.
//!
//! The inference engine itself lives outside this system (it is a thin
//! binding over a third-party model-execution runtime). The core only
//! depends on this trait; the service layer serves the ML endpoints
//! when an implementation is installed and reports them unimplemented
//! otherwise.

use compute_kernel::ComputeError;

/// Operations the external inference collaborator must expose.
pub trait InferenceBackend: Send + Sync {
    /// Runs a single forward pass over `input` with the given shape.
    fn predict(&self, input: &[f64], shape: &[usize]) -> Result<Vec<f64>, ComputeError>;

    /// Runs a forward pass per input, all sharing one shape.
    fn predict_batch(
        &self,
        inputs: &[Vec<f64>],
        shape: &[usize],
    ) -> Result<Vec<Vec<f64>>, ComputeError>;

    /// Converts raw logits into a probability distribution.
    fn softmax(&self, logits: &[f64]) -> Vec<f64>;

    /// The `k` most probable classes as ranked (index, probability) pairs.
    fn top_k(&self, probabilities: &[f64], k: usize) -> Vec<(usize, f64)>;
}
