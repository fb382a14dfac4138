//! Seeded Monte Carlo simulation kernel.
//!
//! Three simulation variants are exposed through [`simulation::run`]:
//! pi estimation, geometric-Brownian-motion option pricing, and
//! hypercube integration. Each call executes single-threaded on one
//! seeded [`SimRng`], so an identical seed produces bit-identical
//! results regardless of how many callers run concurrently.

pub mod rng;
pub mod simulation;

pub use rng::SimRng;
pub use simulation::{run, SimulationKind, SimulationResult};
