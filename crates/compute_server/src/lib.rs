//! HTTP request/response surface for the compute engine.
//!
//! This crate is the dispatcher layer: it decodes wire payloads into
//! kernel inputs, invokes the [`ComputeEngine`](compute_engine::ComputeEngine),
//! times each call, records running metrics, and converts kernel
//! failures into structured error responses.

pub mod config;
pub mod metrics;
pub mod routes;
pub mod server;

// Re-export the engine for integration callers
pub use compute_engine;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
