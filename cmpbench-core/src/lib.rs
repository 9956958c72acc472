//! Comparative latency benchmarking core for cmpbench
//!
//! Drives a fixed batch of concurrent GET requests against each target in a
//! [`TargetRegistry`] and reports total wall-clock time per target.
//!
//! Per target the pipeline is:
//! [`RequestGenerator`] → request queue → [`WorkerPool`] → response queue →
//! [`ResponseCollector`], bracketed by the [`BenchmarkRunner`] timer.

pub mod collector;
pub mod error;
pub mod generator;
pub mod identity;
pub mod pool;
pub mod report;
pub mod runner;
pub mod target;

// Re-export commonly used types at the crate root
pub use collector::{DrainSummary, ResponseCollector};
pub use error::{BenchError, Result};
pub use generator::RequestGenerator;
pub use identity::{random_identity, Identity, IdentitySource};
pub use pool::{RunningPool, WorkerPool};
pub use report::{build_report, Report, RunResult};
pub use runner::{BenchmarkRunner, RunSettings};
pub use target::{Pagination, Target, TargetRegistry};
