//! Discrete-event simulation of a production line with capacity analytics.
//!
//! The pipeline is `validate` -> `run` -> `calculate`: the validator checks a
//! [`SimulationConfig`], the simulator pushes bundles of pieces through each
//! product's routing over a fixed horizon, and the analytics reduce the raw
//! metrics into the output blocks of [`Results`]. All three calls are
//! synchronous and do no I/O.

pub mod analytics;
pub mod config;
pub mod core;
pub mod error;
pub mod validation;

// Re-export commonly used types
pub use crate::analytics::{calculate, calculate_with, Results, Thresholds};
pub use crate::config::SimulationConfig;
pub use crate::core::execution::config::ExecutionConfig;
pub use crate::core::metrics::SimulationMetrics;
pub use crate::core::simulation_engine::{SimulationRun, Simulator};
pub use crate::error::LineSimError;
pub use crate::validation::{ConfigValidator, ValidationReport};

use log::warn;
use std::time::Duration;

/// Check a config; the simulator must not run unless `can_proceed`
pub fn validate(config: &SimulationConfig) -> ValidationReport {
    ConfigValidator::validate(config)
}

/// Simulate `config` with default run parameters
///
/// Returns the metrics and the wall-clock duration of the run. The config
/// is assumed to have passed validation.
pub fn run(config: &SimulationConfig, seed: Option<u64>) -> (SimulationMetrics, Duration) {
    let run = run_with(config, ExecutionConfig::new().with_optional_seed(seed));
    (run.metrics, run.duration)
}

/// Simulate `config` with explicit run parameters
pub fn run_with(config: &SimulationConfig, execution: ExecutionConfig) -> SimulationRun {
    Simulator::new(config, execution).run()
}

/// Validate, simulate and analyse in one call
///
/// Refuses to simulate when validation reports errors.
pub fn simulate(
    config: &SimulationConfig,
    execution: ExecutionConfig,
) -> Result<Results, LineSimError> {
    let report = validate(config);
    if !report.can_proceed {
        warn!("Config rejected with {} error(s)", report.errors.len());
        return Err(LineSimError::ValidationFailed {
            errors: report.errors.len(),
            report: Box::new(report),
        });
    }

    let run = run_with(config, execution.clone());
    let execution = execution.with_seed(run.seed);
    Ok(calculate_with(
        config,
        &run.metrics,
        &report,
        run.duration,
        &Thresholds::default(),
        &execution,
    ))
}
