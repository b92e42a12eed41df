//! Reduction of raw simulation metrics into decision-support blocks.
//!
//! Every block builder is a pure function of the config, the metrics and
//! the thresholds. Only free-capacity analysis depends on another block
//! (station performance).

pub mod assumptions;
pub mod bundles;
pub mod daily;
pub mod free_capacity;
pub mod products;
pub mod rebalancing;
pub mod station;
pub mod weekly;

pub use assumptions::AssumptionLog;
pub use bundles::BundleMetrics;
pub use daily::DailySummary;
pub use free_capacity::FreeCapacity;
pub use products::ProductSummary;
pub use rebalancing::{RebalanceAction, RebalancingSuggestion};
pub use station::StationPerformance;
pub use weekly::WeeklyCapacity;

use crate::config::SimulationConfig;
use crate::core::execution::config::ExecutionConfig;
use crate::core::metrics::SimulationMetrics;
use crate::validation::ValidationReport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Classification thresholds used by the blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Coverage at or above this is OK
    pub coverage_ok_pct: f64,
    /// Coverage at or above this (and below OK) is TIGHT
    pub coverage_tight_pct: f64,
    /// Utilization at or above this marks a bottleneck
    pub bottleneck_pct: f64,
    /// Utilization at or below this marks a donor, if it has spare operators
    pub donor_pct: f64,
}

impl Thresholds {
    pub fn new() -> Self {
        Self {
            coverage_ok_pct: 100.0,
            coverage_tight_pct: 90.0,
            bottleneck_pct: 90.0,
            donor_pct: 50.0,
        }
    }

    pub fn with_coverage(mut self, ok_pct: f64, tight_pct: f64) -> Self {
        self.coverage_ok_pct = ok_pct;
        self.coverage_tight_pct = tight_pct;
        self
    }

    pub fn with_utilization(mut self, bottleneck_pct: f64, donor_pct: f64) -> Self {
        self.bottleneck_pct = bottleneck_pct;
        self.donor_pct = donor_pct;
        self
    }

    /// Bucket a coverage percentage; each bucket is closed at its lower bound
    pub fn classify(&self, coverage_pct: f64) -> CoverageStatus {
        if coverage_pct >= self.coverage_ok_pct {
            CoverageStatus::Ok
        } else if coverage_pct >= self.coverage_tight_pct {
            CoverageStatus::Tight
        } else {
            CoverageStatus::Shortfall
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Ok,
    Tight,
    Shortfall,
}

/// Short form of the validation outcome carried with the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub is_valid: bool,
    pub can_proceed: bool,
    /// Warning messages, so callers see what was tolerated
    pub warning_messages: Vec<String>,
}

impl ValidationSummary {
    pub fn from_report(report: &ValidationReport) -> Self {
        Self {
            errors: report.errors.len(),
            warnings: report.warnings.len(),
            info: report.info.len(),
            is_valid: report.is_valid,
            can_proceed: report.can_proceed,
            warning_messages: report.warnings.iter().map(|w| w.message.clone()).collect(),
        }
    }
}

/// The eight output blocks of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub weekly_capacity: Vec<WeeklyCapacity>,
    pub daily_summary: DailySummary,
    pub station_performance: Vec<StationPerformance>,
    pub free_capacity: FreeCapacity,
    pub bundle_metrics: Vec<BundleMetrics>,
    pub product_summary: Vec<ProductSummary>,
    pub rebalancing: Vec<RebalancingSuggestion>,
    pub assumptions: AssumptionLog,
    pub validation: ValidationSummary,
    /// Wall-clock seconds the simulation took
    pub duration_secs: f64,
    /// Seed of the run, when known
    pub seed: Option<u64>,
}

/// Build all blocks with default thresholds
pub fn calculate(
    config: &SimulationConfig,
    metrics: &SimulationMetrics,
    report: &ValidationReport,
    duration: Duration,
) -> Results {
    calculate_with(
        config,
        metrics,
        report,
        duration,
        &Thresholds::default(),
        &ExecutionConfig::default(),
    )
}

/// Build all blocks with explicit thresholds and the run parameters to echo
pub fn calculate_with(
    config: &SimulationConfig,
    metrics: &SimulationMetrics,
    report: &ValidationReport,
    duration: Duration,
    thresholds: &Thresholds,
    execution: &ExecutionConfig,
) -> Results {
    // Metrics from the simulator carry their own seed
    let seed = execution.seed.or(metrics.seed);
    let station_performance = station::build(config, metrics, thresholds);
    let free_capacity = free_capacity::build(config, metrics, &station_performance);
    let rebalancing = rebalancing::build(&station_performance);

    Results {
        weekly_capacity: weekly::build(config, metrics, thresholds),
        daily_summary: daily::build(config, metrics, thresholds),
        free_capacity,
        bundle_metrics: bundles::build(config, metrics),
        product_summary: products::build(config, metrics, thresholds),
        rebalancing,
        station_performance,
        assumptions: assumptions::build(config, thresholds, execution, seed),
        validation: ValidationSummary::from_report(report),
        duration_secs: duration.as_secs_f64(),
        seed,
    }
}

/// Arithmetic mean, zero for no samples
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Supply as a percentage of demand; nothing demanded counts as fully covered
pub(crate) fn coverage_pct(supply: f64, demand: f64) -> f64 {
    if demand > 0.0 {
        supply * 100.0 / demand
    } else {
        100.0
    }
}

/// Horizon in days as a divisor, never zero
pub(crate) fn horizon_days(config: &SimulationConfig) -> f64 {
    config.horizon_days.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_boundaries_are_closed_below() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.classify(100.0), CoverageStatus::Ok);
        assert_eq!(thresholds.classify(99.999), CoverageStatus::Tight);
        assert_eq!(thresholds.classify(90.0), CoverageStatus::Tight);
        assert_eq!(thresholds.classify(89.9), CoverageStatus::Shortfall);
    }

    #[test]
    fn test_coverage_without_demand() {
        assert_eq!(coverage_pct(0.0, 0.0), 100.0);
        assert_eq!(coverage_pct(50.0, 200.0), 25.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_status_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&CoverageStatus::Shortfall).unwrap(), "\"SHORTFALL\"");
    }
}
