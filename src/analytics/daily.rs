use super::{coverage_pct, horizon_days, mean, CoverageStatus, Thresholds};
use crate::config::SimulationConfig;
use crate::core::metrics::SimulationMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Line-wide figures per working day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub daily_throughput: f64,
    pub daily_demand: f64,
    pub coverage_pct: f64,
    pub status: CoverageStatus,
    /// Minutes, over all completed bundles
    pub avg_cycle_time: f64,
    /// Pieces, over all WIP samples
    pub avg_wip: f64,
    pub bundles_per_day: f64,
    /// The shared bundle size, or "mixed"
    pub bundle_size: String,
}

pub fn build(
    config: &SimulationConfig,
    metrics: &SimulationMetrics,
    thresholds: &Thresholds,
) -> DailySummary {
    let days = horizon_days(config);
    let daily_throughput = metrics.total_throughput() as f64 / days;
    let daily_demand: f64 = config
        .products_with_demand()
        .into_iter()
        .map(|product| config.daily_demand_for(product))
        .sum();
    let coverage = coverage_pct(daily_throughput, daily_demand);
    let wip: Vec<f64> = metrics.wip_samples.iter().map(|s| s.pieces as f64).collect();

    DailySummary {
        daily_throughput,
        daily_demand,
        coverage_pct: coverage,
        status: thresholds.classify(coverage),
        avg_cycle_time: mean(&metrics.cycle_times),
        avg_wip: mean(&wip),
        bundles_per_day: metrics.bundles_completed as f64 / days,
        bundle_size: describe_bundle_size(config),
    }
}

fn describe_bundle_size(config: &SimulationConfig) -> String {
    let sizes: BTreeSet<u32> = config.demands.iter().map(|d| d.bundle_size).collect();
    match sizes.len() {
        0 => "n/a".to_string(),
        1 => sizes.iter().next().map(|s| s.to_string()).unwrap_or_default(),
        _ => "mixed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Demand, Operation, Schedule};
    use crate::core::metrics::WipSample;

    fn config(sizes: &[u32]) -> SimulationConfig {
        let mut config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 1);
        for (i, size) in sizes.iter().enumerate() {
            let product = format!("P{}", i);
            config = config
                .with_operation(Operation::new(&product, 1, "Sew", "M", 1.0, 1))
                .with_demand(Demand::daily(&product, 100.0, *size));
        }
        config
    }

    #[test]
    fn test_bundle_size_descriptor() {
        assert_eq!(describe_bundle_size(&config(&[10, 10])), "10");
        assert_eq!(describe_bundle_size(&config(&[10, 12])), "mixed");
    }

    #[test]
    fn test_daily_aggregates() {
        let config = config(&[10, 10]);
        let mut metrics = SimulationMetrics::new();
        metrics.throughput_by_product.insert("P0".to_string(), 100);
        metrics.throughput_by_product.insert("P1".to_string(), 80);
        metrics.bundles_completed = 18;
        metrics.cycle_times = vec![10.0, 20.0];
        metrics.wip_samples = vec![
            WipSample { time: 0.0, pieces: 0, bundles: 0 },
            WipSample { time: 30.0, pieces: 40, bundles: 4 },
        ];

        let summary = build(&config, &metrics, &Thresholds::default());
        assert_eq!(summary.daily_throughput, 180.0);
        assert_eq!(summary.daily_demand, 200.0);
        assert_eq!(summary.coverage_pct, 90.0);
        assert_eq!(summary.status, CoverageStatus::Tight);
        assert_eq!(summary.avg_cycle_time, 15.0);
        assert_eq!(summary.avg_wip, 20.0);
        assert_eq!(summary.bundles_per_day, 18.0);
    }
}
