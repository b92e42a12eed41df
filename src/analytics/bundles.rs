use super::{horizon_days, mean};
use crate::config::SimulationConfig;
use crate::core::metrics::SimulationMetrics;
use serde::{Deserialize, Serialize};

/// Bundle flow figures for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetrics {
    pub product: String,
    pub bundle_size: u32,
    pub bundles_generated: u64,
    pub bundles_completed: u64,
    pub bundles_per_day: f64,
    pub avg_bundles_in_system: f64,
    pub max_bundles_in_system: u64,
    pub avg_cycle_time: f64,
}

pub fn build(config: &SimulationConfig, metrics: &SimulationMetrics) -> Vec<BundleMetrics> {
    let days = horizon_days(config);

    metrics
        .bundles_generated_by_product
        .iter()
        .map(|(product, generated)| {
            let wip = metrics.product_wip(product);
            let in_system: Vec<f64> = wip.iter().map(|n| *n as f64).collect();
            let completed = metrics.bundles_completed_for(product);
            BundleMetrics {
                product: product.clone(),
                bundle_size: config.demand_for(product).map(|d| d.bundle_size).unwrap_or(0),
                bundles_generated: *generated,
                bundles_completed: completed,
                bundles_per_day: completed as f64 / days,
                avg_bundles_in_system: mean(&in_system),
                max_bundles_in_system: wip.iter().copied().max().unwrap_or(0),
                avg_cycle_time: mean(metrics.cycle_times_for(product)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Demand, Operation, Schedule};

    #[test]
    fn test_per_product_bundle_figures() {
        let config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 2)
            .with_operation(Operation::new("P", 1, "Sew", "M", 1.0, 1))
            .with_demand(Demand::daily("P", 100.0, 10));
        let mut metrics = SimulationMetrics::new();
        metrics.bundles_generated_by_product.insert("P".to_string(), 20);
        metrics.bundles_completed_by_product.insert("P".to_string(), 12);
        metrics.product_wip_samples.insert("P".to_string(), vec![0, 3, 5, 4]);
        metrics
            .cycle_times_by_product
            .insert("P".to_string(), vec![30.0, 50.0]);

        let rows = build(&config, &metrics);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.bundle_size, 10);
        assert_eq!(row.bundles_per_day, 6.0);
        assert_eq!(row.avg_bundles_in_system, 3.0);
        assert_eq!(row.max_bundles_in_system, 5);
        assert_eq!(row.avg_cycle_time, 40.0);
    }
}
