use super::{coverage_pct, horizon_days, CoverageStatus, Thresholds};
use crate::config::SimulationConfig;
use crate::core::metrics::SimulationMetrics;
use serde::{Deserialize, Serialize};

/// Weekly demand against measured capacity for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCapacity {
    pub product: String,
    pub weekly_demand: f64,
    /// Measured daily throughput scaled to the schedule's work days
    pub weekly_capacity: f64,
    pub coverage_pct: f64,
    pub status: CoverageStatus,
}

pub fn build(
    config: &SimulationConfig,
    metrics: &SimulationMetrics,
    thresholds: &Thresholds,
) -> Vec<WeeklyCapacity> {
    let days = horizon_days(config);
    let work_days = config.schedule.work_days as f64;

    config
        .products_with_demand()
        .into_iter()
        .map(|product| {
            let weekly_capacity = metrics.throughput(product) as f64 / days * work_days;
            let weekly_demand = config.weekly_demand_for(product);
            let coverage = coverage_pct(weekly_capacity, weekly_demand);
            WeeklyCapacity {
                product: product.to_string(),
                weekly_demand,
                weekly_capacity,
                coverage_pct: coverage,
                status: thresholds.classify(coverage),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Demand, Operation, Schedule};

    #[test]
    fn test_scales_throughput_to_week() {
        let config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 2)
            .with_operation(Operation::new("P", 1, "Sew", "M", 1.0, 1))
            .with_demand(Demand::daily("P", 100.0, 10));
        let mut metrics = SimulationMetrics::new();
        metrics.throughput_by_product.insert("P".to_string(), 180);

        let rows = build(&config, &metrics, &Thresholds::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weekly_demand, 500.0);
        assert_eq!(rows[0].weekly_capacity, 450.0);
        assert_eq!(rows[0].coverage_pct, 90.0);
        assert_eq!(rows[0].status, CoverageStatus::Tight);
    }
}
