use super::{coverage_pct, horizon_days, CoverageStatus, Thresholds};
use crate::config::SimulationConfig;
use crate::core::metrics::SimulationMetrics;
use serde::{Deserialize, Serialize};

/// Demand against throughput for one product at daily and weekly grain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub product: String,
    pub daily_demand: f64,
    pub daily_throughput: f64,
    pub daily_coverage_pct: f64,
    pub weekly_demand: f64,
    pub weekly_throughput: f64,
    pub weekly_coverage_pct: f64,
    pub status: CoverageStatus,
}

pub fn build(
    config: &SimulationConfig,
    metrics: &SimulationMetrics,
    thresholds: &Thresholds,
) -> Vec<ProductSummary> {
    let days = horizon_days(config);
    let work_days = config.schedule.work_days as f64;

    config
        .products_with_demand()
        .into_iter()
        .map(|product| {
            let daily_demand = config.daily_demand_for(product);
            let daily_throughput = metrics.throughput(product) as f64 / days;
            let weekly_demand = config.weekly_demand_for(product);
            let weekly_throughput = daily_throughput * work_days;
            let daily_coverage = coverage_pct(daily_throughput, daily_demand);
            ProductSummary {
                product: product.to_string(),
                daily_demand,
                daily_throughput,
                daily_coverage_pct: daily_coverage,
                weekly_demand,
                weekly_throughput,
                weekly_coverage_pct: coverage_pct(weekly_throughput, weekly_demand),
                status: thresholds.classify(daily_coverage),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Demand, DemandMode, Operation, Schedule};

    #[test]
    fn test_mix_driven_demand_split() {
        let config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 1)
            .with_mode(DemandMode::MixDriven { total_demand: 500.0 })
            .with_operation(Operation::new("A", 1, "Sew", "M", 1.0, 1))
            .with_operation(Operation::new("B", 1, "Sew", "M", 1.0, 1))
            .with_demand(Demand::mix_share("A", 60.0, 10))
            .with_demand(Demand::mix_share("B", 40.0, 10));
        let mut metrics = SimulationMetrics::new();
        metrics.throughput_by_product.insert("A".to_string(), 300);
        metrics.throughput_by_product.insert("B".to_string(), 100);

        let rows = build(&config, &metrics, &Thresholds::default());
        assert_eq!(rows[0].product, "A");
        assert_eq!(rows[0].daily_demand, 300.0);
        assert_eq!(rows[0].daily_coverage_pct, 100.0);
        assert_eq!(rows[0].status, CoverageStatus::Ok);
        assert_eq!(rows[0].weekly_demand, 1500.0);
        assert_eq!(rows[0].weekly_throughput, 1500.0);

        assert_eq!(rows[1].daily_demand, 200.0);
        assert_eq!(rows[1].daily_coverage_pct, 50.0);
        assert_eq!(rows[1].status, CoverageStatus::Shortfall);
    }
}
