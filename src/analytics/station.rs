use super::{mean, Thresholds};
use crate::config::SimulationConfig;
use crate::core::metrics::SimulationMetrics;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Performance of one pooled machine/tool resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPerformance {
    pub machine_tool: String,
    /// Operation labels served by this resource, as "product/step name"
    pub operations: Vec<String>,
    pub products: Vec<String>,
    /// Pooled operators across every operation naming the resource
    pub operators: u32,
    pub utilization_pct: f64,
    pub busy_minutes: f64,
    pub pieces_processed: u64,
    /// Mean minutes per processing draw, rework passes included
    pub avg_processing_time: f64,
    /// Mean minutes per draw for each operation label in `operations`
    pub avg_time_by_operation: BTreeMap<String, f64>,
    pub avg_queue_wait: f64,
    pub max_queue_wait: f64,
    /// Most bundles ever waiting at once
    pub peak_queue_length: u64,
    pub rework_count: u64,
    pub breakdown_count: u64,
    pub is_bottleneck: bool,
    pub is_donor: bool,
}

#[derive(Default)]
struct StationUsers {
    operations: Vec<String>,
    products: BTreeSet<String>,
    avg_times: BTreeMap<String, f64>,
}

/// Busy time over pooled operator-minutes in the horizon
pub fn utilization_pct(busy_minutes: f64, horizon_minutes: f64, operators: u32) -> f64 {
    let available = horizon_minutes * operators as f64;
    if available > 0.0 {
        (busy_minutes * 100.0 / available).max(0.0)
    } else {
        0.0
    }
}

pub fn build(
    config: &SimulationConfig,
    metrics: &SimulationMetrics,
    thresholds: &Thresholds,
) -> Vec<StationPerformance> {
    let horizon = config.horizon_minutes();

    let mut users: BTreeMap<&str, StationUsers> = BTreeMap::new();
    for op in &config.operations {
        let label = format!("{}/{} {}", op.product, op.step, op.name);
        let entry = users.entry(op.machine_tool.as_str()).or_default();
        entry
            .avg_times
            .insert(label.clone(), mean(metrics.operation_times(&op.product, op.step)));
        entry.operations.push(label);
        entry.products.insert(op.product.clone());
    }

    config
        .pooled_operators()
        .into_iter()
        .map(|(machine, operators)| {
            let station_users = users.remove(machine).unwrap_or_default();
            let busy = metrics.busy_time(machine);
            let utilization = utilization_pct(busy, horizon, operators);
            let waits = metrics.queue_waits(machine);

            StationPerformance {
                machine_tool: machine.to_string(),
                operations: station_users.operations,
                products: station_users.products.into_iter().collect(),
                operators,
                utilization_pct: utilization,
                busy_minutes: busy,
                pieces_processed: metrics.pieces_processed(machine),
                avg_processing_time: mean(metrics.processing_times(machine)),
                avg_time_by_operation: station_users.avg_times,
                avg_queue_wait: mean(waits),
                max_queue_wait: waits.iter().cloned().fold(0.0, f64::max),
                peak_queue_length: metrics.peak_queue(machine),
                rework_count: metrics.rework_for(machine),
                breakdown_count: metrics.breakdowns_for(machine),
                is_bottleneck: utilization >= thresholds.bottleneck_pct,
                // A single-operator station has nobody to give away
                is_donor: utilization <= thresholds.donor_pct && operators > 1,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Demand, Operation, Schedule};

    fn config() -> SimulationConfig {
        SimulationConfig::new(Schedule::new(1, 8.0, 5), 1)
            .with_operation(Operation::new("A", 1, "Sew", "M", 1.0, 2))
            .with_operation(Operation::new("B", 1, "Sew", "M", 1.0, 2))
            .with_operation(Operation::new("A", 2, "Pack", "T", 1.0, 1))
            .with_demand(Demand::daily("A", 10.0, 5))
            .with_demand(Demand::daily("B", 10.0, 5))
    }

    #[test]
    fn test_pooled_operators_reported() {
        let rows = build(&config(), &SimulationMetrics::new(), &Thresholds::default());
        let m = rows.iter().find(|r| r.machine_tool == "M").unwrap();
        assert_eq!(m.operators, 4);
        assert_eq!(m.products, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(m.operations.len(), 2);
        assert_eq!(m.peak_queue_length, 0);
    }

    #[test]
    fn test_queue_and_operation_times_reported() {
        let mut metrics = SimulationMetrics::new();
        metrics.resource_peak_queue.insert("M".to_string(), 3);
        let mut steps = BTreeMap::new();
        steps.insert(1, vec![1.0, 2.0]);
        metrics.operation_processing_times.insert("A".to_string(), steps);

        let rows = build(&config(), &metrics, &Thresholds::default());
        let m = rows.iter().find(|r| r.machine_tool == "M").unwrap();
        assert_eq!(m.peak_queue_length, 3);
        assert_eq!(m.avg_time_by_operation["A/1 Sew"], 1.5);
        assert_eq!(m.avg_time_by_operation["B/1 Sew"], 0.0);
    }

    #[test]
    fn test_flags() {
        let mut metrics = SimulationMetrics::new();
        // M: 4 operators * 480 min, T: 1 operator * 480 min
        metrics.resource_busy_time.insert("M".to_string(), 192.0);
        metrics.resource_busy_time.insert("T".to_string(), 432.0);
        let rows = build(&config(), &metrics, &Thresholds::default());

        let m = rows.iter().find(|r| r.machine_tool == "M").unwrap();
        assert_eq!(m.utilization_pct, 10.0);
        assert!(m.is_donor);
        assert!(!m.is_bottleneck);

        let t = rows.iter().find(|r| r.machine_tool == "T").unwrap();
        assert_eq!(t.utilization_pct, 90.0);
        assert!(t.is_bottleneck);
        assert!(!t.is_donor);
    }

    #[test]
    fn test_single_operator_is_never_donor() {
        let rows = build(&config(), &SimulationMetrics::new(), &Thresholds::default());
        let t = rows.iter().find(|r| r.machine_tool == "T").unwrap();
        assert_eq!(t.utilization_pct, 0.0);
        assert!(!t.is_donor);
        let m = rows.iter().find(|r| r.machine_tool == "M").unwrap();
        assert!(m.is_donor);
    }

    #[test]
    fn test_zero_capacity_is_zero_utilization() {
        assert_eq!(utilization_pct(100.0, 480.0, 0), 0.0);
    }
}
