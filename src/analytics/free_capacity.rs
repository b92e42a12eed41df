use super::horizon_days;
use super::station::StationPerformance;
use crate::config::SimulationConfig;
use crate::core::metrics::SimulationMetrics;
use serde::{Deserialize, Serialize};

/// Headroom of the line, derived from its most utilized resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeCapacity {
    pub bottleneck: Option<String>,
    pub bottleneck_utilization_pct: f64,
    pub current_daily_throughput: f64,
    /// Daily pieces if the bottleneck ran at 100%
    pub theoretical_max_daily_throughput: f64,
    pub additional_daily_pieces: f64,
    pub free_capacity_pct: f64,
    /// Line hours per day the bottleneck leaves unused
    pub unused_line_hours_per_day: f64,
    /// Idle operator time across all stations, in whole-operator units
    pub idle_operator_equivalents: f64,
    pub total_operators: u32,
}

pub fn build(
    config: &SimulationConfig,
    metrics: &SimulationMetrics,
    stations: &[StationPerformance],
) -> FreeCapacity {
    let current = metrics.total_throughput() as f64 / horizon_days(config);
    let bottleneck = stations
        .iter()
        .max_by(|a, b| a.utilization_pct.total_cmp(&b.utilization_pct));

    let (name, utilization) = match bottleneck {
        Some(station) if station.utilization_pct > 0.0 => {
            (Some(station.machine_tool.clone()), station.utilization_pct)
        }
        _ => (None, 0.0),
    };

    let theoretical_max = if utilization > 0.0 {
        current * 100.0 / utilization.min(100.0)
    } else {
        0.0
    };
    let free_pct = (100.0 - utilization).max(0.0);

    let idle_operator_equivalents = stations
        .iter()
        .map(|s| s.operators as f64 * (1.0 - s.utilization_pct / 100.0).max(0.0))
        .sum();

    FreeCapacity {
        bottleneck: name,
        bottleneck_utilization_pct: utilization,
        current_daily_throughput: current,
        theoretical_max_daily_throughput: theoretical_max,
        additional_daily_pieces: (theoretical_max - current).max(0.0),
        free_capacity_pct: free_pct,
        unused_line_hours_per_day: config.schedule.daily_planned_hours() * free_pct / 100.0,
        idle_operator_equivalents,
        total_operators: stations.iter().map(|s| s.operators).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{station, Thresholds};
    use crate::config::{Demand, Operation, Schedule};

    #[test]
    fn test_headroom_from_bottleneck() {
        let config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 1)
            .with_operation(Operation::new("P", 1, "Cut", "C", 1.0, 2))
            .with_operation(Operation::new("P", 2, "Sew", "M", 1.0, 1))
            .with_demand(Demand::daily("P", 200.0, 10));
        let mut metrics = SimulationMetrics::new();
        metrics.throughput_by_product.insert("P".to_string(), 160);
        metrics.resource_busy_time.insert("C".to_string(), 240.0);
        metrics.resource_busy_time.insert("M".to_string(), 384.0);

        let stations = station::build(&config, &metrics, &Thresholds::default());
        let free = build(&config, &metrics, &stations);

        assert_eq!(free.bottleneck.as_deref(), Some("M"));
        assert!((free.bottleneck_utilization_pct - 80.0).abs() < 1e-9);
        assert!((free.theoretical_max_daily_throughput - 200.0).abs() < 1e-9);
        assert!((free.additional_daily_pieces - 40.0).abs() < 1e-9);
        assert!((free.unused_line_hours_per_day - 1.6).abs() < 1e-9);
        // C: 2 * 0.75, M: 1 * 0.2
        assert!((free.idle_operator_equivalents - 1.7).abs() < 1e-9);
        assert_eq!(free.total_operators, 3);
    }

    #[test]
    fn test_idle_line_has_no_bottleneck() {
        let config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 1)
            .with_operation(Operation::new("P", 1, "Cut", "C", 1.0, 1))
            .with_demand(Demand::daily("P", 0.0, 10));
        let metrics = SimulationMetrics::new();
        let stations = station::build(&config, &metrics, &Thresholds::default());
        let free = build(&config, &metrics, &stations);
        assert_eq!(free.bottleneck, None);
        assert_eq!(free.theoretical_max_daily_throughput, 0.0);
        assert_eq!(free.free_capacity_pct, 100.0);
    }
}
