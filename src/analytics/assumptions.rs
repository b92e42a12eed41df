use super::Thresholds;
use crate::config::{Breakdown, DemandMode, DemandQuantity, Schedule, SimulationConfig};
use crate::core::execution::config::ExecutionConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEcho {
    pub schedule: Schedule,
    pub enabled_shifts: usize,
    pub daily_planned_hours: f64,
    pub weekly_total_hours: f64,
    pub horizon_days: u32,
    pub horizon_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandEcho {
    pub product: String,
    pub input: String,
    pub daily_pieces: f64,
    pub weekly_pieces: f64,
    pub horizon_pieces: f64,
    pub bundle_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDefault {
    pub name: String,
    pub value: String,
}

impl AppliedDefault {
    fn new(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Echo of every input and modeling rule behind a run, for audit only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionLog {
    pub schedule: ScheduleEcho,
    pub demand_mode: String,
    pub demands: Vec<DemandEcho>,
    pub breakdowns: Vec<Breakdown>,
    pub defaults: Vec<AppliedDefault>,
    pub formulas: Vec<String>,
    pub limitations: Vec<String>,
}

/// Echo the inputs, defaults and formulas behind a result set
///
/// `seed` is the seed the run actually used; `None` is echoed as "unknown".
pub fn build(
    config: &SimulationConfig,
    thresholds: &Thresholds,
    execution: &ExecutionConfig,
    seed: Option<u64>,
) -> AssumptionLog {
    let schedule = &config.schedule;
    let demand_mode = match &config.mode {
        DemandMode::DemandDriven => "demand-driven".to_string(),
        DemandMode::MixDriven { total_demand } => {
            format!("mix-driven (total {} pieces/day)", total_demand)
        }
    };

    let demands = config
        .demands
        .iter()
        .map(|d| DemandEcho {
            product: d.product.clone(),
            input: match d.quantity {
                DemandQuantity::Daily(v) => format!("{} pieces/day", v),
                DemandQuantity::Weekly(v) => format!("{} pieces/week", v),
                DemandQuantity::MixShare(v) => format!("{}% of mix", v),
            },
            daily_pieces: d.daily_pieces(&config.mode, schedule.work_days),
            weekly_pieces: d.weekly_pieces(&config.mode, schedule.work_days),
            horizon_pieces: d.daily_pieces(&config.mode, schedule.work_days)
                * config.horizon_days as f64,
            bundle_size: d.bundle_size,
        })
        .collect();

    let seed = seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let defaults = vec![
        AppliedDefault::new("seed", seed),
        AppliedDefault::new("wip_sample_interval_min", execution.wip_sample_interval),
        AppliedDefault::new("small_bundle_threshold_pieces", execution.small_bundle_threshold),
        AppliedDefault::new("short_transition_sec", execution.short_transition_secs),
        AppliedDefault::new("long_transition_sec", execution.long_transition_secs),
        AppliedDefault::new("triangular_spread", execution.variability_spread),
        AppliedDefault::new("min_process_time_min", execution.min_process_time),
        AppliedDefault::new("arrival_spread", execution.arrival_spread),
        AppliedDefault::new("coverage_ok_pct", thresholds.coverage_ok_pct),
        AppliedDefault::new("coverage_tight_pct", thresholds.coverage_tight_pct),
        AppliedDefault::new("bottleneck_utilization_pct", thresholds.bottleneck_pct),
        AppliedDefault::new("donor_utilization_pct", thresholds.donor_pct),
        AppliedDefault::new("missing_grade_pct", 100),
        AppliedDefault::new("missing_rework_pct", 0),
        AppliedDefault::new("missing_fpd_pct", 0),
        AppliedDefault::new("missing_variability", "deterministic"),
    ];

    AssumptionLog {
        schedule: ScheduleEcho {
            schedule: schedule.clone(),
            enabled_shifts: schedule.enabled_shifts(),
            daily_planned_hours: schedule.daily_planned_hours(),
            weekly_total_hours: schedule.weekly_total_hours(),
            horizon_days: config.horizon_days,
            horizon_minutes: config.horizon_minutes(),
        },
        demand_mode,
        demands,
        breakdowns: config.breakdowns.clone(),
        defaults,
        formulas: formulas(),
        limitations: limitations(),
    }
}

fn formulas() -> Vec<String> {
    [
        "horizon_minutes = daily_planned_hours * 60 * horizon_days",
        "bundles = ceil(daily_demand * horizon_days / bundle_size)",
        "arrival_offset = bundle_index * (horizon_minutes / bundles) * arrival_spread",
        "process_time = max(min_process_time, sam * (1 + variability + fpd_pct/100 + (100 - grade_pct)/100))",
        "variability = 0 (deterministic) or triangular(-spread, +spread, mode 0)",
        "rework: with probability rework_pct/100 a piece is processed once more on the same resource",
        "breakdown: with probability breakdown_pct/100 per grant the resource is held for delay_minutes",
        "utilization_pct = busy_minutes / (horizon_minutes * pooled_operators) * 100",
        "coverage_pct = capacity / demand * 100",
        "weekly_capacity = throughput / horizon_days * work_days",
        "projected_utilization = utilization * old_operators / new_operators",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn limitations() -> Vec<String> {
    [
        "Bundles still in flight at the horizon contribute no throughput or cycle time",
        "Overtime hours are reported but not simulated",
        "Operators of a pooled resource are interchangeable across products",
        "Resources are granted strictly first come, first served with no priorities",
        "Breakdown repair time holds the resource but is not counted as busy time",
        "Rework is a single in-station pass and never re-enters the queue",
        "Projected utilization assumes the workload on a resource stays unchanged",
        "Products with operations but no demand are not simulated",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Demand, Operation};

    #[test]
    fn test_echoes_inputs() {
        let config = SimulationConfig::new(Schedule::new(2, 8.0, 5).with_overtime(2.0, 2), 3)
            .with_operation(Operation::new("P", 1, "Sew", "M", 1.0, 1))
            .with_demand(Demand::weekly("P", 1000.0, 10))
            .with_breakdown(Breakdown::new("M", 2.0, 15.0));
        let log = build(&config, &Thresholds::default(), &ExecutionConfig::new(), Some(11));

        assert_eq!(log.schedule.daily_planned_hours, 16.0);
        assert_eq!(log.schedule.weekly_total_hours, 84.0);
        assert_eq!(log.schedule.horizon_minutes, 2880.0);
        assert_eq!(log.demand_mode, "demand-driven");
        assert_eq!(log.demands[0].daily_pieces, 200.0);
        assert_eq!(log.demands[0].horizon_pieces, 600.0);
        assert_eq!(log.breakdowns.len(), 1);
        assert!(log.defaults.iter().any(|d| d.name == "seed" && d.value == "11"));
        assert!(!log.formulas.is_empty());
        assert!(!log.limitations.is_empty());
    }

    #[test]
    fn test_missing_seed_is_unknown() {
        let config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 1);
        let log = build(&config, &Thresholds::default(), &ExecutionConfig::new(), None);
        assert!(log.defaults.iter().any(|d| d.name == "seed" && d.value == "unknown"));
    }
}
