use line_sim::config::{Demand, Operation, Schedule};
use line_sim::validation::IssueKind;
use line_sim::{simulate, ExecutionConfig, LineSimError, SimulationConfig};

fn config() -> SimulationConfig {
    SimulationConfig::new(Schedule::new(2, 8.0, 5), 2)
        .with_operation(Operation::new("P", 1, "Cut", "cutter", 1.0, 2))
        .with_operation(Operation::new("P", 2, "Sew", "lockstitch", 2.0, 3))
        .with_demand(Demand::daily("P", 300.0, 20))
}

#[test]
fn simulate_refuses_invalid_config() {
    let config = config().with_operation(Operation::new("P", 4, "Press", "press", 1.0, 1));
    match simulate(&config, ExecutionConfig::new().with_seed(1)) {
        Err(LineSimError::ValidationFailed { errors, report }) => {
            assert_eq!(errors, 1);
            assert!(report.has_issue(IssueKind::StepGap));
        }
        other => panic!("expected validation failure, got {:?}", other.map(|r| r.seed)),
    }
}

#[test]
fn simulate_reports_seed_and_validation() {
    let results = simulate(&config(), ExecutionConfig::new().with_seed(17)).unwrap();
    assert_eq!(results.seed, Some(17));
    assert!(results.validation.can_proceed);
    assert_eq!(results.validation.errors, 0);
    assert_eq!(results.assumptions.schedule.horizon_minutes, 1920.0);
    assert!(results.daily_summary.daily_throughput > 0.0);
}

#[test]
fn unseeded_simulate_records_drawn_seed() {
    let results = simulate(&config(), ExecutionConfig::new()).unwrap();
    let seed = results.seed.expect("seed is always reported");
    let replay = simulate(&config(), ExecutionConfig::new().with_seed(seed)).unwrap();
    assert_eq!(results.product_summary, replay.product_summary);
    assert_eq!(results.station_performance, replay.station_performance);
}

#[test]
fn config_loads_from_json_and_results_serialize() {
    let json = r#"{
        "operations": [
            {"product": "P", "step": 1, "name": "Cut", "machine_tool": "cutter", "sam": 1.0, "operators": 1},
            {"product": "P", "step": 2, "name": "Sew", "machine_tool": "lockstitch", "sam": 2.0,
             "operators": 2, "variability": "triangular", "rework_pct": 5.0, "grade_pct": 90.0}
        ],
        "schedule": {"shifts": [{"hours": 8.0}], "work_days": 5},
        "demands": [{"product": "P", "quantity": {"daily": 150.0}, "bundle_size": 10}],
        "breakdowns": [{"machine_tool": "lockstitch", "probability_pct": 5.0, "delay_minutes": 12.0}],
        "mode": {"type": "demand_driven"},
        "horizon_days": 1
    }"#;
    let config = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(config.operations[1].grade_pct, 90.0);
    assert_eq!(config.operations[0].grade_pct, 100.0);

    let results = simulate(&config, ExecutionConfig::new().with_seed(3)).unwrap();
    let value = serde_json::to_value(&results).unwrap();
    assert!(value["station_performance"].is_array());
    assert_eq!(value["weekly_capacity"][0]["product"], "P");
    assert!(value["assumptions"]["formulas"].is_array());
}

#[test]
fn missing_file_is_io_error() {
    let err = SimulationConfig::from_json_file("/nonexistent/line.json").unwrap_err();
    assert!(matches!(err, LineSimError::Io { .. }));
}
