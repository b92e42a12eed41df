//! Line configuration supplied by the caller.
//!
//! The config is the aggregate root of a run: every operation, the schedule,
//! per-product demand, optional breakdown rules and the horizon. It is never
//! mutated once a simulation starts.

pub mod breakdown;
pub mod demand;
pub mod operation;
pub mod schedule;

pub use breakdown::Breakdown;
pub use demand::{Demand, DemandMode, DemandQuantity};
pub use operation::{Operation, Variability};
pub use schedule::{Overtime, Schedule, Shift};

use crate::error::LineSimError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub operations: Vec<Operation>,
    pub schedule: Schedule,
    pub demands: Vec<Demand>,
    #[serde(default)]
    pub breakdowns: Vec<Breakdown>,
    #[serde(default)]
    pub mode: DemandMode,
    pub horizon_days: u32,
}

impl SimulationConfig {
    /// Create an empty demand-driven config over `horizon_days`
    pub fn new(schedule: Schedule, horizon_days: u32) -> Self {
        Self {
            operations: Vec::new(),
            schedule,
            demands: Vec::new(),
            breakdowns: Vec::new(),
            mode: DemandMode::DemandDriven,
            horizon_days,
        }
    }

    pub fn with_mode(mut self, mode: DemandMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_demand(mut self, demand: Demand) -> Self {
        self.demands.push(demand);
        self
    }

    pub fn with_breakdown(mut self, breakdown: Breakdown) -> Self {
        self.breakdowns.push(breakdown);
        self
    }

    /// Parse a config from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, LineSimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LineSimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LineSimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Simulated minutes in the run
    pub fn horizon_minutes(&self) -> f64 {
        self.schedule.horizon_minutes(self.horizon_days)
    }

    /// Products that own at least one operation, sorted
    pub fn products_with_operations(&self) -> BTreeSet<&str> {
        self.operations.iter().map(|op| op.product.as_str()).collect()
    }

    /// Products that carry demand, sorted
    pub fn products_with_demand(&self) -> BTreeSet<&str> {
        self.demands.iter().map(|d| d.product.as_str()).collect()
    }

    /// Operations of `product` in step order
    pub fn routing(&self, product: &str) -> Vec<&Operation> {
        let mut ops: Vec<&Operation> = self
            .operations
            .iter()
            .filter(|op| op.product == product)
            .collect();
        ops.sort_by_key(|op| op.step);
        ops
    }

    /// First demand entry for `product`
    pub fn demand_for(&self, product: &str) -> Option<&Demand> {
        self.demands.iter().find(|d| d.product == product)
    }

    /// Pieces per working day for `product`, zero when it has no demand
    pub fn daily_demand_for(&self, product: &str) -> f64 {
        self.demand_for(product)
            .map(|d| d.daily_pieces(&self.mode, self.schedule.work_days))
            .unwrap_or(0.0)
    }

    /// Pieces per week for `product`, zero when it has no demand
    pub fn weekly_demand_for(&self, product: &str) -> f64 {
        self.demand_for(product)
            .map(|d| d.weekly_pieces(&self.mode, self.schedule.work_days))
            .unwrap_or(0.0)
    }

    /// Pieces `product` must produce over the whole horizon
    pub fn horizon_pieces_for(&self, product: &str) -> f64 {
        self.daily_demand_for(product) * self.horizon_days as f64
    }

    /// Pooled operator capacity per machine/tool key
    ///
    /// Operators are summed across every operation naming the key, including
    /// operations of different products.
    pub fn pooled_operators(&self) -> BTreeMap<&str, u32> {
        let mut pools: BTreeMap<&str, u32> = BTreeMap::new();
        for op in &self.operations {
            *pools.entry(op.machine_tool.as_str()).or_insert(0) += op.operators;
        }
        pools
    }

    /// Breakdown rule for `machine_tool`, first match wins
    pub fn breakdown_for(&self, machine_tool: &str) -> Option<&Breakdown> {
        self.breakdowns.iter().find(|b| b.machine_tool == machine_tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_product_config() -> SimulationConfig {
        SimulationConfig::new(Schedule::new(1, 8.0, 5), 2)
            .with_operation(Operation::new("A", 2, "Sew", "M", 1.0, 2))
            .with_operation(Operation::new("A", 1, "Cut", "C", 1.0, 1))
            .with_operation(Operation::new("B", 1, "Sew", "M", 1.0, 3))
            .with_demand(Demand::daily("A", 100.0, 10))
            .with_demand(Demand::weekly("B", 250.0, 5))
    }

    #[test]
    fn test_pooled_operators_span_products() {
        let config = two_product_config();
        let pools = config.pooled_operators();
        assert_eq!(pools.get("M"), Some(&5));
        assert_eq!(pools.get("C"), Some(&1));
    }

    #[test]
    fn test_routing_sorted_by_step() {
        let config = two_product_config();
        let steps: Vec<u32> = config.routing("A").iter().map(|op| op.step).collect();
        assert_eq!(steps, vec![1, 2]);
    }

    #[test]
    fn test_demand_helpers() {
        let config = two_product_config();
        assert_eq!(config.daily_demand_for("A"), 100.0);
        assert_eq!(config.daily_demand_for("B"), 50.0);
        assert_eq!(config.horizon_pieces_for("A"), 200.0);
        assert_eq!(config.daily_demand_for("missing"), 0.0);
        assert_eq!(config.horizon_minutes(), 960.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = two_product_config();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = SimulationConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = SimulationConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, LineSimError::Parse(_)));
    }
}
