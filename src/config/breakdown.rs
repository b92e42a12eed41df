use serde::{Deserialize, Serialize};

/// Random equipment failure rule for one machine/tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub machine_tool: String,
    /// Chance (percent) that a resource grant triggers a breakdown
    pub probability_pct: f64,
    /// Minutes the resource stays held while repaired
    pub delay_minutes: f64,
}

impl Breakdown {
    pub fn new(machine_tool: &str, probability_pct: f64, delay_minutes: f64) -> Self {
        Self {
            machine_tool: machine_tool.to_string(),
            probability_pct,
            delay_minutes,
        }
    }
}
