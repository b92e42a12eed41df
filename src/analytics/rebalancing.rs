use super::station::StationPerformance;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebalanceAction {
    AddOperator,
    RemoveOperator,
}

/// A proposed one-operator move at a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingSuggestion {
    pub machine_tool: String,
    pub action: RebalanceAction,
    pub current_operators: u32,
    pub suggested_operators: u32,
    pub current_utilization_pct: f64,
    pub projected_utilization_pct: f64,
    /// The resource on the other side of the move, if any
    pub paired_with: Option<String>,
    pub reason: String,
}

/// Utilization after changing the operator count, same workload assumed
pub fn projected_utilization(utilization_pct: f64, old_operators: u32, new_operators: u32) -> f64 {
    if new_operators == 0 {
        return 0.0;
    }
    utilization_pct * old_operators as f64 / new_operators as f64
}

/// Pair bottlenecks with donors by rank and propose one-operator moves
///
/// Bottlenecks are taken hottest first, donors coolest first. Each
/// bottleneck gets +1 operator; its paired donor, if it still has more
/// than one operator, gets -1.
pub fn build(stations: &[StationPerformance]) -> Vec<RebalancingSuggestion> {
    let mut bottlenecks: Vec<&StationPerformance> =
        stations.iter().filter(|s| s.is_bottleneck).collect();
    bottlenecks.sort_by(|a, b| b.utilization_pct.total_cmp(&a.utilization_pct));

    let mut donors: Vec<&StationPerformance> = stations.iter().filter(|s| s.is_donor).collect();
    donors.sort_by(|a, b| a.utilization_pct.total_cmp(&b.utilization_pct));

    let mut suggestions = Vec::new();
    for (rank, bottleneck) in bottlenecks.iter().enumerate() {
        let donor = donors.get(rank).filter(|d| d.operators > 1);

        let added = bottleneck.operators + 1;
        let projected =
            projected_utilization(bottleneck.utilization_pct, bottleneck.operators, added);
        suggestions.push(RebalancingSuggestion {
            machine_tool: bottleneck.machine_tool.clone(),
            action: RebalanceAction::AddOperator,
            current_operators: bottleneck.operators,
            suggested_operators: added,
            current_utilization_pct: bottleneck.utilization_pct,
            projected_utilization_pct: projected,
            paired_with: donor.map(|d| d.machine_tool.clone()),
            reason: format!(
                "Bottleneck at {:.1}% utilization; one more operator brings it to {:.1}%",
                bottleneck.utilization_pct, projected
            ),
        });

        if let Some(donor) = donor {
            let removed = donor.operators - 1;
            let projected = projected_utilization(donor.utilization_pct, donor.operators, removed);
            suggestions.push(RebalancingSuggestion {
                machine_tool: donor.machine_tool.clone(),
                action: RebalanceAction::RemoveOperator,
                current_operators: donor.operators,
                suggested_operators: removed,
                current_utilization_pct: donor.utilization_pct,
                projected_utilization_pct: projected,
                paired_with: Some(bottleneck.machine_tool.clone()),
                reason: format!(
                    "Underused at {:.1}%; moving one operator to '{}' raises it to {:.1}%",
                    donor.utilization_pct, bottleneck.machine_tool, projected
                ),
            });
        }
    }
    suggestions
}
