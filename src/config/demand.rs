use serde::{Deserialize, Serialize};

/// How product demand is expressed across the whole config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DemandMode {
    /// Every product carries its own daily or weekly figure
    DemandDriven,
    /// Products carry a share of one daily total
    MixDriven { total_demand: f64 },
}

impl Default for DemandMode {
    fn default() -> Self {
        DemandMode::DemandDriven
    }
}

/// Demand figure for one product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandQuantity {
    /// Pieces per working day
    Daily(f64),
    /// Pieces per week, spread over the schedule's work days
    Weekly(f64),
    /// Percentage of the mix-driven total
    MixShare(f64),
}

/// Demand for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub product: String,
    pub quantity: DemandQuantity,
    /// Pieces moved together as one bundle
    pub bundle_size: u32,
}

impl Demand {
    pub fn daily(product: &str, pieces: f64, bundle_size: u32) -> Self {
        Self {
            product: product.to_string(),
            quantity: DemandQuantity::Daily(pieces),
            bundle_size,
        }
    }

    pub fn weekly(product: &str, pieces: f64, bundle_size: u32) -> Self {
        Self {
            product: product.to_string(),
            quantity: DemandQuantity::Weekly(pieces),
            bundle_size,
        }
    }

    pub fn mix_share(product: &str, pct: f64, bundle_size: u32) -> Self {
        Self {
            product: product.to_string(),
            quantity: DemandQuantity::MixShare(pct),
            bundle_size,
        }
    }

    /// Pieces per working day under the given mode
    ///
    /// A quantity that does not belong to `mode` yields zero; the validator
    /// reports that mismatch as an error.
    pub fn daily_pieces(&self, mode: &DemandMode, work_days: u32) -> f64 {
        match (mode, self.quantity) {
            (DemandMode::DemandDriven, DemandQuantity::Daily(d)) => d,
            (DemandMode::DemandDriven, DemandQuantity::Weekly(w)) => {
                if work_days == 0 {
                    0.0
                } else {
                    w / work_days as f64
                }
            }
            (DemandMode::MixDriven { total_demand }, DemandQuantity::MixShare(pct)) => {
                total_demand * pct / 100.0
            }
            _ => 0.0,
        }
    }

    /// Pieces per week under the given mode
    pub fn weekly_pieces(&self, mode: &DemandMode, work_days: u32) -> f64 {
        match (mode, self.quantity) {
            (DemandMode::DemandDriven, DemandQuantity::Weekly(w)) => w,
            _ => self.daily_pieces(mode, work_days) * work_days as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_demand_prorated_by_work_days() {
        let demand = Demand::weekly("P", 1000.0, 10);
        assert_eq!(demand.daily_pieces(&DemandMode::DemandDriven, 5), 200.0);
        assert_eq!(demand.weekly_pieces(&DemandMode::DemandDriven, 5), 1000.0);
    }

    #[test]
    fn test_mix_share_of_total() {
        let mode = DemandMode::MixDriven { total_demand: 500.0 };
        let demand = Demand::mix_share("P", 60.0, 10);
        assert_eq!(demand.daily_pieces(&mode, 5), 300.0);
        assert_eq!(demand.weekly_pieces(&mode, 5), 1500.0);
    }

    #[test]
    fn test_quantity_outside_mode_is_zero() {
        let demand = Demand::daily("P", 100.0, 10);
        let mode = DemandMode::MixDriven { total_demand: 500.0 };
        assert_eq!(demand.daily_pieces(&mode, 5), 0.0);
    }

    #[test]
    fn test_tagged_json_shapes() {
        let mode: DemandMode =
            serde_json::from_str(r#"{"type":"mix_driven","total_demand":500.0}"#).unwrap();
        assert_eq!(mode, DemandMode::MixDriven { total_demand: 500.0 });
        let demand: Demand =
            serde_json::from_str(r#"{"product":"P","quantity":{"daily":200.0},"bundle_size":10}"#)
                .unwrap();
        assert_eq!(demand.quantity, DemandQuantity::Daily(200.0));
    }
}
