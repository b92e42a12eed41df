use super::event::TransitionKind;
use super::types::{BundleId, SimTime};

/// Where a bundle is in its routing
///
/// Every suspension point of a bundle's flow is an explicit stage; the
/// simulator moves a bundle between stages as its events fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BundleStage {
    /// Created, waiting for its start offset
    Scheduled,
    AwaitingTransition { kind: TransitionKind, until: SimTime },
    /// Queued for the current operation's resource
    AwaitingResource { requested_at: SimTime },
    /// Holding the resource while it is repaired
    BrokenDown { until: SimTime },
    /// Holding the resource, working on `piece` (0-based)
    Processing { piece: u32, rework: bool },
    Completed,
}

/// A batch of pieces of one product flowing through the line as a unit
#[derive(Debug, Clone)]
pub struct Bundle {
    pub id: BundleId,
    pub product: String,
    pub pieces: u32,
    pub created_at: SimTime,
    /// Index into the product routing
    pub step_index: usize,
    pub stage: BundleStage,
}

impl Bundle {
    pub fn new(id: BundleId, product: &str, pieces: u32, created_at: SimTime) -> Self {
        Self {
            id,
            product: product.to_string(),
            pieces,
            created_at,
            step_index: 0,
            stage: BundleStage::Scheduled,
        }
    }

    /// Whether the bundle counts towards WIP
    pub fn in_system(&self) -> bool {
        !matches!(self.stage, BundleStage::Scheduled | BundleStage::Completed)
    }
}
