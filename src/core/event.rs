use super::types::BundleId;

/// Which side of an operation a transition delay sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Moving into the station before requesting its resource
    Entry,
    /// Moving out of the station after releasing its resource
    Exit,
}

/// Something that happens at a point in virtual time
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A bundle enters the line at its staggered start offset
    BundleArrival { bundle: BundleId },
    /// A transition delay has elapsed
    TransitionComplete { bundle: BundleId, kind: TransitionKind },
    /// The resource held by a bundle is repaired
    BreakdownCleared { bundle: BundleId },
    /// One piece (or its rework pass) finished on the held resource
    PieceComplete { bundle: BundleId, minutes: f64, rework: bool },
    /// Periodic WIP snapshot
    SampleWip,
}

impl Event {
    /// Bundle the event belongs to, if any
    pub fn bundle(&self) -> Option<BundleId> {
        match self {
            Event::BundleArrival { bundle }
            | Event::TransitionComplete { bundle, .. }
            | Event::BreakdownCleared { bundle }
            | Event::PieceComplete { bundle, .. } => Some(*bundle),
            Event::SampleWip => None,
        }
    }
}
