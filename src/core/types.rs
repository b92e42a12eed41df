use serde::{Deserialize, Serialize};

/// Virtual clock value in minutes since the start of the run
pub type SimTime = f64;

/// Identifier of a bundle within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BundleId(pub(crate) usize);

impl BundleId {
    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BundleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bundle-{}", self.0)
    }
}
