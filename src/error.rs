//! Error types for line-sim.
//!
//! Configuration problems are reported through a `ValidationReport`, not as
//! errors. The variants here cover the outer surfaces: loading a config and
//! the guarded pipeline refusing to run.

use thiserror::Error;

use crate::validation::ValidationReport;

#[derive(Debug, Error)]
pub enum LineSimError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config rejected with {errors} validation error(s)")]
    ValidationFailed {
        errors: usize,
        report: Box<ValidationReport>,
    },
}
