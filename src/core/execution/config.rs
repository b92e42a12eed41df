//! Run parameters for the simulator.
//!
//! These are the model constants that are not part of the line
//! configuration itself: the random seed, transition delays, variability
//! spread and sampling cadence.

use crate::core::process_time::MIN_PROCESS_TIME;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Seed for the run's PRNG; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Minutes between WIP snapshots
    pub wip_sample_interval: f64,
    /// Bundles up to this many pieces use the short transition
    pub small_bundle_threshold: u32,
    pub short_transition_secs: f64,
    pub long_transition_secs: f64,
    /// Half-width of the triangular variability factor
    pub variability_spread: f64,
    pub min_process_time: f64,
    /// Fraction of the per-bundle interval used to stagger arrivals
    pub arrival_spread: f64,
}

impl ExecutionConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            seed: None,
            wip_sample_interval: 30.0,
            small_bundle_threshold: 10,
            short_transition_secs: 5.0,
            long_transition_secs: 10.0,
            variability_spread: 0.10,
            min_process_time: MIN_PROCESS_TIME,
            arrival_spread: 0.10,
        }
    }

    /// Set the PRNG seed
    ///
    /// # Arguments
    /// * `seed` - Seed value; identical seeds give identical runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_optional_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the WIP sampling interval in minutes
    pub fn with_wip_sample_interval(mut self, minutes: f64) -> Self {
        self.wip_sample_interval = minutes;
        self
    }

    /// Set the triangular variability half-width
    pub fn with_variability_spread(mut self, spread: f64) -> Self {
        self.variability_spread = spread;
        self
    }

    /// Set the short and long transition delays in seconds
    pub fn with_transitions(mut self, short_secs: f64, long_secs: f64) -> Self {
        self.short_transition_secs = short_secs;
        self.long_transition_secs = long_secs;
        self
    }

    /// Set the fraction of the per-bundle interval used to stagger arrivals
    pub fn with_arrival_spread(mut self, spread: f64) -> Self {
        self.arrival_spread = spread;
        self
    }

    /// Transition delay in minutes for a bundle of `bundle_size` pieces
    pub fn transition_minutes(&self, bundle_size: u32) -> f64 {
        let secs = if bundle_size <= self.small_bundle_threshold {
            self.short_transition_secs
        } else {
            self.long_transition_secs
        };
        secs / 60.0
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExecutionConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.wip_sample_interval, 30.0);
        assert_eq!(config.arrival_spread, 0.10);
    }

    #[test]
    fn test_config_builder() {
        let config = ExecutionConfig::new()
            .with_seed(7)
            .with_wip_sample_interval(15.0)
            .with_transitions(6.0, 12.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.wip_sample_interval, 15.0);
        assert_eq!(config.transition_minutes(10), 0.1);
        assert_eq!(config.transition_minutes(11), 0.2);
    }
}
