use super::types::SimTime;
use crate::config::Operation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time WIP snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WipSample {
    pub time: SimTime,
    /// Pieces inside the line
    pub pieces: u64,
    /// Bundles inside the line
    pub bundles: u64,
}

/// Raw measurements of one simulation run
///
/// Written only by the simulator while events fire and read-only afterwards.
/// Fields hold raw samples and counters; derived figures are computed by the
/// analytics blocks. Maps start empty and the accessors read a missing key
/// as zero or an empty slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Seed of the run that produced these metrics
    pub seed: Option<u64>,
    /// Completed pieces per product
    pub throughput_by_product: BTreeMap<String, u64>,
    pub bundles_generated_by_product: BTreeMap<String, u64>,
    pub bundles_completed: u64,
    pub bundles_completed_by_product: BTreeMap<String, u64>,
    /// Minutes from bundle arrival to completion
    pub cycle_times: Vec<f64>,
    pub cycle_times_by_product: BTreeMap<String, Vec<f64>>,
    /// Minutes of processing (including rework) per resource
    pub resource_busy_time: BTreeMap<String, f64>,
    pub resource_pieces_processed: BTreeMap<String, u64>,
    /// Individual processing draws per resource, rework passes included
    pub resource_processing_times: BTreeMap<String, Vec<f64>>,
    /// Processing draws per product and routing step
    pub operation_processing_times: BTreeMap<String, BTreeMap<u32, Vec<f64>>>,
    pub resource_queue_waits: BTreeMap<String, Vec<f64>>,
    /// Longest wait queue seen per resource
    pub resource_peak_queue: BTreeMap<String, u64>,
    pub wip_samples: Vec<WipSample>,
    /// Bundles in system per product, aligned with `wip_samples`
    pub product_wip_samples: BTreeMap<String, Vec<u64>>,
    pub rework_count: u64,
    pub rework_by_resource: BTreeMap<String, u64>,
    pub breakdown_count: u64,
    pub breakdowns_by_resource: BTreeMap<String, u64>,
    pub breakdown_minutes_by_resource: BTreeMap<String, f64>,
}

impl SimulationMetrics {
    /// Create empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_bundles_generated(&mut self, product: &str, count: u64) {
        *self
            .bundles_generated_by_product
            .entry(product.to_string())
            .or_insert(0) += count;
    }

    pub(crate) fn record_queue_wait(&mut self, resource: &str, minutes: f64) {
        self.resource_queue_waits
            .entry(resource.to_string())
            .or_default()
            .push(minutes);
    }

    pub(crate) fn record_breakdown(&mut self, resource: &str, minutes: f64) {
        self.breakdown_count += 1;
        *self.breakdowns_by_resource.entry(resource.to_string()).or_insert(0) += 1;
        *self
            .breakdown_minutes_by_resource
            .entry(resource.to_string())
            .or_insert(0.0) += minutes;
    }

    pub(crate) fn record_queue_length(&mut self, resource: &str, len: usize) {
        let peak = self.resource_peak_queue.entry(resource.to_string()).or_insert(0);
        *peak = (*peak).max(len as u64);
    }

    /// Account one processing draw; rework passes add time but not pieces
    pub(crate) fn record_processing(&mut self, op: &Operation, minutes: f64, rework: bool) {
        self.operation_processing_times
            .entry(op.product.clone())
            .or_default()
            .entry(op.step)
            .or_default()
            .push(minutes);

        let resource = op.machine_tool.as_str();
        *self.resource_busy_time.entry(resource.to_string()).or_insert(0.0) += minutes;
        self.resource_processing_times
            .entry(resource.to_string())
            .or_default()
            .push(minutes);
        if rework {
            self.rework_count += 1;
            *self.rework_by_resource.entry(resource.to_string()).or_insert(0) += 1;
        } else {
            *self
                .resource_pieces_processed
                .entry(resource.to_string())
                .or_insert(0) += 1;
        }
    }

    pub(crate) fn record_completion(&mut self, product: &str, pieces: u32, cycle_time: f64) {
        *self.throughput_by_product.entry(product.to_string()).or_insert(0) += pieces as u64;
        self.bundles_completed += 1;
        *self
            .bundles_completed_by_product
            .entry(product.to_string())
            .or_insert(0) += 1;
        self.cycle_times.push(cycle_time);
        self.cycle_times_by_product
            .entry(product.to_string())
            .or_default()
            .push(cycle_time);
    }

    pub(crate) fn record_wip_sample<'a>(
        &mut self,
        sample: WipSample,
        per_product: impl IntoIterator<Item = (&'a String, &'a u64)>,
    ) {
        self.wip_samples.push(sample);
        for (product, bundles) in per_product {
            self.product_wip_samples
                .entry(product.clone())
                .or_default()
                .push(*bundles);
        }
    }

    pub fn throughput(&self, product: &str) -> u64 {
        self.throughput_by_product.get(product).copied().unwrap_or(0)
    }

    /// Completed pieces across all products
    pub fn total_throughput(&self) -> u64 {
        self.throughput_by_product.values().sum()
    }

    pub fn bundles_generated(&self, product: &str) -> u64 {
        self.bundles_generated_by_product.get(product).copied().unwrap_or(0)
    }

    pub fn bundles_completed_for(&self, product: &str) -> u64 {
        self.bundles_completed_by_product.get(product).copied().unwrap_or(0)
    }

    pub fn cycle_times_for(&self, product: &str) -> &[f64] {
        self.cycle_times_by_product
            .get(product)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn busy_time(&self, resource: &str) -> f64 {
        self.resource_busy_time.get(resource).copied().unwrap_or(0.0)
    }

    pub fn pieces_processed(&self, resource: &str) -> u64 {
        self.resource_pieces_processed.get(resource).copied().unwrap_or(0)
    }

    pub fn processing_times(&self, resource: &str) -> &[f64] {
        self.resource_processing_times
            .get(resource)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn operation_times(&self, product: &str, step: u32) -> &[f64] {
        self.operation_processing_times
            .get(product)
            .and_then(|steps| steps.get(&step))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn peak_queue(&self, resource: &str) -> u64 {
        self.resource_peak_queue.get(resource).copied().unwrap_or(0)
    }

    pub fn queue_waits(&self, resource: &str) -> &[f64] {
        self.resource_queue_waits
            .get(resource)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn product_wip(&self, product: &str) -> &[u64] {
        self.product_wip_samples
            .get(product)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn rework_for(&self, resource: &str) -> u64 {
        self.rework_by_resource.get(resource).copied().unwrap_or(0)
    }

    pub fn breakdowns_for(&self, resource: &str) -> u64 {
        self.breakdowns_by_resource.get(resource).copied().unwrap_or(0)
    }

    pub fn breakdown_minutes_for(&self, resource: &str) -> f64 {
        self.breakdown_minutes_by_resource
            .get(resource)
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_read_as_zero() {
        let metrics = SimulationMetrics::new();
        assert_eq!(metrics.throughput("P"), 0);
        assert_eq!(metrics.busy_time("M"), 0.0);
        assert!(metrics.queue_waits("M").is_empty());
        assert!(metrics.cycle_times_for("P").is_empty());
        assert_eq!(metrics.breakdowns_for("M"), 0);
        assert_eq!(metrics.peak_queue("M"), 0);
        assert_eq!(metrics.seed, None);
    }

    #[test]
    fn test_peak_queue_keeps_maximum() {
        let mut metrics = SimulationMetrics::new();
        metrics.record_queue_length("M", 3);
        metrics.record_queue_length("M", 1);
        assert_eq!(metrics.peak_queue("M"), 3);
    }

    #[test]
    fn test_rework_adds_time_not_pieces() {
        let op = Operation::new("P", 2, "Sew", "M", 2.0, 1);
        let mut metrics = SimulationMetrics::new();
        metrics.record_processing(&op, 2.0, false);
        metrics.record_processing(&op, 2.5, true);
        assert_eq!(metrics.busy_time("M"), 4.5);
        assert_eq!(metrics.operation_times("P", 2), &[2.0, 2.5]);
        assert!(metrics.operation_times("P", 1).is_empty());
        assert_eq!(metrics.pieces_processed("M"), 1);
        assert_eq!(metrics.rework_for("M"), 1);
        assert_eq!(metrics.rework_count, 1);
        assert_eq!(metrics.processing_times("M"), &[2.0, 2.5]);
    }

    #[test]
    fn test_completion_updates_all_counters() {
        let mut metrics = SimulationMetrics::new();
        metrics.record_completion("P", 10, 42.0);
        metrics.record_completion("Q", 5, 12.0);
        assert_eq!(metrics.throughput("P"), 10);
        assert_eq!(metrics.total_throughput(), 15);
        assert_eq!(metrics.bundles_completed, 2);
        assert_eq!(metrics.bundles_completed_for("Q"), 1);
        assert_eq!(metrics.cycle_times, vec![42.0, 12.0]);
        assert_eq!(metrics.cycle_times_for("P"), &[42.0]);
    }
}
