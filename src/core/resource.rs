use super::types::{BundleId, SimTime};
use crate::config::SimulationConfig;
use std::collections::{BTreeMap, VecDeque};

/// One machine/tool key with its pooled operator capacity
///
/// Requests are granted while `in_use < capacity`; otherwise they wait in
/// strict FIFO order. There is no priority or preemption.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    name: String,
    capacity: u32,
    in_use: u32,
    waiting: VecDeque<(BundleId, SimTime)>,
    peak_queue_len: usize,
}

impl ResourcePool {
    /// Create a new idle pool
    pub fn new(name: &str, capacity: u32) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            in_use: 0,
            waiting: VecDeque::new(),
            peak_queue_len: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_use(&self) -> u32 {
        self.in_use
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn peak_queue_len(&self) -> usize {
        self.peak_queue_len
    }

    /// Request a unit for `bundle` at `now`
    ///
    /// Returns true when granted immediately. Otherwise the request joins the
    /// back of the queue and is handed out later by `release`.
    pub fn request(&mut self, bundle: BundleId, now: SimTime) -> bool {
        if self.waiting.is_empty() && self.in_use < self.capacity {
            self.in_use += 1;
            return true;
        }
        self.waiting.push_back((bundle, now));
        self.peak_queue_len = self.peak_queue_len.max(self.waiting.len());
        false
    }

    /// Return a unit to the pool
    ///
    /// If a request is waiting, the unit passes straight to it and the
    /// waiting bundle with its request time is returned.
    pub fn release(&mut self) -> Option<(BundleId, SimTime)> {
        match self.waiting.pop_front() {
            Some(next) => Some(next),
            None => {
                self.in_use = self.in_use.saturating_sub(1);
                None
            }
        }
    }
}

/// All pools of a run, keyed by machine/tool
#[derive(Debug, Clone, Default)]
pub struct ResourcePools {
    pools: BTreeMap<String, ResourcePool>,
}

impl ResourcePools {
    /// Build one pool per distinct machine/tool with summed operators
    pub fn from_config(config: &SimulationConfig) -> Self {
        let pools = config
            .pooled_operators()
            .into_iter()
            .map(|(name, capacity)| (name.to_string(), ResourcePool::new(name, capacity)))
            .collect();
        Self { pools }
    }

    pub fn get(&self, name: &str) -> Option<&ResourcePool> {
        self.pools.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ResourcePool> {
        self.pools.get_mut(name)
    }

    /// Pooled capacity of `name`, zero if unknown
    pub fn capacity(&self, name: &str) -> u32 {
        self.pools.get(name).map(|p| p.capacity()).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourcePool> {
        self.pools.values()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Operation, Schedule};

    #[test]
    fn test_grants_up_to_capacity_then_queues() {
        let mut pool = ResourcePool::new("M", 2);
        assert!(pool.request(BundleId(0), 0.0));
        assert!(pool.request(BundleId(1), 0.0));
        assert!(!pool.request(BundleId(2), 1.0));
        assert!(!pool.request(BundleId(3), 2.0));
        assert_eq!(pool.in_use(), 2);
        assert_eq!(pool.queue_len(), 2);

        // Handed over in FIFO order, unit stays in use
        assert_eq!(pool.release(), Some((BundleId(2), 1.0)));
        assert_eq!(pool.release(), Some((BundleId(3), 2.0)));
        assert_eq!(pool.in_use(), 2);

        assert_eq!(pool.release(), None);
        assert_eq!(pool.release(), None);
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.peak_queue_len(), 2);
    }

    #[test]
    fn test_new_request_cannot_jump_queue() {
        let mut pool = ResourcePool::new("M", 1);
        assert!(pool.request(BundleId(0), 0.0));
        assert!(!pool.request(BundleId(1), 0.5));
        assert_eq!(pool.release(), Some((BundleId(1), 0.5)));
        assert!(!pool.request(BundleId(2), 1.0));
    }

    #[test]
    fn test_pools_sum_operators_across_products() {
        let config = SimulationConfig::new(Schedule::new(1, 8.0, 5), 1)
            .with_operation(Operation::new("A", 1, "Sew", "M", 1.0, 2))
            .with_operation(Operation::new("B", 1, "Sew", "M", 1.0, 3))
            .with_operation(Operation::new("B", 2, "Pack", "T", 1.0, 1));
        let pools = ResourcePools::from_config(&config);
        assert_eq!(pools.len(), 2);
        assert_eq!(pools.capacity("M"), 5);
        assert_eq!(pools.capacity("T"), 1);
        assert_eq!(pools.capacity("missing"), 0);
    }
}
