use super::event::Event;
use super::types::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent {
    pub time: SimTime,
    pub sequence_num: u64,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Time-ordered event queue; events due at the same time pop in the order they were scheduled
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule an event at an absolute virtual time
    pub fn schedule_at(&mut self, event: Event, time: SimTime) {
        let scheduled_event = ScheduledEvent {
            time,
            sequence_num: self.sequence_counter,
            event,
        };

        self.event_queue.push(scheduled_event);
        self.sequence_counter += 1;
    }

    /// Remove and return the earliest event
    pub fn pop_next(&mut self) -> Option<ScheduledEvent> {
        self.event_queue.pop()
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Get the next event time without removing it
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|event| event.time)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BundleId;

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at(Event::SampleWip, 5.0);
        scheduler.schedule_at(Event::BundleArrival { bundle: BundleId(0) }, 1.5);
        scheduler.schedule_at(Event::BundleArrival { bundle: BundleId(1) }, 3.0);

        let times: Vec<f64> = std::iter::from_fn(|| scheduler.pop_next()).map(|e| e.time).collect();
        assert_eq!(times, vec![1.5, 3.0, 5.0]);
        assert!(!scheduler.has_events());
    }

    #[test]
    fn test_equal_times_are_fifo() {
        let mut scheduler = EventScheduler::new();
        for i in 0..5 {
            scheduler.schedule_at(Event::BundleArrival { bundle: BundleId(i) }, 2.0);
        }
        scheduler.schedule_at(Event::SampleWip, 1.0);

        assert_eq!(scheduler.peek_next_time(), Some(1.0));
        assert_eq!(scheduler.pop_next().map(|e| e.event), Some(Event::SampleWip));
        let order: Vec<usize> = std::iter::from_fn(|| scheduler.pop_next())
            .filter_map(|e| e.event.bundle())
            .map(|b| b.index())
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
