use super::bundle::{Bundle, BundleStage};
use super::event::{Event, TransitionKind};
use super::event_scheduler::EventScheduler;
use super::execution::config::ExecutionConfig;
use super::metrics::{SimulationMetrics, WipSample};
use super::process_time::ProcessTimeModel;
use super::resource::ResourcePools;
use super::types::{BundleId, SimTime};
use crate::config::{Breakdown, Operation, SimulationConfig};
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the virtual clock moves forward
    fn on_time_advance(&mut self, old_time: SimTime, new_time: SimTime);

    /// Called before an event is handled
    fn on_event(&mut self, time: SimTime, event: &Event);
}

/// Everything a finished run hands back
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub metrics: SimulationMetrics,
    /// Seed the PRNG was built from
    pub seed: u64,
    /// Wall-clock time spent in the event loop
    pub duration: Duration,
    pub horizon_minutes: f64,
    pub events_processed: u64,
    /// Bundles still inside the line at the horizon; they record nothing
    pub bundles_in_flight: u64,
}

/// Number of bundles needed to carry `pieces`, rounding up
pub fn bundle_count(pieces: f64, bundle_size: u32) -> u64 {
    if bundle_size == 0 || !(pieces > 0.0) || !pieces.is_finite() {
        return 0;
    }
    (pieces / bundle_size as f64).ceil() as u64
}

/// Single-threaded discrete-event simulator of a production line
///
/// Bundles are generated up front from demand and the horizon, then move
/// through their product's routing one event at a time. The clock only
/// advances by popping the next-due event, and the run stops at the
/// horizon without draining bundles still in flight.
pub struct Simulator {
    routings: BTreeMap<String, Vec<Operation>>,
    breakdowns: BTreeMap<String, Breakdown>,
    pools: ResourcePools,
    scheduler: EventScheduler,
    bundles: Vec<Bundle>,
    metrics: SimulationMetrics,
    process_model: ProcessTimeModel,
    execution: ExecutionConfig,
    rng: StdRng,
    seed: u64,
    current_time: SimTime,
    horizon: SimTime,
    wip_pieces: u64,
    wip_bundles: u64,
    in_system: BTreeMap<String, u64>,
    observers: Vec<Box<dyn SimulationObserver>>,
    events_processed: u64,
}

impl Simulator {
    /// Create a simulator for `config` and schedule every bundle arrival
    pub fn new(config: &SimulationConfig, execution: ExecutionConfig) -> Self {
        let seed = execution.seed.unwrap_or_else(rand::random);
        let breakdowns = config
            .pooled_operators()
            .into_keys()
            .filter_map(|machine| {
                config
                    .breakdown_for(machine)
                    .map(|rule| (machine.to_string(), rule.clone()))
            })
            .collect();
        let mut metrics = SimulationMetrics::new();
        metrics.seed = Some(seed);

        let mut simulator = Self {
            routings: BTreeMap::new(),
            breakdowns,
            pools: ResourcePools::from_config(config),
            scheduler: EventScheduler::new(),
            bundles: Vec::new(),
            metrics,
            process_model: ProcessTimeModel::new(
                execution.variability_spread,
                execution.min_process_time,
            ),
            rng: StdRng::seed_from_u64(seed),
            seed,
            current_time: 0.0,
            horizon: config.horizon_minutes(),
            wip_pieces: 0,
            wip_bundles: 0,
            in_system: BTreeMap::new(),
            observers: Vec::new(),
            events_processed: 0,
            execution,
        };

        if simulator.execution.wip_sample_interval > 0.0 {
            simulator.scheduler.schedule_at(Event::SampleWip, 0.0);
        }
        simulator.generate_bundles(config);
        simulator
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    fn generate_bundles(&mut self, config: &SimulationConfig) {
        let mut seen = BTreeSet::new();
        for demand in &config.demands {
            let product = demand.product.as_str();
            if !seen.insert(product) {
                continue;
            }
            let routing = config.routing(product);
            if routing.is_empty() {
                warn!("Product '{}' has demand but no operations; skipping", product);
                continue;
            }
            self.routings
                .insert(product.to_string(), routing.into_iter().cloned().collect());
            self.in_system.insert(product.to_string(), 0);

            let pieces = config.horizon_pieces_for(product);
            let count = bundle_count(pieces, demand.bundle_size);
            self.metrics.record_bundles_generated(product, count);
            if count == 0 {
                debug!("Product '{}' needs no bundles over the horizon", product);
                continue;
            }

            // Stagger arrivals over a fraction of the per-bundle interval
            let interval = self.horizon / count as f64;
            for index in 0..count {
                let offset = index as f64 * interval * self.execution.arrival_spread;
                let id = BundleId(self.bundles.len());
                self.bundles
                    .push(Bundle::new(id, product, demand.bundle_size, offset));
                self.scheduler
                    .schedule_at(Event::BundleArrival { bundle: id }, offset);
            }
            debug!(
                "Product '{}': {:.1} pieces -> {} bundle(s) of {}",
                product, pieces, count, demand.bundle_size
            );
        }
    }

    /// Run until the horizon and hand back the metrics
    pub fn run(mut self) -> SimulationRun {
        info!(
            "Starting simulation: {} bundle(s), {} resource(s), horizon {:.1} min, seed {}",
            self.bundles.len(),
            self.pools.len(),
            self.horizon,
            self.seed
        );
        let started = Instant::now();
        while self.step() {}
        let duration = started.elapsed();

        info!(
            "Simulation finished at t={:.1}: {} event(s), {} bundle(s) completed, {} in flight",
            self.current_time,
            self.events_processed,
            self.metrics.bundles_completed,
            self.wip_bundles
        );

        SimulationRun {
            metrics: self.metrics,
            seed: self.seed,
            duration,
            horizon_minutes: self.horizon,
            events_processed: self.events_processed,
            bundles_in_flight: self.wip_bundles,
        }
    }

    /// Process the next event, returns false once the horizon is reached
    pub fn step(&mut self) -> bool {
        match self.scheduler.peek_next_time() {
            Some(time) if time < self.horizon => {}
            _ => return false,
        }
        let scheduled = match self.scheduler.pop_next() {
            Some(scheduled) => scheduled,
            None => return false,
        };

        if scheduled.time != self.current_time {
            for observer in &mut self.observers {
                observer.on_time_advance(self.current_time, scheduled.time);
            }
            self.current_time = scheduled.time;
        }
        for observer in &mut self.observers {
            observer.on_event(self.current_time, &scheduled.event);
        }

        trace!("t={:.3} {:?}", self.current_time, scheduled.event);
        self.dispatch(scheduled.event);
        self.events_processed += 1;
        true
    }

    fn dispatch(&mut self, event: Event) {
        match event {
            Event::BundleArrival { bundle } => self.on_arrival(bundle),
            Event::TransitionComplete { bundle, kind } => self.on_transition_complete(bundle, kind),
            Event::BreakdownCleared { bundle } => self.start_piece(bundle, 0, false),
            Event::PieceComplete {
                bundle,
                minutes,
                rework,
            } => self.on_piece_complete(bundle, minutes, rework),
            Event::SampleWip => self.on_sample_wip(),
        }
    }

    /// Operation the bundle is currently at
    fn operation(&self, id: BundleId) -> Option<&Operation> {
        let bundle = &self.bundles[id.0];
        self.routings
            .get(&bundle.product)
            .and_then(|routing| routing.get(bundle.step_index))
    }

    fn on_arrival(&mut self, id: BundleId) {
        let bundle = &mut self.bundles[id.0];
        bundle.created_at = self.current_time;
        self.wip_pieces += bundle.pieces as u64;
        self.wip_bundles += 1;
        *self.in_system.entry(bundle.product.clone()).or_insert(0) += 1;
        self.start_transition(id, TransitionKind::Entry);
    }

    fn start_transition(&mut self, id: BundleId, kind: TransitionKind) {
        let pieces = self.bundles[id.0].pieces;
        let until = self.current_time + self.execution.transition_minutes(pieces);
        self.bundles[id.0].stage = BundleStage::AwaitingTransition { kind, until };
        self.scheduler
            .schedule_at(Event::TransitionComplete { bundle: id, kind }, until);
    }

    fn on_transition_complete(&mut self, id: BundleId, kind: TransitionKind) {
        match kind {
            TransitionKind::Entry => self.request_resource(id),
            TransitionKind::Exit => {
                let bundle = &mut self.bundles[id.0];
                bundle.step_index += 1;
                let steps = self
                    .routings
                    .get(&bundle.product)
                    .map(|routing| routing.len())
                    .unwrap_or(0);
                if bundle.step_index < steps {
                    self.start_transition(id, TransitionKind::Entry);
                } else {
                    self.complete(id);
                }
            }
        }
    }

    fn request_resource(&mut self, id: BundleId) {
        let now = self.current_time;
        let machine = match self.operation(id) {
            Some(op) => op.machine_tool.clone(),
            None => return,
        };
        self.bundles[id.0].stage = BundleStage::AwaitingResource { requested_at: now };

        let pool = match self.pools.get_mut(&machine) {
            Some(pool) => pool,
            None => return,
        };
        if pool.request(id, now) {
            self.on_granted(id, now);
        } else {
            self.metrics.record_queue_length(&machine, pool.peak_queue_len());
            trace!("{} queued for '{}'", id, machine);
        }
    }

    fn on_granted(&mut self, id: BundleId, requested_at: SimTime) {
        let now = self.current_time;
        let machine = match self.operation(id) {
            Some(op) => op.machine_tool.clone(),
            None => return,
        };
        self.metrics.record_queue_wait(&machine, now - requested_at);

        if let Some(rule) = self.breakdowns.get(&machine) {
            if rule.probability_pct > 0.0 {
                let draw: f64 = self.rng.gen_range(0.0..100.0);
                if draw < rule.probability_pct {
                    let until = now + rule.delay_minutes;
                    self.metrics.record_breakdown(&machine, rule.delay_minutes);
                    self.bundles[id.0].stage = BundleStage::BrokenDown { until };
                    self.scheduler
                        .schedule_at(Event::BreakdownCleared { bundle: id }, until);
                    debug!(
                        "'{}' broke down at t={:.2} for {:.1} min",
                        machine, now, rule.delay_minutes
                    );
                    return;
                }
            }
        }

        self.start_piece(id, 0, false);
    }

    fn start_piece(&mut self, id: BundleId, piece: u32, rework: bool) {
        let minutes = {
            let bundle = &self.bundles[id.0];
            match self
                .routings
                .get(&bundle.product)
                .and_then(|routing| routing.get(bundle.step_index))
            {
                Some(op) => self.process_model.sample(op, &mut self.rng),
                None => return,
            }
        };
        self.bundles[id.0].stage = BundleStage::Processing { piece, rework };
        self.scheduler.schedule_at(
            Event::PieceComplete {
                bundle: id,
                minutes,
                rework,
            },
            self.current_time + minutes,
        );
    }

    fn on_piece_complete(&mut self, id: BundleId, minutes: f64, rework: bool) {
        let bundle = &self.bundles[id.0];
        let op = match self
            .routings
            .get(&bundle.product)
            .and_then(|routing| routing.get(bundle.step_index))
        {
            Some(op) => op,
            None => return,
        };
        self.metrics.record_processing(op, minutes, rework);
        let (machine, rework_pct) = (op.machine_tool.clone(), op.rework_pct);

        let piece = match self.bundles[id.0].stage {
            BundleStage::Processing { piece, .. } => piece,
            _ => return,
        };

        // At most one in-station rework pass per piece
        if !rework && rework_pct > 0.0 && self.rng.gen::<f64>() < rework_pct / 100.0 {
            self.start_piece(id, piece, true);
            return;
        }

        if piece + 1 < self.bundles[id.0].pieces {
            self.start_piece(id, piece + 1, false);
        } else {
            self.release_resource(id, &machine);
        }
    }

    fn release_resource(&mut self, id: BundleId, machine: &str) {
        self.start_transition(id, TransitionKind::Exit);
        let handed_over = self.pools.get_mut(machine).and_then(|pool| pool.release());
        if let Some((next, requested_at)) = handed_over {
            self.on_granted(next, requested_at);
        }
    }

    fn complete(&mut self, id: BundleId) {
        let bundle = &mut self.bundles[id.0];
        bundle.stage = BundleStage::Completed;
        let cycle_time = self.current_time - bundle.created_at;
        self.metrics
            .record_completion(&bundle.product, bundle.pieces, cycle_time);
        self.wip_pieces = self.wip_pieces.saturating_sub(bundle.pieces as u64);
        self.wip_bundles = self.wip_bundles.saturating_sub(1);
        if let Some(count) = self.in_system.get_mut(&bundle.product) {
            *count = count.saturating_sub(1);
        }
    }

    fn on_sample_wip(&mut self) {
        let sample = WipSample {
            time: self.current_time,
            pieces: self.wip_pieces,
            bundles: self.wip_bundles,
        };
        self.metrics.record_wip_sample(sample, self.in_system.iter());

        let next = self.current_time + self.execution.wip_sample_interval;
        if next < self.horizon {
            self.scheduler.schedule_at(Event::SampleWip, next);
        }
    }

    /// Seed the PRNG was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    pub fn pools(&self) -> &ResourcePools {
        &self.pools
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// Pieces currently inside the line
    pub fn wip_pieces(&self) -> u64 {
        self.wip_pieces
    }

    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }
}
