pub mod bundle;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod metrics;
pub mod process_time;
pub mod resource;
pub mod simulation_engine;
pub mod types;
