//! Ascend economy simulator.
//!
//! Plays the idle economy autonomously with a greedy strategy (ROI-ranked
//! speed upgrades, projection-timed elevations) and reports how long it
//! takes to reach ascension. Deterministic: the same config always
//! produces the same run.

pub mod clock;
pub mod config;
pub mod cost_model;
pub mod elevation_subsystem;
pub mod engine;
pub mod error;
pub mod event;
pub mod income_subsystem;
pub mod milestone_subsystem;
pub mod projector;
pub mod report;
pub mod snapshot;
pub mod spending_subsystem;
pub mod state;
pub mod store;
pub mod subsystem;
pub mod types;
