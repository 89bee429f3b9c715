//! Subsystem trait and tick context.
//!
//! RULE: Every tick phase implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, every tick.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    state::SimulationState,
    types::{SimTime, Tick},
};
use std::any::Any;

/// Values fixed at the start of a tick and shared by every phase.
///
/// `mult_product` is deliberately not refreshed after income growth:
/// the ROI ranking in the spending phase prices upgrades with the value
/// read at tick start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick:         Tick,
    /// Simulated time at the start of the tick.
    pub time:         SimTime,
    pub dt:           SimTime,
    pub mult_product: f64,
    pub elev_mult:    f64,
}

impl TickContext {
    pub fn capture(tick: Tick, dt: SimTime, state: &SimulationState) -> Self {
        Self {
            tick,
            time: state.elapsed_time,
            dt,
            mult_product: state.multiplier_product(),
            elev_mult: state.elevation_multiplier(),
        }
    }
}

/// The contract every tick phase must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per tick by the engine.
    ///
    /// - `ctx`:       tick number, time and the tick-start multipliers
    /// - `state`:     the authoritative state, already mutated by earlier phases
    /// - `events_in`: events emitted by earlier subsystems this tick
    ///
    /// Returns a vec of new events to add to the tick's event log.
    fn update(
        &mut self,
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>>;

    /// For downcasting in tests and tooling only.
    /// Production sim code never uses this.
    fn as_any(&self) -> &dyn Any;
}
