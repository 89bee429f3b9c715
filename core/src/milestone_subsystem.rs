//! Milestone subsystem: first crossing of the ascension threshold.
//!
//! Execution: every tick, last in registration order.
//! Records the tick-start time of the first tick that ends with
//! `coins >= ascension_threshold`. Later crossings are ignored.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    state::SimulationState,
    subsystem::{SimSubsystem, TickContext},
};

#[derive(Debug, Default)]
pub struct MilestoneSubsystem;

impl MilestoneSubsystem {
    pub fn new() -> Self {
        Self
    }
}

impl SimSubsystem for MilestoneSubsystem {
    fn name(&self) -> &'static str { "milestone" }

    fn update(
        &mut self,
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        if state.ascension_time.is_some() || state.coins < config.run.ascension_threshold {
            return Ok(vec![]);
        }

        state.ascension_time = Some(ctx.time);
        log::info!(
            "tick={} ascension reached at {:.1} min (x{}, {} elevations)",
            ctx.tick,
            ctx.time / 60.0,
            state.elevation_level,
            state.elevation_count
        );

        Ok(vec![SimEvent::AscensionReached {
            tick:  ctx.tick,
            time:  ctx.time,
            coins: state.coins,
        }])
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
