//! Income subsystem: runner and manual-play income.
//!
//! Execution: every tick, first in registration order.
//! Uses the tick-start multiplier product from the context for every
//! payout, then grows the multipliers of the tracks that earned.
//!
//! Manual play happens on exactly one track per tick. The first time a
//! track's cumulative manual completions reach one full run, its ghost is
//! recorded permanently.

use crate::{
    config::SimConfig,
    cost_model::{completion_rate, manual_run_rate, runner_multiplier_increment},
    error::SimResult,
    event::SimEvent,
    state::SimulationState,
    subsystem::{SimSubsystem, TickContext},
};

#[derive(Debug, Default)]
pub struct IncomeSubsystem;

impl IncomeSubsystem {
    pub fn new() -> Self {
        Self
    }

    fn runner_income(ctx: &TickContext, config: &SimConfig, state: &mut SimulationState) -> f64 {
        let mut income = 0.0;
        for (i, track) in state.tracks.iter_mut().enumerate() {
            if !track.has_runner {
                continue;
            }
            let rate = completion_rate(config, i, track.speed_level);
            income += rate * config.track(i).base_reward * ctx.mult_product * ctx.elev_mult * ctx.dt;
            track.multiplier += rate * runner_multiplier_increment(config, track.star_count) * ctx.dt;
        }
        income
    }

    fn manual_income(
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        out: &mut Vec<SimEvent>,
    ) -> f64 {
        let Some(i) = state.manual_play_track() else {
            return 0.0;
        };
        let runs_per_sec = manual_run_rate(config, i);
        let income =
            runs_per_sec * config.track(i).base_reward * ctx.mult_product * ctx.elev_mult * ctx.dt;

        let track = &mut state.tracks[i];
        track.multiplier += runs_per_sec * config.progression.manual_increment * ctx.dt;
        track.manual_completions += runs_per_sec * ctx.dt;
        if !track.has_ghost && track.manual_completions >= 1.0 {
            track.has_ghost = true;
            log::debug!("tick={} ghost recorded on track {i}", ctx.tick);
            out.push(SimEvent::GhostRecorded { tick: ctx.tick, track: i });
        }
        income
    }
}

impl SimSubsystem for IncomeSubsystem {
    fn name(&self) -> &'static str { "income" }

    fn update(
        &mut self,
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let mut out = Vec::new();

        let runner = Self::runner_income(ctx, config, state);
        let manual = Self::manual_income(ctx, config, state, &mut out);
        let total = runner + manual;

        state.coins += total;
        state.last_income_rate = total / ctx.dt;

        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
