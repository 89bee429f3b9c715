//! Spending subsystem: the automated purchase policy.
//!
//! Execution: every tick, after income.
//! Steps run in a fixed order, each seeing the coins left by the last:
//!   a. buy any affordable locked track
//!   b. fire auto-unlock-next guards (runner at the trigger level)
//!   c. spawn free runners on unlocked, ghosted tracks
//!   d. buy best-ROI speed upgrades until none qualifies
//!   e. evolve tracks sitting at max speed with star capacity left
//!
//! Every purchase checks `cost <= coins`, so coins never go negative.

use crate::{
    config::SimConfig,
    cost_model::{speed_upgrade_income_delta, upgrade_cost},
    error::SimResult,
    event::{SimEvent, UnlockTrigger},
    state::SimulationState,
    subsystem::{SimSubsystem, TickContext},
    types::{TrackIndex, TRACK_COUNT},
};

/// The upgrade the ROI ranking picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeChoice {
    pub track:        TrackIndex,
    pub cost:         f64,
    pub payback_secs: f64,
}

#[derive(Debug, Default)]
pub struct SpendingSubsystem;

impl SpendingSubsystem {
    pub fn new() -> Self {
        Self
    }

    fn unlock_affordable_tracks(
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        out: &mut Vec<SimEvent>,
    ) {
        for i in 0..TRACK_COUNT {
            let price = config.track(i).unlock_price;
            if state.tracks[i].map_unlocked || price > state.coins {
                continue;
            }
            state.coins -= price;
            state.tracks[i].map_unlocked = true;
            log::debug!("tick={} bought track {i} for {price:.0}", ctx.tick);
            out.push(SimEvent::TrackUnlocked {
                tick: ctx.tick,
                track: i,
                trigger: UnlockTrigger::Purchase,
                price,
            });
        }
    }

    fn fire_auto_unlocks(
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        out: &mut Vec<SimEvent>,
    ) {
        let trigger_level = config.progression.unlock_trigger_level;
        for i in 0..TRACK_COUNT {
            let track = &state.tracks[i];
            let reached = track.speed_level >= trigger_level || track.star_count > 0;
            if !track.has_runner || !reached || track.auto_unlocked_next {
                continue;
            }
            state.tracks[i].auto_unlocked_next = true;

            let next = i + 1;
            if next < TRACK_COUNT && !state.tracks[next].map_unlocked {
                state.tracks[next].map_unlocked = true;
                log::debug!("tick={} runner on track {i} unlocked track {next}", ctx.tick);
                out.push(SimEvent::TrackUnlocked {
                    tick: ctx.tick,
                    track: next,
                    trigger: UnlockTrigger::RunnerMilestone,
                    price: 0.0,
                });
            }
        }
    }

    fn spawn_runners(ctx: &TickContext, state: &mut SimulationState, out: &mut Vec<SimEvent>) {
        for (i, track) in state.tracks.iter_mut().enumerate() {
            if track.map_unlocked && track.has_ghost && !track.has_runner {
                track.has_runner = true;
                out.push(SimEvent::RunnerSpawned { tick: ctx.tick, track: i });
            }
        }
    }

    /// Lowest-payback affordable speed upgrade, if any qualifies.
    /// Ties go to the lower track index.
    pub fn best_upgrade(
        ctx: &TickContext,
        config: &SimConfig,
        state: &SimulationState,
    ) -> Option<UpgradeChoice> {
        let budget = state.coins * config.strategy.spend_cap;
        let mut best: Option<UpgradeChoice> = None;

        for (i, track) in state.tracks.iter().enumerate() {
            if !track.has_runner || track.speed_level >= config.progression.max_speed_level {
                continue;
            }
            let cost = upgrade_cost(config, track.speed_level, i, track.star_count);
            if cost > budget || cost > state.coins {
                continue;
            }
            let delta = speed_upgrade_income_delta(config, i, ctx.mult_product, ctx.elev_mult);
            if delta <= 0.0 {
                continue;
            }
            let payback_secs = cost / delta;
            if payback_secs > config.strategy.payback_ceiling_secs {
                continue;
            }
            if best.map_or(true, |b| payback_secs < b.payback_secs) {
                best = Some(UpgradeChoice { track: i, cost, payback_secs });
            }
        }
        best
    }

    fn buy_speed_upgrades(
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        out: &mut Vec<SimEvent>,
    ) {
        while let Some(choice) = Self::best_upgrade(ctx, config, state) {
            state.coins -= choice.cost;
            let track = &mut state.tracks[choice.track];
            track.speed_level += 1;
            out.push(SimEvent::SpeedUpgraded {
                tick: ctx.tick,
                track: choice.track,
                new_level: track.speed_level,
                cost: choice.cost,
                payback_secs: choice.payback_secs,
            });
        }
    }

    fn evolve_maxed_runners(
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        out: &mut Vec<SimEvent>,
    ) {
        let p = &config.progression;
        for (i, track) in state.tracks.iter_mut().enumerate() {
            if track.speed_level < p.max_speed_level || track.star_count >= p.max_stars {
                continue;
            }
            track.star_count += 1;
            track.speed_level = 0;
            log::debug!("tick={} track {i} evolved to {} stars", ctx.tick, track.star_count);
            out.push(SimEvent::RunnerEvolved {
                tick: ctx.tick,
                track: i,
                stars: track.star_count,
            });
        }
    }
}

impl SimSubsystem for SpendingSubsystem {
    fn name(&self) -> &'static str { "spending" }

    fn update(
        &mut self,
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let mut out = Vec::new();

        Self::unlock_affordable_tracks(ctx, config, state, &mut out);
        Self::fire_auto_unlocks(ctx, config, state, &mut out);
        Self::spawn_runners(ctx, state, &mut out);
        Self::buy_speed_upgrades(ctx, config, state, &mut out);
        Self::evolve_maxed_runners(ctx, config, state, &mut out);

        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
