//! Elevation subsystem: when to take the prestige reset.
//!
//! State machine:
//!   CoolingDown  → recently elevated (or no runner on track 0 yet);
//!                  nothing is evaluated.
//!   Evaluating   → cooldown elapsed; every tick runs `decide()`.
//!   Elevating    → all conditions held; the reset is applied this tick,
//!                  then the machine returns to CoolingDown.
//!
//! Elevate only when the batch is big enough (`min_levels`), material
//! relative to the current level (`min_gain_fraction`), and a forward
//! projection shows that waiting `projection_horizon_secs` longer would
//! add less than `marginal_threshold` of the batch.
//!
//! Execution: every tick, after spending.

use crate::{
    config::SimConfig,
    cost_model::{cumulative_elevation_purchase, ElevationPurchase},
    error::SimResult,
    event::SimEvent,
    projector::project,
    state::SimulationState,
    subsystem::{SimSubsystem, TickContext},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationPhase {
    CoolingDown,
    Evaluating,
    Elevating,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElevationVerdict {
    CoolingDown,
    TooFewLevels(ElevationPurchase),
    GainTooSmall(ElevationPurchase),
    WorthWaiting {
        now:          ElevationPurchase,
        levels_later: u64,
    },
    Elevate(ElevationPurchase),
}

impl ElevationVerdict {
    pub fn purchase(&self) -> Option<&ElevationPurchase> {
        match self {
            Self::CoolingDown => None,
            Self::TooFewLevels(p) | Self::GainTooSmall(p) | Self::Elevate(p) => Some(p),
            Self::WorthWaiting { now, .. } => Some(now),
        }
    }
}

/// Evaluate the elevation conditions against `state` without mutating it.
pub fn decide(config: &SimConfig, state: &SimulationState) -> ElevationVerdict {
    let s = &config.strategy;
    if state.time_since_elevation <= s.cooldown_secs || !state.tracks[0].has_runner {
        return ElevationVerdict::CoolingDown;
    }

    let level = state.elevation_level;
    let now = cumulative_elevation_purchase(config, level, state.coins);
    if now.levels < u64::from(s.min_levels) {
        return ElevationVerdict::TooFewLevels(now);
    }

    let gain_fraction = now.levels as f64 / level.max(1) as f64;
    if gain_fraction < s.min_gain_fraction {
        return ElevationVerdict::GainTooSmall(now);
    }

    let projected = project(s.projection_horizon_secs, s.projection_step_secs, state, config);
    let levels_later = cumulative_elevation_purchase(config, level, projected).levels;
    let marginal = levels_later.saturating_sub(now.levels) as f64 / now.levels.max(1) as f64;
    if marginal < s.marginal_threshold {
        ElevationVerdict::Elevate(now)
    } else {
        ElevationVerdict::WorthWaiting { now, levels_later }
    }
}

#[derive(Debug)]
pub struct ElevationSubsystem {
    pub phase: ElevationPhase,
}

impl ElevationSubsystem {
    pub fn new() -> Self {
        Self { phase: ElevationPhase::CoolingDown }
    }

    fn elevate(
        ctx: &TickContext,
        state: &mut SimulationState,
        purchase: &ElevationPurchase,
    ) -> SimEvent {
        let old_level = state.elevation_level;
        let gain_percent = purchase.levels as f64 / old_level.max(1) as f64 * 100.0;

        state.elevation_level += purchase.levels;
        state.elevation_count += 1;
        state.reset_for_elevation();

        log::info!(
            "tick={} t={:.0}s elevation x{old_level} -> x{} (+{} levels, +{gain_percent:.0}%)",
            ctx.tick,
            ctx.time,
            state.elevation_level,
            purchase.levels,
        );

        SimEvent::Elevated {
            tick: ctx.tick,
            time: ctx.time,
            old_level,
            new_level: state.elevation_level,
            levels_gained: purchase.levels,
            gain_percent,
            coins_spent: purchase.total_cost,
        }
    }
}

impl Default for ElevationSubsystem {
    fn default() -> Self { Self::new() }
}

impl SimSubsystem for ElevationSubsystem {
    fn name(&self) -> &'static str { "elevation" }

    fn update(
        &mut self,
        ctx: &TickContext,
        config: &SimConfig,
        state: &mut SimulationState,
        _events_in: &[SimEvent],
    ) -> SimResult<Vec<SimEvent>> {
        let mut out = Vec::new();
        state.time_since_elevation += ctx.dt;

        let verdict = decide(config, state);
        if let Some(purchase) = verdict.purchase().filter(|p| p.capped) {
            log::error!(
                "tick={} elevation purchase hit the iteration ceiling at {} levels (coins={:.3e})",
                ctx.tick,
                purchase.levels,
                state.coins
            );
            out.push(SimEvent::ElevationPurchaseCapped {
                tick: ctx.tick,
                levels: purchase.levels,
            });
        }

        // Elevating is reported for the tick the reset fired; the next
        // tick falls back to CoolingDown because the timer restarted.
        self.phase = match verdict {
            ElevationVerdict::CoolingDown => ElevationPhase::CoolingDown,
            ElevationVerdict::Elevate(purchase) => {
                out.push(Self::elevate(ctx, state, &purchase));
                ElevationPhase::Elevating
            }
            _ => ElevationPhase::Evaluating,
        };

        Ok(out)
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
