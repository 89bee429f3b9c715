//! Forward projector: cheap lookahead used to time elevations.
//!
//! Replays only the income half of a tick, at a coarser step, on a
//! scratch copy of coins and multipliers. Speed levels, stars, unlocks,
//! runners and ghosts are read from the snapshot and never change during
//! the projection. Nothing is bought, evolved or reset.

use crate::{
    config::SimConfig,
    cost_model::{completion_rate, manual_run_rate, runner_multiplier_increment},
    state::{manual_play_track, multiplier_product, SimulationState},
    types::{SimTime, TRACK_COUNT},
};

/// Coins the state would hold after `horizon` seconds of pure income,
/// stepping `step` seconds at a time. The last step is shortened so the
/// projection covers exactly `horizon`.
pub fn project(
    horizon: SimTime,
    step: SimTime,
    state: &SimulationState,
    config: &SimConfig,
) -> f64 {
    let mut coins = state.coins;
    let mut multipliers: [f64; TRACK_COUNT] = std::array::from_fn(|i| state.tracks[i].multiplier);
    if step <= 0.0 {
        return coins;
    }

    let manual_track = manual_play_track(&state.tracks);
    let elev_mult = state.elevation_multiplier();
    let mut remaining = horizon;

    while remaining > 0.0 {
        let dt = step.min(remaining);
        let mult_product = multiplier_product(multipliers.iter().copied());

        for (i, track) in state.tracks.iter().enumerate() {
            if !track.has_runner {
                continue;
            }
            let rate = completion_rate(config, i, track.speed_level);
            coins += rate * config.track(i).base_reward * mult_product * elev_mult * dt;
            multipliers[i] += rate * runner_multiplier_increment(config, track.star_count) * dt;
        }

        if let Some(i) = manual_track {
            let runs_per_sec = manual_run_rate(config, i);
            coins += runs_per_sec * config.track(i).base_reward * mult_product * elev_mult * dt;
            multipliers[i] += runs_per_sec * config.progression.manual_increment * dt;
        }

        remaining -= dt;
    }

    coins
}
