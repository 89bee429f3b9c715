//! Fixed-shape output records: periodic snapshots and elevation records.
//!
//! A snapshot is taken on the first tick whose start time reaches the
//! next scheduled snapshot time, and is stamped with the scheduled time.

use crate::{
    config::SimConfig,
    cost_model::best_run_reward,
    elevation_subsystem::ElevationPhase,
    state::SimulationState,
    types::{SimTime, TRACK_COUNT},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time:                 SimTime,
    pub coins:                f64,
    pub income_rate:          f64,
    pub elevation_level:      u64,
    pub elevation_count:      u32,
    pub multiplier_product:   f64,
    pub best_run_reward:      f64,
    pub active_runner_count:  usize,
    pub unlocked_track_count: usize,
    pub speed_levels:         [u32; TRACK_COUNT],
    pub star_counts:          [u32; TRACK_COUNT],
    pub elevation_phase:      ElevationPhase,
}

impl SimSnapshot {
    pub fn capture(
        time: SimTime,
        config: &SimConfig,
        state: &SimulationState,
        elevation_phase: ElevationPhase,
    ) -> Self {
        Self {
            time,
            coins:                state.coins,
            income_rate:          state.last_income_rate,
            elevation_level:      state.elevation_level,
            elevation_count:      state.elevation_count,
            multiplier_product:   state.multiplier_product(),
            best_run_reward:      best_run_reward(config, state),
            active_runner_count:  state.active_runner_count(),
            unlocked_track_count: state.unlocked_track_count(),
            speed_levels:         std::array::from_fn(|i| state.tracks[i].speed_level),
            star_counts:          std::array::from_fn(|i| state.tracks[i].star_count),
            elevation_phase,
        }
    }
}

/// One elevation, as reported in the run's elevation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationRecord {
    pub time:          SimTime,
    pub old_level:     u64,
    pub new_level:     u64,
    pub levels_gained: u64,
    pub gain_percent:  f64,
}
