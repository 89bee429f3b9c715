//! End-of-run report handed to the reporter.

use crate::{
    snapshot::{ElevationRecord, SimSnapshot},
    state::SimulationState,
    types::{RunId, SimTime, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Reached {
        time: SimTime,
    },
    NotReached {
        final_coins:     f64,
        elevation_level: u64,
    },
}

impl RunOutcome {
    pub fn from_state(state: &SimulationState) -> Self {
        match state.ascension_time {
            Some(time) => Self::Reached { time },
            None => Self::NotReached {
                final_coins:     state.coins,
                elevation_level: state.elevation_level,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id:      RunId,
    pub ticks:       Tick,
    pub snapshots:   Vec<SimSnapshot>,
    pub elevations:  Vec<ElevationRecord>,
    pub outcome:     RunOutcome,
    pub final_state: SimulationState,
}
