//! The single mutable simulation state.
//!
//! Owned by the engine for the duration of a run. The projector works on
//! a copy of the parts it needs; the reporter only reads.

use crate::types::{SimTime, TrackIndex, TRACK_COUNT};
use serde::{Deserialize, Serialize};

/// Per-track progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackState {
    /// Income multiplier, never below 1.0. Reset on elevation.
    pub multiplier:         f64,
    pub speed_level:        u32,
    pub star_count:         u32,
    pub map_unlocked:       bool,
    pub has_runner:         bool,
    /// Permanent: set once the track has been completed manually.
    pub has_ghost:          bool,
    /// Per-elevation guard on the auto-unlock-next-track rule.
    pub auto_unlocked_next: bool,
    /// Lifetime manual completions, fractional progress included.
    pub manual_completions: f64,
}

impl Default for TrackState {
    fn default() -> Self {
        Self {
            multiplier:         1.0,
            speed_level:        0,
            star_count:         0,
            map_unlocked:       false,
            has_runner:         false,
            has_ghost:          false,
            auto_unlocked_next: false,
            manual_completions: 0.0,
        }
    }
}

impl TrackState {
    /// Wipe everything an elevation resets. Ghost and manual history stay.
    fn reset_for_elevation(&mut self, keep_unlocked: bool) {
        self.multiplier = 1.0;
        self.speed_level = 0;
        self.star_count = 0;
        self.map_unlocked = keep_unlocked;
        self.has_runner = false;
        self.auto_unlocked_next = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub elapsed_time:         SimTime,
    pub coins:                f64,
    pub elevation_level:      u64,
    pub elevation_count:      u32,
    pub time_since_elevation: SimTime,
    /// Coins per second earned during the most recent tick.
    pub last_income_rate:     f64,
    pub ascension_time:       Option<SimTime>,
    pub tracks:               [TrackState; TRACK_COUNT],
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationState {
    /// Fresh run: no coins, level 0, only track 0 unlocked.
    pub fn new() -> Self {
        let mut tracks: [TrackState; TRACK_COUNT] = Default::default();
        tracks[0].map_unlocked = true;
        Self {
            elapsed_time:         0.0,
            coins:                0.0,
            elevation_level:      0,
            elevation_count:      0,
            time_since_elevation: 0.0,
            last_income_rate:     0.0,
            ascension_time:       None,
            tracks,
        }
    }

    /// Product of all track multipliers, each floored at 1.0.
    pub fn multiplier_product(&self) -> f64 {
        multiplier_product(self.tracks.iter().map(|t| t.multiplier))
    }

    /// Elevation income multiplier: the level itself, at least 1.
    pub fn elevation_multiplier(&self) -> f64 {
        self.elevation_level.max(1) as f64
    }

    /// The track played by hand this tick: the highest unlocked track
    /// still lacking a ghost, else the highest unlocked track.
    pub fn manual_play_track(&self) -> Option<TrackIndex> {
        manual_play_track(&self.tracks)
    }

    pub fn active_runner_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.has_runner).count()
    }

    pub fn unlocked_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.map_unlocked).count()
    }

    pub fn ghosts(&self) -> [bool; TRACK_COUNT] {
        std::array::from_fn(|i| self.tracks[i].has_ghost)
    }

    /// Bulk reset performed by an elevation. Coins, multipliers, speed,
    /// stars, unlocks (except track 0), runners and the auto-unlock guards
    /// are cleared. Ghosts persist.
    pub fn reset_for_elevation(&mut self) {
        self.coins = 0.0;
        self.time_since_elevation = 0.0;
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.reset_for_elevation(i == 0);
        }
    }
}

pub(crate) fn multiplier_product(multipliers: impl Iterator<Item = f64>) -> f64 {
    multipliers.fold(1.0, |acc, m| acc * m.max(1.0))
}

pub(crate) fn manual_play_track(tracks: &[TrackState; TRACK_COUNT]) -> Option<TrackIndex> {
    let highest_unghosted = (0..TRACK_COUNT)
        .rev()
        .find(|&i| tracks[i].map_unlocked && !tracks[i].has_ghost);
    highest_unghosted.or_else(|| (0..TRACK_COUNT).rev().find(|&i| tracks[i].map_unlocked))
}
