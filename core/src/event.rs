//! Events emitted by the tick phases.
//!
//! RULE: Every observable decision (unlock, purchase, evolution,
//! elevation, milestone) is reported as an event. Income accrual is not;
//! it happens every tick and shows up in snapshots instead.

use crate::types::{RunId, SimTime, Tick, TrackIndex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    RunInitialized {
        run_id: RunId,
    },

    // ── Income events ──────────────────────────────
    GhostRecorded {
        tick:  Tick,
        track: TrackIndex,
    },

    // ── Spending events ────────────────────────────
    TrackUnlocked {
        tick:    Tick,
        track:   TrackIndex,
        trigger: UnlockTrigger,
        price:   f64,
    },
    RunnerSpawned {
        tick:  Tick,
        track: TrackIndex,
    },
    SpeedUpgraded {
        tick:         Tick,
        track:        TrackIndex,
        new_level:    u32,
        cost:         f64,
        payback_secs: f64,
    },
    RunnerEvolved {
        tick:  Tick,
        track: TrackIndex,
        stars: u32,
    },

    // ── Elevation events ───────────────────────────
    Elevated {
        tick:          Tick,
        time:          SimTime,
        old_level:     u64,
        new_level:     u64,
        levels_gained: u64,
        gain_percent:  f64,
        coins_spent:   f64,
    },
    ElevationPurchaseCapped {
        tick:   Tick,
        levels: u64,
    },

    // ── Milestone events ───────────────────────────
    AscensionReached {
        tick:  Tick,
        time:  SimTime,
        coins: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockTrigger {
    /// Bought with coins.
    Purchase,
    /// Free unlock from the previous track's runner reaching the trigger level.
    RunnerMilestone,
}

/// The event log entry as kept by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub tick:       Tick,
    pub subsystem:  String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
