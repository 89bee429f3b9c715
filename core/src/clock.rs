//! Simulation clock: owns the tick counter and the fixed step size.

use crate::types::{SimTime, Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_tick: Tick,
    /// Simulated seconds per tick.
    pub dt:           SimTime,
}

impl SimClock {
    pub fn new(dt: SimTime) -> Self {
        Self { current_tick: 0, dt }
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    /// Number of ticks needed to cover `duration` simulated seconds.
    pub fn ticks_for(&self, duration: SimTime) -> Tick {
        if duration <= 0.0 {
            return 0;
        }
        (duration / self.dt).ceil() as Tick
    }
}
