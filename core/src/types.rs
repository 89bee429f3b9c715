//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one fixed `dt` step of simulated time.
pub type Tick = u64;

/// Simulated seconds.
pub type SimTime = f64;

/// Index of a track, `0..TRACK_COUNT`. Lower index = easier tier.
pub type TrackIndex = usize;

/// The canonical run identifier.
pub type RunId = String;

/// Fixed number of tracks. Ordering and cardinality are part of the model.
pub const TRACK_COUNT: usize = 5;
