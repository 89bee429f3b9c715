//! In-memory run store.
//!
//! RULE: Only the engine writes to the store.
//! Subsystems return events; the engine records them here together
//! with snapshots and elevation records. Nothing is persisted.

use crate::{
    event::EventLogEntry,
    snapshot::{ElevationRecord, SimSnapshot},
    types::Tick,
};

#[derive(Debug, Default)]
pub struct SimStore {
    events:     Vec<EventLogEntry>,
    snapshots:  Vec<SimSnapshot>,
    elevations: Vec<ElevationRecord>,
}

impl SimStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&mut self, entry: EventLogEntry) {
        self.events.push(entry);
    }

    /// Entries are appended in tick order, so a binary search finds the
    /// tick's range.
    pub fn events_for_tick(&self, tick: Tick) -> &[EventLogEntry] {
        let start = self.events.partition_point(|e| e.tick < tick);
        let end = self.events.partition_point(|e| e.tick <= tick);
        &self.events[start..end]
    }

    pub fn events(&self) -> &[EventLogEntry] {
        &self.events
    }

    pub fn event_count(&self, event_type: &str) -> usize {
        self.events.iter().filter(|e| e.event_type == event_type).count()
    }

    // ── Snapshots ──────────────────────────────────────────────

    pub fn save_snapshot(&mut self, snapshot: SimSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[SimSnapshot] {
        &self.snapshots
    }

    // ── Elevations ─────────────────────────────────────────────

    pub fn record_elevation(&mut self, record: ElevationRecord) {
        self.elevations.push(record);
    }

    pub fn elevations(&self) -> &[ElevationRecord] {
        &self.elevations
    }
}
