//! The simulation engine: drives the idle economy one fixed step at a time.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Tick context   (multiplier product + elevation multiplier, engine)
//!   1. Income         (runner income, manual play, ghosts)
//!   2. Spending       (unlocks, runners, speed upgrades, evolution)
//!   3. Elevation      (prestige decision with forward projection)
//!   4. Milestone      (first ascension-threshold crossing)
//!
//! RULES:
//!   - Subsystems execute in registration order, every tick.
//!   - Each subsystem sees the state as left by the previous one.
//!   - No subsystem calls another subsystem's functions directly.
//!   - There is no randomness and no wall-clock input: a run is a pure
//!     function of its config.
//!   - All decisions are recorded in the event log.

use crate::{
    clock::SimClock,
    config::SimConfig,
    elevation_subsystem::{ElevationPhase, ElevationSubsystem},
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    income_subsystem::IncomeSubsystem,
    milestone_subsystem::MilestoneSubsystem,
    report::{RunOutcome, RunReport},
    snapshot::{ElevationRecord, SimSnapshot},
    spending_subsystem::SpendingSubsystem,
    state::SimulationState,
    store::SimStore,
    subsystem::{SimSubsystem, TickContext},
    types::{RunId, SimTime, Tick},
};

pub struct SimEngine {
    pub run_id:    RunId,
    pub clock:     SimClock,
    pub config:    SimConfig,
    pub state:     SimulationState,
    pub store:     SimStore,
    subsystems:    Vec<Box<dyn SimSubsystem>>,
    next_snapshot: SimTime,
}

impl SimEngine {
    /// Validate the config and create an engine with no subsystems.
    pub fn new(run_id: RunId, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            clock:         SimClock::new(config.run.dt),
            state:         SimulationState::new(),
            store:         SimStore::new(),
            subsystems:    Vec::new(),
            next_snapshot: 0.0,
            config,
            run_id,
        })
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(run_id: RunId, config: SimConfig) -> SimResult<Self> {
        let mut engine = SimEngine::new(run_id, config)?;

        // EXECUTION ORDER: fixed, documented, never reordered.
        engine.register(Box::new(IncomeSubsystem::new()));
        engine.register(Box::new(SpendingSubsystem::new()));
        engine.register(Box::new(ElevationSubsystem::new()));
        engine.register(Box::new(MilestoneSubsystem::new()));
        Ok(engine)
    }

    /// Fully wired engine on the test config.
    pub fn build_test(run_id: RunId) -> SimResult<Self> {
        Self::build(run_id, SimConfig::default_test())
    }

    /// Fully wired engine starting from a hand-built state.
    pub fn build_with_state(
        run_id: RunId,
        config: SimConfig,
        state: SimulationState,
    ) -> SimResult<Self> {
        let mut engine = Self::build(run_id, config)?;
        engine.next_snapshot = state.elapsed_time;
        engine.state = state;
        Ok(engine)
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push(subsystem);
    }

    /// Advance one tick. This is the core simulation step.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        let current_tick = self.clock.advance();
        let ctx = TickContext::capture(current_tick, self.clock.dt, &self.state);
        let mut tick_events: Vec<SimEvent> = Vec::new();

        // Execute each subsystem in registration order.
        // Each subsystem sees all events emitted so far this tick.
        for subsystem in &mut self.subsystems {
            let new_events =
                subsystem.update(&ctx, &self.config, &mut self.state, &tick_events)?;

            for event in &new_events {
                let entry = EventLogEntry {
                    tick:       current_tick,
                    subsystem:  subsystem.name().to_string(),
                    event_type: event_type_name(event).to_string(),
                    payload:    serde_json::to_string(event)?,
                };
                self.store.append_event(entry);
            }

            tick_events.extend(new_events);
        }

        for event in &tick_events {
            if let SimEvent::Elevated { time, old_level, new_level, levels_gained, gain_percent, .. } = event {
                self.store.record_elevation(ElevationRecord {
                    time:          *time,
                    old_level:     *old_level,
                    new_level:     *new_level,
                    levels_gained: *levels_gained,
                    gain_percent:  *gain_percent,
                });
            }
        }

        if ctx.time >= self.next_snapshot {
            self.take_snapshot(self.next_snapshot);
            self.next_snapshot += self.config.run.snapshot_interval;
        }

        self.state.elapsed_time += self.clock.dt;
        Ok(tick_events)
    }

    /// Run n ticks in a loop, ignoring the stop conditions.
    /// Used for testing and scenario stepping.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<()> {
        self.record_run_initialized()?;
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Run until the time budget or the post-ascension grace period is
    /// exhausted and return the report.
    pub fn run(&mut self) -> SimResult<RunReport> {
        if self.is_finished() {
            return Err(SimError::RunFinished { tick: self.clock.current_tick });
        }
        self.record_run_initialized()?;
        log::info!(
            "run {} starting: dt={}s budget={}s ({} ticks max)",
            self.run_id,
            self.clock.dt,
            self.config.run.sim_time,
            self.clock.ticks_for(self.config.run.sim_time)
        );

        while !self.is_finished() {
            self.tick()?;
        }

        log::info!(
            "run {} finished at tick {} ({:.1} min): {:?}",
            self.run_id,
            self.clock.current_tick,
            self.state.elapsed_time / 60.0,
            RunOutcome::from_state(&self.state)
        );
        Ok(self.report())
    }

    /// True once the time budget is spent, or the grace period after the
    /// first ascension has elapsed.
    pub fn is_finished(&self) -> bool {
        let elapsed = self.state.elapsed_time;
        let past_grace = self
            .state
            .ascension_time
            .is_some_and(|t| elapsed > t + self.config.run.grace_period);
        elapsed >= self.config.run.sim_time || past_grace
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            run_id:      self.run_id.clone(),
            ticks:       self.clock.current_tick,
            snapshots:   self.store.snapshots().to_vec(),
            elevations:  self.store.elevations().to_vec(),
            outcome:     RunOutcome::from_state(&self.state),
            final_state: self.state.clone(),
        }
    }

    /// Query the elevation state machine's current phase.
    pub fn elevation_phase(&self) -> ElevationPhase {
        self.subsystems
            .iter()
            .find_map(|sub| {
                sub.as_any()
                    .downcast_ref::<ElevationSubsystem>()
                    .map(|e| e.phase)
            })
            .unwrap_or(ElevationPhase::CoolingDown)
    }

    /// Query the event log for a specific tick.
    /// Used by the determinism test and replay tooling.
    pub fn store_events_for_tick(&self, tick: Tick) -> &[EventLogEntry] {
        self.store.events_for_tick(tick)
    }

    fn record_run_initialized(&mut self) -> SimResult<()> {
        // Emit RunInitialized at tick 0 so every log starts the same way.
        if self.clock.current_tick != 0 || !self.store.events().is_empty() {
            return Ok(());
        }
        let init_event = SimEvent::RunInitialized { run_id: self.run_id.clone() };
        self.store.append_event(EventLogEntry {
            tick:       0,
            subsystem:  "engine".to_string(),
            event_type: event_type_name(&init_event).to_string(),
            payload:    serde_json::to_string(&init_event)?,
        });
        Ok(())
    }

    fn take_snapshot(&mut self, time: SimTime) {
        let snapshot =
            SimSnapshot::capture(time, &self.config, &self.state, self.elevation_phase());
        log::debug!(
            "t={time:.0}s coins={:.3e} rate={:.3e}/s x{}",
            snapshot.coins,
            snapshot.income_rate,
            snapshot.elevation_level
        );
        self.store.save_snapshot(snapshot);
    }
}

/// Extract a stable string name from a SimEvent variant.
/// Used for the event_type field of the event log.
fn event_type_name(event: &SimEvent) -> &'static str {
    match event {
        SimEvent::RunInitialized { .. }          => "run_initialized",
        SimEvent::GhostRecorded { .. }           => "ghost_recorded",
        SimEvent::TrackUnlocked { .. }           => "track_unlocked",
        SimEvent::RunnerSpawned { .. }           => "runner_spawned",
        SimEvent::SpeedUpgraded { .. }           => "speed_upgraded",
        SimEvent::RunnerEvolved { .. }           => "runner_evolved",
        SimEvent::Elevated { .. }                => "elevated",
        SimEvent::ElevationPurchaseCapped { .. } => "elevation_purchase_capped",
        SimEvent::AscensionReached { .. }        => "ascension_reached",
    }
}
