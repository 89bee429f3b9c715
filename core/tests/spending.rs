//! Purchase policy: unlocks, runners, ROI-ranked speed upgrades, evolution.

use ascend_sim_core::{
    config::SimConfig,
    event::{SimEvent, UnlockTrigger},
    spending_subsystem::SpendingSubsystem,
    state::SimulationState,
    subsystem::{SimSubsystem, TickContext},
};

fn run_spending(config: &SimConfig, state: &mut SimulationState) -> Vec<SimEvent> {
    let ctx = TickContext::capture(1, config.run.dt, state);
    SpendingSubsystem::new()
        .update(&ctx, config, state, &[])
        .expect("spending update")
}

fn runner_on(state: &mut SimulationState, track: usize) {
    let t = &mut state.tracks[track];
    t.map_unlocked = true;
    t.has_ghost = true;
    t.has_runner = true;
}

#[test]
fn affordable_tracks_are_bought() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    state.coins = 150.0;

    let events = run_spending(&config, &mut state);

    assert!(state.tracks[1].map_unlocked);
    assert!(!state.tracks[2].map_unlocked, "500 is not affordable after paying 100");
    assert_eq!(state.coins, 50.0);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::TrackUnlocked { track: 1, trigger: UnlockTrigger::Purchase, .. }
    )));
}

#[test]
fn ghosted_tracks_get_a_free_runner() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    state.tracks[0].has_ghost = true;

    let events = run_spending(&config, &mut state);

    assert!(state.tracks[0].has_runner);
    assert_eq!(state.coins, 0.0);
    assert!(events.contains(&SimEvent::RunnerSpawned { tick: 1, track: 0 }));
}

#[test]
fn runner_milestone_unlocks_next_track_once_per_elevation() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    runner_on(&mut state, 0);
    state.tracks[0].speed_level = config.progression.unlock_trigger_level;

    let events = run_spending(&config, &mut state);
    assert!(state.tracks[1].map_unlocked);
    assert!(state.tracks[0].auto_unlocked_next);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::TrackUnlocked { track: 1, trigger: UnlockTrigger::RunnerMilestone, .. }
    )));

    let again = run_spending(&config, &mut state);
    assert!(
        !again.iter().any(|e| matches!(e, SimEvent::TrackUnlocked { .. })),
        "guard should stop a second auto-unlock in the same epoch"
    );

    state.reset_for_elevation();
    assert!(!state.tracks[1].map_unlocked);
    assert!(!state.tracks[0].auto_unlocked_next);

    runner_on(&mut state, 0);
    state.tracks[0].speed_level = config.progression.unlock_trigger_level;
    let after_reset = run_spending(&config, &mut state);
    assert!(after_reset.iter().any(|e| matches!(
        e,
        SimEvent::TrackUnlocked { track: 1, trigger: UnlockTrigger::RunnerMilestone, .. }
    )));
}

#[test]
fn auto_unlock_below_trigger_level_does_nothing() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    runner_on(&mut state, 0);
    state.tracks[0].speed_level = config.progression.unlock_trigger_level - 1;

    run_spending(&config, &mut state);
    assert!(!state.tracks[1].map_unlocked);
    assert!(!state.tracks[0].auto_unlocked_next);
}

#[test]
fn best_upgrade_picks_lowest_payback() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    runner_on(&mut state, 0);
    runner_on(&mut state, 1);
    state.coins = 1_000.0;

    let ctx = TickContext::capture(1, config.run.dt, &state);
    let choice = SpendingSubsystem::best_upgrade(&ctx, &config, &state).expect("an upgrade");

    // Track 0: cost 5 for 0.1/2.6 coins/s. Track 1: cost 42 for 0.1 coins/s.
    assert_eq!(choice.track, 0);
    assert_eq!(choice.cost, 5.0);
    assert!((choice.payback_secs - 130.0).abs() < 1e-9);
}

#[test]
fn spend_cap_limits_upgrades() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    runner_on(&mut state, 0);

    state.coins = 8.0;
    let ctx = TickContext::capture(1, config.run.dt, &state);
    assert!(
        SpendingSubsystem::best_upgrade(&ctx, &config, &state).is_none(),
        "cost 5 exceeds 60% of 8 coins"
    );

    state.coins = 9.0;
    let ctx = TickContext::capture(1, config.run.dt, &state);
    let choice = SpendingSubsystem::best_upgrade(&ctx, &config, &state).expect("an upgrade");
    assert_eq!(choice.track, 0);
}

#[test]
fn slow_payback_upgrades_are_skipped() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    runner_on(&mut state, 0);
    state.tracks[0].speed_level = 2;
    state.coins = 1e6;

    // cost 40 at 0.1/2.6 coins/s pays back in 1040s.
    let ctx = TickContext::capture(1, config.run.dt, &state);
    assert!(SpendingSubsystem::best_upgrade(&ctx, &config, &state).is_none());
}

#[test]
fn upgrade_loop_never_overspends() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    for track in 0..5 {
        runner_on(&mut state, track);
    }
    state.tracks.iter_mut().for_each(|t| t.multiplier = 50.0);
    state.coins = 1e7;

    let events = run_spending(&config, &mut state);

    assert!(state.coins >= 0.0);
    assert!(events.iter().any(|e| matches!(e, SimEvent::SpeedUpgraded { .. })));
    for track in &state.tracks {
        assert!(track.speed_level <= config.progression.max_speed_level);
    }
}

#[test]
fn maxed_runner_evolves() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    runner_on(&mut state, 0);
    state.tracks[0].speed_level = config.progression.max_speed_level;

    let events = run_spending(&config, &mut state);

    assert_eq!(state.tracks[0].star_count, 1);
    assert_eq!(state.tracks[0].speed_level, 0);
    assert!(events.contains(&SimEvent::RunnerEvolved { tick: 1, track: 0, stars: 1 }));
}

#[test]
fn fully_evolved_runner_stays_put() {
    let config = SimConfig::default();
    let mut state = SimulationState::new();
    runner_on(&mut state, 0);
    state.tracks[0].speed_level = config.progression.max_speed_level;
    state.tracks[0].star_count = config.progression.max_stars;

    let events = run_spending(&config, &mut state);

    assert_eq!(state.tracks[0].star_count, config.progression.max_stars);
    assert_eq!(state.tracks[0].speed_level, config.progression.max_speed_level);
    assert!(!events.iter().any(|e| matches!(e, SimEvent::RunnerEvolved { .. })));
}
