//! Forward projector: pure, exact on a single step, and never mutating.

use ascend_sim_core::{config::SimConfig, projector::project, state::SimulationState};

fn state_with_first_runner() -> SimulationState {
    let mut state = SimulationState::new();
    state.tracks[0].has_ghost = true;
    state.tracks[0].has_runner = true;
    state
}

#[test]
fn projection_does_not_touch_the_state() {
    let config = SimConfig::default();
    let mut state = state_with_first_runner();
    state.coins = 1_234.0;
    state.tracks[0].speed_level = 7;
    state.tracks[0].multiplier = 3.5;
    let before = state.clone();

    let projected = project(120.0, 2.0, &state, &config);

    assert_eq!(state, before, "project() mutated its input");
    assert!(projected > state.coins);
}

#[test]
fn zero_horizon_returns_current_coins() {
    let config = SimConfig::default();
    let mut state = state_with_first_runner();
    state.coins = 42.0;
    assert_eq!(project(0.0, 2.0, &state, &config), 42.0);
}

#[test]
fn single_step_matches_closed_form() {
    let config = SimConfig::default();
    let state = state_with_first_runner();

    // Runner on track 0 at speed 0 plus manual play on track 0,
    // both at multiplier 1 and elevation multiplier 1.
    let expected = (1.0 / 2.6 + 1.0 / 4.6) * 2.0;
    let projected = project(2.0, 2.0, &state, &config);
    assert!(
        (projected - expected).abs() < 1e-12,
        "expected {expected}, got {projected}"
    );
}

#[test]
fn last_step_is_shortened_to_the_horizon() {
    let config = SimConfig::default();
    let state = state_with_first_runner();

    // 3s at a 2s step is one full step and one 1s step, the same
    // first step as a 2s projection.
    let two = project(2.0, 2.0, &state, &config);
    let three = project(3.0, 2.0, &state, &config);
    let four = project(4.0, 2.0, &state, &config);
    assert!(two < three && three < four);
}

#[test]
fn projection_grows_with_horizon() {
    let config = SimConfig::default();
    let state = state_with_first_runner();
    let mut last = state.coins;
    for horizon in [10.0, 30.0, 60.0, 120.0, 300.0] {
        let projected = project(horizon, 2.0, &state, &config);
        assert!(projected > last, "horizon {horizon}: {projected} <= {last}");
        last = projected;
    }
}
