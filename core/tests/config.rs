//! Constant table loading and validation.

use ascend_sim_core::{config::SimConfig, engine::SimEngine, error::SimError};

const SHIPPED_TABLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/economy.json");

#[test]
fn shipped_table_matches_defaults() {
    let loaded = SimConfig::load(SHIPPED_TABLE).expect("load shipped table");
    assert_eq!(loaded, SimConfig::default());
}

#[test]
fn defaults_are_valid() {
    SimConfig::default().validate().expect("default config");
    SimConfig::default_test().validate().expect("test config");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let config: SimConfig =
        serde_json::from_str(r#"{ "run": { "dt": 0.5 } }"#).expect("parse partial table");
    assert_eq!(config.run.dt, 0.5);
    assert_eq!(config.run.sim_time, SimConfig::default().run.sim_time);
    assert_eq!(config.tracks, SimConfig::default().tracks);
    assert_eq!(config.elevation, SimConfig::default().elevation);
}

#[test]
fn non_positive_base_time_is_rejected() {
    let mut config = SimConfig::default();
    config.tracks[2].base_time = 0.0;
    match config.validate() {
        Err(SimError::InvalidConfig { field, .. }) => assert_eq!(field, "tracks[2].base_time"),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn engine_refuses_invalid_config() {
    let mut config = SimConfig::default();
    config.run.dt = 0.0;
    match SimEngine::build("bad".to_string(), config) {
        Err(SimError::InvalidConfig { field, .. }) => assert_eq!(field, "run.dt"),
        Err(other) => panic!("expected InvalidConfig, got {other:?}"),
        Ok(_) => panic!("engine accepted dt = 0"),
    }
}

#[test]
fn missing_file_is_an_error() {
    let err = SimConfig::load("/nonexistent/economy.json").unwrap_err();
    assert!(err.to_string().contains("Cannot read"));
}
