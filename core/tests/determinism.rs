//! Two engines, same config, same run length.
//! They must produce bit-identical state, snapshots and event logs.

use ascend_sim_core::{config::SimConfig, engine::SimEngine};

fn build_engine(config: SimConfig) -> SimEngine {
    SimEngine::build("det-test".to_string(), config).expect("build engine")
}

fn collect_event_log(engine: &SimEngine) -> Vec<String> {
    (0..=engine.clock.current_tick)
        .flat_map(|tick| {
            engine
                .store_events_for_tick(tick)
                .iter()
                .map(|e| e.payload.clone())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn same_config_produces_identical_runs() {
    let mut config = SimConfig::default();
    config.run.sim_time = 14_400.0;

    let mut engine_a = build_engine(config.clone());
    let mut engine_b = build_engine(config);

    let report_a = engine_a.run().expect("engine_a run");
    let report_b = engine_b.run().expect("engine_b run");

    assert_eq!(report_a.ticks, report_b.ticks);
    assert_eq!(
        report_a.final_state.coins.to_bits(),
        report_b.final_state.coins.to_bits(),
        "Final coins diverged: {} vs {}",
        report_a.final_state.coins,
        report_b.final_state.coins
    );
    assert_eq!(report_a.final_state.elevation_level, report_b.final_state.elevation_level);

    let snaps_a = serde_json::to_string(&report_a.snapshots).unwrap();
    let snaps_b = serde_json::to_string(&report_b.snapshots).unwrap();
    assert_eq!(snaps_a, snaps_b, "Snapshot sequences diverged");

    let log_a = collect_event_log(&engine_a);
    let log_b = collect_event_log(&engine_b);
    assert_eq!(
        log_a.len(), log_b.len(),
        "Event log lengths differ: {} vs {}",
        log_a.len(), log_b.len()
    );
    for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
        assert_eq!(a, b, "Event log diverged at entry {i}:\n  A: {a}\n  B: {b}");
    }
}

#[test]
fn different_configs_produce_different_runs() {
    let base = SimConfig::default_test();
    let mut slower = base.clone();
    slower.tracks[0].base_time = 5.0;

    let report_a = build_engine(base).run().expect("run a");
    let report_b = build_engine(slower).run().expect("run b");

    assert_ne!(
        report_a.final_state.coins.to_bits(),
        report_b.final_state.coins.to_bits(),
        "Changing a constant had no observable effect"
    );
}
