//! sim-runner: headless economy runner for the ascend idle game.
//!
//! Usage:
//!   sim-runner
//!   sim-runner --config data/economy.json --sim-time 7200 --dt 0.25
//!   sim-runner --snapshot-interval 60 --json > run.json

use anyhow::Result;
use ascend_sim_core::{
    config::SimConfig,
    cost_model::{elevation_cost, naive_elevation_cost},
    engine::SimEngine,
    report::{RunOutcome, RunReport},
};
use std::env;

const COMPARISON_LEVELS: [u64; 8] = [1, 5, 10, 20, 50, 100, 200, 500];

#[derive(serde::Serialize)]
struct CostRow {
    level:     u64,
    naive:     f64,
    flattened: f64,
    ratio:     f64,
}

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    report:          &'a RunReport,
    cost_comparison: Vec<CostRow>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let mut config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    config.run.sim_time = parse_arg(&args, "--sim-time", config.run.sim_time);
    config.run.dt = parse_arg(&args, "--dt", config.run.dt);
    config.run.snapshot_interval =
        parse_arg(&args, "--snapshot-interval", config.run.snapshot_interval);

    let run_id = format!("run-{}", chrono::Utc::now().format("%Y%m%d-%H%M%S"));

    if !json {
        println!("Ascend economy simulation: sim-runner");
        println!("  run_id:    {run_id}");
        println!("  config:    {}", config_path.unwrap_or("(built-in defaults)"));
        println!("  sim time:  {:.0}s ({:.1}h)", config.run.sim_time, config.run.sim_time / 3600.0);
        println!("  dt:        {}s", config.run.dt);
        println!();
    }

    let mut engine = SimEngine::build(run_id, config)?;
    let report = engine.run()?;
    let rows = cost_comparison(&engine.config);

    if json {
        let out = JsonOutput { report: &report, cost_comparison: rows };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_snapshots(&report);
        print_elevations(&report);
        print_cost_comparison(&rows);
        print_outcome(&engine, &report);
    }

    Ok(())
}

fn cost_comparison(config: &SimConfig) -> Vec<CostRow> {
    COMPARISON_LEVELS
        .iter()
        .map(|&level| {
            let naive = naive_elevation_cost(config, level);
            let flattened = elevation_cost(config, level);
            CostRow { level, naive, flattened, ratio: naive / flattened }
        })
        .collect()
}

fn print_snapshots(report: &RunReport) {
    println!("=== SNAPSHOTS ===");
    println!(
        "  {:>6} | {:>9} | {:>9} | {:>6} | {:>4} | {:>9} | {:>9} | {:>3} | {:>3} | {:<14} | {:<14} | phase",
        "min", "coins", "coins/s", "elev", "#", "mult", "best run", "run", "map",
        "speed", "stars"
    );
    for s in &report.snapshots {
        println!(
            "  {:>6.1} | {:>9} | {:>9} | {:>6} | {:>4} | {:>9} | {:>9} | {:>3} | {:>3} | {:<14} | {:<14} | {:?}",
            s.time / 60.0,
            fmt_num(s.coins),
            fmt_num(s.income_rate),
            format!("x{}", s.elevation_level),
            s.elevation_count,
            fmt_num(s.multiplier_product),
            fmt_num(s.best_run_reward),
            s.active_runner_count,
            s.unlocked_track_count,
            join(&s.speed_levels),
            join(&s.star_counts),
            s.elevation_phase,
        );
    }
    println!();
}

fn print_elevations(report: &RunReport) {
    println!("=== ELEVATIONS ===");
    if report.elevations.is_empty() {
        println!("  (none)");
    }
    for (i, e) in report.elevations.iter().enumerate() {
        println!(
            "  #{:<3} {:>6.1} min | x{} -> x{} | +{} levels (+{:.0}%)",
            i + 1,
            e.time / 60.0,
            e.old_level,
            e.new_level,
            e.levels_gained,
            e.gain_percent
        );
    }
    println!();
}

fn print_cost_comparison(rows: &[CostRow]) {
    println!("=== ELEVATION COST: NAIVE vs FLATTENED ===");
    println!("  {:>6} | {:>10} | {:>10} | {:>10}", "level", "naive", "flattened", "ratio");
    for r in rows {
        println!(
            "  {:>6} | {:>10} | {:>10} | {:>10}",
            r.level,
            fmt_num(r.naive),
            fmt_num(r.flattened),
            fmt_num(r.ratio)
        );
    }
    println!();
}

fn print_outcome(engine: &SimEngine, report: &RunReport) {
    println!("=== RUN SUMMARY ===");
    println!("  ticks run:   {}", report.ticks);
    println!("  sim time:    {:.1} min", engine.state.elapsed_time / 60.0);
    println!("  elevations:  {}", engine.state.elevation_count);
    match &report.outcome {
        RunOutcome::Reached { time } => println!(
            "  ASCENSION reached at {:.1} min ({:.2}h)",
            time / 60.0,
            time / 3600.0
        ),
        RunOutcome::NotReached { final_coins, elevation_level } => println!(
            "  ASCENSION NOT reached: {} coins at x{elevation_level} (threshold {})",
            fmt_num(*final_coins),
            fmt_num(engine.config.run.ascension_threshold)
        ),
    }
}

/// Compact magnitude formatting: 1.23K, 4.56M ... up to Q, scientific beyond.
fn fmt_num(n: f64) -> String {
    const SUFFIXES: [(f64, &str); 5] = [(1e15, "Q"), (1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    if !n.is_finite() {
        return n.to_string();
    }
    if n.abs() >= 1e18 {
        return format!("{n:.2e}");
    }
    for (scale, suffix) in SUFFIXES {
        if n.abs() >= scale {
            return format!("{:.2}{suffix}", n / scale);
        }
    }
    format!("{n:.2}")
}

fn join(values: &[u32]) -> String {
    values.iter().map(u32::to_string).collect::<Vec<_>>().join("/")
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    let Some(raw) = args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str()) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("Ignoring {flag} {raw:?}: not a valid value, keeping the default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_numbers() {
        assert_eq!(fmt_num(12.0), "12.00");
        assert_eq!(fmt_num(1_500.0), "1.50K");
        assert_eq!(fmt_num(2_500_000.0), "2.50M");
        assert_eq!(fmt_num(3e9), "3.00B");
        assert_eq!(fmt_num(4e12), "4.00T");
        assert_eq!(fmt_num(5e15), "5.00Q");
        assert_eq!(fmt_num(6e20), "6.00e20");
    }

    #[test]
    fn unparsable_flag_keeps_default() {
        let args: Vec<String> = ["sim-runner", "--dt", "fast", "--sim-time", "600"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(parse_arg(&args, "--dt", 0.25), 0.25);
        assert_eq!(parse_arg(&args, "--sim-time", 14_400.0), 600.0);
        assert_eq!(parse_arg(&args, "--snapshot-interval", 120.0), 120.0);
    }

    #[test]
    fn flattened_curve_is_cheaper_past_level_one() {
        let rows = cost_comparison(&SimConfig::default());
        assert_eq!(rows.len(), COMPARISON_LEVELS.len());
        assert_eq!(rows[0].ratio, 1.0);
        assert!(rows[1..].iter().all(|r| r.ratio > 1.0));
    }
}
