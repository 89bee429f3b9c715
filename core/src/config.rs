//! Injected constant tables: track curves, progression caps, elevation
//! cost curve, strategy thresholds and run parameters.
//!
//! Every number the engine uses comes from here. A designer edits
//! `data/economy.json` (or builds a `SimConfig` in code) and re-runs.
//! Sections missing from a JSON file fall back to the shipped defaults.

use crate::{
    error::{SimError, SimResult},
    types::{TrackIndex, TRACK_COUNT},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub label: String,
    /// Seconds for one completion at speed level 0.
    pub base_time: f64,
    /// Coins per completion before multipliers.
    pub base_reward: f64,
    pub unlock_price: f64,
    /// Added to the total speed level before the cost curve is applied.
    pub cost_offset: u32,
    pub cost_multiplier: f64,
    /// Cost multiplier at speed level 0 of the first evolution cycle.
    /// Decays linearly to 1.0 at `early_boost_threshold`.
    pub early_boost: f64,
}

impl TrackConfig {
    fn new(
        label: &str,
        base_time: f64,
        base_reward: f64,
        unlock_price: f64,
        cost_offset: u32,
        cost_multiplier: f64,
        early_boost: f64,
    ) -> Self {
        Self {
            label: label.into(),
            base_time,
            base_reward,
            unlock_price,
            cost_offset,
            cost_multiplier,
            early_boost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Completion-rate bonus per speed level (+10% = 0.10).
    pub speed_per_level:       f64,
    pub max_speed_level:       u32,
    pub max_stars:             u32,
    pub early_boost_threshold: u32,
    /// Runner multiplier growth per completion at 0 stars.
    pub runner_increment:      f64,
    /// Each star multiplies the runner increment by this factor.
    pub evolution_power:       f64,
    /// Multiplier growth per manual completion.
    pub manual_increment:      f64,
    /// Seconds lost per manual run (walking back, restarting).
    pub manual_overhead:       f64,
    /// Runner speed level that unlocks the next track for free.
    pub unlock_trigger_level:  u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            speed_per_level:       0.10,
            max_speed_level:       20,
            max_stars:             5,
            early_boost_threshold: 10,
            runner_increment:      0.1,
            evolution_power:       3.0,
            manual_increment:      0.1,
            manual_overhead:       2.0,
            unlock_trigger_level:  5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    pub base_cost:   f64,
    pub cost_growth: f64,
    /// Exponent applied to the level before `cost_growth`. Below 1.0 the
    /// curve flattens at high levels.
    pub cost_curve:  f64,
    /// Hard ceiling on levels summed by one cumulative purchase.
    pub max_purchase_iterations: u32,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            base_cost:   30_000.0,
            cost_growth: 1.15,
            cost_curve:  0.77,
            max_purchase_iterations: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Seconds after an elevation before the next one is considered.
    pub cooldown_secs:           f64,
    /// Minimum levels bought by a single elevation.
    pub min_levels:              u32,
    /// `levels_now / max(1, current_level)` must reach this.
    pub min_gain_fraction:       f64,
    /// Elevate once waiting the projection horizon would add less than
    /// this fraction of `levels_now`.
    pub marginal_threshold:      f64,
    /// Upgrades paying back slower than this are skipped.
    pub payback_ceiling_secs:    f64,
    /// A single upgrade may spend at most this fraction of current coins.
    pub spend_cap:               f64,
    pub projection_horizon_secs: f64,
    pub projection_step_secs:    f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            cooldown_secs:           30.0,
            min_levels:              3,
            min_gain_fraction:       0.3,
            marginal_threshold:      0.25,
            payback_ceiling_secs:    600.0,
            spend_cap:               0.6,
            projection_horizon_secs: 120.0,
            projection_step_secs:    2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Fixed tick size in simulated seconds.
    pub dt:                  f64,
    /// Total simulated time budget.
    pub sim_time:            f64,
    pub snapshot_interval:   f64,
    /// Seconds kept running after the milestone is first reached.
    pub grace_period:        f64,
    pub ascension_threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt:                  0.25,
            sim_time:            14_400.0,
            snapshot_interval:   120.0,
            grace_period:        600.0,
            ascension_threshold: 1e16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tracks:      [TrackConfig; TRACK_COUNT],
    pub progression: ProgressionConfig,
    pub elevation:   ElevationConfig,
    pub strategy:    StrategyConfig,
    pub run:         RunConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tracks: [
                TrackConfig::new("red",    2.6,   1.0,      0.0, 0, 1.0, 1.0),
                TrackConfig::new("orange", 5.0,   5.0,    100.0, 1, 1.4, 1.5),
                TrackConfig::new("yellow", 10.0,  25.0,   500.0, 2, 1.9, 2.0),
                TrackConfig::new("green",  15.0,  100.0, 2500.0, 3, 2.6, 2.5),
                TrackConfig::new("blue",   20.0,  500.0, 10000.0, 4, 3.5, 3.0),
            ],
            progression: ProgressionConfig::default(),
            elevation:   ElevationConfig::default(),
            strategy:    StrategyConfig::default(),
            run:         RunConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load a constant table from a JSON file and validate it.
    /// In tests, use SimConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Shipped economy with a short time budget, for tests.
    pub fn default_test() -> Self {
        let mut config = Self::default();
        config.run.sim_time = 1_800.0;
        config.run.snapshot_interval = 60.0;
        config
    }

    pub fn track(&self, index: TrackIndex) -> &TrackConfig {
        &self.tracks[index]
    }

    /// Reject tables the engine cannot run: non-positive times and steps,
    /// negative prices, and curves outside their meaningful range.
    pub fn validate(&self) -> SimResult<()> {
        for (i, track) in self.tracks.iter().enumerate() {
            require(track.base_time > 0.0, format!("tracks[{i}].base_time"), "must be > 0")?;
            require(track.base_reward >= 0.0, format!("tracks[{i}].base_reward"), "must be >= 0")?;
            require(track.unlock_price >= 0.0, format!("tracks[{i}].unlock_price"), "must be >= 0")?;
            require(track.cost_multiplier > 0.0, format!("tracks[{i}].cost_multiplier"), "must be > 0")?;
            require(track.early_boost > 0.0, format!("tracks[{i}].early_boost"), "must be > 0")?;
        }

        let p = &self.progression;
        require(p.speed_per_level > 0.0, "progression.speed_per_level", "must be > 0")?;
        require(p.max_speed_level > 0, "progression.max_speed_level", "must be > 0")?;
        require(p.early_boost_threshold > 0, "progression.early_boost_threshold", "must be > 0")?;
        require(p.runner_increment > 0.0, "progression.runner_increment", "must be > 0")?;
        require(p.evolution_power >= 1.0, "progression.evolution_power", "must be >= 1")?;
        require(p.manual_increment >= 0.0, "progression.manual_increment", "must be >= 0")?;
        require(p.manual_overhead >= 0.0, "progression.manual_overhead", "must be >= 0")?;

        let e = &self.elevation;
        require(e.base_cost > 0.0, "elevation.base_cost", "must be > 0")?;
        require(e.cost_growth > 1.0, "elevation.cost_growth", "must be > 1")?;
        require(
            e.cost_curve > 0.0 && e.cost_curve <= 1.0,
            "elevation.cost_curve",
            "must be in (0, 1]",
        )?;
        require(e.max_purchase_iterations > 0, "elevation.max_purchase_iterations", "must be > 0")?;

        let s = &self.strategy;
        require(s.cooldown_secs >= 0.0, "strategy.cooldown_secs", "must be >= 0")?;
        require(s.min_levels > 0, "strategy.min_levels", "must be > 0")?;
        require(s.min_gain_fraction >= 0.0, "strategy.min_gain_fraction", "must be >= 0")?;
        require(s.marginal_threshold > 0.0, "strategy.marginal_threshold", "must be > 0")?;
        require(s.payback_ceiling_secs > 0.0, "strategy.payback_ceiling_secs", "must be > 0")?;
        require(
            s.spend_cap > 0.0 && s.spend_cap <= 1.0,
            "strategy.spend_cap",
            "must be in (0, 1]",
        )?;
        require(s.projection_horizon_secs >= 0.0, "strategy.projection_horizon_secs", "must be >= 0")?;
        require(s.projection_step_secs > 0.0, "strategy.projection_step_secs", "must be > 0")?;

        let r = &self.run;
        require(r.dt > 0.0, "run.dt", "must be > 0")?;
        require(r.sim_time >= 0.0, "run.sim_time", "must be >= 0")?;
        require(r.snapshot_interval > 0.0, "run.snapshot_interval", "must be > 0")?;
        require(r.grace_period >= 0.0, "run.grace_period", "must be >= 0")?;
        require(r.ascension_threshold > 0.0, "run.ascension_threshold", "must be > 0")?;
        Ok(())
    }
}

fn require(ok: bool, field: impl Into<String>, reason: &str) -> SimResult<()> {
    if ok {
        Ok(())
    } else {
        Err(SimError::invalid_config(field, reason))
    }
}
