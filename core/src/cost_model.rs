//! Cost/reward model: pure functions of progression state.
//!
//! Nothing here reads or writes simulation state except through the
//! arguments. All curves come from `SimConfig`.

use crate::{
    config::SimConfig,
    state::SimulationState,
    types::TrackIndex,
};
use serde::{Deserialize, Serialize};

/// Result of greedily buying elevation levels with a coin budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationPurchase {
    pub levels:     u64,
    pub total_cost: f64,
    /// The iteration ceiling stopped the loop while levels were still
    /// affordable.
    pub capped:     bool,
}

/// Price of the next speed level on `track`.
///
/// `base(L) = 5 * 2^L + 10 * L` evaluated at
/// `stars * max_speed_level + speed_level + track offset`, scaled by the
/// track multiplier and the early-level boost.
pub fn upgrade_cost(
    config: &SimConfig,
    speed_level: u32,
    track: TrackIndex,
    star_count: u32,
) -> f64 {
    let t = config.track(track);
    let total_level = f64::from(star_count) * f64::from(config.progression.max_speed_level)
        + f64::from(speed_level);
    let effective = total_level + f64::from(t.cost_offset);
    let base = 5.0 * 2f64.powf(effective) + 10.0 * effective;
    base * t.cost_multiplier * early_boost(config, speed_level, track, star_count)
}

/// Front-loaded friction for the first evolution cycle of harder tracks.
/// Full boost at level 0, linear decay to 1.0 at the threshold.
pub fn early_boost(
    config: &SimConfig,
    speed_level: u32,
    track: TrackIndex,
    star_count: u32,
) -> f64 {
    let threshold = config.progression.early_boost_threshold;
    if star_count > 0 || speed_level >= threshold {
        return 1.0;
    }
    let max_boost = config.track(track).early_boost;
    if max_boost <= 1.0 {
        return 1.0;
    }
    let decay = f64::from(threshold - speed_level) / f64::from(threshold);
    1.0 + (max_boost - 1.0) * decay
}

/// Cost of buying elevation level `level + 1` from `level`:
/// `base * growth ^ (level ^ curve)`.
pub fn elevation_cost(config: &SimConfig, level: u64) -> f64 {
    let e = &config.elevation;
    let effective = (level as f64).powf(e.cost_curve);
    e.base_cost * e.cost_growth.powf(effective)
}

/// The unflattened curve `base * growth ^ level`, kept for comparison.
pub fn naive_elevation_cost(config: &SimConfig, level: u64) -> f64 {
    let e = &config.elevation;
    e.base_cost * e.cost_growth.powf(level as f64)
}

/// Greedily sum consecutive elevation costs starting at `current_level`
/// while the running total stays within `available_coins`.
pub fn cumulative_elevation_purchase(
    config: &SimConfig,
    current_level: u64,
    available_coins: f64,
) -> ElevationPurchase {
    let mut purchase = ElevationPurchase::default();
    if available_coins.is_nan() || available_coins <= 0.0 {
        return purchase;
    }

    let ceiling = u64::from(config.elevation.max_purchase_iterations);
    let mut level = current_level;
    loop {
        let next = purchase.total_cost + elevation_cost(config, level);
        if next > available_coins {
            break;
        }
        if purchase.levels >= ceiling {
            purchase.capped = true;
            break;
        }
        purchase.total_cost = next;
        purchase.levels += 1;
        level += 1;
    }
    purchase
}

/// Multiplier growth per runner completion: `increment * power ^ stars`.
pub fn runner_multiplier_increment(config: &SimConfig, star_count: u32) -> f64 {
    let p = &config.progression;
    p.runner_increment * p.evolution_power.powf(f64::from(star_count))
}

/// Runner completions per second on `track` at `speed_level`.
pub fn completion_rate(config: &SimConfig, track: TrackIndex, speed_level: u32) -> f64 {
    let speed = 1.0 + f64::from(speed_level) * config.progression.speed_per_level;
    speed / config.track(track).base_time
}

/// Manual completions per second on `track`.
pub fn manual_run_rate(config: &SimConfig, track: TrackIndex) -> f64 {
    1.0 / (config.track(track).base_time + config.progression.manual_overhead)
}

/// Income gained per second by one more speed level on `track`.
pub fn speed_upgrade_income_delta(
    config: &SimConfig,
    track: TrackIndex,
    mult_product: f64,
    elev_mult: f64,
) -> f64 {
    let t = config.track(track);
    config.progression.speed_per_level / t.base_time * t.base_reward * mult_product * elev_mult
}

/// Coins paid by one completion on the best unlocked track.
pub fn best_run_reward(config: &SimConfig, state: &SimulationState) -> f64 {
    let scale = state.multiplier_product() * state.elevation_multiplier();
    state
        .tracks
        .iter()
        .zip(config.tracks.iter())
        .filter(|(t, _)| t.map_unlocked)
        .map(|(_, c)| c.base_reward * scale)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_boost_decays_to_one_at_threshold() {
        let config = SimConfig::default();
        assert_eq!(early_boost(&config, 0, 4, 0), 3.0);
        assert!((early_boost(&config, 5, 4, 0) - 2.0).abs() < 1e-12);
        assert_eq!(early_boost(&config, 10, 4, 0), 1.0);
        assert_eq!(early_boost(&config, 0, 4, 1), 1.0);
        assert_eq!(early_boost(&config, 0, 0, 0), 1.0);
    }

    #[test]
    fn upgrade_cost_matches_base_formula_on_first_track() {
        let config = SimConfig::default();
        // effective level 3: 5 * 8 + 30
        assert_eq!(upgrade_cost(&config, 3, 0, 0), 70.0);
    }

    #[test]
    fn upgrade_cost_saturates_on_extreme_tables() {
        let mut config = SimConfig::default();
        config.progression.max_speed_level = u32::MAX;
        config.progression.max_stars = u32::MAX;

        let cost = upgrade_cost(&config, u32::MAX - 1, 4, u32::MAX);
        assert!(cost.is_infinite() && cost > 0.0);
        assert!(upgrade_cost(&config, 3, 0, 0) < upgrade_cost(&config, 3, 0, 1));
    }
}
