//! Priority weight of a variant.
//!
//! The weight is the product of four independent factors:
//! - recency: grows with the number of epochs since the last clean round
//! - frequency: shrinks as recent successes accumulate
//! - error: grows with recent mistakes
//! - newness: boosts variants played fewer than [`NEWNESS_THRESHOLD`] times
//!
//! Each factor is raised to a user-tunable power from [`WeightSettings`].

use serde::{Deserialize, Serialize};

use crate::variant::VariantStats;

/// Plays after which a variant no longer counts as new.
pub const NEWNESS_THRESHOLD: u32 = 7;

/// Exponents applied to the weight factors. Missing or `null` exponents load
/// as their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredWeightSettings")]
pub struct WeightSettings {
    pub recency_power: f64,
    pub frequency_power: f64,
    pub error_power: f64,
    pub newness_power: f64,
}

impl WeightSettings {
    pub const DEFAULT_RECENCY_POWER: f64 = 1.0;
    pub const DEFAULT_FREQUENCY_POWER: f64 = 2.0;
    pub const DEFAULT_ERROR_POWER: f64 = 2.0;
    pub const DEFAULT_NEWNESS_POWER: f64 = 2.0;

    /// Replace negative or non-finite exponents with their defaults.
    pub fn sanitized(self) -> Self {
        fn pick(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                fallback
            }
        }
        Self {
            recency_power: pick(self.recency_power, Self::DEFAULT_RECENCY_POWER),
            frequency_power: pick(self.frequency_power, Self::DEFAULT_FREQUENCY_POWER),
            error_power: pick(self.error_power, Self::DEFAULT_ERROR_POWER),
            newness_power: pick(self.newness_power, Self::DEFAULT_NEWNESS_POWER),
        }
    }
}

impl Default for WeightSettings {
    fn default() -> Self {
        Self {
            recency_power: Self::DEFAULT_RECENCY_POWER,
            frequency_power: Self::DEFAULT_FREQUENCY_POWER,
            error_power: Self::DEFAULT_ERROR_POWER,
            newness_power: Self::DEFAULT_NEWNESS_POWER,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct StoredWeightSettings {
    recency_power: Option<f64>,
    frequency_power: Option<f64>,
    error_power: Option<f64>,
    newness_power: Option<f64>,
}

impl From<StoredWeightSettings> for WeightSettings {
    fn from(stored: StoredWeightSettings) -> Self {
        Self {
            recency_power: stored.recency_power.unwrap_or(Self::DEFAULT_RECENCY_POWER),
            frequency_power: stored
                .frequency_power
                .unwrap_or(Self::DEFAULT_FREQUENCY_POWER),
            error_power: stored.error_power.unwrap_or(Self::DEFAULT_ERROR_POWER),
            newness_power: stored.newness_power.unwrap_or(Self::DEFAULT_NEWNESS_POWER),
        }
    }
}

/// Factors of one weight computation, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightFactors {
    pub recency: f64,
    pub frequency: f64,
    pub error: f64,
    pub newness: f64,
    pub weight: f64,
}

/// Compute the weight of a variant with the given statistics at `current_epoch`.
pub fn compute_factors(
    stats: &VariantStats,
    current_epoch: u32,
    settings: &WeightSettings,
) -> WeightFactors {
    let age = current_epoch.saturating_sub(stats.last_succeeded_epoch) as f64;
    let unplayed = NEWNESS_THRESHOLD.saturating_sub(stats.times_played) as f64;

    let recency = (1.0 + age).powf(settings.recency_power);
    let frequency = 1.0 / (1.0 + stats.success_ema).powf(settings.frequency_power);
    let error = (1.0 + stats.error_ema).powf(settings.error_power);
    let newness = (1.0 + unplayed).powf(settings.newness_power);

    WeightFactors {
        recency,
        frequency,
        error,
        newness,
        weight: recency * frequency * error * newness,
    }
}

/// Natural logarithm of the weight [`compute_factors`] would return. Stays
/// finite for exponents large enough to overflow the weight itself.
pub fn log_weight(stats: &VariantStats, current_epoch: u32, settings: &WeightSettings) -> f64 {
    let age = current_epoch.saturating_sub(stats.last_succeeded_epoch) as f64;
    let unplayed = NEWNESS_THRESHOLD.saturating_sub(stats.times_played) as f64;

    settings.recency_power * (1.0 + age).ln()
        - settings.frequency_power * (1.0 + stats.success_ema).ln()
        + settings.error_power * (1.0 + stats.error_ema).ln()
        + settings.newness_power * (1.0 + unplayed).ln()
}

#[cfg(test)]
#[path = "weight_tests.rs"]
mod weight_tests;
