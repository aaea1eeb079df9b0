//! Training days ("epochs") and load-time normalization.
//!
//! An epoch is a calendar day (UTC) on which the learner trained. However long
//! the break, the epoch counter only moves by one per load.

use chrono::{NaiveDate, Utc};
use drill_core::SUCCESS_DECAY;
use tracing::info;

use crate::snapshot::RepertoireSnapshot;

/// Source of the current date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Today's date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock stuck on one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Start a new epoch if `today` is after the last training day.
///
/// Returns whether an epoch started. A date at or before the last training
/// day (including a clock going backwards) changes nothing.
pub fn advance(snapshot: &mut RepertoireSnapshot, today: NaiveDate) -> bool {
    if today <= snapshot.last_played_date {
        return false;
    }

    snapshot.current_epoch = snapshot.current_epoch.saturating_add(1);
    snapshot.last_played_date = today;
    snapshot.daily_play_count = 0;
    for record in &mut snapshot.data {
        record.success_ema *= SUCCESS_DECAY;
    }

    info!(
        epoch = snapshot.current_epoch,
        date = %today,
        variants = snapshot.data.len(),
        "new training epoch"
    );
    true
}

/// Repair a freshly loaded snapshot, then start a new epoch if due.
///
/// Negative or non-finite statistics are reset to zero and the weight
/// settings sanitized. Returns whether an epoch started.
pub fn normalize(snapshot: &mut RepertoireSnapshot, today: NaiveDate) -> bool {
    fn clamp(value: f64) -> f64 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }

    for record in &mut snapshot.data {
        record.error_ema = clamp(record.error_ema);
        record.success_ema = clamp(record.success_ema);
    }
    snapshot.weight_settings = snapshot.weight_settings.sanitized();

    advance(snapshot, today)
}

#[cfg(test)]
#[path = "epoch_tests.rs"]
mod epoch_tests;
