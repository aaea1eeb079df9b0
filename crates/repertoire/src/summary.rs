//! At-a-glance health of a repertoire.
//!
//! The age of a line is the number of epochs since it was last completed
//! without a mistake.

use std::collections::VecDeque;

use crate::snapshot::RepertoireSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepertoireSummary {
    pub total: usize,
    /// Largest age.
    pub oldest: u32,
    /// Lines at the largest age.
    pub oldest_count: usize,
    /// Age at the 80th percentile.
    pub eightieth: u32,
    /// Oldest lines to replay before the 80th percentile drops by one.
    pub eightieth_count: usize,
    /// Lines with an error average above one.
    pub errors_count: usize,
    pub daily_count: u32,
}

impl RepertoireSummary {
    pub fn from_snapshot(snapshot: &RepertoireSnapshot) -> Self {
        if snapshot.data.is_empty() {
            return Self::default();
        }

        let mut ages: Vec<u32> = snapshot
            .data
            .iter()
            .map(|r| snapshot.current_epoch.saturating_sub(r.last_succeeded_epoch))
            .collect();
        ages.sort_unstable();

        let oldest = ages[ages.len() - 1];
        let eightieth = ages[percentile_rank(ages.len())];

        Self {
            total: ages.len(),
            oldest,
            oldest_count: ages.iter().filter(|&&a| a == oldest).count(),
            eightieth,
            eightieth_count: eightieth_count(&ages, eightieth),
            errors_count: snapshot.data.iter().filter(|r| r.error_ema > 1.0).count(),
            daily_count: snapshot.daily_play_count,
        }
    }
}

fn percentile_rank(len: usize) -> usize {
    (0.8 * (len - 1) as f64).floor() as usize
}

/// Number of oldest lines that must be replayed, each dropping to age 0,
/// until the 80th percentile age is at most `eightieth - 1`.
pub fn eightieth_count(ages: &[u32], eightieth: u32) -> usize {
    if eightieth <= 1 {
        return 0;
    }
    let target = eightieth - 1;

    let mut sorted = ages.to_vec();
    sorted.sort_unstable();
    let mut ages: VecDeque<u32> = sorted.into();

    let mut count = 0;
    while !ages.is_empty() {
        if ages[percentile_rank(ages.len())] <= target {
            break;
        }
        ages.pop_back();
        ages.push_front(0);
        count += 1;
    }
    count
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod summary_tests;
