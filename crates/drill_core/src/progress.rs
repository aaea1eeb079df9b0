//! Learning statistics updates at the end of a round.

use tracing::info;

use crate::error::SessionError;
use crate::variant::{Variant, VariantId};

/// Factor applied to `error_ema` on every completion touching a variant.
pub const ERROR_DECAY: f64 = 0.7;

/// Factor applied to `success_ema` once per new epoch. Roughly averages over
/// three epochs.
pub const SUCCESS_DECAY: f64 = 0.6667;

/// Mistakes made during the current round.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    has_errors: bool,
    errors: Vec<f64>,
}

impl RoundState {
    pub fn new(variant_count: usize) -> Self {
        Self {
            has_errors: false,
            errors: vec![0.0; variant_count],
        }
    }

    /// Record one mistake at a position shared by `variants`. The mistake is
    /// split evenly between them.
    pub fn mark_error(&mut self, variants: &[VariantId]) {
        self.has_errors = true;
        if variants.is_empty() {
            return;
        }
        let share = 1.0 / variants.len() as f64;
        for id in variants {
            if let Some(slot) = self.errors.get_mut(id.0) {
                *slot += share;
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Accumulated mistakes attributed to `variant` this round.
    pub fn errors_of(&self, variant: VariantId) -> f64 {
        self.errors.get(variant.0).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        self.has_errors = false;
        self.errors.iter_mut().for_each(|e| *e = 0.0);
    }
}

/// Result of completing a variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub variant: VariantId,
    /// True when the round had no mistakes.
    pub succeeded: bool,
    /// Variants whose error statistics were raised.
    pub penalized: Vec<VariantId>,
}

/// Apply the outcome of a round ending at a position reached by `reached`.
///
/// Exactly one variant must end there. On a clean round it is credited with
/// a success; otherwise every variant implicated in a mistake this round is
/// penalized, not only the completed one.
pub fn complete_variant(
    variants: &mut [Variant],
    round: &RoundState,
    reached: &[VariantId],
    position: &str,
) -> Result<Completion, SessionError> {
    let id = match reached {
        [] => {
            return Err(SessionError::UnknownPosition {
                position: position.to_string(),
            })
        }
        [id] => *id,
        _ => {
            return Err(SessionError::AmbiguousCompletion {
                position: position.to_string(),
                count: reached.len(),
            })
        }
    };

    let variant = &mut variants[id.0];
    variant.stats.times_played += 1;

    if !round.has_errors() {
        let stats = &mut variant.stats;
        stats.last_succeeded_epoch = variant.current_epoch;
        stats.error_ema *= ERROR_DECAY;
        stats.success_ema += 1.0 - SUCCESS_DECAY;
        info!(variant = %id, epoch = variant.current_epoch, "variant completed cleanly");
        return Ok(Completion {
            variant: id,
            succeeded: true,
            penalized: Vec::new(),
        });
    }

    let mut penalized = Vec::new();
    for (i, v) in variants.iter_mut().enumerate() {
        let errors = round.errors_of(VariantId(i));
        if errors > 0.0 {
            v.stats.error_ema = v.stats.error_ema * ERROR_DECAY + errors;
            v.stats.success_ema = 0.0;
            penalized.push(VariantId(i));
        }
    }
    info!(variant = %id, penalized = penalized.len(), "variant completed with errors");

    Ok(Completion {
        variant: id,
        succeeded: false,
        penalized,
    })
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod progress_tests;
