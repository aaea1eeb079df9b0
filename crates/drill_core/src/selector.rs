//! Weighted choice of the next move.
//!
//! Selection runs in four steps: enumerate legal moves, keep those leading to
//! an indexed position (claiming the variants found there), weigh the claimed
//! variants, then sample one of them with a single uniform draw. The result is
//! returned as a [`Selection`]; variants themselves are never touched.

use rand::Rng;
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::fen::normalize;
use crate::index::PositionIndex;
use crate::rules::{CandidateMove, RulesEngine};
use crate::variant::{Variant, VariantId};
use crate::weight::{compute_factors, log_weight, WeightFactors, WeightSettings};

/// An applicable variant together with the move that continues it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub variant: VariantId,
    pub mv: CandidateMove,
    pub factors: WeightFactors,
    pub probability: f64,
}

/// Outcome of one call to [`MoveSelector::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub position: String,
    pub ply: usize,
    /// The uniform draw in `[0, 1)` used for sampling.
    pub draw: f64,
    /// Index into `candidates` of the chosen variant.
    pub chosen: usize,
    /// Applicable variants in claim order.
    pub candidates: Vec<Candidate>,
}

impl Selection {
    pub fn chosen(&self) -> &Candidate {
        &self.candidates[self.chosen]
    }

    pub fn mv(&self) -> &CandidateMove {
        &self.chosen().mv
    }

    pub fn is_picked(&self, variant: VariantId) -> bool {
        self.chosen().variant == variant
    }

    pub fn candidate(&self, variant: VariantId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.variant == variant)
    }
}

/// Borrowed view over a session's state that picks the next move.
pub struct MoveSelector<'a> {
    rules: &'a dyn RulesEngine,
    index: &'a PositionIndex,
    variants: &'a [Variant],
    settings: &'a WeightSettings,
}

impl<'a> MoveSelector<'a> {
    pub fn new(
        rules: &'a dyn RulesEngine,
        index: &'a PositionIndex,
        variants: &'a [Variant],
        settings: &'a WeightSettings,
    ) -> Self {
        Self {
            rules,
            index,
            variants,
            settings,
        }
    }

    /// Variants continued by a legal move from `position`, each claimed by the
    /// first move (in rules-engine order) whose resulting position reaches it.
    pub fn claims(&self, position: &str) -> Result<Vec<(VariantId, CandidateMove)>, SessionError> {
        let mut claimed: Vec<(VariantId, CandidateMove)> = Vec::new();

        for mv in self.rules.legal_moves(position)? {
            let next = normalize(&self.rules.play(position, &mv)?);
            for &id in self.index.lookup(&next) {
                if !claimed.iter().any(|(c, _)| *c == id) {
                    claimed.push((id, mv.clone()));
                }
            }
        }

        Ok(claimed)
    }

    /// Attach weights and probabilities to claimed variants.
    pub fn weigh(&self, claims: Vec<(VariantId, CandidateMove)>) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = claims
            .into_iter()
            .map(|(variant, mv)| {
                let v = &self.variants[variant.0];
                Candidate {
                    variant,
                    mv,
                    factors: compute_factors(&v.stats, v.current_epoch, self.settings),
                    probability: 0.0,
                }
            })
            .collect();

        let total: f64 = candidates.iter().map(|c| c.factors.weight).sum();
        if total.is_finite() && total > 0.0 {
            for c in &mut candidates {
                c.probability = c.factors.weight / total;
            }
            return candidates;
        }

        // Weights overflowed or underflowed: normalize in log space instead.
        let logs: Vec<f64> = candidates
            .iter()
            .map(|c| {
                let v = &self.variants[c.variant.0];
                log_weight(&v.stats, v.current_epoch, self.settings)
            })
            .collect();
        let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let scaled: Vec<f64> = logs.iter().map(|l| (l - max).exp()).collect();
        let scaled_total: f64 = scaled.iter().sum();
        let count = candidates.len() as f64;
        debug!(total, max, "weights out of range, normalized from logarithms");

        for (c, w) in candidates.iter_mut().zip(scaled) {
            c.probability = if scaled_total.is_finite() && scaled_total > 0.0 {
                w / scaled_total
            } else {
                1.0 / count
            };
        }
        candidates
    }

    /// Pick the next move from `position`. `ply` is the number of moves
    /// already played and is only used for diagnostics.
    pub fn select<R: Rng + ?Sized>(
        &self,
        position: &str,
        ply: usize,
        rng: &mut R,
    ) -> Result<Selection, SessionError> {
        let claims = self.claims(position)?;
        if claims.is_empty() {
            return Err(SessionError::NoApplicableMove {
                position: position.to_string(),
                ply,
            });
        }

        let candidates = self.weigh(claims);
        let probabilities: Vec<f64> = candidates.iter().map(|c| c.probability).collect();
        let draw: f64 = rng.gen();
        let chosen = sample(&probabilities, draw);

        debug!(
            ply,
            applicable = candidates.len(),
            draw,
            chosen = %candidates[chosen].variant,
            mv = %candidates[chosen].mv.san,
            "move selected"
        );

        Ok(Selection {
            position: position.to_string(),
            ply,
            draw,
            chosen,
            candidates,
        })
    }
}

/// Walk `probabilities` in order, subtracting each from `draw` until the
/// remainder is no longer positive. When rounding leaves a positive remainder
/// after the last entry, the last entry is chosen.
///
/// `probabilities` must not be empty.
pub fn sample(probabilities: &[f64], draw: f64) -> usize {
    let mut remainder = draw;
    for (i, p) in probabilities.iter().enumerate() {
        remainder -= p;
        if remainder <= 0.0 {
            return i;
        }
    }
    let last = probabilities.len().saturating_sub(1);
    warn!(draw, remainder, "sampling walk exhausted, falling back to last candidate");
    last
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod selector_tests;
