//! The training session: one repertoire, drilled round after round.
//!
//! A round walks a variant from the start position. The caller alternates
//! between asking for the opponent's move ([`TrainingSession::select_next_move`])
//! and submitting the learner's move ([`TrainingSession::attempt_move`]).
//! Mistakes are recorded with [`TrainingSession::mark_error`] and the round is
//! closed with [`TrainingSession::complete_variant`] once a leaf is reached.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::fen::normalize;
use crate::index::PositionIndex;
use crate::progress::{self, Completion, RoundState};
use crate::rules::{CandidateMove, RulesEngine, ShakmatyRules};
use crate::selector::{MoveSelector, Selection};
use crate::variant::{Annotation, Orientation, Variant, VariantId, VariantStats};
use crate::weight::{compute_factors, WeightFactors, WeightSettings};

/// Result of a learner move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Illegal, or leaves the repertoire. Nothing was recorded.
    Invalid,
    /// The move follows at least one variant which goes on.
    Continue { position: String, capture: bool },
    /// The move reaches the last position of a variant.
    EndOfVariant { position: String, capture: bool },
}

/// Read-only view of a variant for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantReport {
    pub id: VariantId,
    pub pgn: String,
    pub orientation: Orientation,
    pub stats: VariantStats,
    pub factors: WeightFactors,
    /// Probability in the last selection, if the variant was a candidate.
    pub probability: Option<f64>,
    /// Whether the last selection picked this variant.
    pub picked: bool,
    pub round_errors: f64,
}

/// Builder for [`TrainingSession`].
pub struct SessionBuilder {
    variants: Vec<Variant>,
    rules: Option<Box<dyn RulesEngine>>,
    rng: Option<Box<dyn RngCore>>,
    settings: WeightSettings,
}

impl SessionBuilder {
    pub fn with_rules(mut self, rules: impl RulesEngine + 'static) -> Self {
        self.rules = Some(Box::new(rules));
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_weights(mut self, settings: WeightSettings) -> Self {
        self.settings = settings.sanitized();
        self
    }

    /// Replay every variant and index its positions. Fails with
    /// [`SessionError::CorruptVariant`] when a line cannot be replayed.
    pub fn build(self) -> Result<TrainingSession, SessionError> {
        let rules = self.rules.unwrap_or_else(|| Box::new(ShakmatyRules));
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_entropy()));
        let index = PositionIndex::build(rules.as_ref(), &self.variants)?;
        let round = RoundState::new(self.variants.len());

        debug!(
            variants = self.variants.len(),
            positions = index.len(),
            "training session ready"
        );

        Ok(TrainingSession {
            variants: self.variants,
            index,
            rules,
            rng,
            settings: self.settings,
            round,
            last_selection: None,
        })
    }
}

/// Variants, their position index and the state of the round in progress.
pub struct TrainingSession {
    variants: Vec<Variant>,
    index: PositionIndex,
    rules: Box<dyn RulesEngine>,
    rng: Box<dyn RngCore>,
    settings: WeightSettings,
    round: RoundState,
    last_selection: Option<Selection>,
}

impl TrainingSession {
    pub fn builder(variants: Vec<Variant>) -> SessionBuilder {
        SessionBuilder {
            variants,
            rules: None,
            rng: None,
            settings: WeightSettings::default(),
        }
    }

    /// Session with the default rules engine, an entropy-seeded RNG and
    /// default weights.
    pub fn new(variants: Vec<Variant>) -> Result<Self, SessionError> {
        Self::builder(variants).build()
    }

    pub fn rules(&self) -> &dyn RulesEngine {
        self.rules.as_ref()
    }

    pub fn start_position(&self) -> String {
        self.rules.start_position()
    }

    pub fn settings(&self) -> &WeightSettings {
        &self.settings
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn into_variants(self) -> Vec<Variant> {
        self.variants
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Whether any variant passes through `position`.
    pub fn is_valid_variant(&self, position: &str) -> bool {
        self.index.is_known_position(position)
    }

    /// Whether a variant ends at `position` after exactly `ply` moves.
    pub fn is_end_of_variant(&self, position: &str, ply: usize) -> bool {
        self.index
            .lookup(position)
            .iter()
            .any(|&id| self.index.ply_count(id) == ply)
    }

    /// Record a learner mistake made at `position`.
    pub fn mark_error(&mut self, position: &str) {
        let ids = self.index.lookup(position);
        if ids.is_empty() {
            warn!(position, "mistake recorded at a position outside the repertoire");
        }
        self.round.mark_error(ids);
    }

    pub fn had_errors(&self) -> bool {
        self.round.has_errors()
    }

    /// Mistakes attributed to `variant` in the current round.
    pub fn round_errors(&self, variant: VariantId) -> f64 {
        self.round.errors_of(variant)
    }

    /// Close the round at `position` and update statistics. The round is
    /// reset on success; on error it is left as is.
    pub fn complete_variant(&mut self, position: &str) -> Result<Completion, SessionError> {
        let key = normalize(position);
        let reached = self.index.lookup(&key).to_vec();
        let completion = progress::complete_variant(&mut self.variants, &self.round, &reached, &key)?;
        self.reset_round();
        Ok(completion)
    }

    /// Forget the mistakes and selection of the current round.
    pub fn reset_round(&mut self) {
        self.round.reset();
        self.last_selection = None;
    }

    /// Pick the opponent's move at `position`, `ply` moves into the round.
    pub fn select_next_move(
        &mut self,
        position: &str,
        ply: usize,
    ) -> Result<CandidateMove, SessionError> {
        let selector = MoveSelector::new(
            self.rules.as_ref(),
            &self.index,
            &self.variants,
            &self.settings,
        );
        let selection = selector.select(position, ply, self.rng.as_mut())?;
        let mv = selection.mv().clone();
        self.last_selection = Some(selection);
        Ok(mv)
    }

    pub fn last_selection(&self) -> Option<&Selection> {
        self.last_selection.as_ref()
    }

    /// Play a learner move from `position`, `ply` moves into the round.
    pub fn attempt_move(
        &self,
        position: &str,
        ply: usize,
        from: &str,
        to: &str,
        promotion: Option<char>,
    ) -> Result<MoveOutcome, SessionError> {
        let Some((mv, next)) = self.rules.play_squares(position, from, to, promotion)? else {
            return Ok(MoveOutcome::Invalid);
        };
        if !self.is_valid_variant(&next) {
            return Ok(MoveOutcome::Invalid);
        }

        let capture = mv.capture;
        if self.is_end_of_variant(&next, ply + 1) {
            Ok(MoveOutcome::EndOfVariant {
                position: next,
                capture,
            })
        } else {
            Ok(MoveOutcome::Continue {
                position: next,
                capture,
            })
        }
    }

    /// Hints of every variant passing through `position`, in index order.
    pub fn annotations(&self, position: &str) -> Vec<Annotation> {
        let key = normalize(position);
        self.index
            .lookup(&key)
            .iter()
            .flat_map(|id| self.variants[id.0].annotations_at(&key).iter().cloned())
            .collect()
    }

    pub fn variant_reports(&self) -> Vec<VariantReport> {
        self.variants
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let id = VariantId(i);
                let candidate = self
                    .last_selection
                    .as_ref()
                    .and_then(|s| s.candidate(id));
                VariantReport {
                    id,
                    pgn: v.pgn.clone(),
                    orientation: v.orientation,
                    stats: v.stats.clone(),
                    factors: compute_factors(&v.stats, v.current_epoch, &self.settings),
                    probability: candidate.map(|c| c.probability),
                    picked: self
                        .last_selection
                        .as_ref()
                        .is_some_and(|s| s.is_picked(id)),
                    round_errors: self.round.errors_of(id),
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
