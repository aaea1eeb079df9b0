//! Position index: normalized FEN -> variants passing through it.

use std::collections::HashMap;
use tracing::{debug, error};

use crate::error::SessionError;
use crate::fen::normalize;
use crate::rules::RulesEngine;
use crate::variant::{Variant, VariantId};

/// Maps every position of every variant to the variants that reach it.
///
/// The index holds ids into the variant slice it was built from and is never
/// updated in place. Build a new one whenever the variant set changes.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    entries: HashMap<String, Vec<VariantId>>,
    plies: Vec<usize>,
}

impl PositionIndex {
    /// Replay every variant and record the start position plus the position
    /// after each move.
    ///
    /// One unreadable variant fails the whole build.
    pub fn build(rules: &dyn RulesEngine, variants: &[Variant]) -> Result<Self, SessionError> {
        let mut entries: HashMap<String, Vec<VariantId>> = HashMap::new();
        let mut plies = Vec::with_capacity(variants.len());

        for (i, variant) in variants.iter().enumerate() {
            let id = VariantId(i);
            let moves = rules.parse_movetext(&variant.pgn);
            let positions = rules.replay(&moves).map_err(|source| {
                error!(variant = %id, pgn = %variant.pgn, %source, "invalid move sequence");
                SessionError::CorruptVariant {
                    variant: id,
                    pgn: variant.pgn.clone(),
                    source,
                }
            })?;

            plies.push(moves.len());
            for fen in &positions {
                let slot = entries.entry(normalize(fen)).or_default();
                // A line repeating a position is listed once for it.
                if slot.last() != Some(&id) {
                    slot.push(id);
                }
            }
        }

        debug!(
            variants = variants.len(),
            positions = entries.len(),
            "position index built"
        );
        Ok(Self { entries, plies })
    }

    /// Variants reaching `position`, in variant order. Empty when unknown.
    pub fn lookup(&self, position: &str) -> &[VariantId] {
        self.entries
            .get(&normalize(position))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_known_position(&self, position: &str) -> bool {
        self.entries.contains_key(&normalize(position))
    }

    /// Number of moves in a variant.
    pub fn ply_count(&self, variant: VariantId) -> usize {
        self.plies.get(variant.0).copied().unwrap_or(0)
    }

    /// Number of distinct positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod index_tests;
