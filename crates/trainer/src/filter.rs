//! Narrowing a drill to part of the repertoire.

use drill_core::fen::{is_likely_fen, normalize};
use drill_core::{PositionIndex, RulesEngine, SessionError, Variant, VariantId};

/// Which lines a drill covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingFilter {
    /// Lines with a classification containing this text, ignoring case.
    Classification(String),
    /// Lines passing through this normalized position.
    Position(String),
}

impl TrainingFilter {
    /// Interpret user input. A FEN selects by position, anything else by
    /// classification. Blank input means no filter.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            None
        } else if is_likely_fen(text) {
            Some(Self::Position(normalize(text)))
        } else {
            Some(Self::Classification(text.to_lowercase()))
        }
    }

    /// Keep the variants matching this filter, in their original order.
    pub fn apply(
        &self,
        rules: &dyn RulesEngine,
        variants: Vec<Variant>,
    ) -> Result<Vec<Variant>, SessionError> {
        match self {
            Self::Classification(text) => Ok(variants
                .into_iter()
                .filter(|v| {
                    v.classifications
                        .iter()
                        .any(|c| c.to_lowercase().contains(text.as_str()))
                })
                .collect()),
            Self::Position(position) => {
                let index = PositionIndex::build(rules, &variants)?;
                let through = index.lookup(position).to_vec();
                Ok(variants
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| through.contains(&VariantId(*i)))
                    .map(|(_, v)| v)
                    .collect())
            }
        }
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod filter_tests;
