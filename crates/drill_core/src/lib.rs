//! Adaptive opening drill engine.
//!
//! Stored opening lines ([`Variant`]s) are indexed by board position so that
//! transpositions are recognized. At every turn the engine picks one of the
//! lines consistent with the current position, weighted by how recently it
//! was mastered, how often it succeeded, how many mistakes it drew and how
//! new it is. Round outcomes feed back into the per-line statistics.
//!
//! Chess rules are delegated to a [`RulesEngine`]; [`ShakmatyRules`] is the
//! default implementation.

pub mod error;
pub mod fen;
pub mod index;
pub mod progress;
pub mod rules;
pub mod selector;
pub mod session;
pub mod variant;
pub mod weight;

pub use error::{RulesError, SessionError};
pub use fen::{normalize, START_FEN};
pub use index::PositionIndex;
pub use progress::{Completion, RoundState, ERROR_DECAY, SUCCESS_DECAY};
pub use rules::{CandidateMove, RulesEngine, ShakmatyRules};
pub use selector::{Candidate, MoveSelector, Selection};
pub use session::{MoveOutcome, SessionBuilder, TrainingSession, VariantReport};
pub use variant::{Annotation, Brush, Orientation, Variant, VariantId, VariantStats};
pub use weight::{compute_factors, log_weight, WeightFactors, WeightSettings, NEWNESS_THRESHOLD};
