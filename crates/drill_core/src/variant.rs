//! Opening lines and their learning statistics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::fen::normalize;

/// Side the learner plays in a variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Orientation {
    pub fn other(self) -> Orientation {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::White => "white",
            Orientation::Black => "black",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Orientation::White),
            "black" | "b" => Ok(Orientation::Black),
            _ => Err(format!("unknown orientation '{s}', expected white or black")),
        }
    }
}

/// Index of a variant inside the session that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantId(pub usize);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Learning statistics of one variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariantStats {
    /// Completed rounds, successful or not.
    pub times_played: u32,
    /// Epoch of the last round finished without a mistake.
    pub last_succeeded_epoch: u32,
    /// Decaying error accumulator. Not a true moving average.
    pub error_ema: f64,
    /// Decaying success indicator in `[0, 1)`.
    pub success_ema: f64,
}

/// Arrow or highlight colour, as used by board GUIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brush {
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "Y")]
    Yellow,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "B")]
    Blue,
}

/// A visual hint attached to a position: an arrow when `dest` is set,
/// a square highlight otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub brush: Brush,
    pub orig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,
}

impl Annotation {
    pub fn arrow(brush: Brush, orig: &str, dest: &str) -> Self {
        Self {
            brush,
            orig: orig.to_string(),
            dest: Some(dest.to_string()),
        }
    }

    pub fn square(brush: Brush, orig: &str) -> Self {
        Self {
            brush,
            orig: orig.to_string(),
            dest: None,
        }
    }
}

/// One stored opening line.
#[derive(Clone, Debug)]
pub struct Variant {
    /// Move text of the line, e.g. `1. e4 e5 2. Nf3 Nc6`.
    pub pgn: String,
    pub orientation: Orientation,
    pub classifications: Vec<String>,
    pub stats: VariantStats,
    /// Epoch of the current training day, stamped when the repertoire is loaded.
    pub current_epoch: u32,
    annotations: HashMap<String, Vec<Annotation>>,
}

impl Variant {
    pub fn new(pgn: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            pgn: pgn.into(),
            orientation,
            classifications: Vec::new(),
            stats: VariantStats::default(),
            current_epoch: 0,
            annotations: HashMap::new(),
        }
    }

    pub fn with_stats(mut self, stats: VariantStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_epoch(mut self, current_epoch: u32) -> Self {
        self.current_epoch = current_epoch;
        self
    }

    pub fn with_classifications(mut self, classifications: Vec<String>) -> Self {
        self.classifications = classifications;
        self
    }

    /// Attach a hint to `position`. The FEN is normalized before it is stored.
    pub fn annotate(&mut self, position: &str, annotation: Annotation) {
        self.annotations
            .entry(normalize(position))
            .or_default()
            .push(annotation);
    }

    /// Hints recorded for an already normalized position key.
    pub fn annotations_at(&self, key: &str) -> &[Annotation] {
        self.annotations.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every annotated position key with its hints.
    pub fn annotations(&self) -> impl Iterator<Item = (&str, &[Annotation])> {
        self.annotations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Identity used to match a live variant with its persisted record.
    pub fn key(&self) -> (&str, Orientation) {
        (self.pgn.as_str(), self.orientation)
    }
}
