//! Trainer configuration, read from `trainer.toml`.
//!
//! ```toml
//! repertoire = "data/repertoire.json"
//! seed = 42
//! orientation = "black"
//! log_level = "debug"
//!
//! [weights]
//! errorPower = 3.0
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use drill_core::{Orientation, WeightSettings};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "trainer.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Repertoire snapshot file.
    pub repertoire: PathBuf,
    /// Fixed RNG seed; entropy when unset.
    pub seed: Option<u64>,
    /// Side the learner plays. Drills default to white; stats cover both
    /// sides when unset.
    pub orientation: Option<Orientation>,
    /// Default tracing filter, overridden by `RUST_LOG`.
    pub log_level: String,
    /// Overrides the weight settings stored in the repertoire.
    pub weights: Option<WeightSettings>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            repertoire: PathBuf::from("repertoire.json"),
            seed: None,
            orientation: None,
            log_level: "info".to_string(),
            weights: None,
        }
    }
}

impl TrainerConfig {
    /// Read the configuration at `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)
                .with_context(|| format!("invalid configuration in {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
