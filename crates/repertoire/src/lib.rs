//! Persisted opening repertoire for ML-chess drills
//!
//! This crate provides:
//! - The JSON snapshot format, tolerant of missing fields
//! - Daily epochs and load-time normalization
//! - Conversion between stored records and live `drill_core` variants
//! - Summary statistics on how stale the repertoire is
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use drill_core::TrainingSession;
//! use repertoire::{epoch, store, Clock, SystemClock};
//!
//! let path = Path::new("repertoire.json");
//! let mut snapshot = store::load(path)?;
//! epoch::normalize(&mut snapshot, SystemClock.today());
//! let variants = repertoire::to_variants(&snapshot, None);
//! let session = TrainingSession::builder(variants)
//!     .with_weights(snapshot.weight_settings)
//!     .build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod error;
mod snapshot;
mod summary;

pub mod epoch;
pub mod store;

pub use convert::*;
pub use epoch::{Clock, FixedClock, SystemClock};
pub use error::RepertoireError;
pub use snapshot::*;
pub use summary::*;
