//! Opening drill trainer for ML-chess
//!
//! This crate provides:
//! - `TrainerConfig`, read from `trainer.toml`
//! - `RoundDriver`, which plays drill rounds against any `MoveSource`
//! - `TrainingFilter`, narrowing a drill by classification or position
//!
//! # Usage
//!
//! ```bash
//! # Add a line to the repertoire
//! cargo run -p trainer -- add "1. e4 c5 2. Nf3 d6" --orientation white
//!
//! # Drill it, typing moves as UCI or SAN
//! cargo run -p trainer -- drill --seed 7
//!
//! # Drill only the lines of one opening
//! cargo run -p trainer -- drill --filter najdorf
//!
//! # Show how stale the repertoire is
//! cargo run -p trainer -- stats
//! ```

mod config;
mod filter;
mod round;

pub use config::*;
pub use filter::*;
pub use round::*;
