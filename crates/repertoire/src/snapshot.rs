//! Persisted form of a repertoire.
//!
//! Every field is optional on input: older files, hand-edited files and
//! `null` values all load, with missing values replaced by their defaults.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use drill_core::{
    Annotation, Orientation, RulesEngine, RulesError, SessionError, VariantId, VariantStats,
};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Stored statistics of one opening line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub pgn: String,
    #[serde(default, deserialize_with = "nullable")]
    pub orientation: Orientation,
    #[serde(default, deserialize_with = "nullable")]
    pub classifications: Vec<String>,
    #[serde(rename = "errorEMA", default, deserialize_with = "nullable")]
    pub error_ema: f64,
    #[serde(default, deserialize_with = "count")]
    pub number_of_times_played: u32,
    #[serde(default, deserialize_with = "count")]
    pub last_succeeded_epoch: u32,
    #[serde(rename = "successEMA", default, deserialize_with = "nullable")]
    pub success_ema: f64,
    /// Hints keyed by normalized position.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub annotations: BTreeMap<String, Vec<Annotation>>,
}

impl VariantRecord {
    pub fn new(pgn: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            pgn: pgn.into(),
            orientation,
            classifications: Vec::new(),
            error_ema: 0.0,
            number_of_times_played: 0,
            last_succeeded_epoch: 0,
            success_ema: 0.0,
            annotations: BTreeMap::new(),
        }
    }

    pub fn stats(&self) -> VariantStats {
        VariantStats {
            times_played: self.number_of_times_played,
            last_succeeded_epoch: self.last_succeeded_epoch,
            error_ema: self.error_ema,
            success_ema: self.success_ema,
        }
    }

    pub fn set_stats(&mut self, stats: &VariantStats) {
        self.number_of_times_played = stats.times_played;
        self.last_succeeded_epoch = stats.last_succeeded_epoch;
        self.error_ema = stats.error_ema;
        self.success_ema = stats.success_ema;
    }

    pub fn matches(&self, pgn: &str, orientation: Orientation) -> bool {
        self.pgn == pgn && self.orientation == orientation
    }
}

/// A whole repertoire as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepertoireSnapshot {
    #[serde(default, deserialize_with = "nullable")]
    pub data: Vec<VariantRecord>,
    #[serde(default, deserialize_with = "count")]
    pub current_epoch: u32,
    /// Last training day, UTC.
    #[serde(default, deserialize_with = "date")]
    pub last_played_date: NaiveDate,
    /// Rounds completed on `last_played_date`.
    #[serde(default, deserialize_with = "count")]
    pub daily_play_count: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub weight_settings: drill_core::WeightSettings,
}

impl Default for RepertoireSnapshot {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            current_epoch: 0,
            last_played_date: NaiveDate::default(),
            daily_play_count: 0,
            weight_settings: Default::default(),
        }
    }
}

impl RepertoireSnapshot {
    pub fn record(&self, pgn: &str, orientation: Orientation) -> Option<&VariantRecord> {
        self.data.iter().find(|r| r.matches(pgn, orientation))
    }

    pub fn record_mut(&mut self, pgn: &str, orientation: Orientation) -> Option<&mut VariantRecord> {
        self.data.iter_mut().find(|r| r.matches(pgn, orientation))
    }

    /// Add a new line after checking that it replays from the start position.
    /// Returns `false` when the line is already present.
    pub fn add_variant(
        &mut self,
        rules: &dyn RulesEngine,
        pgn: &str,
        orientation: Orientation,
    ) -> Result<bool, SessionError> {
        let pgn = pgn.trim();
        if self.record(pgn, orientation).is_some() {
            return Ok(false);
        }

        let corrupt = |source: RulesError| SessionError::CorruptVariant {
            variant: VariantId(self.data.len()),
            pgn: pgn.to_string(),
            source,
        };
        let moves = rules.parse_movetext(pgn);
        if moves.is_empty() {
            return Err(corrupt(RulesError::InvalidSan {
                token: String::new(),
                ply: 1,
                reason: "line has no moves".to_string(),
            }));
        }
        rules.replay(&moves).map_err(corrupt)?;

        self.data.push(VariantRecord::new(pgn, orientation));
        Ok(true)
    }

    /// Delete a line with all its statistics. Returns the removed record, or
    /// `None` when the line is not in the repertoire.
    pub fn remove_variant(&mut self, pgn: &str, orientation: Orientation) -> Option<VariantRecord> {
        let pgn = pgn.trim();
        let at = self.data.iter().position(|r| r.matches(pgn, orientation))?;
        Some(self.data.remove(at))
    }
}

/// Parse a stored date, either `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|e| format!("invalid date '{}': {}", text, e))
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counters are written by other tools as floats or negative numbers at times.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if value.is_finite() && value > 0.0 {
        Ok(value.min(u32::MAX as f64) as u32)
    } else {
        Ok(0)
    }
}

fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse_date(&text).map_err(de::Error::custom),
        None => Ok(NaiveDate::default()),
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
