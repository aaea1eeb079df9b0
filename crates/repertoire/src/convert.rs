//! Moving statistics between the stored snapshot and live variants.

use drill_core::{Orientation, Variant};

use crate::snapshot::{RepertoireSnapshot, VariantRecord};

/// Live variants for the records matching `filter` (all when `None`), with
/// the snapshot's epoch stamped on each, sorted by move text.
pub fn to_variants(snapshot: &RepertoireSnapshot, filter: Option<Orientation>) -> Vec<Variant> {
    let mut variants: Vec<Variant> = snapshot
        .data
        .iter()
        .filter(|r| filter.map_or(true, |o| r.orientation == o))
        .map(|r| {
            let mut variant = Variant::new(r.pgn.clone(), r.orientation)
                .with_stats(r.stats())
                .with_classifications(r.classifications.clone())
                .with_epoch(snapshot.current_epoch);
            for (position, hints) in &r.annotations {
                for hint in hints {
                    variant.annotate(position, hint.clone());
                }
            }
            variant
        })
        .collect();

    variants.sort_by(|a, b| a.pgn.cmp(&b.pgn));
    variants
}

/// Write the statistics of `variants` back into `snapshot`, matching records
/// by move text and orientation. Unknown variants are appended.
pub fn merge_variants(snapshot: &mut RepertoireSnapshot, variants: &[Variant]) {
    for variant in variants {
        let (pgn, orientation) = variant.key();
        match snapshot.record_mut(pgn, orientation) {
            Some(record) => record.set_stats(&variant.stats),
            None => {
                let mut record = VariantRecord::new(pgn, orientation);
                record.classifications = variant.classifications.clone();
                record.set_stats(&variant.stats);
                for (position, hints) in variant.annotations() {
                    record.annotations.insert(position.to_string(), hints.to_vec());
                }
                snapshot.data.push(record);
            }
        }
    }

    if let Some(epoch) = variants.iter().map(|v| v.current_epoch).max() {
        snapshot.current_epoch = snapshot.current_epoch.max(epoch);
    }
}

/// Count one more completed round for today.
pub fn record_completed_round(snapshot: &mut RepertoireSnapshot) {
    snapshot.daily_play_count = snapshot.daily_play_count.saturating_add(1);
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod convert_tests;
