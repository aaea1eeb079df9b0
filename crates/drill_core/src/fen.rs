//! Position keys.
//!
//! Every lookup in the engine goes through [`normalize`]. The halfmove clock and
//! the fullmove number are reset so that the same layout reached through a
//! different move order (or after a different number of quiet moves) maps to
//! the same key.

use crate::variant::Orientation;

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Canonicalize a FEN into a transposition key.
///
/// Placement, side to move, castling rights and en-passant square are kept;
/// the two move counters become `0 1`. Input with fewer than four fields is
/// returned trimmed.
pub fn normalize(position: &str) -> String {
    let fields: Vec<&str> = position.split_whitespace().collect();
    if fields.len() < 4 {
        return position.trim().to_string();
    }
    format!("{} {} {} {} 0 1", fields[0], fields[1], fields[2], fields[3])
}

/// Cheap check used to tell a FEN apart from free text such as an opening name.
pub fn is_likely_fen(value: &str) -> bool {
    let fields: Vec<&str> = value.split_whitespace().collect();
    fields.len() == 6 && fields[0].split('/').count() == 8
}

/// Side to move encoded in the second FEN field.
pub fn side_to_move(position: &str) -> Option<Orientation> {
    match position.split_whitespace().nth(1)? {
        "w" => Some(Orientation::White),
        "b" => Some(Orientation::Black),
        _ => None,
    }
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
