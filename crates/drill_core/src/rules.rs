//! Rules engine seam.
//!
//! The drill engine never decides chess legality on its own. Everything it
//! needs (legal moves, playing a move, replaying a stored line) goes through
//! [`RulesEngine`]. Positions cross the seam as FEN strings so the core stays
//! independent of the board representation. [`ShakmatyRules`] is the default
//! implementation.

use pgn_reader::{BufferedReader, SanPlus, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Move, Position, Square};
use tracing::warn;

use crate::error::RulesError;

/// A legal move as seen by the drill engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CandidateMove {
    /// Origin square, e.g. `g1`.
    pub from: String,
    /// Destination square. For castling this is the king's destination.
    pub to: String,
    /// Promotion piece as a lowercase letter (`q`, `r`, `b`, `n`).
    pub promotion: Option<char>,
    pub capture: bool,
    /// Standard algebraic notation without check suffix.
    pub san: String,
    /// Long algebraic notation, e.g. `e7e8q`.
    pub uci: String,
}

impl CandidateMove {
    /// True if `text` names this move in UCI or SAN form. Check and
    /// annotation suffixes are ignored.
    pub fn matches_text(&self, text: &str) -> bool {
        let text = text.trim();
        if text.eq_ignore_ascii_case(&self.uci) {
            return true;
        }
        let stripped = strip_suffixes(text);
        let castle = stripped.replace('0', "O");
        stripped == self.san || castle == self.san
    }
}

/// Operations the drill engine consumes from a chess rules library.
pub trait RulesEngine {
    /// FEN of the position every variant starts from.
    fn start_position(&self) -> String;

    /// Legal moves in `position`, in the engine's enumeration order.
    fn legal_moves(&self, position: &str) -> Result<Vec<CandidateMove>, RulesError>;

    /// Play `mv` in `position` and return the resulting FEN.
    fn play(&self, position: &str, mv: &CandidateMove) -> Result<String, RulesError>;

    /// Split PGN move text into SAN tokens, dropping tag pairs, move numbers,
    /// comments, variations, NAGs and the game result.
    fn parse_movetext(&self, movetext: &str) -> Vec<String>;

    /// Replay `moves` from the start position. The result holds the start
    /// position followed by the position after every move.
    fn replay(&self, moves: &[String]) -> Result<Vec<String>, RulesError>;

    /// Find the legal move going from `from` to `to`. Without an explicit
    /// promotion piece a queen is assumed.
    fn find_move(
        &self,
        position: &str,
        from: &str,
        to: &str,
        promotion: Option<char>,
    ) -> Result<Option<CandidateMove>, RulesError> {
        let promotion = promotion.map(|c| c.to_ascii_lowercase()).or(Some('q'));
        Ok(self.legal_moves(position)?.into_iter().find(|m| {
            m.from == from && m.to == to && (m.promotion.is_none() || m.promotion == promotion)
        }))
    }

    /// Play the move going from `from` to `to`, if it is legal. Returns the
    /// move together with the resulting FEN.
    fn play_squares(
        &self,
        position: &str,
        from: &str,
        to: &str,
        promotion: Option<char>,
    ) -> Result<Option<(CandidateMove, String)>, RulesError> {
        match self.find_move(position, from, to, promotion)? {
            Some(mv) => {
                let next = self.play(position, &mv)?;
                Ok(Some((mv, next)))
            }
            None => Ok(None),
        }
    }

    /// Resolve free text typed by a learner (UCI or SAN) to a legal move.
    fn parse_move(&self, position: &str, text: &str) -> Result<Option<CandidateMove>, RulesError> {
        Ok(self
            .legal_moves(position)?
            .into_iter()
            .find(|m| m.matches_text(text)))
    }
}

/// [`RulesEngine`] backed by the `shakmaty` crate.
///
/// En-passant squares are only written to FEN output when a capture is
/// actually possible, so positions reached by different pawn moves still
/// compare equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    pub fn new() -> Self {
        Self
    }

    fn load(position: &str) -> Result<Chess, RulesError> {
        let invalid = |reason: String| RulesError::InvalidFen {
            fen: position.to_string(),
            reason,
        };
        let fen: Fen = position.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        fen.into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))
    }

    fn fen_of(pos: &Chess) -> String {
        Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
    }

    fn describe(pos: &Chess, mv: &Move) -> Option<CandidateMove> {
        let (from, to, promotion, capture) = match mv {
            Move::Normal {
                from,
                to,
                promotion,
                capture,
                ..
            } => (*from, *to, promotion.map(|r| r.char()), capture.is_some()),
            Move::EnPassant { from, to } => (*from, *to, None, true),
            Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() {
                    File::G
                } else {
                    File::C
                };
                (*king, Square::from_coords(file, king.rank()), None, false)
            }
            Move::Put { .. } => return None,
        };

        let mut uci = format!("{from}{to}");
        if let Some(p) = promotion {
            uci.push(p);
        }

        Some(CandidateMove {
            from: from.to_string(),
            to: to.to_string(),
            promotion,
            capture,
            san: San::from_move(pos, mv).to_string(),
            uci,
        })
    }
}

impl RulesEngine for ShakmatyRules {
    fn start_position(&self) -> String {
        Self::fen_of(&Chess::default())
    }

    fn legal_moves(&self, position: &str) -> Result<Vec<CandidateMove>, RulesError> {
        let pos = Self::load(position)?;
        Ok(pos
            .legal_moves()
            .iter()
            .filter_map(|mv| Self::describe(&pos, mv))
            .collect())
    }

    fn play(&self, position: &str, mv: &CandidateMove) -> Result<String, RulesError> {
        let mut pos = Self::load(position)?;
        let legal = pos.legal_moves();
        let found = legal
            .iter()
            .find(|m| Self::describe(&pos, m).is_some_and(|d| d.uci == mv.uci))
            .cloned();
        match found {
            Some(m) => {
                pos.play_unchecked(&m);
                Ok(Self::fen_of(&pos))
            }
            None => Err(RulesError::IllegalMove {
                fen: position.to_string(),
                mv: mv.uci.clone(),
            }),
        }
    }

    fn parse_movetext(&self, movetext: &str) -> Vec<String> {
        read_main_line(movetext)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn replay(&self, moves: &[String]) -> Result<Vec<String>, RulesError> {
        let mut pos = Chess::default();
        let mut positions = Vec::with_capacity(moves.len() + 1);
        positions.push(Self::fen_of(&pos));

        for (ply, token) in moves.iter().enumerate() {
            let invalid = |reason: String| RulesError::InvalidSan {
                token: token.clone(),
                ply: ply + 1,
                reason,
            };
            let san_plus: SanPlus = token.trim().parse().map_err(|e| invalid(format!("{e}")))?;
            let mv = san_plus
                .san
                .to_move(&pos)
                .map_err(|e| invalid(format!("{e}")))?;
            pos.play_unchecked(&mv);
            positions.push(Self::fen_of(&pos));
        }

        Ok(positions)
    }
}

fn strip_suffixes(token: &str) -> &str {
    token.trim_end_matches(['+', '#', '!', '?'])
}

/// Collects the main line of a PGN game. Variations are skipped; comments,
/// NAGs and move numbers never reach the visitor.
#[derive(Debug, Default)]
struct MainLine {
    moves: Vec<SanPlus>,
}

impl Visitor for MainLine {
    type Result = Vec<SanPlus>;

    fn begin_game(&mut self) {
        self.moves.clear();
    }

    fn san(&mut self, san_plus: SanPlus) {
        self.moves.push(san_plus);
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {
        std::mem::take(&mut self.moves)
    }
}

/// SAN moves of the main line of the first game in `movetext`.
pub fn read_main_line(movetext: &str) -> Vec<SanPlus> {
    let mut reader = BufferedReader::new_cursor(movetext.as_bytes());
    match reader.read_game(&mut MainLine::default()) {
        Ok(Some(moves)) => moves,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(error = %e, "unreadable move text");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
