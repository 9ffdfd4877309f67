//! Shared vocabulary: colors, protocol moves, move outcomes.

use serde::{Deserialize, Serialize};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A side of the board; also identifies who the human plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// A move as announced on the wire: square names plus a promotion letter.
///
/// The promotion letter is always present and defaults to `'q'` when the
/// engine omits it; the rules oracle ignores it for non-promotion moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineMove {
    pub from: String,
    pub to: String,
    pub promotion: char,
}

/// Verdict of the rules oracle on an attempted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    Rejected,
}
