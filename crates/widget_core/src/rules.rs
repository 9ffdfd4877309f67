//! Rules oracle seam and the default implementation.
//!
//! The widget never computes chess itself: legality, turn, game-over and
//! position serialization are all questions for the oracle. The default
//! implementation delegates every one of them to the `chess` crate.

use std::str::FromStr;

use chess::{Board, ChessMove, File, Game, Piece, Rank, Square};

use crate::types::{Color, MoveOutcome};

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;

/// The rules component contract consumed by the session.
///
/// `apply_move` never panics on garbage input: illegal moves and malformed
/// square names come back as [`MoveOutcome::Rejected`], which the board view
/// answers with a visual snapback.
pub trait RulesOracle {
    fn apply_move(&mut self, from: &str, to: &str, promotion: char) -> MoveOutcome;
    fn is_game_over(&self) -> bool;
    fn turn(&self) -> Color;
    fn fen(&self) -> String;
    fn reset(&mut self);
}

/// Default oracle over `chess::Game`.
pub struct ChessRules {
    game: Game,
}

impl ChessRules {
    pub fn new() -> Self {
        Self { game: Game::new() }
    }

    /// Start from an arbitrary position. `None` if the FEN does not parse.
    pub fn from_fen(fen: &str) -> Option<Self> {
        let board = Board::from_str(fen).ok()?;
        Some(Self {
            game: Game::new_with_board(board),
        })
    }
}

impl Default for ChessRules {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_square(name: &str) -> Option<Square> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].checked_sub(b'a')?;
    let rank = bytes[1].checked_sub(b'1')?;
    if file > 7 || rank > 7 {
        return None;
    }
    Some(Square::make_square(
        Rank::from_index(rank as usize),
        File::from_index(file as usize),
    ))
}

fn promotion_piece(letter: char) -> Piece {
    match letter.to_ascii_lowercase() {
        'r' => Piece::Rook,
        'b' => Piece::Bishop,
        'n' => Piece::Knight,
        _ => Piece::Queen,
    }
}

impl RulesOracle for ChessRules {
    fn apply_move(&mut self, from: &str, to: &str, promotion: char) -> MoveOutcome {
        let (Some(from), Some(to)) = (parse_square(from), parse_square(to)) else {
            return MoveOutcome::Rejected;
        };

        // The promotion letter accompanies every move; it only takes effect
        // when the plain move is not legal (i.e. an actual promotion).
        let plain = ChessMove::new(from, to, None);
        let promoting = ChessMove::new(from, to, Some(promotion_piece(promotion)));
        if !self.game.make_move(plain) && !self.game.make_move(promoting) {
            return MoveOutcome::Rejected;
        }

        // Repetition and fifty-move endings count as game over without an
        // explicit claim, matching how the widget treats them.
        if self.game.can_declare_draw() {
            self.game.declare_draw();
        }
        MoveOutcome::Applied
    }

    fn is_game_over(&self) -> bool {
        self.game.result().is_some()
    }

    fn turn(&self) -> Color {
        match self.game.side_to_move() {
            chess::Color::White => Color::White,
            chess::Color::Black => Color::Black,
        }
    }

    fn fen(&self) -> String {
        self.game.current_position().to_string()
    }

    fn reset(&mut self) {
        self.game = Game::new();
    }
}
