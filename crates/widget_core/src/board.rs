//! Board view seam.
//!
//! Rendering lives outside this crate. A view receives position pushes and
//! orientation changes through [`BoardView`]; drag-drop input flows the other
//! way, from the host into the session's `on_drag_start` / `on_drop` /
//! `on_snap_end` handlers.

use crate::types::{Color, START_FEN};

/// Construction options for a board view implementation.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub draggable: bool,
    /// FEN to show before the first position push.
    pub initial_position: String,
    pub orientation: Color,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            draggable: true,
            initial_position: START_FEN.to_string(),
            orientation: Color::White,
        }
    }
}

/// Rendering contract consumed by the session.
pub trait BoardView {
    /// Show the given FEN.
    fn set_position(&mut self, fen: &str);

    /// Put the given color at the bottom of the board.
    fn set_orientation(&mut self, color: Color);

    /// Return to the starting position.
    fn reset_to_start(&mut self);

    /// Re-fit the board to its surroundings; views that cannot resize may
    /// keep the default no-op.
    fn resize(&mut self) {}
}
