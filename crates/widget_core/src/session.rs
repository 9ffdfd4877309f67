//! Orchestrator: wires user input, rules oracle, board view and engine.
//!
//! The session owns the collaborators and the status line, relays board
//! input into the rules oracle, pumps engine lines through the adapter, and
//! applies the turn-advance rule: after every applied move, every reset and
//! the engine's ready signal, the engine is asked to move whenever the side
//! to move is not the human's.

use std::time::Duration;

use thiserror::Error;

use crate::board::BoardView;
use crate::config::WidgetConfig;
use crate::engine::{EngineConfig, EngineEvent, EnginePhase, EngineSession, EngineStatus};
use crate::rules::RulesOracle;
use crate::transport::{EngineTransport, TransportError};
use crate::types::{Color, MoveOutcome};

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;

/// Required collaborators missing at startup. Fatal to the interactive
/// feature; the caller reports it and aborts initialization.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not load the chess rules component")]
    MissingRules,
    #[error("could not load the board component")]
    MissingBoard,
}

/// What the board view should do with a dropped piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Accepted,
    /// Illegal attempt: revert the drag visually, nothing else happens.
    Snapback,
}

pub struct SessionBuilder {
    config: WidgetConfig,
    rules: Option<Box<dyn RulesOracle>>,
    board: Option<Box<dyn BoardView>>,
}

impl SessionBuilder {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            rules: None,
            board: None,
        }
    }

    pub fn rules(mut self, rules: Box<dyn RulesOracle>) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn board(mut self, board: Box<dyn BoardView>) -> Self {
        self.board = Some(board);
        self
    }

    pub fn build(self) -> Result<Session, SessionError> {
        let rules = self.rules.ok_or(SessionError::MissingRules)?;
        let mut board = self.board.ok_or(SessionError::MissingBoard)?;
        let player_color = self.config.player_color;
        board.set_orientation(player_color);
        Ok(Session {
            config: self.config,
            rules,
            board,
            engine: None,
            player_color,
            status: "",
        })
    }
}

/// One interactive game session. Single-threaded: every method is an event
/// handler invoked by the host (drag-drop, an inbound engine line, a reset).
pub struct Session {
    config: WidgetConfig,
    rules: Box<dyn RulesOracle>,
    board: Box<dyn BoardView>,
    engine: Option<EngineSession>,
    player_color: Color,
    status: &'static str,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("player_color", &self.player_color)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn builder(config: WidgetConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// Attach the engine channel and start the handshake.
    ///
    /// Takes the spawn result so a failed engine leaves the rest of the
    /// widget alive: the status line reports it and engine turns are simply
    /// never triggered.
    pub fn start_engine(&mut self, transport: Result<Box<dyn EngineTransport>, TransportError>) {
        match transport {
            Ok(transport) => {
                let config = EngineConfig {
                    elo_target: self.config.elo_target,
                    skill_level: self.config.skill_level,
                    think_time: Duration::from_millis(self.config.think_time_ms),
                };
                let mut engine = EngineSession::new(transport, config);
                let events = engine.initialize();
                self.engine = Some(engine);
                self.apply_engine_events(events);
            }
            Err(err) => {
                log::warn!("engine unavailable: {err}");
                self.status = EngineStatus::Failed.label();
            }
        }
    }

    pub fn status(&self) -> &str {
        self.status
    }

    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn turn(&self) -> Color {
        self.rules.turn()
    }

    pub fn fen(&self) -> String {
        self.rules.fen()
    }

    pub fn is_game_over(&self) -> bool {
        self.rules.is_game_over()
    }

    pub fn is_human_turn(&self) -> bool {
        !self.rules.is_game_over() && self.rules.turn() == self.player_color
    }

    /// `None` when no engine is attached (spawn failed or never started).
    pub fn engine_phase(&self) -> Option<EnginePhase> {
        self.engine.as_ref().map(|engine| engine.phase())
    }

    /// Drag gate: no pickups once the game is over, and only the human's
    /// own pieces.
    pub fn on_drag_start(&self, piece: Color) -> bool {
        !self.rules.is_game_over() && piece == self.player_color
    }

    /// A piece was dropped. Promotions default to queen.
    pub fn on_drop(&mut self, from: &str, to: &str) -> DropOutcome {
        match self.rules.apply_move(from, to, 'q') {
            MoveOutcome::Applied => DropOutcome::Accepted,
            MoveOutcome::Rejected => DropOutcome::Snapback,
        }
    }

    /// The drag animation settled: sync the board, then hand the turn over.
    pub fn on_snap_end(&mut self) {
        let fen = self.rules.fen();
        self.board.set_position(&fen);
        self.maybe_engine_move();
    }

    /// Relay one inbound engine line.
    pub fn on_engine_line(&mut self, line: &str) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let events = engine.handle_line(line);
        self.apply_engine_events(events);
    }

    /// Fresh game: starting position, oriented for the human, engine
    /// history cleared. The handshake is not repeated.
    pub fn new_game(&mut self) {
        self.rules.reset();
        self.board.set_orientation(self.player_color);
        self.board.reset_to_start();
        if let Some(engine) = self.engine.as_mut() {
            let events = engine.reset();
            self.apply_engine_events(events);
        }
        self.board.resize();
        self.maybe_engine_move();
    }

    /// Switch sides and start over.
    pub fn set_player_color(&mut self, color: Color) {
        self.player_color = color;
        self.new_game();
    }

    /// Tear the engine down; the session keeps showing the final position.
    pub fn dispose(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.dispose();
        }
    }

    /// The turn-advance rule.
    fn maybe_engine_move(&mut self) {
        if self.rules.is_game_over() || self.rules.turn() == self.player_color {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let fen = self.rules.fen();
        let events = engine.request_best_move(&fen);
        self.apply_engine_events(events);
    }

    fn apply_engine_events(&mut self, events: Vec<EngineEvent>) {
        for event in events {
            match event {
                EngineEvent::Status(status) => {
                    self.status = status.label();
                    if status == EngineStatus::Ready {
                        // when the human sits black, the engine opens
                        self.maybe_engine_move();
                    }
                }
                EngineEvent::BestMove(Some(mv)) => {
                    if self.rules.is_game_over() {
                        continue;
                    }
                    if self.rules.apply_move(&mv.from, &mv.to, mv.promotion)
                        == MoveOutcome::Applied
                    {
                        let fen = self.rules.fen();
                        self.board.set_position(&fen);
                        self.maybe_engine_move();
                    } else {
                        log::warn!("engine proposed an illegal move: {}{}", mv.from, mv.to);
                    }
                }
                EngineEvent::BestMove(None) => {
                    // no legal move on the engine's side; the oracle already
                    // reports the game as over
                }
            }
        }
    }
}
