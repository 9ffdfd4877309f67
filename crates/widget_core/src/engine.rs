//! Search engine adapter.
//!
//! Translates the engine's line-oriented text protocol into a small
//! request/response contract:
//! - [`EngineSession::initialize`] starts the identify/ready handshake
//! - configuration (strength limit, target rating, skill) is applied once
//!   the ready acknowledgement arrives
//! - [`EngineSession::request_best_move`] runs one fixed-time search
//! - inbound lines are fed through [`EngineSession::handle_line`], which
//!   yields typed [`EngineEvent`]s for the orchestrator
//!
//! The adapter enforces the two protocol invariants: no search command is
//! ever sent before the handshake completes, and at most one search is
//! outstanding at a time (a request while thinking is a no-op).

use std::time::Duration;

use crate::transport::EngineTransport;
use crate::types::EngineMove;
use crate::uci;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;

/// Fixed engine settings, applied once after the ready acknowledgement.
///
/// Strength limiting must be enabled before the rating value is honored,
/// so the three options are always sent in that order.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub elo_target: u32,
    pub skill_level: u8,
    /// Per-move search time; fixed regardless of position.
    pub think_time: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            elo_target: 1614,
            skill_level: 8,
            think_time: Duration::from_millis(1200),
        }
    }
}

/// Lifecycle phase of the engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Uninitialized,
    /// Identification sent; waiting for the identify/ready acknowledgements.
    HandshakePending,
    /// Handshake done, configuration applied; a search may be requested.
    Ready,
    /// One search outstanding; further requests are ignored.
    Thinking,
    /// A search has completed; equivalent to `Ready` for new requests.
    Idle,
    /// The channel broke; the engine side of the widget is disabled.
    Failed,
    Disposed,
}

/// Status surfaced to the UI alongside phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Loading,
    Ready,
    Thinking,
    Idle,
    Failed,
}

impl EngineStatus {
    /// Display text for the status line. `Idle` clears it.
    pub fn label(self) -> &'static str {
        match self {
            EngineStatus::Loading => "Loading engine…",
            EngineStatus::Ready => "Engine ready",
            EngineStatus::Thinking => "Thinking…",
            EngineStatus::Idle => "",
            EngineStatus::Failed => "Could not load engine.",
        }
    }
}

/// Typed adapter output, consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Status(EngineStatus),
    /// Fired exactly once per accepted search request. `None` means the
    /// engine found no legal move (mate or stalemate on its side) and
    /// nothing must be applied to the rules oracle.
    BestMove(Option<EngineMove>),
}

/// The engine session state machine.
pub struct EngineSession {
    transport: Box<dyn EngineTransport>,
    phase: EnginePhase,
    config: EngineConfig,
}

impl EngineSession {
    pub fn new(transport: Box<dyn EngineTransport>, config: EngineConfig) -> Self {
        Self {
            transport,
            phase: EnginePhase::Uninitialized,
            config,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Send the identification command and enter the handshake.
    ///
    /// Completion is signaled later by a `Status(Ready)` event. A channel
    /// failure here leaves the session `Failed` with a visible status
    /// instead of propagating an error.
    pub fn initialize(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.phase != EnginePhase::Uninitialized {
            return events;
        }
        events.push(EngineEvent::Status(EngineStatus::Loading));
        if self.send("uci", &mut events) {
            self.phase = EnginePhase::HandshakePending;
        }
        events
    }

    /// Feed one inbound protocol line through the state machine.
    pub fn handle_line(&mut self, line: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let line = line.trim();
        if line.is_empty() {
            return events;
        }

        match self.phase {
            EnginePhase::HandshakePending if line == "uciok" => {
                self.send("isready", &mut events);
            }
            EnginePhase::HandshakePending if line == "readyok" => {
                self.phase = EnginePhase::Ready;
                self.apply_config(&mut events);
                if self.phase == EnginePhase::Ready {
                    events.push(EngineEvent::Status(EngineStatus::Ready));
                }
            }
            EnginePhase::Thinking if line.starts_with("bestmove") => {
                match uci::parse_bestmove(line) {
                    Some(best) => {
                        self.phase = EnginePhase::Idle;
                        events.push(EngineEvent::BestMove(best));
                        events.push(EngineEvent::Status(EngineStatus::Idle));
                    }
                    None => log::warn!("malformed best-move line ignored: {line:?}"),
                }
            }
            // Identification banners, `info` chatter, lines for phases we
            // are not in: ignored for forward compatibility.
            _ => log::debug!("engine chatter: {line}"),
        }
        events
    }

    /// Apply the strength configuration. Valid once the handshake is done;
    /// called automatically when the ready acknowledgement arrives.
    pub fn configure(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if matches!(self.phase, EnginePhase::Ready | EnginePhase::Idle) {
            self.apply_config(&mut events);
        }
        events
    }

    fn apply_config(&mut self, events: &mut Vec<EngineEvent>) {
        let commands = [
            uci::set_option("UCI_LimitStrength", true),
            uci::set_option("UCI_Elo", self.config.elo_target),
            uci::set_option("Skill Level", self.config.skill_level),
        ];
        for command in &commands {
            if !self.send(command, events) {
                return;
            }
        }
    }

    /// Ask for the best move in `fen`, searching for the fixed think time.
    ///
    /// Fire-and-forget: the answer arrives later as an
    /// [`EngineEvent::BestMove`]. Ignored unless the session is `Ready` or
    /// `Idle`, which is what keeps searches from overlapping.
    pub fn request_best_move(&mut self, fen: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !matches!(self.phase, EnginePhase::Ready | EnginePhase::Idle) {
            log::debug!("search request ignored in phase {:?}", self.phase);
            return events;
        }
        if self.send(&uci::position_fen(fen), &mut events)
            && self.send(&uci::go_movetime(self.config.think_time.as_millis() as u64), &mut events)
        {
            self.phase = EnginePhase::Thinking;
            events.push(EngineEvent::Status(EngineStatus::Thinking));
        }
        events
    }

    /// Start a new game on the engine side. Clears engine-internal history
    /// only; the session phase (and the handshake) are untouched.
    pub fn reset(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if matches!(
            self.phase,
            EnginePhase::Ready | EnginePhase::Idle | EnginePhase::Thinking
        ) {
            self.send("ucinewgame", &mut events);
        }
        events
    }

    /// Best-effort shutdown; the session accepts no further requests.
    pub fn dispose(&mut self) {
        if !matches!(
            self.phase,
            EnginePhase::Uninitialized | EnginePhase::Failed | EnginePhase::Disposed
        ) {
            let _ = self.transport.send("quit");
        }
        self.phase = EnginePhase::Disposed;
    }

    fn send(&mut self, line: &str, events: &mut Vec<EngineEvent>) -> bool {
        match self.transport.send(line) {
            Ok(()) => {
                log::debug!("engine << {line}");
                true
            }
            Err(err) => {
                log::warn!("engine channel failed while sending {line:?}: {err}");
                self.phase = EnginePhase::Failed;
                events.push(EngineEvent::Status(EngineStatus::Failed));
                false
            }
        }
    }
}
