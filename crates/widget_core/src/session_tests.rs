use super::*;
use crate::types::MoveOutcome;

use std::cell::RefCell;
use std::rc::Rc;

struct RulesInner {
    turn: Color,
    over: bool,
    reject: bool,
    applied: Vec<String>,
    resets: usize,
}

impl Default for RulesInner {
    fn default() -> Self {
        Self {
            turn: Color::White,
            over: false,
            reject: false,
            applied: Vec::new(),
            resets: 0,
        }
    }
}

/// Scripted oracle: accepts everything (unless told not to) and flips the
/// turn on each applied move.
struct FakeRules(Rc<RefCell<RulesInner>>);

impl RulesOracle for FakeRules {
    fn apply_move(&mut self, from: &str, to: &str, promotion: char) -> MoveOutcome {
        let mut inner = self.0.borrow_mut();
        if inner.reject || inner.over {
            return MoveOutcome::Rejected;
        }
        inner.applied.push(format!("{from}{to}{promotion}"));
        inner.turn = inner.turn.opposite();
        MoveOutcome::Applied
    }

    fn is_game_over(&self) -> bool {
        self.0.borrow().over
    }

    fn turn(&self) -> Color {
        self.0.borrow().turn
    }

    fn fen(&self) -> String {
        format!("fen-{}", self.0.borrow().applied.len())
    }

    fn reset(&mut self) {
        let mut inner = self.0.borrow_mut();
        inner.applied.clear();
        inner.turn = Color::White;
        inner.over = false;
        inner.resets += 1;
    }
}

struct RecordingBoard(Rc<RefCell<Vec<String>>>);

impl BoardView for RecordingBoard {
    fn set_position(&mut self, fen: &str) {
        self.0.borrow_mut().push(format!("position {fen}"));
    }

    fn set_orientation(&mut self, color: Color) {
        self.0.borrow_mut().push(format!("orient {color}"));
    }

    fn reset_to_start(&mut self) {
        self.0.borrow_mut().push("start".to_string());
    }

    fn resize(&mut self) {
        self.0.borrow_mut().push("resize".to_string());
    }
}

struct RecordingTransport(Rc<RefCell<Vec<String>>>);

impl EngineTransport for RecordingTransport {
    fn send(&mut self, line: &str) -> Result<(), TransportError> {
        self.0.borrow_mut().push(line.to_string());
        Ok(())
    }
}

struct Harness {
    session: Session,
    rules: Rc<RefCell<RulesInner>>,
    board: Rc<RefCell<Vec<String>>>,
    wire: Rc<RefCell<Vec<String>>>,
}

fn harness(player: Color) -> Harness {
    let config = WidgetConfig {
        player_color: player,
        ..WidgetConfig::default()
    };
    let rules = Rc::new(RefCell::new(RulesInner::default()));
    let board = Rc::new(RefCell::new(Vec::new()));
    let wire = Rc::new(RefCell::new(Vec::new()));

    let mut session = Session::builder(config)
        .rules(Box::new(FakeRules(rules.clone())))
        .board(Box::new(RecordingBoard(board.clone())))
        .build()
        .unwrap();
    session.start_engine(Ok(Box::new(RecordingTransport(wire.clone()))));

    Harness {
        session,
        rules,
        board,
        wire,
    }
}

fn complete_handshake(session: &mut Session) {
    session.on_engine_line("uciok");
    session.on_engine_line("readyok");
}

fn go_count(wire: &Rc<RefCell<Vec<String>>>) -> usize {
    wire.borrow().iter().filter(|l| l.starts_with("go ")).count()
}

#[test]
fn builder_requires_both_components() {
    let err = Session::builder(WidgetConfig::default())
        .board(Box::new(RecordingBoard(Rc::new(RefCell::new(Vec::new())))))
        .build()
        .unwrap_err();
    assert!(matches!(err, SessionError::MissingRules));

    let err = Session::builder(WidgetConfig::default())
        .rules(Box::new(FakeRules(Rc::new(RefCell::new(RulesInner::default())))))
        .build()
        .unwrap_err();
    assert!(matches!(err, SessionError::MissingBoard));
}

#[test]
fn spawn_failure_degrades_to_a_status_message() {
    let mut session = Session::builder(WidgetConfig::default())
        .rules(Box::new(FakeRules(Rc::new(RefCell::new(RulesInner::default())))))
        .board(Box::new(RecordingBoard(Rc::new(RefCell::new(Vec::new())))))
        .build()
        .unwrap();

    session.start_engine(Err(TransportError::Spawn(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "no such binary",
    ))));

    assert_eq!(session.status(), "Could not load engine.");
    assert!(session.engine_phase().is_none());
    // the board stays playable
    assert_eq!(session.on_drop("e2", "e4"), DropOutcome::Accepted);
}

#[test]
fn status_follows_the_handshake() {
    let mut h = harness(Color::White);
    assert_eq!(h.session.status(), "Loading engine…");

    h.session.on_engine_line("uciok");
    assert_eq!(h.session.status(), "Loading engine…");

    h.session.on_engine_line("readyok");
    assert_eq!(h.session.status(), "Engine ready");
}

#[test]
fn human_as_white_waits_for_input() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);
    assert_eq!(go_count(&h.wire), 0);
}

#[test]
fn human_as_black_gets_exactly_one_opening_search() {
    let mut h = harness(Color::Black);
    complete_handshake(&mut h.session);

    assert_eq!(go_count(&h.wire), 1);
    assert!(h.wire.borrow().iter().any(|l| l == "position fen fen-0"));
    assert_eq!(h.session.status(), "Thinking…");
}

#[test]
fn human_move_hands_the_turn_to_the_engine() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);

    assert_eq!(h.session.on_drop("e2", "e4"), DropOutcome::Accepted);
    h.session.on_snap_end();

    assert_eq!(go_count(&h.wire), 1);
    assert!(h.wire.borrow().iter().any(|l| l == "position fen fen-1"));
    assert!(h.board.borrow().iter().any(|l| l == "position fen-1"));
    assert_eq!(h.session.status(), "Thinking…");
}

#[test]
fn snap_end_while_thinking_requests_nothing_new() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);
    h.session.on_drop("e2", "e4");
    h.session.on_snap_end();

    h.session.on_snap_end();

    assert_eq!(go_count(&h.wire), 1);
}

#[test]
fn best_move_is_applied_and_the_board_synced() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);
    h.session.on_drop("e2", "e4");
    h.session.on_snap_end();

    h.session.on_engine_line("bestmove e7e5");

    assert_eq!(h.rules.borrow().applied, vec!["e2e4q", "e7e5q"]);
    assert!(h.board.borrow().iter().any(|l| l == "position fen-2"));
    // thinking status cleared, no further search: it is the human's turn
    assert_eq!(h.session.status(), "");
    assert_eq!(go_count(&h.wire), 1);
}

#[test]
fn null_best_move_is_never_applied() {
    let mut h = harness(Color::Black);
    complete_handshake(&mut h.session);
    assert_eq!(go_count(&h.wire), 1);

    h.session.on_engine_line("bestmove (none)");

    assert!(h.rules.borrow().applied.is_empty());
    assert_eq!(h.session.status(), "");
    assert_eq!(go_count(&h.wire), 1);
}

#[test]
fn illegal_engine_move_is_dropped() {
    let mut h = harness(Color::Black);
    complete_handshake(&mut h.session);
    h.rules.borrow_mut().reject = true;

    h.session.on_engine_line("bestmove e7e5");

    assert!(h.rules.borrow().applied.is_empty());
    assert!(!h.board.borrow().iter().any(|l| l.starts_with("position")));
}

#[test]
fn game_over_blocks_the_turn_advance() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);
    h.session.on_drop("e2", "e4");
    h.rules.borrow_mut().over = true;

    h.session.on_snap_end();

    assert_eq!(go_count(&h.wire), 0);
}

#[test]
fn illegal_drop_snaps_back() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);
    h.rules.borrow_mut().reject = true;

    assert_eq!(h.session.on_drop("e2", "e5"), DropOutcome::Snapback);
    h.session.on_snap_end();

    // nothing was applied, so it is still the human's turn
    assert_eq!(go_count(&h.wire), 0);
}

#[test]
fn drag_gate_checks_color_and_game_state() {
    let h = harness(Color::White);
    assert!(h.session.on_drag_start(Color::White));
    assert!(!h.session.on_drag_start(Color::Black));

    h.rules.borrow_mut().over = true;
    assert!(!h.session.on_drag_start(Color::White));
}

#[test]
fn new_game_resets_rules_board_and_engine_history() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);
    h.session.on_drop("e2", "e4");
    h.session.on_snap_end();
    h.session.on_engine_line("bestmove e7e5");

    h.session.new_game();

    assert_eq!(h.rules.borrow().resets, 1);
    let board = h.board.borrow();
    assert!(board.iter().any(|l| l == "orient white"));
    assert!(board.iter().any(|l| l == "start"));
    assert!(board.iter().any(|l| l == "resize"));
    assert!(h.wire.borrow().iter().any(|l| l == "ucinewgame"));
    // human is white again: no opening search, and no repeated handshake
    assert_eq!(go_count(&h.wire), 1);
    assert_eq!(h.wire.borrow().iter().filter(|l| *l == "uci").count(), 1);
}

#[test]
fn switching_to_black_reorients_and_opens() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);

    h.session.set_player_color(Color::Black);

    assert!(h.board.borrow().iter().any(|l| l == "orient black"));
    assert_eq!(go_count(&h.wire), 1);
    assert_eq!(h.session.player_color(), Color::Black);
}

#[test]
fn dispose_quits_the_engine() {
    let mut h = harness(Color::White);
    complete_handshake(&mut h.session);

    h.session.dispose();

    assert_eq!(h.wire.borrow().last().unwrap(), "quit");
    assert!(h.session.engine_phase().is_none());
    // lines arriving afterwards are ignored
    h.session.on_engine_line("bestmove e2e4");
    assert!(h.rules.borrow().applied.is_empty());
}
