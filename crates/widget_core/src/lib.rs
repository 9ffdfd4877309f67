//! Session core for a play-against-the-engine chess widget.
//!
//! This crate is orchestration, not chess: the rules live behind
//! [`RulesOracle`], the rendering behind [`BoardView`], and the move search
//! inside an external engine process reached through [`EngineTransport`].
//! What this crate owns is the glue:
//! - [`EngineSession`], the finite-state adapter for the engine's
//!   line-oriented search protocol (handshake, configuration, best-move relay)
//! - [`Session`], the orchestrator applying user and engine moves and
//!   deciding when the engine is to move
//! - the best-effort public ratings fetch and the featured-game embed URL
//! - TOML configuration for the whole widget

pub mod board;
pub mod config;
pub mod embed;
pub mod engine;
pub mod ratings;
pub mod rules;
pub mod session;
pub mod transport;
pub mod types;
pub mod uci;

pub use board::*;
pub use config::*;
pub use embed::featured_game_url;
pub use engine::*;
pub use ratings::*;
pub use rules::*;
pub use session::*;
pub use transport::*;
pub use types::*;
