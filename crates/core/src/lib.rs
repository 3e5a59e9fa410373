//! Core simulation - pure, deterministic, and testable
//!
//! This crate holds every game rule and all session state for a falling-block
//! puzzle. It has **no dependencies** on rendering, audio, input devices, or
//! a wall clock, which keeps it:
//!
//! - **Deterministic**: the same seed, rules and intent sequence always produce
//!   the same session
//! - **Testable**: every rule is exercised without a terminal or a timer
//! - **Portable**: the caller decides how ticks are paced and how state is drawn
//!
//! # Module Structure
//!
//! - [`catalog`]: the seven piece kinds, their four rotation states, and kick tables
//! - [`rng`]: seeded 7-bag randomizer
//! - [`grid`]: the playfield with placement checks and row compaction
//! - [`piece`]: the active piece controller (move, rotate, drop, lock timing)
//! - [`clear`]: full-row detection and removal after a lock
//! - [`scoring`]: score, line total, level, combo and fall speed
//! - [`game_state`]: the session state machine driving all of the above
//! - [`input`]: bounded intent queue drained once per tick
//! - [`snapshot`]: render view and the persisted session format
//! - [`config`], [`error`], [`event`]: rules, failures, and per-tick events
//!
//! # Example
//!
//! ```
//! use block_shock_core::{GameEvent, GameSession};
//! use block_shock_core::types::Intent;
//!
//! let mut session = GameSession::with_seed(12345);
//! session.start();
//!
//! // The first tick spawns a piece
//! session.tick();
//! assert!(session.active().is_some());
//!
//! session.queue(Intent::MoveRight);
//! session.queue(Intent::RotateCw);
//! session.queue(Intent::HardDrop);
//! let events = session.tick();
//! assert!(matches!(events[0], GameEvent::Locked { .. }));
//! assert_eq!(session.grid().occupied_count(), 4);
//! ```
//!
//! # Timing
//!
//! One [`GameSession::tick`] is one fixed step of `tick_ms` simulated
//! milliseconds (16 by default). Gravity and lock delay are measured in those
//! steps, never in wall-clock time.

pub mod catalog;
pub mod clear;
pub mod config;
pub mod error;
pub mod event;
pub mod game_state;
pub mod grid;
pub mod input;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use block_shock_types as types;

// Re-export commonly used types for convenience
pub use catalog::KickPolicy;
pub use clear::ClearEvent;
pub use config::RuleConfig;
pub use error::{ConfigError, SnapshotError};
pub use event::GameEvent;
pub use game_state::{GameSession, GameStatus};
pub use grid::Grid;
pub use input::InputQueue;
pub use piece::{ActivePiece, PieceController, PiecePhase};
pub use rng::{Bag, BagState, SimpleRng};
pub use scoring::{ScoreDelta, ScoreState, Scoring};
pub use snapshot::{RenderSnapshot, SessionSnapshot, SNAPSHOT_VERSION};
