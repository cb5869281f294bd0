//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation
//! logic. It has no dependencies on terminal, input, or file I/O.
//!
//! # Module Structure
//!
//! - [`shapes`]: the 5x5 local-grid shape table for every kind and rotation
//! - [`board`]: configurable-size locked-cell grid and row clearing
//! - [`piece`]: the active piece, collision, and the horizontal kick rotation
//! - [`rng`]: 7-bag randomizer and the lookahead queue
//! - [`lock`]: lock-delay state machine
//! - [`scoring`]: T-Spin detection, clear scoring and level progression
//! - [`game_state`]: the per-tick engine composing all of the above
//! - [`snapshot`]: read-only state for renderers
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use blockfall_config::EngineConfig;
//! use blockfall_core::GameState;
//! use blockfall_types::GameAction;
//!
//! let start = Instant::now();
//! let mut game = GameState::with_seed(EngineConfig::default(), 12345, start);
//!
//! game.tick(start, Some(GameAction::MoveRight));
//! game.tick(start, Some(GameAction::Rotate));
//! game.tick(start + Duration::from_millis(16), Some(GameAction::HardDrop));
//!
//! // Hard drop awards two points per row.
//! assert!(game.score() > 0);
//! assert_eq!(game.board().filled_count(), 4);
//! ```
//!
//! # Timing
//!
//! Callers pass a wall-clock `Instant` into every tick. Gravity steps once
//! its interval has strictly elapsed; lock delay counts from the moment a
//! piece became grounded. Pausing freezes both.

pub mod board;
pub mod game_state;
pub mod lock;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, MAX_CLEARED_ROWS};
pub use game_state::{GameState, LockEvent};
pub use lock::{LockController, LockState};
pub use piece::{ActivePiece, KICKS};
pub use rng::{PieceQueue, Randomizer};
pub use scoring::{calculate_drop_score, detect_tspin, ScoreResult, ScoreState};
pub use shapes::occupied_cells;
pub use snapshot::{ActiveSnapshot, GameSnapshot};
