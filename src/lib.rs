//! Falling-block puzzle engine.
//!
//! The engine is pure, deterministic, and command-driven: an external
//! shell dispatches one [`Command`](core::Command) at a time together
//! with a read-only [`Settings`](types::Settings) snapshot, and reads
//! back the composited screen, queued sound requests, toast messages,
//! and counters. Timing lives outside the engine; a collaborator timer
//! dispatches `Tick` and restarts its cadence whenever `restart_ticker`
//! changes.
//!
//! # Module structure
//!
//! - [`core::buffer`]: the grid of locked blocks with row compaction
//! - [`core::player`]: the falling piece and its guarded transforms
//! - [`core::ghost`]: resting-position projection
//! - [`core::game_state`]: the aggregate and its command dispatch
//! - [`core::scoring`]: line awards, level progression, fall cadence
//! - [`core::tools`]: score-gated aids (save/load, skip piece, clear row)
//! - [`core::screen`]: render-ready composited output
//! - [`core::rng`]: seedable piece source for reproducible games
//!
//! # Example
//!
//! ```
//! use blockfall::core::{Command, GameState};
//! use blockfall::types::{Direction, Settings};
//!
//! let settings = Settings::new(true, true);
//! let mut game = GameState::new(12345);
//!
//! game.apply(Command::Start(1), settings);
//! game.apply(Command::Run, settings);
//! game.apply(Command::Tick, settings);
//! game.apply(Command::Move(Direction::Left), settings);
//! game.apply(Command::HardDrop, settings);
//!
//! assert!(game.player().is_some());
//! ```

pub mod core;
pub mod types;

pub use crate::core::{Command, GameState};
pub use crate::types::{Direction, GameStatus, GameToolKind, Settings};
