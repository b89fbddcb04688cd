//! Core module - pure game logic with no I/O
//!
//! This module contains all the game rules, state management, and logic.
//! It has zero dependencies on UI, timers, or audio playback; those are
//! collaborators that dispatch commands and consume the outputs.

pub mod buffer;
pub mod command;
pub mod game_state;
pub mod ghost;
pub mod player;
pub mod rng;
pub mod saved;
pub mod scoring;
pub mod screen;
pub mod tetromino;
pub mod tools;

// Re-export commonly used types
pub use buffer::{Buffer, BufferPatch, BufferRow};
pub use command::{Command, StatePatch};
pub use game_state::GameState;
pub use ghost::{ghost, Ghost};
pub use player::{
    collision, drop_player, player_transform, rotate_for, rotate_noop, transform, translate_for,
    translate_noop, Player,
};
pub use rng::PieceRng;
pub use saved::{SavedGame, SavedState};
pub use screen::{render, Screen, ScreenCell};
pub use tools::{GameTool, GameTools};
