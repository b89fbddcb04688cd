//! Command module - the engine's single mutation surface
//!
//! External collaborators drive the engine by dispatching one command at
//! a time; each command synchronously mutates the aggregate and leaves a
//! freshly composited screen plus any pending sound/toast outputs behind.

use serde::{Deserialize, Serialize};

use crate::core::buffer::{Buffer, BufferPatch};
use crate::types::{Direction, GameStatus, GameToolKind, TetrominoKind};

/// One discrete engine action, optionally carrying a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Reset everything and begin a new game at the given level
    Start(u32),
    /// Leave the starting countdown and let pieces fall
    Run,
    Pause,
    /// Back through the starting countdown, not straight to running
    Resume,
    Quit,
    /// Recomposite the screen without advancing the simulation
    Render,
    /// One simulation step; drives both the falling and finishing machines
    Tick,
    /// Soft-drop key held or released
    SoftDrop(bool),
    HardDrop,
    Move(Direction),
    Rotate(Direction),
    Hold,
    /// Replace the whole buffer
    BufferSet(Buffer),
    /// Apply single-cell writes
    BufferPatch(Vec<BufferPatch>),
    /// Acknowledge a played sound track by id
    SoundAck(u32),
    /// Restore a persisted subset of fields
    Patch(Box<StatePatch>),
    /// Show a message to the player
    Toast(String),
    /// Recompute tool availability from the current score
    UpdateTools,
    /// Snapshot the game (ambient path, awards bonus points)
    SaveGame,
    /// Return to the last snapshot
    LoadGame,
    /// Spend points on a score-gated tool
    UseTool(GameToolKind),
}

/// Partial state restore used by the persistence collaborator; absent
/// fields are left untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatePatch {
    pub buffer: Option<Buffer>,
    pub next: Option<Vec<TetrominoKind>>,
    pub hold: Option<TetrominoKind>,
    pub score: Option<u32>,
    pub level: Option<u32>,
    pub lines_total: Option<u32>,
    pub lines_level: Option<u32>,
    pub lines_level_up: Option<u32>,
    pub status: Option<GameStatus>,
}
