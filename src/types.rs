//! Core types shared across the engine
//! This module contains pure data types with no dependencies on other modules

use serde::{Deserialize, Serialize};

/// Playfield dimensions
pub const BUFFER_WIDTH: usize = 10;
pub const BUFFER_HEIGHT: usize = 20;

/// Target length of the next-piece queue
pub const NEXT_MAX: usize = 3;

/// Gravity cadence (milliseconds between fall ticks, read by the external timer)
pub const BASE_FALL_DELAY_MS: u32 = 620;
pub const FALL_DELAY_STEP_MS: u32 = 20;
pub const FALL_DELAY_FLOOR_MS: u32 = 120;

/// Soft-drop cadence hint for the external timer
pub const FAST_SPEED_MS: u32 = 25;

/// Line-clear awards indexed by lines cleared this lock, multiplied by level
pub const LINE_AWARDS: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points granted by the ambient save command
pub const SAVE_BONUS: u32 = 50;

/// Cap on the lines-to-level-up threshold
pub const LINES_LEVEL_UP_CAP: u32 = 10;

/// A level-up toast fires on every multiple of this
pub const LEVEL_TOAST_STEP: u32 = 5;

/// Rows the clear-row tool sweeps from the bottom
pub const CLEAR_ROW_SPAN: usize = 4;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    /// All seven kinds, in canonical order
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::O,
        TetrominoKind::T,
        TetrominoKind::S,
        TetrominoKind::Z,
        TetrominoKind::J,
        TetrominoKind::L,
    ];

    /// Kinds handed out by the skip-piece tool
    pub const FAVORABLE: [TetrominoKind; 4] = [
        TetrominoKind::I,
        TetrominoKind::T,
        TetrominoKind::L,
        TetrominoKind::J,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(TetrominoKind::I),
            "o" => Some(TetrominoKind::O),
            "t" => Some(TetrominoKind::T),
            "s" => Some(TetrominoKind::S),
            "z" => Some(TetrominoKind::Z),
            "j" => Some(TetrominoKind::J),
            "l" => Some(TetrominoKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            TetrominoKind::I => "i",
            TetrominoKind::O => "o",
            TetrominoKind::T => "t",
            TetrominoKind::S => "s",
            TetrominoKind::Z => "z",
            TetrominoKind::J => "j",
            TetrominoKind::L => "l",
        }
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }
}

/// Horizontal direction, used by both the translate and rotate tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// Lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Welcome screen, no game in progress
    Welcome,
    /// Countdown before pieces fall
    Starting,
    /// Pieces are falling
    Running,
    /// Game in progress but paused
    Paused,
    /// Game over, sweeping the board for final points
    Finishing,
    /// Final score shown
    Finished,
}

/// Sound effects the engine requests; playback belongs to a collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundKind {
    Drop,
    Score,
    LevelUp,
    Finished,
}

/// A queued sound request, acknowledged by id once played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundTrack {
    pub id: u32,
    pub kind: SoundKind,
}

/// The three score-gated tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameToolKind {
    SaveGame,
    SkipPiece,
    ClearRow,
}

/// Read-only preferences snapshot supplied by the settings collaborator
/// with every dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub sound: bool,
    pub ghost_piece: bool,
}

impl Settings {
    pub fn new(sound: bool, ghost_piece: bool) -> Self {
        Self { sound, ghost_piece }
    }
}

/// Cell on the playfield (None = empty, Some = filled with piece kind)
pub type Cell = Option<TetrominoKind>;
