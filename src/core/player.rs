//! Player module - the actively falling piece and its guarded transforms
//!
//! All movement goes through one pipeline: build a transformed candidate,
//! test it against the buffer, and commit only when the candidate is
//! collision-free. Moves, rotations and drops differ only in which
//! translate/rotate functions they feed the pipeline; `translate_noop`
//! and `rotate_noop` let the same pipeline express pure moves or pure
//! rotations.

use serde::{Deserialize, Serialize};

use crate::core::buffer::Buffer;
use crate::core::tetromino::{shape, spawn_x, PieceShape};
use crate::types::{Direction, Rotation, TetrominoKind};

/// The actively falling, player-controlled piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub kind: TetrominoKind,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
}

impl Player {
    /// Create a new piece at the spawn anchor of a buffer of the given width
    pub fn create(kind: TetrominoKind, buffer_width: usize) -> Self {
        Self {
            kind,
            x: spawn_x(buffer_width),
            y: 0,
            rotation: Rotation::North,
        }
    }

    /// Block offsets for the current rotation
    pub fn shape(&self) -> PieceShape {
        shape(self.kind, self.rotation)
    }

    /// Absolute buffer coordinates of the piece's occupied cells
    pub fn cells(&self) -> [(i32, i32); 4] {
        let mut cells = self.shape();
        for cell in &mut cells {
            cell.0 += self.x;
            cell.1 += self.y;
        }
        cells
    }
}

/// Translation step applied to the piece anchor
pub type Translate = fn(i32, i32) -> (i32, i32);

/// Rotation step applied to the piece orientation
pub type Rotate = fn(Rotation) -> Rotation;

pub fn translate_noop(x: i32, y: i32) -> (i32, i32) {
    (x, y)
}

pub fn translate_left(x: i32, y: i32) -> (i32, i32) {
    (x - 1, y)
}

pub fn translate_right(x: i32, y: i32) -> (i32, i32) {
    (x + 1, y)
}

pub fn translate_down(x: i32, y: i32) -> (i32, i32) {
    (x, y + 1)
}

pub fn rotate_noop(rotation: Rotation) -> Rotation {
    rotation
}

pub fn rotate_left(rotation: Rotation) -> Rotation {
    rotation.ccw()
}

pub fn rotate_right(rotation: Rotation) -> Rotation {
    rotation.cw()
}

/// Translate table keyed by direction
pub fn translate_for(direction: Direction) -> Translate {
    match direction {
        Direction::Left => translate_left,
        Direction::Right => translate_right,
    }
}

/// Rotate table keyed by direction
pub fn rotate_for(direction: Direction) -> Rotate {
    match direction {
        Direction::Left => rotate_left,
        Direction::Right => rotate_right,
    }
}

/// Pure transform: returns a translated and/or rotated candidate without
/// touching the original
pub fn transform(player: &Player, translate: Translate, rotate: Rotate) -> Player {
    let (x, y) = translate(player.x, player.y);
    Player {
        kind: player.kind,
        x,
        y,
        rotation: rotate(player.rotation),
    }
}

/// True when any occupied cell of the candidate falls outside the buffer
/// bounds or overlaps a filled cell
pub fn collision(candidate: &Player, buffer: &Buffer) -> bool {
    candidate
        .cells()
        .iter()
        .any(|&(x, y)| !buffer.is_open(x, y))
}

/// Guarded move: build the candidate, commit it only if collision-free.
/// Returns whether the transform was committed; on collision the player
/// is left unchanged.
pub fn player_transform(
    buffer: &Buffer,
    player: &mut Player,
    translate: Translate,
    rotate: Rotate,
) -> bool {
    let candidate = transform(player, translate, rotate);
    if collision(&candidate, buffer) {
        return false;
    }
    *player = candidate;
    true
}

/// Drop the piece straight down to its resting position
pub fn drop_player(buffer: &Buffer, player: &mut Player) {
    while player_transform(buffer, player, translate_down, rotate_noop) {}
}
