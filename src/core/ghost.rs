//! Ghost module - projects the falling piece's resting position
//!
//! The ghost is derived data: recomputed after every move, rotate or tick
//! while the ghost-piece display option is enabled, never mutated on its
//! own. When the option is off it is simply not computed.

use serde::{Deserialize, Serialize};

use crate::core::buffer::Buffer;
use crate::core::player::{collision, rotate_noop, transform, translate_down, Player};
use crate::types::{Rotation, TetrominoKind};

/// Non-interactive preview of where the player piece would come to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    pub kind: TetrominoKind,
    pub x: i32,
    pub y: i32,
    pub rotation: Rotation,
}

impl Ghost {
    /// Absolute buffer coordinates of the ghost's cells
    pub fn cells(&self) -> [(i32, i32); 4] {
        Player {
            kind: self.kind,
            x: self.x,
            y: self.y,
            rotation: self.rotation,
        }
        .cells()
    }
}

/// Compute the ghost for the current player: translate a copy down until
/// one step before collision
pub fn ghost(buffer: &Buffer, player: &Player) -> Ghost {
    let mut probe = *player;
    loop {
        let candidate = transform(&probe, translate_down, rotate_noop);
        if collision(&candidate, buffer) {
            break;
        }
        probe = candidate;
    }
    Ghost {
        kind: probe.kind,
        x: probe.x,
        y: probe.y,
        rotation: probe.rotation,
    }
}
