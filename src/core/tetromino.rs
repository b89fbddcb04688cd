//! Tetromino module - canonical piece shapes
//!
//! Each kind maps to a pre-tabulated coordinate set per rotation state;
//! rotation is a table lookup, no runtime trigonometry.

use crate::types::{Rotation, TetrominoKind};

/// Offset of a single block relative to the piece anchor
pub type BlockOffset = (i32, i32);

/// Shape of a piece - 4 block offsets from the piece anchor
pub type PieceShape = [BlockOffset; 4];

/// Get the shape (block offsets) for a piece kind and rotation
pub fn shape(kind: TetrominoKind, rotation: Rotation) -> PieceShape {
    match kind {
        TetrominoKind::I => i_shape(rotation),
        TetrominoKind::O => o_shape(rotation),
        TetrominoKind::T => t_shape(rotation),
        TetrominoKind::S => s_shape(rotation),
        TetrominoKind::Z => z_shape(rotation),
        TetrominoKind::J => j_shape(rotation),
        TetrominoKind::L => l_shape(rotation),
    }
}

/// Spawn anchor for a new piece, horizontally centered on the buffer
pub fn spawn_x(buffer_width: usize) -> i32 {
    (buffer_width.saturating_sub(4) / 2) as i32
}

fn i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece is rotation-invariant
fn o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}
