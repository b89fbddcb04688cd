//! Screen module - composites buffer, player and ghost into render output
//!
//! This module is pure (no I/O). The screen is the render-ready grid the
//! UI collaborator consumes; it is rebuilt after every mutation that can
//! change what the player sees.

use serde::{Deserialize, Serialize};

use crate::core::buffer::Buffer;
use crate::core::ghost::Ghost;
use crate::core::player::Player;
use crate::types::TetrominoKind;

/// One cell of the composited output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenCell {
    #[default]
    Empty,
    /// A locked block or the falling piece
    Block(TetrominoKind),
    /// Resting-position preview
    Ghost(TetrominoKind),
    /// Column swept by a hard drop, shown for one render
    Trail(TetrominoKind),
}

impl ScreenCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, ScreenCell::Empty)
    }
}

/// Render-ready composited grid, `height` rows by `width` columns
pub type Screen = Vec<Vec<ScreenCell>>;

/// Composite the buffer with the active piece and ghost overlay.
///
/// `trail_from` is the piece's anchor row before a hard drop; when given,
/// the cells the piece fell through are marked as trail.
pub fn render(
    buffer: &Buffer,
    player: Option<&Player>,
    ghost: Option<&Ghost>,
    trail_from: Option<i32>,
) -> Screen {
    let width = buffer.width();
    let height = buffer.height();
    let mut screen: Screen = buffer
        .rows()
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| match cell {
                    Some(kind) => ScreenCell::Block(*kind),
                    None => ScreenCell::Empty,
                })
                .collect()
        })
        .collect();

    let put = |x: i32, y: i32, cell: ScreenCell, screen: &mut Screen| {
        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
            screen[y as usize][x as usize] = cell;
        }
    };

    // Ghost first so the player overdraws it when they overlap.
    if let Some(ghost) = ghost {
        for (x, y) in ghost.cells() {
            put(x, y, ScreenCell::Ghost(ghost.kind), &mut screen);
        }
    }

    if let Some(player) = player {
        if let Some(origin_y) = trail_from {
            for (dx, dy) in player.shape() {
                let x = player.x + dx;
                for y in (origin_y + dy)..(player.y + dy) {
                    if y >= 0
                        && (y as usize) < height
                        && x >= 0
                        && (x as usize) < width
                        && screen[y as usize][x as usize].is_empty()
                    {
                        screen[y as usize][x as usize] = ScreenCell::Trail(player.kind);
                    }
                }
            }
        }
        for (x, y) in player.cells() {
            put(x, y, ScreenCell::Block(player.kind), &mut screen);
        }
    }

    screen
}
