//! Scoring module - line awards, level progression and fall cadence
//!
//! Points scale superlinearly with lines cleared in one lock and linearly
//! with the current level, so multi-line clears at speed are worth far
//! more than the same lines cleared one at a time.

use crate::types::{
    BASE_FALL_DELAY_MS, FALL_DELAY_FLOOR_MS, FALL_DELAY_STEP_MS, LINES_LEVEL_UP_CAP, LINE_AWARDS,
};

/// Points for clearing `lines` rows with a single lock at `level`
pub fn line_award(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_AWARDS.len() {
        return 0;
    }
    LINE_AWARDS[lines] * level
}

/// Lines needed to clear the next level; grows with the level, capped
pub fn level_up_threshold(level: u32) -> u32 {
    level.min(LINES_LEVEL_UP_CAP).max(1)
}

/// Milliseconds between gravity ticks at `level`, floored so high levels
/// stay playable
pub fn fall_delay_ms(level: u32) -> u32 {
    BASE_FALL_DELAY_MS
        .saturating_sub(level.saturating_mul(FALL_DELAY_STEP_MS))
        .max(FALL_DELAY_FLOOR_MS)
}

/// Speed factor recorded when the game enters the running state, so a
/// resume reproduces the cadence of the original start
pub fn speed_factor(level: u32) -> u32 {
    level * 20
}
