//! Saved-game module - explicit structural clone of the aggregate
//!
//! A save is a deliberate field-for-field value copy of the game state,
//! excluding the tool set and the saved snapshot itself. Loading writes
//! the copy back over the live aggregate while current tool state and
//! the snapshot survive, so repeated loads return to the same checkpoint.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::buffer::Buffer;
use crate::core::game_state::GameState;
use crate::core::ghost::Ghost;
use crate::core::player::Player;
use crate::core::rng::PieceRng;
use crate::core::screen::Screen;
use crate::types::{GameStatus, SoundTrack, TetrominoKind};

/// Value copy of every aggregate field except `tools` and `saved_game`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    pub buffer: Buffer,
    pub fast_speed: u32,
    pub initial_speed_factor: Option<u32>,
    pub ghost: Option<Ghost>,
    pub hold: Option<TetrominoKind>,
    pub hold_enable: bool,
    pub level: u32,
    pub lines_level: u32,
    pub lines_level_up: u32,
    pub lines_total: u32,
    pub next: VecDeque<TetrominoKind>,
    pub next_max: usize,
    pub player: Option<Player>,
    pub player_freeze: bool,
    pub restart_ticker: u32,
    pub rng: PieceRng,
    pub score: u32,
    pub screen: Screen,
    pub soft_drop: bool,
    pub sound_id: u32,
    pub sound_tracks: Vec<SoundTrack>,
    pub status: GameStatus,
    pub toast_message: Option<String>,
    pub has_saved_game_prompt: bool,
}

impl SavedState {
    /// Capture a value copy of the current aggregate
    pub fn capture(state: &GameState) -> Self {
        Self {
            buffer: state.buffer.clone(),
            fast_speed: state.fast_speed,
            initial_speed_factor: state.initial_speed_factor,
            ghost: state.ghost,
            hold: state.hold,
            hold_enable: state.hold_enable,
            level: state.level,
            lines_level: state.lines_level,
            lines_level_up: state.lines_level_up,
            lines_total: state.lines_total,
            next: state.next.clone(),
            next_max: state.next_max,
            player: state.player,
            player_freeze: state.player_freeze,
            restart_ticker: state.restart_ticker,
            rng: state.rng.clone(),
            score: state.score,
            screen: state.screen.clone(),
            soft_drop: state.soft_drop,
            sound_id: state.sound_id,
            sound_tracks: state.sound_tracks.clone(),
            status: state.status,
            toast_message: state.toast_message.clone(),
            has_saved_game_prompt: state.has_saved_game_prompt,
        }
    }

    /// Write the copy back over the aggregate; `tools` and `saved_game`
    /// keep their current values
    pub fn restore_into(&self, state: &mut GameState) {
        state.buffer = self.buffer.clone();
        state.fast_speed = self.fast_speed;
        state.initial_speed_factor = self.initial_speed_factor;
        state.ghost = self.ghost;
        state.hold = self.hold;
        state.hold_enable = self.hold_enable;
        state.level = self.level;
        state.lines_level = self.lines_level;
        state.lines_level_up = self.lines_level_up;
        state.lines_total = self.lines_total;
        state.next = self.next.clone();
        state.next_max = self.next_max;
        state.player = self.player;
        state.player_freeze = self.player_freeze;
        state.restart_ticker = self.restart_ticker;
        state.rng = self.rng.clone();
        state.score = self.score;
        state.screen = self.screen.clone();
        state.soft_drop = self.soft_drop;
        state.sound_id = self.sound_id;
        state.sound_tracks = self.sound_tracks.clone();
        state.status = self.status;
        state.toast_message = self.toast_message.clone();
        state.has_saved_game_prompt = self.has_saved_game_prompt;
    }
}

/// The retained snapshot plus when it was taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub state: SavedState,
    /// Milliseconds since the Unix epoch at save time
    pub timestamp_ms: u64,
}

impl SavedGame {
    pub fn capture(state: &GameState) -> Self {
        Self {
            state: SavedState::capture(state),
            timestamp_ms: now_ms(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
