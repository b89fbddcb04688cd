//! Game state module - the aggregate and its command dispatch
//!
//! This module ties together all core components: buffer, player, ghost,
//! RNG, scoring, tools and save/load. One `GameState` is live per session
//! and is mutated exclusively through `apply`, one command at a time. The
//! engine owns no timing: an external timer dispatches `Tick` and watches
//! `restart_ticker` to know when the fall cadence must reset.
//!
//! Guarded operations (move/rotate/drop/hold/tool use) are silent no-ops
//! when their precondition fails; the only terminal condition is a spawn
//! collision, which starts the finishing sweep rather than erroring.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::buffer::Buffer;
use crate::core::command::{Command, StatePatch};
use crate::core::ghost::{ghost, Ghost};
use crate::core::player::{
    collision, drop_player, player_transform, rotate_for, rotate_noop, transform, translate_down,
    translate_for, translate_noop, Player,
};
use crate::core::rng::PieceRng;
use crate::core::saved::SavedGame;
use crate::core::scoring::{fall_delay_ms, level_up_threshold, line_award, speed_factor};
use crate::core::screen::{self, Screen};
use crate::core::tools::{GameTool, GameTools};
use crate::types::{
    Direction, GameStatus, GameToolKind, Settings, SoundKind, SoundTrack, TetrominoKind,
    BUFFER_HEIGHT, BUFFER_WIDTH, CLEAR_ROW_SPAN, FAST_SPEED_MS, LEVEL_TOAST_STEP, NEXT_MAX,
    SAVE_BONUS,
};

/// The single mutable root of a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) buffer: Buffer,
    /// Soft-drop cadence hint for the external timer
    pub(crate) fast_speed: u32,
    /// Speed factor recorded when the game entered the running state
    pub(crate) initial_speed_factor: Option<u32>,
    pub(crate) ghost: Option<Ghost>,
    pub(crate) hold: Option<TetrominoKind>,
    /// Holding is allowed once per piece; re-enabled on lock
    pub(crate) hold_enable: bool,
    pub(crate) level: u32,
    /// Lines cleared on the current level
    pub(crate) lines_level: u32,
    /// Lines needed to clear the current level
    pub(crate) lines_level_up: u32,
    pub(crate) lines_total: u32,
    /// Front = next to spawn
    pub(crate) next: VecDeque<TetrominoKind>,
    pub(crate) next_max: usize,
    pub(crate) player: Option<Player>,
    /// Set by hard drop; the next tick performs the merge, input is shut
    /// out in between
    pub(crate) player_freeze: bool,
    /// Monotonic counter; external timers restart the fall cadence when
    /// it changes
    pub(crate) restart_ticker: u32,
    pub(crate) rng: PieceRng,
    pub(crate) score: u32,
    pub(crate) screen: Screen,
    pub(crate) soft_drop: bool,
    pub(crate) sound_id: u32,
    pub(crate) sound_tracks: Vec<SoundTrack>,
    pub(crate) status: GameStatus,
    pub(crate) toast_message: Option<String>,
    /// Set when the save tool paused the game so the shell can offer a
    /// load prompt
    pub(crate) has_saved_game_prompt: bool,
    pub(crate) tools: GameTools,
    pub(crate) saved_game: Option<SavedGame>,
}

impl GameState {
    /// Create a fresh aggregate with a seeded piece source
    pub fn new(seed: u32) -> Self {
        Self::with_rng(PieceRng::new(seed))
    }

    fn with_rng(mut rng: PieceRng) -> Self {
        let mut next = VecDeque::with_capacity(NEXT_MAX + 2);
        for _ in 0..NEXT_MAX {
            next.push_back(rng.next_kind());
        }
        let buffer = Buffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        let screen = screen::render(&buffer, None, None, None);

        Self {
            buffer,
            fast_speed: FAST_SPEED_MS,
            initial_speed_factor: None,
            ghost: None,
            hold: None,
            hold_enable: true,
            level: 1,
            lines_level: 0,
            lines_level_up: 1,
            lines_total: 0,
            next,
            next_max: NEXT_MAX,
            player: None,
            player_freeze: false,
            restart_ticker: 0,
            rng,
            score: 0,
            screen,
            soft_drop: false,
            sound_id: 1,
            sound_tracks: Vec::new(),
            status: GameStatus::Welcome,
            toast_message: None,
            has_saved_game_prompt: false,
            tools: GameTools::new(),
            saved_game: None,
        }
    }

    /// Dispatch one command against the aggregate
    pub fn apply(&mut self, command: Command, settings: Settings) {
        match command {
            Command::Start(level) => self.start(level),
            Command::Run => self.run(),
            Command::Pause => self.status = GameStatus::Paused,
            Command::Resume => self.status = GameStatus::Starting,
            Command::Quit => self.quit(),
            Command::Render => self.render(),
            Command::Tick => self.tick(settings),
            Command::SoftDrop(on) => self.soft_drop = on,
            Command::HardDrop => self.hard_drop(settings),
            Command::Move(direction) => self.shift(direction, settings),
            Command::Rotate(direction) => self.rotate(direction, settings),
            Command::Hold => self.hold(),
            Command::BufferSet(buffer) => self.buffer = buffer,
            Command::BufferPatch(patches) => self.buffer.patch(&patches),
            Command::SoundAck(id) => self.sound_tracks.retain(|track| track.id != id),
            Command::Patch(patch) => self.apply_patch(*patch),
            Command::Toast(message) => self.toast_message = Some(message),
            Command::UpdateTools => self.update_tools(false),
            Command::SaveGame => self.save_game(),
            Command::LoadGame => self.load_game(),
            Command::UseTool(kind) => self.use_tool(kind),
        }
    }

    // --- lifecycle ---------------------------------------------------------

    /// Full reset at the given starting level; the piece source carries on
    /// so seeded sequences stay reproducible across restarts
    fn start(&mut self, level: u32) {
        let rng = self.rng.clone();
        *self = Self::with_rng(rng);
        self.level = level;
        self.status = GameStatus::Starting;
    }

    fn run(&mut self) {
        self.status = GameStatus::Running;
        // Tools unlocked by a non-zero starting score must not toast.
        self.update_tools(true);
        self.initial_speed_factor = Some(speed_factor(self.level));
    }

    fn quit(&mut self) {
        let rng = self.rng.clone();
        *self = Self::with_rng(rng);
    }

    // --- simulation --------------------------------------------------------

    /// One simulation step, externally timed
    fn tick(&mut self, settings: Settings) {
        if self.status == GameStatus::Finishing {
            self.finishing_tick();
            return;
        }
        self.falling_tick(settings);
    }

    fn falling_tick(&mut self, settings: Settings) {
        if let Some(mut player) = self.player {
            if player_transform(&self.buffer, &mut player, translate_down, rotate_noop) {
                self.player = Some(player);
                self.refresh_ghost(settings);
            } else {
                self.lock_player(player, settings);
            }
        } else if !self.buffer.tick_rows() {
            self.spawn_piece(settings);
        }
        self.render();
    }

    /// Merge a landed piece, credit any cleared lines, release the player
    /// slot for the next spawn
    fn lock_player(&mut self, player: Player, settings: Settings) {
        self.buffer.merge(&player.cells(), player.kind);
        let lines = self.mark_full_rows();

        let old_level = self.level;
        let sound = self.credit_lines(lines);
        if old_level != self.level && self.level % LEVEL_TOAST_STEP == 0 {
            self.toast_message = Some(format!("Level {}", self.level));
            if settings.sound {
                self.push_sound(SoundKind::LevelUp);
            }
        }
        if settings.sound {
            if let Some(sound) = sound {
                self.push_sound(sound);
            }
        }

        self.player_freeze = false;
        self.hold_enable = true;
        self.player = None;
        self.ghost = None;
        self.update_tools(false);
    }

    /// Flag every completed row for compaction; cells stay in place until
    /// `tick_rows` runs with the player slot empty
    fn mark_full_rows(&mut self) -> usize {
        let mut marked = 0;
        for row in self.buffer.rows_mut() {
            if !row.removed && row.full() {
                row.removed = true;
                marked += 1;
            }
        }
        marked
    }

    /// Register cleared lines: counters, level-up, point award. Returns
    /// the sound to emit, if any; the caller owns the sound setting.
    fn credit_lines(&mut self, lines: usize) -> Option<SoundKind> {
        if lines == 0 {
            return None;
        }
        self.lines_total += lines as u32;
        self.lines_level += lines as u32;
        if self.lines_level >= self.lines_level_up {
            self.level += 1;
            self.lines_level = 0;
            self.lines_level_up = level_up_threshold(self.level);
        }
        self.score += line_award(lines, self.level);
        Some(SoundKind::Score)
    }

    /// Dequeue the next piece and place it; a blocked spawn is game over
    fn spawn_piece(&mut self, settings: Settings) {
        let kind = match self.next.pop_front() {
            Some(kind) => kind,
            None => self.rng.next_kind(),
        };
        if self.next.len() < self.next_max {
            let refill = self.rng.next_kind();
            self.next.push_back(refill);
        }

        let player = Player::create(kind, self.buffer.width());
        let candidate = transform(&player, translate_noop, rotate_noop);
        if collision(&candidate, &self.buffer) {
            if settings.sound {
                self.push_sound(SoundKind::Finished);
            }
            self.restart_ticker += 1;
            self.status = GameStatus::Finishing;
        } else {
            self.ghost = settings
                .ghost_piece
                .then(|| ghost(&self.buffer, &player));
            self.player = Some(player);
        }
    }

    /// One step of the post-game sweep: compact an already-flagged row and
    /// bank its cells as points, else flag the next non-empty row, else
    /// the game is finished
    fn finishing_tick(&mut self) {
        let flagged = self.buffer.rows().iter().position(|row| row.removed);
        if let Some(index) = flagged {
            self.score += self.buffer.rows()[index].count() as u32;
            self.buffer.tick_rows();
            self.update_tools(false);
        } else if let Some(index) = self.buffer.rows().iter().position(|row| row.some()) {
            self.buffer.rows_mut()[index].removed = true;
        } else {
            self.status = GameStatus::Finished;
        }
        self.render();
    }

    // --- player control ----------------------------------------------------

    fn shift(&mut self, direction: Direction, settings: Settings) {
        if self.player.is_none() || self.player_freeze {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player_transform(
                &self.buffer,
                player,
                translate_for(direction),
                rotate_noop,
            );
        }
        self.refresh_ghost(settings);
        self.render();
    }

    fn rotate(&mut self, direction: Direction, settings: Settings) {
        if self.player.is_none() || self.player_freeze {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player_transform(&self.buffer, player, translate_noop, rotate_for(direction));
        }
        self.refresh_ghost(settings);
        self.render();
    }

    /// Drop to the resting position; the merge happens on the next tick,
    /// with input frozen in between
    fn hard_drop(&mut self, settings: Settings) {
        if self.player_freeze {
            return;
        }
        let Some(mut player) = self.player else {
            return;
        };

        let origin_y = player.y;
        drop_player(&self.buffer, &mut player);
        self.player = Some(player);
        self.restart_ticker += 1;
        self.screen = screen::render(&self.buffer, Some(&player), None, Some(origin_y));
        self.player_freeze = true;
        self.ghost = None;
        if settings.sound {
            self.push_sound(SoundKind::Drop);
            self.push_sound(SoundKind::Score);
        }
    }

    /// Swap the falling piece with the hold slot; the pulled piece goes to
    /// the queue front so the next spawn delivers it
    fn hold(&mut self) {
        if self.player_freeze || !self.hold_enable {
            return;
        }
        let Some(player) = self.player.take() else {
            return;
        };

        let pulled = match self.hold.take() {
            Some(kind) => kind,
            None => match self.next.pop_front() {
                Some(kind) => kind,
                None => self.rng.next_kind(),
            },
        };
        self.next.push_front(pulled);

        self.ghost = None;
        self.hold = Some(player.kind);
        self.hold_enable = false;
    }

    // --- outputs -----------------------------------------------------------

    /// Recomposite the render-ready screen
    fn render(&mut self) {
        self.screen = screen::render(
            &self.buffer,
            self.player.as_ref(),
            self.ghost.as_ref(),
            None,
        );
    }

    fn refresh_ghost(&mut self, settings: Settings) {
        self.ghost = match (&self.player, settings.ghost_piece) {
            (Some(player), true) => Some(ghost(&self.buffer, player)),
            _ => None,
        };
    }

    fn push_sound(&mut self, kind: SoundKind) {
        let id = self.sound_id;
        self.sound_id += 1;
        self.sound_tracks.push(SoundTrack { id, kind });
    }

    // --- tools and snapshots -----------------------------------------------

    /// Recompute availability of every tool from the current score.
    /// Initial checks stay silent so tools unlocked by a starting score
    /// don't spuriously notify.
    fn update_tools(&mut self, initial: bool) {
        let score = self.score;
        let status = self.status;
        let mut unlocked: ArrayVec<String, 3> = ArrayVec::new();

        for tool in self.tools.iter_mut() {
            if score >= tool.required_score && !tool.available {
                tool.available = true;
                if !initial {
                    unlocked.push(tool.name.clone());
                }
            } else if score < tool.required_score && tool.available {
                // Score dropped back below the threshold, e.g. after
                // spending points on another tool.
                tool.available = false;
            }
        }

        for name in unlocked {
            self.toast_message = Some(format!("{} tool is now available!", name));
            if status == GameStatus::Running {
                self.push_sound(SoundKind::LevelUp);
            }
        }
    }

    /// Ambient save: snapshot plus a point bonus for planning ahead
    fn save_game(&mut self) {
        if !matches!(self.status, GameStatus::Running | GameStatus::Paused) {
            return;
        }
        self.saved_game = Some(SavedGame::capture(self));
        self.toast_message = Some("Game saved!".to_string());
        self.score += SAVE_BONUS;
        self.push_sound(SoundKind::Score);
        if self.tools.get(GameToolKind::SaveGame).available {
            self.tools.get_mut(GameToolKind::SaveGame).available = false;
        }
    }

    /// Restore the snapshot; tool state stays current and the snapshot is
    /// kept, so loading again returns to the same checkpoint
    fn load_game(&mut self) {
        let Some(saved) = self.saved_game.clone() else {
            return;
        };
        saved.state.restore_into(self);
        self.push_sound(SoundKind::LevelUp);
        self.toast_message = Some("Game restored!".to_string());
        self.status = GameStatus::Paused;
    }

    /// Spend points on a tool; no-op unless the game is in progress, the
    /// tool is unlocked and the score covers its cost
    fn use_tool(&mut self, kind: GameToolKind) {
        let tool = self.tools.get(kind);
        if !matches!(self.status, GameStatus::Running | GameStatus::Paused)
            || !tool.available
            || self.score < tool.required_score
        {
            return;
        }
        let cost = tool.required_score;

        self.push_sound(SoundKind::Score);
        self.score -= cost;

        match kind {
            GameToolKind::SaveGame => self.tool_save(cost),
            GameToolKind::SkipPiece => self.tool_skip_piece(cost),
            GameToolKind::ClearRow => self.tool_clear_row(cost),
        }

        // Unavailable after use until the score qualifies again; the
        // refresh below may immediately re-unlock it.
        self.tools.get_mut(kind).available = false;
        self.update_tools(false);
    }

    fn tool_save(&mut self, cost: u32) {
        self.saved_game = Some(SavedGame::capture(self));
        self.push_sound(SoundKind::LevelUp);
        if self.status == GameStatus::Running {
            // Brief pause as feedback that the save happened.
            self.status = GameStatus::Paused;
            self.has_saved_game_prompt = true;
        }
        self.toast_message = Some(format!("Game saved! (-{} points)", cost));
    }

    fn tool_skip_piece(&mut self, cost: u32) {
        if self.player.is_none() {
            return;
        }
        self.player = None;
        self.ghost = None;

        // Three favorable pieces to the front of the queue.
        for _ in 0..3 {
            let kind = self.rng.next_favorable();
            self.next.push_front(kind);
        }
        while self.next.len() > self.next_max + 2 {
            self.next.pop_back();
        }

        self.push_sound(SoundKind::LevelUp);
        self.toast_message = Some(format!(
            "Skipped piece! (-{} points, 3 favorable pieces coming)",
            cost
        ));
    }

    fn tool_clear_row(&mut self, cost: u32) {
        // Bottom-up, up to four rows that actually hold blocks.
        let mut targets: ArrayVec<usize, CLEAR_ROW_SPAN> = ArrayVec::new();
        for y in (0..self.buffer.height()).rev() {
            if targets.is_full() {
                break;
            }
            if self.buffer.rows()[y].some() {
                targets.push(y);
            }
        }

        if !targets.is_empty() {
            let cleared = targets.len() as u32;
            for &y in &targets {
                let row = &mut self.buffer.rows_mut()[y];
                row.clear_cells();
                row.removed = true;
            }
            for _ in 0..cleared {
                self.push_sound(SoundKind::Score);
            }

            self.lines_total += cleared;
            self.lines_level += cleared;
            if self.lines_level >= self.lines_level_up {
                self.level += 1;
                self.lines_level = 0;
                self.lines_level_up = level_up_threshold(self.level);
                self.push_sound(SoundKind::LevelUp);
            }

            let plural = if cleared > 1 { "s" } else { "" };
            self.toast_message = Some(format!(
                "Cleared {} row{}! (-{} points)",
                cleared, plural, cost
            ));
        } else {
            // Preparation branch: empty the bottom rows without removing
            // them from the row list, so the stack does not shift.
            let height = self.buffer.height();
            for y in height.saturating_sub(CLEAR_ROW_SPAN)..height {
                self.buffer.rows_mut()[y].clear_cells();
            }
            self.toast_message = Some(format!(
                "Prepared bottom rows for your next moves! (-{} points)",
                cost
            ));
        }
    }

    fn apply_patch(&mut self, patch: StatePatch) {
        if let Some(buffer) = patch.buffer {
            self.buffer = buffer;
        }
        if let Some(next) = patch.next {
            self.next = next.into_iter().collect();
        }
        if let Some(hold) = patch.hold {
            self.hold = Some(hold);
        }
        if let Some(score) = patch.score {
            self.score = score;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(lines_total) = patch.lines_total {
            self.lines_total = lines_total;
        }
        if let Some(lines_level) = patch.lines_level {
            self.lines_level = lines_level;
        }
        if let Some(lines_level_up) = patch.lines_level_up {
            self.lines_level_up = lines_level_up;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    // --- read accessors ----------------------------------------------------

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_total(&self) -> u32 {
        self.lines_total
    }

    pub fn lines_level(&self) -> u32 {
        self.lines_level
    }

    pub fn lines_level_up(&self) -> u32 {
        self.lines_level_up
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn ghost(&self) -> Option<&Ghost> {
        self.ghost.as_ref()
    }

    pub fn hold_piece(&self) -> Option<TetrominoKind> {
        self.hold
    }

    pub fn hold_enabled(&self) -> bool {
        self.hold_enable
    }

    pub fn player_frozen(&self) -> bool {
        self.player_freeze
    }

    pub fn next_queue(&self) -> &VecDeque<TetrominoKind> {
        &self.next
    }

    pub fn tools(&self) -> impl Iterator<Item = &GameTool> {
        self.tools.iter()
    }

    pub fn tool(&self, kind: GameToolKind) -> &GameTool {
        self.tools.get(kind)
    }

    pub fn saved_game(&self) -> Option<&SavedGame> {
        self.saved_game.as_ref()
    }

    pub fn sound_tracks(&self) -> &[SoundTrack] {
        &self.sound_tracks
    }

    pub fn toast_message(&self) -> Option<&str> {
        self.toast_message.as_deref()
    }

    /// Read and clear the pending toast
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast_message.take()
    }

    pub fn restart_ticker(&self) -> u32 {
        self.restart_ticker
    }

    /// Milliseconds between gravity ticks at the current level
    pub fn fall_delay_ms(&self) -> u32 {
        fall_delay_ms(self.level)
    }

    pub fn fast_speed(&self) -> u32 {
        self.fast_speed
    }

    pub fn initial_speed_factor(&self) -> Option<u32> {
        self.initial_speed_factor
    }

    pub fn soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn has_saved_game_prompt(&self) -> bool {
        self.has_saved_game_prompt
    }

    /// Current piece-source state, usable to replay the sequence
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
