//! Tools module - the three score-gated player aids
//!
//! Each tool flips available once the score reaches its threshold and
//! back to unavailable when the score later drops below it; availability
//! is a function of the current score, recomputed after every score
//! change, not a one-shot unlock.

use serde::{Deserialize, Serialize};

use crate::types::GameToolKind;

/// A score-gated special action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTool {
    pub kind: GameToolKind,
    /// Score required to unlock and spend on the tool
    pub required_score: u32,
    pub available: bool,
    pub name: String,
    pub description: String,
}

impl GameTool {
    fn new(kind: GameToolKind, required_score: u32, name: &str, description: &str) -> Self {
        Self {
            kind,
            required_score,
            available: false,
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// The fixed set of tools, keyed by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTools {
    tools: [GameTool; 3],
}

impl GameTools {
    /// All tools start unavailable; thresholds are fixed per tool
    pub fn new() -> Self {
        Self {
            tools: [
                GameTool::new(
                    GameToolKind::SaveGame,
                    100,
                    "Save Game",
                    "Save current game to resume later (Costs 100 points)",
                ),
                GameTool::new(
                    GameToolKind::SkipPiece,
                    200,
                    "Skip Piece",
                    "Skip current difficult piece (Costs 200 points)",
                ),
                GameTool::new(
                    GameToolKind::ClearRow,
                    150,
                    "Clear Row",
                    "Clear the bottom row (Costs 150 points)",
                ),
            ],
        }
    }

    fn index(kind: GameToolKind) -> usize {
        match kind {
            GameToolKind::SaveGame => 0,
            GameToolKind::SkipPiece => 1,
            GameToolKind::ClearRow => 2,
        }
    }

    pub fn get(&self, kind: GameToolKind) -> &GameTool {
        &self.tools[Self::index(kind)]
    }

    pub fn get_mut(&mut self, kind: GameToolKind) -> &mut GameTool {
        &mut self.tools[Self::index(kind)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameTool> {
        self.tools.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameTool> {
        self.tools.iter_mut()
    }
}

impl Default for GameTools {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_start_unavailable() {
        let tools = GameTools::new();
        assert!(tools.iter().all(|tool| !tool.available));
    }

    #[test]
    fn test_fixed_thresholds() {
        let tools = GameTools::new();
        assert_eq!(tools.get(GameToolKind::SaveGame).required_score, 100);
        assert_eq!(tools.get(GameToolKind::ClearRow).required_score, 150);
        assert_eq!(tools.get(GameToolKind::SkipPiece).required_score, 200);
    }

    #[test]
    fn test_get_mut_toggles_one_tool() {
        let mut tools = GameTools::new();
        tools.get_mut(GameToolKind::ClearRow).available = true;

        assert!(tools.get(GameToolKind::ClearRow).available);
        assert!(!tools.get(GameToolKind::SaveGame).available);
        assert!(!tools.get(GameToolKind::SkipPiece).available);
    }
}
