//! RNG module - seedable random piece source
//!
//! Piece selection is uniform over the seven kinds; the queue replenishes
//! one draw at a time. The generator is a small LCG owned by the game
//! state, so a given seed reproduces the exact piece sequence in tests.

use serde::{Deserialize, Serialize};

use crate::types::TetrominoKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRng {
    state: u32,
}

impl PieceRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Draw a uniformly-random piece kind
    pub fn next_kind(&mut self) -> TetrominoKind {
        let index = self.next_range(TetrominoKind::ALL.len() as u32) as usize;
        TetrominoKind::ALL[index]
    }

    /// Draw a kind from the favorable subset used by the skip-piece tool
    pub fn next_favorable(&mut self) -> TetrominoKind {
        let index = self.next_range(TetrominoKind::FAVORABLE.len() as u32) as usize;
        TetrominoKind::FAVORABLE[index]
    }

    /// Current generator state, usable as a seed to replay the sequence
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for PieceRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceRng::new(12345);
        let mut b = PieceRng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = PieceRng::new(12345);
        let mut b = PieceRng::new(54321);
        let seq_a: Vec<_> = (0..20).map(|_| a.next_kind()).collect();
        let seq_b: Vec<_> = (0..20).map(|_| b.next_kind()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut a = PieceRng::new(0);
        let mut b = PieceRng::new(1);
        assert_eq!(a.next_kind(), b.next_kind());
    }

    #[test]
    fn test_all_kinds_eventually_drawn() {
        let mut rng = PieceRng::new(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(rng.next_kind());
        }
        assert_eq!(seen.len(), TetrominoKind::ALL.len());
    }

    #[test]
    fn test_favorable_draws_stay_in_subset() {
        let mut rng = PieceRng::new(99);
        for _ in 0..100 {
            assert!(TetrominoKind::FAVORABLE.contains(&rng.next_favorable()));
        }
    }
}
