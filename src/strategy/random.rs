use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::{Board, Move};

/// Baseline policy: a uniformly random legal direction.
pub struct RandomPlayer {
    rng: SmallRng,
}

impl RandomPlayer {
    pub fn new() -> Self {
        crate::engine::init();
        Self { rng: SmallRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        crate::engine::init();
        Self { rng: SmallRng::seed_from_u64(seed) }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Strategy for RandomPlayer {
    fn pick_move(&mut self, board: Board) -> Move {
        let legal: Vec<Move> = Move::ALL
            .iter()
            .copied()
            .filter(|&dir| board.shift(dir) != board)
            .collect();
        if legal.is_empty() {
            Move::Up
        } else {
            legal[self.rng.gen_range(0..legal.len())]
        }
    }
}
