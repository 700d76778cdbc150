use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::engine::{Board, Move};

/// Safety cap on playout length. A real game ends long before this (the
/// board's tile sum grows every spawn), so the cap never bites in practice.
const MAX_PLAYOUT_MOVES: usize = 4096;

/// Monte Carlo move selection by full random playouts.
///
/// Each candidate direction is scored by the average final score of
/// `iterations` independent playouts: apply the candidate, then spawn and
/// play uniformly random legal moves until the game ends. Playouts run in
/// parallel with per-playout seeds drawn from the strategy's own RNG, so a
/// seeded instance is reproducible regardless of thread scheduling.
pub struct MonteCarloPlayer {
    pub iterations: u32,
    rng: SmallRng,
}

impl MonteCarloPlayer {
    pub fn new(iterations: u32) -> Self {
        crate::engine::init();
        Self { iterations, rng: SmallRng::from_entropy() }
    }

    /// Reproducible variant with an explicit seed.
    pub fn seeded(iterations: u32, seed: u64) -> Self {
        crate::engine::init();
        Self { iterations, rng: SmallRng::seed_from_u64(seed) }
    }

    fn average_playout_score(&mut self, start: Board) -> f64 {
        let seeds: Vec<u64> = (0..self.iterations).map(|_| self.rng.gen()).collect();
        let total: f64 = seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = SmallRng::seed_from_u64(seed);
                random_playout(start, &mut rng)
            })
            .sum();
        total / f64::from(self.iterations.max(1))
    }
}

impl super::Strategy for MonteCarloPlayer {
    fn pick_move(&mut self, board: Board) -> Move {
        let mut best: Option<(Move, f64)> = None;
        for &dir in &Move::ALL {
            let moved = board.shift(dir);
            if moved == board {
                continue;
            }
            let avg = self.average_playout_score(moved);
            match best {
                Some((_, bv)) if avg <= bv => {}
                _ => best = Some((dir, avg)),
            }
        }
        best.map(|(dir, _)| dir).unwrap_or(Move::Up)
    }
}

/// Play uniformly random legal moves to the end of the game, returning the
/// final board score. `start` is the position right after the candidate
/// move, before its spawn.
pub(crate) fn random_playout<R: Rng + ?Sized>(start: Board, rng: &mut R) -> f64 {
    let mut board = start.with_random_tile(rng);
    for _ in 0..MAX_PLAYOUT_MOVES {
        let legal: Vec<Move> = Move::ALL
            .iter()
            .copied()
            .filter(|&dir| board.shift(dir) != board)
            .collect();
        if legal.is_empty() {
            break;
        }
        let dir = legal[rng.gen_range(0..legal.len())];
        board = board.shift(dir).with_random_tile(rng);
    }
    board.score() as f64
}
