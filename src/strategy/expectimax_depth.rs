use ahash::RandomState as AHasher;
use dashmap::DashMap;
use rayon::prelude::*;

use crate::engine::{empty_cells, with_tile, Board, Move};
use crate::heuristics::Heuristic;

/// Cache of chance-node values for one search, keyed by (board, depth).
///
/// Hits require an exact depth match, so a cached value is always identical
/// to what the recursion would recompute; sharing the map across the four
/// root branches therefore cannot change any result, only skip work.
type Cache = DashMap<(u64, u32), f64, AHasher>;

/// Fixed-depth expectimax.
///
/// Decision nodes maximize over the four directions; chance nodes average
/// over every empty cell with the 90/10 spawn split. Depth counts chance
/// plies: at depth 0 the heuristic stands in for further search. Fully
/// deterministic for a fixed board, depth and heuristic; ties at the root
/// break toward the first-enumerated direction.
pub struct ExpectimaxDepth {
    pub depth: u32,
    heuristic: Heuristic,
}

impl ExpectimaxDepth {
    pub fn new(depth: u32, heuristic: Heuristic) -> Self {
        crate::engine::init();
        Self { depth, heuristic }
    }

    /// Best direction and its expected value. `None` on a terminal board.
    pub fn best_move_with_value(&self, board: Board) -> (Option<Move>, f64) {
        let cache: Cache = DashMap::with_hasher(AHasher::new());
        // The four root branches are independent; the shared cache only
        // ever returns exact values, so parallel order cannot leak in.
        let evals: Vec<(usize, Option<f64>)> = Move::ALL
            .par_iter()
            .enumerate()
            .map(|(i, &dir)| {
                let moved = board.shift(dir);
                if moved == board {
                    (i, None)
                } else {
                    (i, Some(self.chance_value(moved, self.depth, &cache)))
                }
            })
            .collect();
        let mut by_dir: [Option<f64>; 4] = [None; 4];
        for (i, ev) in evals {
            by_dir[i] = ev;
        }
        let mut best: Option<(Move, f64)> = None;
        for (i, &dir) in Move::ALL.iter().enumerate() {
            if let Some(ev) = by_dir[i] {
                match best {
                    Some((_, bv)) if ev <= bv => {}
                    _ => best = Some((dir, ev)),
                }
            }
        }
        match best {
            Some((dir, ev)) => (Some(dir), ev),
            None => (None, (self.heuristic)(board)),
        }
    }

    fn max_value(&self, board: Board, depth: u32, cache: &Cache) -> f64 {
        if depth == 0 {
            return (self.heuristic)(board);
        }
        let mut best = f64::NEG_INFINITY;
        for &dir in &Move::ALL {
            let moved = board.shift(dir);
            if moved != board {
                best = best.max(self.chance_value(moved, depth, cache));
            }
        }
        if best == f64::NEG_INFINITY {
            (self.heuristic)(board)
        } else {
            best
        }
    }

    fn chance_value(&self, board: Board, depth: u32, cache: &Cache) -> f64 {
        if depth == 0 {
            return (self.heuristic)(board);
        }
        let key = (board.raw(), depth);
        if let Some(hit) = cache.get(&key) {
            return *hit;
        }
        let mut sum = 0.0;
        let mut cells = 0u32;
        for idx in empty_cells(board) {
            sum += 0.9 * self.max_value(with_tile(board, idx, 1), depth - 1, cache);
            sum += 0.1 * self.max_value(with_tile(board, idx, 2), depth - 1, cache);
            cells += 1;
        }
        // A legal move always vacates a cell, so this only guards direct
        // calls on hand-built full boards.
        if cells == 0 {
            return (self.heuristic)(board);
        }
        let value = sum / f64::from(cells);
        cache.insert(key, value);
        value
    }
}

impl super::Strategy for ExpectimaxDepth {
    fn pick_move(&mut self, board: Board) -> Move {
        self.best_move_with_value(board).0.unwrap_or(Move::Up)
    }
}
