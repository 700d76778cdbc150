use crate::engine::{empty_cells, with_tile, Board, Move};
use crate::heuristics::Heuristic;

/// Expectimax with a cumulative-probability cutoff instead of a fixed depth.
///
/// The recursion tracks the probability of the path from the root; once it
/// falls below the threshold the heuristic stands in for further search.
/// Likely lines are searched deep, unlikely ones shallow. Every chance ply
/// multiplies the path probability by at most 0.9, so the recursion always
/// bottoms out.
pub struct ExpectimaxProbability {
    pub threshold: f32,
    heuristic: Heuristic,
}

impl ExpectimaxProbability {
    /// A non-positive (or NaN) threshold defaults to 0.001.
    pub fn new(threshold: f32, heuristic: Heuristic) -> Self {
        crate::engine::init();
        let threshold = if threshold > 0.0 { threshold } else { 0.001 };
        Self { threshold, heuristic }
    }

    pub fn best_move_with_value(&self, board: Board) -> (Option<Move>, f64) {
        let mut best: Option<(Move, f64)> = None;
        for &dir in &Move::ALL {
            let moved = board.shift(dir);
            if moved == board {
                continue;
            }
            let ev = self.chance_value(moved, 1.0);
            match best {
                Some((_, bv)) if ev <= bv => {}
                _ => best = Some((dir, ev)),
            }
        }
        match best {
            Some((dir, ev)) => (Some(dir), ev),
            None => (None, (self.heuristic)(board)),
        }
    }

    fn max_value(&self, board: Board, cum_prob: f32) -> f64 {
        let mut best = f64::NEG_INFINITY;
        for &dir in &Move::ALL {
            let moved = board.shift(dir);
            if moved != board {
                best = best.max(self.chance_value(moved, cum_prob));
            }
        }
        if best == f64::NEG_INFINITY {
            (self.heuristic)(board)
        } else {
            best
        }
    }

    fn chance_value(&self, board: Board, cum_prob: f32) -> f64 {
        if cum_prob < self.threshold {
            return (self.heuristic)(board);
        }
        let cells: Vec<usize> = empty_cells(board).collect();
        if cells.is_empty() {
            return (self.heuristic)(board);
        }
        let base_prob = cum_prob / cells.len() as f32;
        let mut sum = 0.0;
        for &idx in &cells {
            sum += 0.9 * self.max_value(with_tile(board, idx, 1), base_prob * 0.9);
            sum += 0.1 * self.max_value(with_tile(board, idx, 2), base_prob * 0.1);
        }
        sum / cells.len() as f64
    }
}

impl super::Strategy for ExpectimaxProbability {
    fn pick_move(&mut self, board: Board) -> Move {
        self.best_move_with_value(board).0.unwrap_or(Move::Up)
    }
}
