//! Move-selection strategies and their factory.
//!
//! Five policy kinds share one contract: given a board, produce a direction.
//! Callers are expected to check `is_game_over` first; on a terminal board a
//! strategy still returns a direction (Up) rather than failing.
//!
//! The factory resolves case-insensitive type strings and normalizes every
//! out-of-range numeric parameter to a documented default; nothing here is
//! an error path, because the embedding environment treats a failure as
//! worse than a fallback.

use crate::engine::{Board, Move};
use crate::heuristics::{self, Heuristic};

mod expectimax_depth;
mod expectimax_prob;
mod monte_carlo;
mod random;
mod random_trials;

pub use expectimax_depth::ExpectimaxDepth;
pub use expectimax_prob::ExpectimaxProbability;
pub use monte_carlo::MonteCarloPlayer;
pub use random::RandomPlayer;
pub use random_trials::RandomTrialsStrategy;

/// Common strategy contract: one direction per query.
pub trait Strategy {
    fn pick_move(&mut self, board: Board) -> Move;
}

/// Closed set of configured strategies, as produced by [`build_strategy`].
pub enum ConfiguredStrategy {
    ExpectimaxDepth(ExpectimaxDepth),
    ExpectimaxProbability(ExpectimaxProbability),
    MonteCarlo(MonteCarloPlayer),
    RandomTrials(RandomTrialsStrategy),
    Random(RandomPlayer),
}

impl Strategy for ConfiguredStrategy {
    fn pick_move(&mut self, board: Board) -> Move {
        match self {
            ConfiguredStrategy::ExpectimaxDepth(s) => s.pick_move(board),
            ConfiguredStrategy::ExpectimaxProbability(s) => s.pick_move(board),
            ConfiguredStrategy::MonteCarlo(s) => s.pick_move(board),
            ConfiguredStrategy::RandomTrials(s) => s.pick_move(board),
            ConfiguredStrategy::Random(s) => s.pick_move(board),
        }
    }
}

/// Resolve a strategy type string and numeric parameters into a configured
/// strategy. Case-insensitive; never fails.
///
/// Defaulting rules:
/// - unrecognized type: expectimax-depth
/// - expectimax-depth with depth <= 0: depth 4
/// - expectimax-probability with probability not > 0: 0.001
/// - monte-carlo with trials <= 0: max(128, depth * 128) iterations
/// - random-trials with trials <= 0: 32 games; depth <= 0: branch depth 3;
///   branch width is always 2
pub fn build_strategy(
    kind: &str,
    heuristic: Heuristic,
    depth: i32,
    probability: f64,
    trials: i32,
) -> ConfiguredStrategy {
    match kind.to_ascii_lowercase().as_str() {
        "expectimax-probability" => {
            ConfiguredStrategy::ExpectimaxProbability(ExpectimaxProbability::new(
                probability as f32,
                heuristic,
            ))
        }
        "monte-carlo" => {
            let iterations = if trials > 0 { trials } else { 128.max(depth.saturating_mul(128)) };
            ConfiguredStrategy::MonteCarlo(MonteCarloPlayer::new(iterations as u32))
        }
        "random-trials" => {
            let games_per_move = if trials > 0 { trials as u32 } else { 32 };
            let branch_depth = if depth > 0 { depth as u32 } else { 3 };
            ConfiguredStrategy::RandomTrials(RandomTrialsStrategy::new(
                games_per_move,
                branch_depth,
                2,
                heuristic,
            ))
        }
        "random" => ConfiguredStrategy::Random(RandomPlayer::new()),
        // "expectimax-depth", "expectimax" and everything unrecognized.
        _ => {
            let depth = if depth > 0 { depth as u32 } else { 4 };
            ConfiguredStrategy::ExpectimaxDepth(ExpectimaxDepth::new(depth, heuristic))
        }
    }
}

/// Reconfigurable strategy handle, mirroring the operations a host
/// environment needs: construct, reconfigure, adjust trials, pick moves,
/// and evaluate a board with the current heuristic.
///
/// Reconfiguration builds a fresh strategy value rather than mutating the
/// old one in place; the handle just swaps in the latest. A `Solver` is
/// single-writer: reconfigure and pick_move from one owner at a time.
pub struct Solver {
    kind: String,
    heuristic_name: String,
    heuristic: Heuristic,
    depth: i32,
    probability: f64,
    trials: i32,
    strategy: ConfiguredStrategy,
}

impl Solver {
    pub fn new(kind: &str, heuristic_name: &str, depth: i32, probability: f64) -> Self {
        let mut solver = Self::default();
        solver.configure(kind, heuristic_name, depth, probability);
        solver
    }

    /// Replace the policy. Unrecognized names fall back to their defaults
    /// (expectimax-depth, corner heuristic); the trial count is kept.
    pub fn configure(&mut self, kind: &str, heuristic_name: &str, depth: i32, probability: f64) {
        self.kind = kind.to_ascii_lowercase();
        self.heuristic_name = heuristic_name.to_ascii_lowercase();
        self.heuristic = heuristics::resolve(&self.heuristic_name);
        self.depth = depth;
        self.probability = probability;
        self.rebuild();
    }

    /// Update the trial count independently of the other parameters.
    pub fn set_trials(&mut self, trials: i32) {
        self.trials = trials;
        self.rebuild();
    }

    /// Direction code (0..3) for the current board.
    pub fn pick_move(&mut self, board: Board) -> u8 {
        self.strategy.pick_move(board).index()
    }

    /// Score the board with the currently configured heuristic.
    pub fn evaluate(&self, board: Board) -> f64 {
        (self.heuristic)(board)
    }

    pub fn strategy(&self) -> &ConfiguredStrategy {
        &self.strategy
    }

    /// Normalized strategy type string currently in effect.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Normalized heuristic name currently in effect.
    pub fn heuristic_name(&self) -> &str {
        &self.heuristic_name
    }

    fn rebuild(&mut self) {
        self.strategy =
            build_strategy(&self.kind, self.heuristic, self.depth, self.probability, self.trials);
    }
}

impl Default for Solver {
    fn default() -> Self {
        let heuristic = heuristics::resolve("corner");
        Self {
            kind: "expectimax-depth".to_owned(),
            heuristic_name: "corner".to_owned(),
            heuristic,
            depth: 4,
            probability: 0.0025,
            trials: 256,
            strategy: build_strategy("expectimax-depth", heuristic, 4, 0.0025, 256),
        }
    }
}
