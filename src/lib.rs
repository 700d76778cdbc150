//! solver-2048: a 2048 game engine plus a family of AI move-selection
//! strategies.
//!
//! This crate provides:
//! - A compact bit-packed `Board` with table-driven O(1) move resolution
//!   (`engine` module)
//! - Stateless board evaluators (`heuristics` module)
//! - Five move-selection strategies behind one `Strategy` contract, plus a
//!   string-driven factory and a reconfigurable `Solver` handle
//!   (`strategy` module)
//!
//! Quick start:
//! ```
//! use solver_2048::engine::{self, Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Optional eager table init; everything also builds lazily.
//! engine::init();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let b1 = b0.shift(Move::Left);
//! assert!(b1.count_empty() >= 14);
//! ```
//!
//! Driving a game with a strategy:
//! ```
//! use solver_2048::engine::{self, Board};
//! use solver_2048::strategy::{MonteCarloPlayer, Strategy};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! engine::init();
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut board = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let mut policy = MonteCarloPlayer::seeded(16, 7);
//! let mut moves = 0;
//! while !board.is_game_over() && moves < 4 {
//!     let dir = policy.pick_move(board);
//!     board = board.make_move(dir, &mut rng);
//!     moves += 1;
//! }
//! assert!(moves > 0);
//! ```

pub mod engine;
pub mod heuristics;
pub mod strategy;
