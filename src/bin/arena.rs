use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use solver_2048::engine::{self, Board};
use solver_2048::strategy::{build_strategy, Strategy};
use solver_2048::heuristics;

/// Play full games with each requested strategy and compare results.
#[derive(Debug, Parser)]
#[command(name = "arena", about = "2048 strategy comparison runner")]
struct Args {
    /// Strategy type strings, e.g. expectimax-depth, monte-carlo, random
    #[arg(long = "strategy", default_values_t = vec!["expectimax-depth".to_string(), "random".to_string()])]
    strategies: Vec<String>,

    /// Heuristic name (unrecognized names fall back to corner)
    #[arg(long, default_value = "corner")]
    heuristic: String,

    /// Search depth / branch depth
    #[arg(long, default_value_t = 3)]
    depth: i32,

    /// Probability cutoff for expectimax-probability
    #[arg(long, default_value_t = 0.0025)]
    probability: f64,

    /// Trial count for the sampling strategies (0 = strategy default)
    #[arg(long, default_value_t = 0)]
    trials: i32,

    /// Games per strategy
    #[arg(long, default_value_t = 20)]
    games: u32,

    /// Base seed for game RNGs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

struct GameOutcome {
    score: u64,
    highest_tile: u64,
    moves: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    engine::init();
    let heuristic = heuristics::resolve(&args.heuristic);

    for kind in &args.strategies {
        let pb = if args.quiet {
            None
        } else {
            let pb = ProgressBar::new(args.games as u64);
            pb.set_style(ProgressStyle::with_template(
                "{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} {msg}",
            )?);
            pb.set_message(kind.clone());
            Some(pb)
        };

        let start = Instant::now();
        let outcomes: Vec<GameOutcome> = (0..args.games)
            .into_par_iter()
            .map(|game| {
                let outcome = play_one(
                    kind,
                    heuristic,
                    args.depth,
                    args.probability,
                    args.trials,
                    args.seed.wrapping_add(game as u64),
                );
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                outcome
            })
            .collect();
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let elapsed = start.elapsed().as_secs_f64().max(1e-6);
        let games = outcomes.len().max(1) as f64;
        let mean_score = outcomes.iter().map(|o| o.score).sum::<u64>() as f64 / games;
        let best_tile = outcomes.iter().map(|o| o.highest_tile).max().unwrap_or(0);
        let total_moves: u64 = outcomes.iter().map(|o| o.moves).sum();
        println!(
            "{kind:>22} | mean score {mean_score:>10.1} | best tile {best_tile:>5} | {:.0} moves/sec",
            total_moves as f64 / elapsed
        );
    }
    Ok(())
}

fn play_one(
    kind: &str,
    heuristic: heuristics::Heuristic,
    depth: i32,
    probability: f64,
    trials: i32,
    seed: u64,
) -> GameOutcome {
    let mut strategy = build_strategy(kind, heuristic, depth, probability, trials);
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    let mut moves = 0u64;
    while !board.is_game_over() {
        let dir = strategy.pick_move(board);
        let next = board.make_move(dir, &mut rng);
        if next == board {
            // A strategy returned an illegal direction; nudge with any
            // legal move so the game always finishes.
            let fallback = solver_2048::engine::Move::ALL
                .into_iter()
                .find(|&d| board.is_valid_move(d));
            match fallback {
                Some(d) => board = board.make_move(d, &mut rng),
                None => break,
            }
        } else {
            board = next;
        }
        moves += 1;
    }
    GameOutcome { score: board.score(), highest_tile: board.highest_tile(), moves }
}
