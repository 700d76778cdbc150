//! Stateless board evaluators.
//!
//! Every heuristic is a plain `fn(Board) -> f64`: total over any board whose
//! nibbles are in range, always finite, higher is better. They carry no
//! state and are safe under unlimited concurrent reads, so strategies hold
//! them as ordinary function values.
//!
//! Name resolution is case-insensitive and never fails: an unrecognized
//! name deliberately resolves to the corner heuristic.

use crate::engine::{extract_line, transpose, Board};

/// A first-class board evaluator.
pub type Heuristic = fn(Board) -> f64;

/// Clockwise perimeter walk starting at the anchor corner (cell 0):
/// top row, right column, bottom row reversed, left column upward.
const PERIMETER: [usize; 12] = [0, 1, 2, 3, 7, 11, 15, 14, 13, 12, 8, 4];

/// Fixed per-cell weights pulling the large tiles toward the top-left
/// corner, decaying along both axes.
const CORNER_WEIGHTS: [f64; 16] = [
    6.0, 5.0, 4.0, 3.0, //
    5.0, 4.0, 3.0, 2.0, //
    4.0, 3.0, 2.0, 1.0, //
    3.0, 2.0, 1.0, 0.0,
];

/// Like the corner weights but skewed hard toward the top edge, so the
/// ordering preference runs along the first row before it turns down.
const SKEWED_CORNER_WEIGHTS: [f64; 16] = [
    10.0, 8.0, 6.5, 5.5, //
    5.0, 3.0, 2.0, 1.5, //
    2.5, 1.5, 1.0, 0.5, //
    1.0, 0.5, 0.25, 0.0,
];

/// Resolve a heuristic by name, case-insensitively.
///
/// Unrecognized names resolve to [`corner`]; that fallback is the
/// documented default, not an error path.
pub fn resolve(name: &str) -> Heuristic {
    match name.to_ascii_lowercase().as_str() {
        "score" => score,
        "merge" => merge,
        "corner" | "corner_bias" => corner,
        "wall" | "strict_wall" => strict_wall,
        "wall_gap" => wall_gap,
        "full_wall" => full_wall,
        "skewed_corner" => skewed_corner,
        "monotonicity" => monotonicity,
        _ => corner,
    }
}

/// Sum-of-tile-values score, straight from the score table.
pub fn score(board: Board) -> f64 {
    board.score() as f64
}

/// Strength of adjacent mergeable pairs: each equal nonzero neighbor pair
/// along a row or column contributes the tile value it would merge into.
pub fn merge(board: Board) -> f64 {
    let cells = board.to_exponents();
    let mut total = 0.0;
    for row in 0..4 {
        for col in 0..4 {
            let e = cells[row * 4 + col];
            if e == 0 {
                continue;
            }
            if col + 1 < 4 && cells[row * 4 + col + 1] == e {
                total += f64::from(1u32 << (e + 1));
            }
            if row + 1 < 4 && cells[(row + 1) * 4 + col] == e {
                total += f64::from(1u32 << (e + 1));
            }
        }
    }
    total
}

/// Corner-weighted sum of tile values: rewards keeping the maximum tile
/// anchored at the top-left and the rest graded away from it.
pub fn corner(board: Board) -> f64 {
    weighted_sum(board, &CORNER_WEIGHTS)
}

/// Corner weighting skewed along the top edge.
pub fn skewed_corner(board: Board) -> f64 {
    weighted_sum(board, &SKEWED_CORNER_WEIGHTS)
}

/// Reward a non-increasing run of tiles along the perimeter from the
/// anchor corner. The run stops at the first empty cell or ordering
/// violation: a strict wall tolerates no gaps.
pub fn strict_wall(board: Board) -> f64 {
    let cells = board.to_exponents();
    let mut reward = 0.0;
    let mut prev = u8::MAX;
    for &idx in &PERIMETER {
        let e = cells[idx];
        if e == 0 || e > prev {
            break;
        }
        reward += f64::from(1u32 << e);
        prev = e;
    }
    reward
}

/// Like [`strict_wall`] but empty cells along the wall are skipped rather
/// than ending the run; only an ordering violation stops it.
pub fn wall_gap(board: Board) -> f64 {
    let cells = board.to_exponents();
    let mut reward = 0.0;
    let mut prev = u8::MAX;
    for &idx in &PERIMETER {
        let e = cells[idx];
        if e == 0 {
            continue;
        }
        if e > prev {
            break;
        }
        reward += f64::from(1u32 << e);
        prev = e;
    }
    reward
}

/// Walk the whole perimeter, rewarding every tile that keeps the
/// non-increasing order going. Gaps and violations reset the run instead
/// of ending the walk, so partial walls everywhere still count.
pub fn full_wall(board: Board) -> f64 {
    let cells = board.to_exponents();
    let mut reward = 0.0;
    let mut prev = u8::MAX;
    for &idx in &PERIMETER {
        let e = cells[idx];
        if e == 0 || e > prev {
            prev = u8::MAX;
            continue;
        }
        reward += f64::from(1u32 << e);
        prev = e;
    }
    reward
}

/// Penalize rank-order violations along every row and column; for each
/// line only the cheaper of the two directions counts, so a line that is
/// monotone either way costs nothing. Higher (closer to zero) is better.
pub fn monotonicity(board: Board) -> f64 {
    let raw = board.raw();
    let transposed = transpose(raw);
    let mut penalty = 0.0;
    for idx in 0..4 {
        penalty += line_monotonicity_penalty(extract_line(raw, idx));
        penalty += line_monotonicity_penalty(extract_line(transposed, idx));
    }
    -penalty
}

fn weighted_sum(board: Board, weights: &[f64; 16]) -> f64 {
    board
        .to_exponents()
        .iter()
        .zip(weights)
        .filter(|(&e, _)| e != 0)
        .map(|(&e, &w)| w * f64::from(1u32 << e))
        .sum()
}

fn line_monotonicity_penalty(line: u64) -> f64 {
    const POWER: f64 = 4.0;
    const WEIGHT: f64 = 47.0;
    let mut rising = 0.0;
    let mut falling = 0.0;
    let mut prev = ((line >> 12) & 0xf) as f64;
    for shift in [8u64, 4, 0] {
        let cur = ((line >> shift) & 0xf) as f64;
        if prev > cur {
            falling += prev.powf(POWER) - cur.powf(POWER);
        } else {
            rising += cur.powf(POWER) - prev.powf(POWER);
        }
        prev = cur;
    }
    rising.min(falling) * WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    const ALL: [(&str, Heuristic); 8] = [
        ("score", score),
        ("merge", merge),
        ("corner", corner),
        ("skewed_corner", skewed_corner),
        ("strict_wall", strict_wall),
        ("wall_gap", wall_gap),
        ("full_wall", full_wall),
        ("monotonicity", monotonicity),
    ];

    fn mid_game() -> Board {
        Board::from_exponents(&[5, 4, 2, 1, 3, 2, 1, 0, 2, 1, 0, 0, 1, 0, 0, 0])
    }

    #[test]
    fn every_heuristic_is_finite_and_total() {
        engine::init();
        let boards = [Board::EMPTY, Board::from_exponents(&[15; 16]), mid_game()];
        for (name, h) in ALL {
            for board in boards {
                let v = h(board);
                assert!(v.is_finite(), "{name} not finite on {board:?}");
            }
        }
    }

    #[test]
    fn resolution_is_case_insensitive_with_corner_fallback() {
        engine::init();
        let probes = [Board::EMPTY, mid_game(), Board::from_exponents(&[15; 16])];
        for (name, h) in ALL {
            let resolved = resolve(&name.to_uppercase());
            for board in probes {
                assert_eq!(resolved(board), h(board), "{name} resolution mismatch");
            }
        }
        // Aliases and the deliberate fallback.
        for name in ["corner_bias", "wall", "no-such-heuristic", ""] {
            let resolved = resolve(name);
            let expected: Heuristic = if name == "wall" { strict_wall } else { corner };
            for board in probes {
                assert_eq!(resolved(board), expected(board), "{name:?} fallback mismatch");
            }
        }
    }

    #[test]
    fn merge_counts_adjacent_pairs() {
        engine::init();
        // Two 2s side by side: one pair worth a 4.
        assert_eq!(merge(Board::from_exponents(&[1, 1, 0, 0])), 4.0);
        // Vertical pair of 4s: worth an 8.
        assert_eq!(merge(Board::from_exponents(&[2, 0, 0, 0, 2, 0, 0, 0])), 8.0);
        assert_eq!(merge(mid_game()), 0.0);
    }

    #[test]
    fn corner_prefers_anchored_max_tile() {
        engine::init();
        let anchored = Board::from_exponents(&[10, 0, 0, 0]);
        let adrift = Board::from_exponents(&[0, 0, 0, 0, 0, 0, 10, 0]);
        assert!(corner(anchored) > corner(adrift));
    }

    #[test]
    fn wall_family_gap_tolerance() {
        engine::init();
        // 8, gap, 4 along the top edge.
        let gapped = Board::from_exponents(&[3, 0, 2, 0]);
        let solid = Board::from_exponents(&[3, 2, 0, 0]);
        assert_eq!(strict_wall(gapped), 8.0);
        assert_eq!(wall_gap(gapped), 8.0 + 4.0);
        assert_eq!(strict_wall(solid), 8.0 + 4.0);
        // An ordering violation stops even the gap-tolerant wall.
        let broken = Board::from_exponents(&[2, 3, 4, 0]);
        assert_eq!(wall_gap(broken), 4.0);
        // The full wall keeps counting runs after a break.
        assert!(full_wall(broken) >= wall_gap(broken));
    }

    #[test]
    fn monotone_lines_cost_nothing() {
        engine::init();
        let monotone = Board::from_exponents(&[4, 3, 2, 1, 3, 2, 1, 0, 2, 1, 0, 0, 1, 0, 0, 0]);
        assert_eq!(monotonicity(monotone), 0.0);
        let jumbled = Board::from_exponents(&[1, 4, 1, 4, 4, 1, 4, 1, 1, 4, 1, 4, 4, 1, 4, 1]);
        assert!(monotonicity(jumbled) < 0.0);
    }
}
