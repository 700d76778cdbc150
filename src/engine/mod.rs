//! Board representation and move resolution.
//!
//! A board is 16 tile exponents packed into a `u64`, 4 bits per cell,
//! row-major with cell 0 at the most significant nibble. Exponent 0 is an
//! empty cell; exponent `n` is the tile `2^n`. Moves are resolved through
//! the precomputed line tables in [`tables`]: horizontal moves look up each
//! row directly, vertical moves transpose first and use column-spread
//! entries so no second transpose is needed.

use rand::Rng;
use std::fmt;

pub mod tables;

use tables::{get_empty_mask, get_line_entry, get_score_entry, stores};

/// A direction to slide/merge tiles. The numeric codes (0..3) are fixed and
/// shared with every caller-facing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Move {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Move {
    /// All four directions in the fixed enumeration (and tie-break) order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Map a direction code to a `Move`. Codes outside 0..3 are not an
    /// error; they are simply never a legal move.
    #[inline]
    pub fn from_index(code: u8) -> Option<Move> {
        match code {
            0 => Some(Move::Up),
            1 => Some(Move::Down),
            2 => Some(Move::Left),
            3 => Some(Move::Right),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Packed 4x4 2048 board: 16 exponents in a `u64`, one nibble per cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(u64);

impl Board {
    pub const EMPTY: Board = Board(0);

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Board(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Pack a row-major sequence of tile exponents.
    ///
    /// Each value is clamped to `[0, 15]` before packing; out-of-range
    /// input never fails. Missing trailing cells are empty, extra values
    /// are ignored.
    pub fn from_exponents(values: &[i32]) -> Self {
        let mut raw = 0u64;
        for (i, &v) in values.iter().take(16).enumerate() {
            let exponent = v.clamp(0, 15) as u64;
            raw |= exponent << ((15 - i) * 4);
        }
        Board(raw)
    }

    /// Unpack into 16 row-major tile exponents. Inverse of
    /// [`Board::from_exponents`] for already-clamped input.
    pub fn to_exponents(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = ((self.0 >> ((15 - i) * 4)) & 0xf) as u8;
        }
        out
    }

    /// Exponent at a row-major cell index (0..16).
    #[inline]
    pub fn exponent(self, idx: usize) -> u8 {
        ((self.0 >> ((15 - idx) * 4)) & 0xf) as u8
    }

    /// Board after sliding/merging tiles in `dir`. Pure: no tile spawn.
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        match dir {
            Move::Left | Move::Right => shift_rows(self, dir),
            Move::Up | Move::Down => shift_cols(self, dir),
        }
    }

    /// True iff sliding in `dir` changes the board.
    #[inline]
    pub fn is_valid_move(self, dir: Move) -> bool {
        self.shift(dir) != self
    }

    /// True iff no direction changes the board.
    pub fn is_game_over(self) -> bool {
        Move::ALL.iter().all(|&dir| self.shift(dir) == self)
    }

    /// Insert a 2 (90%) or 4 (10%) into a uniformly random empty cell.
    /// A full board is returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let empty = self.count_empty();
        if empty == 0 {
            return self;
        }
        let target = rng.gen_range(0..empty);
        let exponent: u64 = if rng.gen_range(0..10) < 9 { 1 } else { 2 };
        let mut seen = 0u32;
        for row in 0..4u32 {
            let row_val = extract_line(self.0, row as u64) as u16;
            let mut mask = get_empty_mask(row_val);
            while mask != 0 {
                let col = mask.trailing_zeros();
                if seen == target {
                    let cell = (row * 4 + col) as usize;
                    return Board(self.0 | (exponent << ((15 - cell) * 4)));
                }
                seen += 1;
                mask &= mask - 1;
            }
        }
        self
    }

    /// Slide in `direction`, then spawn a random tile if the slide was
    /// legal. Illegal slides return the board unchanged.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        let moved = self.shift(direction);
        if moved != self {
            moved.with_random_tile(rng)
        } else {
            self
        }
    }

    /// Classic accumulated-merge score of this board.
    pub fn score(self) -> u64 {
        (0..4).fold(0, |acc, idx| {
            acc + get_score_entry(extract_line(self.0, idx) as u16)
        })
    }

    /// Largest tile value on the board (0 when the board is empty).
    pub fn highest_tile(self) -> u64 {
        let max_exponent = (0..16).map(|idx| self.exponent(idx)).max().unwrap_or(0);
        if max_exponent == 0 {
            0
        } else {
            1u64 << max_exponent
        }
    }

    /// Number of empty cells.
    #[inline]
    pub fn count_empty(self) -> u32 {
        let mut x = self.0;
        x |= x >> 1;
        x |= x >> 2;
        x &= 0x1111_1111_1111_1111;
        16 - x.count_ones()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            for col in 0..4 {
                let e = self.exponent(row * 4 + col);
                let val = if e == 0 { 0 } else { 1u32 << e };
                write!(f, "{val:>6}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl From<u64> for Board {
    fn from(v: u64) -> Self {
        Board(v)
    }
}

impl From<Board> for u64 {
    fn from(b: Board) -> Self {
        b.raw()
    }
}

/// Force eager construction of the transition tables. Optional: every
/// table accessor also builds them lazily on first use.
pub fn init() {
    tables::init();
}

/// Apply a direction code to a board. Codes outside 0..3 leave the board
/// unchanged (and are therefore never a legal move).
#[inline]
pub fn apply_move(board: Board, code: u8) -> Board {
    match Move::from_index(code) {
        Some(dir) => board.shift(dir),
        None => board,
    }
}

/// A move is legal iff it changes the board.
#[inline]
pub fn is_valid_move(board: Board, code: u8) -> bool {
    match Move::from_index(code) {
        Some(dir) => board.is_valid_move(dir),
        None => false,
    }
}

#[inline]
pub fn is_game_over(board: Board) -> bool {
    board.is_game_over()
}

/// Spawn a 2 (90%) or 4 (10%) into a uniformly random empty cell.
#[inline]
pub fn spawn_tile<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    board.with_random_tile(rng)
}

// Nibble transpose, credit to Nneonneo.
pub(crate) fn transpose(x: u64) -> u64 {
    let a1 = x & 0xF0F0_0F0F_F0F0_0F0F;
    let a2 = x & 0x0000_F0F0_0000_F0F0;
    let a3 = x & 0x0F0F_0000_0F0F_0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00_FF00_00FF_00FF;
    let b2 = a & 0x00FF_00FF_0000_0000;
    let b3 = a & 0x0000_0000_FF00_FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

#[inline]
pub(crate) fn extract_line(board: u64, line_idx: u64) -> u64 {
    (board >> ((3 - line_idx) * 16)) & 0xffff
}

fn shift_rows(board: Board, dir: Move) -> Board {
    let s = stores();
    let table: &[u64] = match dir {
        Move::Left => &s.shift_left,
        Move::Right => &s.shift_right,
        _ => unreachable!("shift_rows handles horizontal moves only"),
    };
    let raw = (0..4).fold(0, |acc, row_idx| {
        let row_val = extract_line(board.0, row_idx) as u16;
        acc | (get_line_entry(table, row_val) << (48 - 16 * row_idx))
    });
    Board(raw)
}

fn shift_cols(board: Board, dir: Move) -> Board {
    let transposed = transpose(board.0);
    let s = stores();
    let table: &[u64] = match dir {
        Move::Up => &s.shift_up,
        Move::Down => &s.shift_down,
        _ => unreachable!("shift_cols handles vertical moves only"),
    };
    let raw = (0..4).fold(0, |acc, col_idx| {
        let col_val = extract_line(transposed, col_idx) as u16;
        acc | (get_line_entry(table, col_val) << (12 - 4 * col_idx))
    });
    Board(raw)
}

/// Row-major indices of every empty cell, via the per-row empty masks.
pub(crate) fn empty_cells(board: Board) -> impl Iterator<Item = usize> {
    (0..4u64).flat_map(move |row| {
        let row_val = extract_line(board.raw(), row) as u16;
        let mask = get_empty_mask(row_val);
        (0..4u32)
            .filter(move |col| mask & (1 << col) != 0)
            .map(move |col| (row * 4 + col as u64) as usize)
    })
}

/// Board with `exponent` written into the (empty) cell `idx`.
#[inline]
pub(crate) fn with_tile(board: Board, idx: usize, exponent: u64) -> Board {
    Board::from_raw(board.raw() | (exponent << ((15 - idx) * 4)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn shift_left_matches_known_rows() {
        init();
        assert_eq!(Board::from_raw(0x0000).shift(Move::Left), Board::from_raw(0x0000));
        assert_eq!(Board::from_raw(0x0002).shift(Move::Left), Board::from_raw(0x2000));
        assert_eq!(Board::from_raw(0x2020).shift(Move::Left), Board::from_raw(0x3000));
        assert_eq!(Board::from_raw(0x1332).shift(Move::Left), Board::from_raw(0x1420));
        assert_eq!(Board::from_raw(0x1234).shift(Move::Left), Board::from_raw(0x1234));
        assert_eq!(Board::from_raw(0x1002).shift(Move::Left), Board::from_raw(0x1200));
    }

    #[test]
    fn shift_right_matches_known_rows() {
        init();
        assert_eq!(Board::from_raw(0x2000).shift(Move::Right), Board::from_raw(0x0002));
        assert_eq!(Board::from_raw(0x2020).shift(Move::Right), Board::from_raw(0x0003));
        assert_eq!(Board::from_raw(0x1332).shift(Move::Right), Board::from_raw(0x0142));
        assert_eq!(Board::from_raw(0x1002).shift(Move::Right), Board::from_raw(0x0012));
    }

    #[test]
    fn shift_full_boards_all_directions() {
        init();
        let board = Board::from_raw(0x1234_1332_2002_1002);
        assert_eq!(board.shift(Move::Left), Board::from_raw(0x1234_1420_3000_1200));
        assert_eq!(board.shift(Move::Right), Board::from_raw(0x1234_0142_0003_0012));
        let board = Board::from_raw(0x1121_2300_3300_4222);
        assert_eq!(board.shift(Move::Up), Board::from_raw(0x1131_2402_3200_4000));
        assert_eq!(board.shift(Move::Down), Board::from_raw(0x1000_2100_3401_4232));
    }

    #[test]
    fn codec_round_trips_after_clamp() {
        let values: Vec<i32> = (0..16).map(|i| i % 16).collect();
        let board = Board::from_exponents(&values);
        let decoded = board.to_exponents();
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(decoded[i] as i32, v);
        }
        // Out-of-range inputs clamp rather than fail.
        let clamped = Board::from_exponents(&[-3, 99, 7, 15]);
        assert_eq!(&clamped.to_exponents()[..4], &[0, 15, 7, 15]);
        // encode . decode . encode == encode
        assert_eq!(Board::from_exponents(&clamped.to_exponents().map(i32::from)), clamped);
    }

    #[test]
    fn short_and_long_inputs_never_fail() {
        assert_eq!(Board::from_exponents(&[]), Board::EMPTY);
        let long: Vec<i32> = vec![1; 32];
        let board = Board::from_exponents(&long);
        assert_eq!(board.to_exponents(), [1u8; 16]);
    }

    #[test]
    fn illegal_iff_noop() {
        init();
        let boards = [
            Board::EMPTY,
            Board::from_raw(0x1234_5678_9abc_def1),
            Board::from_raw(0x1000_0000_0000_0000),
            Board::from_raw(0x1234_1332_2002_1002),
        ];
        for board in boards {
            for code in 0..4u8 {
                let moved = apply_move(board, code);
                assert_eq!(moved == board, !is_valid_move(board, code));
            }
        }
    }

    #[test]
    fn out_of_range_direction_is_never_legal() {
        init();
        let board = Board::from_raw(0x1000_0000_0000_0000);
        for code in [4u8, 5, 200] {
            assert!(!is_valid_move(board, code));
            assert_eq!(apply_move(board, code), board);
        }
    }

    #[test]
    fn terminal_iff_every_move_is_noop() {
        init();
        // Checkerboard of alternating exponents: nothing merges or slides.
        let stuck = Board::from_exponents(&[1, 2, 1, 2, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1]);
        assert!(stuck.is_game_over());
        for code in 0..4u8 {
            assert_eq!(apply_move(stuck, code), stuck);
        }
        // One merge available: not terminal.
        let open = Board::from_exponents(&[1, 1, 2, 1, 2, 1, 2, 1, 1, 2, 1, 2, 2, 1, 2, 1]);
        assert!(!open.is_game_over());
    }

    #[test]
    fn merge_two_twos_left() {
        init();
        let board = Board::from_exponents(&[1, 1, 0, 0]);
        assert!(board.is_valid_move(Move::Left));
        let moved = board.shift(Move::Left);
        assert_eq!(moved, Board::from_exponents(&[2]));
        assert_eq!(moved.exponent(0), 2);
        assert_eq!(moved.highest_tile(), 4);
    }

    #[test]
    fn spawn_fills_a_previously_empty_cell() {
        init();
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::from_exponents(&[3, 0, 3, 0, 0, 3, 0, 3]);
        for _ in 0..64 {
            let spawned = board.with_random_tile(&mut rng);
            assert_eq!(spawned.count_empty(), board.count_empty() - 1);
            let before = board.to_exponents();
            let after = spawned.to_exponents();
            let diff: Vec<usize> = (0..16).filter(|&i| before[i] != after[i]).collect();
            assert_eq!(diff.len(), 1);
            assert_eq!(before[diff[0]], 0);
            assert!(after[diff[0]] == 1 || after[diff[0]] == 2);
        }
    }

    #[test]
    fn spawn_on_full_board_is_noop() {
        init();
        let mut rng = StdRng::seed_from_u64(1);
        let full = Board::from_exponents(&[1; 16]);
        assert_eq!(full.with_random_tile(&mut rng), full);
    }

    #[test]
    fn filling_every_cell_empties_the_count() {
        init();
        let mut rng = StdRng::seed_from_u64(99);
        let mut board = Board::EMPTY;
        for _ in 0..16 {
            board = board.with_random_tile(&mut rng);
        }
        assert_eq!(board.count_empty(), 0);
    }

    #[test]
    fn score_and_highest_tile() {
        init();
        assert_eq!(Board::EMPTY.score(), 0);
        assert_eq!(Board::EMPTY.highest_tile(), 0);
        let board = Board::from_exponents(&[2, 3, 0, 0]);
        assert_eq!(board.score(), 4 + 16);
        assert_eq!(board.highest_tile(), 8);
    }

    #[test]
    fn empty_cells_enumerates_row_major() {
        init();
        let board = Board::from_exponents(&[1, 0, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0]);
        let empties: Vec<usize> = empty_cells(board).collect();
        assert_eq!(empties, vec![1, 3, 4, 15]);
    }
}
