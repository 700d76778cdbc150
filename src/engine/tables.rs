use std::sync::OnceLock;

/// Precomputed transition tables for all possible 4-tile lines (16-bit packed).
///
/// Shifting/merging a row or column depends only on its 4 nibbles, so there
/// are exactly 2^16 distinct lines. For each one we precompute the line after
/// sliding in every direction, the score contribution of its tiles, and a
/// mask of its empty nibbles. This keeps move application branch-light:
/// a move is four table lookups plus (for vertical moves) one transpose.
///
/// Layout:
/// - `shift_left/right[i]`: replacement 16-bit row after the slide.
/// - `shift_up/down[i]`: replacement column pre-spread across the `u64` so
///   the caller can OR columns together without a second transpose.
/// - `score[i]`: accumulated merge score of the line's tiles.
/// - `empty_mask[i]`: bit `c` set iff nibble `c` (0 = leftmost) is zero.
///
/// Access goes through `stores()`, which lazily builds a single process-wide
/// `Stores` on first use. `engine::init()` forces the build eagerly; once
/// built the tables are immutable and shared freely across threads.
pub(crate) struct Stores {
    pub(crate) shift_left: Box<[u64]>,
    pub(crate) shift_right: Box<[u64]>,
    pub(crate) shift_up: Box<[u64]>,
    pub(crate) shift_down: Box<[u64]>,
    pub(crate) score: Box<[u64]>,
    pub(crate) empty_mask: Box<[u8]>,
}

pub(crate) const LINE_TABLE_SIZE: usize = 0x1_0000;

static STORES: OnceLock<Stores> = OnceLock::new();

/// Ensure the tables are built. Safe to call any number of times.
pub fn init() {
    let _ = STORES.get_or_init(build_stores);
}

#[inline(always)]
pub(crate) fn stores() -> &'static Stores {
    STORES.get_or_init(build_stores)
}

fn build_stores() -> Stores {
    // Heap allocation keeps the init stack frame small.
    let mut shift_left = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_right = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_up = vec![0u64; LINE_TABLE_SIZE];
    let mut shift_down = vec![0u64; LINE_TABLE_SIZE];
    let mut score = vec![0u64; LINE_TABLE_SIZE];
    let mut empty_mask = vec![0u8; LINE_TABLE_SIZE];

    for line in 0..LINE_TABLE_SIZE {
        let tiles = unpack_line(line as u16);
        let slid = slide_line_left(tiles);
        let reversed = reverse(tiles);
        let slid_rev = reverse(slide_line_left(reversed));

        shift_left[line] = pack_row(slid) as u64;
        shift_right[line] = pack_row(slid_rev) as u64;
        shift_up[line] = spread_col(slid);
        shift_down[line] = spread_col(slid_rev);
        score[line] = line_score(tiles);
        empty_mask[line] = tiles
            .iter()
            .enumerate()
            .fold(0u8, |m, (c, &t)| if t == 0 { m | (1 << c) } else { m });
    }

    Stores {
        shift_left: shift_left.into_boxed_slice(),
        shift_right: shift_right.into_boxed_slice(),
        shift_up: shift_up.into_boxed_slice(),
        shift_down: shift_down.into_boxed_slice(),
        score: score.into_boxed_slice(),
        empty_mask: empty_mask.into_boxed_slice(),
    }
}

#[inline(always)]
pub(crate) fn get_line_entry(table: &[u64], idx: u16) -> u64 {
    debug_assert!((idx as usize) < LINE_TABLE_SIZE);
    unsafe { *table.get_unchecked(idx as usize) }
}

#[inline(always)]
pub(crate) fn get_score_entry(idx: u16) -> u64 {
    get_line_entry(&stores().score, idx)
}

#[inline(always)]
pub(crate) fn get_empty_mask(idx: u16) -> u8 {
    debug_assert!((idx as usize) < LINE_TABLE_SIZE);
    unsafe { *stores().empty_mask.get_unchecked(idx as usize) }
}

/// Split a packed line into exponents, index 0 at the most significant nibble.
pub(crate) fn unpack_line(line: u16) -> [u8; 4] {
    [
        ((line >> 12) & 0xf) as u8,
        ((line >> 8) & 0xf) as u8,
        ((line >> 4) & 0xf) as u8,
        (line & 0xf) as u8,
    ]
}

pub(crate) fn pack_row(tiles: [u8; 4]) -> u16 {
    ((tiles[0] as u16) << 12) | ((tiles[1] as u16) << 8) | ((tiles[2] as u16) << 4) | tiles[3] as u16
}

/// Pack a column result so that tile `r` lands at the base nibble of row `r`.
/// ORing in `<< (12 - 4*c)` then places it in column `c` of the full board.
fn spread_col(tiles: [u8; 4]) -> u64 {
    ((tiles[0] as u64) << 48) | ((tiles[1] as u64) << 32) | ((tiles[2] as u64) << 16) | tiles[3] as u64
}

fn reverse(tiles: [u8; 4]) -> [u8; 4] {
    [tiles[3], tiles[2], tiles[1], tiles[0]]
}

/// Slide toward index 0 and merge each adjacent equal pair exactly once.
/// A tile produced by a merge is never merged again within the same slide.
pub(crate) fn slide_line_left(tiles: [u8; 4]) -> [u8; 4] {
    let mut out = [0u8; 4];
    let mut write = 0usize;
    let mut mergeable: Option<usize> = None;
    for &t in tiles.iter() {
        if t == 0 {
            continue;
        }
        match mergeable {
            Some(at) if out[at] == t => {
                // Exponents cap at 15: the nibble invariant wins over a
                // theoretical 32768+32768 merge.
                out[at] = (out[at] + 1).min(15);
                mergeable = None;
            }
            _ => {
                out[write] = t;
                mergeable = Some(write);
                write += 1;
            }
        }
    }
    out
}

/// Accumulated merge score of a line: each tile 2^n contributed
/// `(n-1) * 2^n` across all the merges that built it.
pub(crate) fn line_score(tiles: [u8; 4]) -> u64 {
    tiles
        .iter()
        .filter(|&&t| t >= 2)
        .map(|&t| (t as u64 - 1) * (1u64 << t))
        .sum()
}
