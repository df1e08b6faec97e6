use rand::Rng;

use super::state::{rank_value, Board, BoardRaw, Line, Move, Score};
use super::tables::{points_entry, slide_entry, stores};

/// Result of sliding a board: the slid board, the points earned by merges,
/// and whether anything moved.
///
/// `moved == false` marks a rejected move: callers must not spawn a tile,
/// touch the score, or re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub points: Score,
    pub moved: bool,
}

/// Slide/merge all four lines toward `dir`. Pure: no spawn, no RNG.
pub fn slide(board: Board, dir: Move) -> MoveOutcome {
    let (next, points) = match dir {
        Move::Left | Move::Right => slide_rows(board, dir),
        Move::Up | Move::Down => slide_cols(board, dir),
    };
    MoveOutcome {
        board: next,
        points,
        moved: next != board,
    }
}

/// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
/// Leaves a full board untouched.
pub fn spawn_tile<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    let empty = count_empty(board);
    if empty == 0 {
        return board;
    }
    let mut index = rng.gen_range(0..empty);
    let mut probe = board.0;
    let mut tile: BoardRaw = if rng.gen_range(0..10) < 9 { 1 } else { 2 };
    loop {
        while (probe & 0xf) != 0 {
            probe >>= 4;
            tile <<= 4;
        }
        if index == 0 {
            break;
        }
        index -= 1;
        probe >>= 4;
        tile <<= 4;
    }
    Board(board.0 | tile)
}

/// Terminal iff the board is full and no two orthogonal neighbors hold the
/// same value. Pure scan; never mutates and never consults the RNG.
pub fn is_terminal(board: Board) -> bool {
    if count_empty(board) != 0 {
        return false;
    }
    !has_adjacent_pair(board.0) && !has_adjacent_pair(transpose(board.0))
}

/// Count the number of empty cells.
// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
pub fn count_empty(board: Board) -> u64 {
    let mut x = board.0;
    x |= x >> 1;
    x |= x >> 2;
    x &= 0x1111_1111_1111_1111;
    16 - u64::from(x.count_ones())
}

/// Highest tile value present on the board (0 for an empty board).
pub fn highest_tile(board: Board) -> u32 {
    board.tiles().map(rank_value).max().unwrap_or(0)
}

// Credit to Nneonneo
pub(crate) fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F0_0F0F_F0F0_0F0F;
    let a2 = x & 0x0000_F0F0_0000_F0F0;
    let a3 = x & 0x0F0F_0000_0F0F_0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00_FF00_00FF_00FF;
    let b2 = a & 0x00FF_00FF_0000_0000;
    let b3 = a & 0x0000_0000_FF00_FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

pub(crate) fn extract_line(raw: BoardRaw, idx: usize) -> Line {
    (raw >> ((3 - idx) * 16)) & 0xffff
}

fn has_adjacent_pair(raw: BoardRaw) -> bool {
    (0..4).any(|idx| {
        let line = extract_line(raw, idx);
        (0..3).any(|i| {
            let hi = (line >> ((3 - i) * 4)) & 0xf;
            let lo = (line >> ((2 - i) * 4)) & 0xf;
            hi != 0 && hi == lo
        })
    })
}

fn slide_rows(board: Board, dir: Move) -> (Board, Score) {
    let s = stores();
    let table: &[u64] = match dir {
        Move::Left => &s.slide_left,
        Move::Right => &s.slide_right,
        _ => unreachable!("column move routed to slide_rows"),
    };
    let mut raw: BoardRaw = 0;
    let mut points: Score = 0;
    for row_idx in 0..4 {
        let row = extract_line(board.0, row_idx) as u16;
        raw |= slide_entry(table, row) << (48 - 16 * row_idx);
        points += points_entry(row);
    }
    (Board(raw), points)
}

fn slide_cols(board: Board, dir: Move) -> (Board, Score) {
    let transposed = transpose(board.0);
    let s = stores();
    let table: &[u64] = match dir {
        Move::Up => &s.slide_up,
        Move::Down => &s.slide_down,
        _ => unreachable!("row move routed to slide_cols"),
    };
    let mut raw: BoardRaw = 0;
    let mut points: Score = 0;
    for col_idx in 0..4 {
        let col = extract_line(transposed, col_idx) as u16;
        raw |= slide_entry(table, col) << (12 - 4 * col_idx);
        points += points_entry(col);
    }
    (Board(raw), points)
}

/// Reference compact+merge for one line of ranks, toward index 0.
///
/// Zeros are dropped, then a single forward scan merges each equal adjacent
/// pair into one tile of the next rank; a merged tile never merges again in
/// the same pass. Returns the slid ranks and the points earned (the summed
/// values of tiles created by merges). Only the table builder and tests
/// call this; moves at runtime go through the lookup tables.
pub(crate) fn slide_row(ranks: [u8; 4]) -> ([u8; 4], Score) {
    let compact: Vec<u8> = ranks.iter().copied().filter(|&r| r != 0).collect();
    let mut out = [0u8; 4];
    let mut points: Score = 0;
    let mut write = 0;
    let mut read = 0;
    while read < compact.len() {
        if read + 1 < compact.len() && compact[read] == compact[read + 1] {
            let merged = compact[read] + 1;
            // rank 15 (32768) is the representation ceiling; merges saturate
            // there but still score the doubled value
            out[write] = merged.min(15);
            points += 1u64 << merged;
            read += 2;
        } else {
            out[write] = compact[read];
            read += 1;
        }
        write += 1;
    }
    (out, points)
}
