use std::sync::OnceLock;

use super::ops::slide_row;
use super::state::{Line, Score};

/// Precomputed results for every possible 16-bit packed line.
///
/// A slide touches each line independently and a line has only 2^16 states,
/// so all four directional slides and the merge points are built once up
/// front, keeping moves branch-light at runtime.
///
/// Layout:
/// - `slide_left`/`slide_right`: replacement 16-bit row lines.
/// - `slide_up`/`slide_down`: the replacement spread out in column encoding,
///   ready to be OR-ed back into a transposed board.
/// - `points`: score contribution of sliding the line. One table serves all
///   four directions: the same number of pairs merge whichever edge the
///   line moves toward.
pub(crate) struct Stores {
    pub(crate) slide_left: Box<[u64]>,
    pub(crate) slide_right: Box<[u64]>,
    pub(crate) slide_up: Box<[u64]>,
    pub(crate) slide_down: Box<[u64]>,
    pub(crate) points: Box<[Score]>,
}

const LINE_STATES: usize = 1 << 16;

static STORES: OnceLock<Stores> = OnceLock::new();

/// Force table construction now instead of on the first slide.
pub(crate) fn init() {
    let _ = STORES.get_or_init(build_stores);
}

#[inline(always)]
pub(crate) fn stores() -> &'static Stores {
    STORES.get_or_init(build_stores)
}

fn build_stores() -> Stores {
    // Built on the heap; five 64Ki-entry tables would be a large stack frame.
    let mut slide_left = vec![0u64; LINE_STATES];
    let mut slide_right = vec![0u64; LINE_STATES];
    let mut slide_up = vec![0u64; LINE_STATES];
    let mut slide_down = vec![0u64; LINE_STATES];
    let mut points = vec![0u64; LINE_STATES];

    for state in 0..LINE_STATES {
        let ranks = line_ranks(state as Line);
        let (toward, earned) = slide_row(ranks);
        let away = reversed(slide_row(reversed(ranks)).0);
        slide_left[state] = row_line(toward);
        slide_right[state] = row_line(away);
        slide_up[state] = col_line(toward);
        slide_down[state] = col_line(away);
        points[state] = earned;
    }

    Stores {
        slide_left: slide_left.into_boxed_slice(),
        slide_right: slide_right.into_boxed_slice(),
        slide_up: slide_up.into_boxed_slice(),
        slide_down: slide_down.into_boxed_slice(),
        points: points.into_boxed_slice(),
    }
}

#[inline(always)]
pub(crate) fn slide_entry(table: &[u64], line: u16) -> u64 {
    debug_assert!((line as usize) < LINE_STATES);
    unsafe { *table.get_unchecked(line as usize) }
}

#[inline(always)]
pub(crate) fn points_entry(line: u16) -> Score {
    let points = &stores().points;
    debug_assert!((line as usize) < LINE_STATES);
    unsafe { *points.get_unchecked(line as usize) }
}

fn line_ranks(line: Line) -> [u8; 4] {
    [
        ((line >> 12) & 0xf) as u8,
        ((line >> 8) & 0xf) as u8,
        ((line >> 4) & 0xf) as u8,
        (line & 0xf) as u8,
    ]
}

fn reversed(ranks: [u8; 4]) -> [u8; 4] {
    [ranks[3], ranks[2], ranks[1], ranks[0]]
}

fn row_line(ranks: [u8; 4]) -> Line {
    (Line::from(ranks[0]) << 12)
        | (Line::from(ranks[1]) << 8)
        | (Line::from(ranks[2]) << 4)
        | Line::from(ranks[3])
}

fn col_line(ranks: [u8; 4]) -> Line {
    (Line::from(ranks[0]) << 48)
        | (Line::from(ranks[1]) << 32)
        | (Line::from(ranks[2]) << 16)
        | Line::from(ranks[3])
}
