//! Fixed-size chunk of the board and its next-state kernels.
//!
//! A chunk is a 64x64 bit grid, double-buffered so every chunk of a tick
//! can read its neighbors' current generation while writing its own next
//! one. Cross-chunk neighborhoods are resolved through a [`Border`]
//! snapshot gathered before the compute phase.

use crate::bitplane::BitPlane;
use crate::rule::{RuleTable, CENTER_BIT};
use anyhow::{anyhow, Result};

/// Side length of a chunk in cells.
pub const CHUNK_SIZE: usize = 64;

const CELLS: usize = CHUNK_SIZE * CHUNK_SIZE;
const LAST: usize = CHUNK_SIZE - 1;
/// Columns whose full neighborhood lies inside a single row triple.
const INTERIOR_COLUMNS: u64 = !(1 | 1 << LAST);

/// The eight neighbor directions of a chunk, in board coordinates where
/// y grows downward (north is toward smaller y).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Chunk-grid offset for this direction.
    #[inline]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::SouthEast => (1, 1),
        }
    }
}

/// Snapshot of the eight neighboring chunks' facing edges and corners.
///
/// Bit `k` of `top`/`bottom` is column `k` of the adjacent row; bit `k`
/// of `left`/`right` is row `k` of the adjacent column. A missing
/// neighbor contributes all-dead values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Border {
    pub top: u64,
    pub bottom: u64,
    pub left: u64,
    pub right: u64,
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl Border {
    /// Collects border data from the current buffers of up-to-8
    /// neighbors; directions the lookup cannot resolve stay dead.
    pub fn gather<'a, F>(lookup: F) -> Self
    where
        F: Fn(Direction) -> Option<&'a Chunk>,
    {
        let mut border = Border::default();
        if let Some(n) = lookup(Direction::North) {
            border.top = n.bottom_row();
        }
        if let Some(n) = lookup(Direction::South) {
            border.bottom = n.top_row();
        }
        if let Some(n) = lookup(Direction::West) {
            border.left = n.right_column();
        }
        if let Some(n) = lookup(Direction::East) {
            border.right = n.left_column();
        }
        if let Some(n) = lookup(Direction::NorthWest) {
            border.top_left = n.corner(LAST, LAST);
        }
        if let Some(n) = lookup(Direction::NorthEast) {
            border.top_right = n.corner(0, LAST);
        }
        if let Some(n) = lookup(Direction::SouthWest) {
            border.bottom_left = n.corner(LAST, 0);
        }
        if let Some(n) = lookup(Direction::SouthEast) {
            border.bottom_right = n.corner(0, 0);
        }
        border
    }
}

/// A 64x64 double-buffered cell grid.
///
/// Exactly one buffer is current at any instant outside an in-progress
/// tick; [`Chunk::process_next_state`] writes only the other one, and
/// [`Chunk::swap_to_next_state`] flips the selector once every chunk of
/// the tick has finished computing.
pub struct Chunk {
    buffers: [BitPlane; 2],
    current: usize,
    border: Border,
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            buffers: [BitPlane::new(CELLS), BitPlane::new(CELLS)],
            current: 0,
            border: Border::default(),
        }
    }

    fn check_local(x: usize, y: usize) -> Result<()> {
        if x >= CHUNK_SIZE || y >= CHUNK_SIZE {
            return Err(anyhow!(
                "local coordinate ({x}, {y}) outside a chunk of side {CHUNK_SIZE}"
            ));
        }
        Ok(())
    }

    /// Reads a cell of the current buffer; fails on coordinates outside
    /// `[0, 64)` without touching chunk state.
    pub fn get_cell(&self, x: usize, y: usize) -> Result<bool> {
        Self::check_local(x, y)?;
        self.buffers[self.current].get(y * CHUNK_SIZE + x)
    }

    /// Writes a cell of the current buffer; fails on coordinates outside
    /// `[0, 64)` without touching chunk state.
    pub fn set_cell(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        Self::check_local(x, y)?;
        self.buffers[self.current].set(y * CHUNK_SIZE + x, value)
    }

    #[inline]
    fn current_words(&self) -> &[u64] {
        self.buffers[self.current].words()
    }

    /// Row 0 of the current buffer, the edge facing the north neighbor.
    #[inline]
    pub fn top_row(&self) -> u64 {
        self.current_words()[0]
    }

    /// Row 63 of the current buffer, the edge facing the south neighbor.
    #[inline]
    pub fn bottom_row(&self) -> u64 {
        self.current_words()[LAST]
    }

    /// Column 0 of the current buffer packed as bit `k` = row `k`.
    pub fn left_column(&self) -> u64 {
        self.current_words()
            .iter()
            .enumerate()
            .fold(0, |acc, (y, row)| acc | (row & 1) << y)
    }

    /// Column 63 of the current buffer packed as bit `k` = row `k`.
    pub fn right_column(&self) -> u64 {
        self.current_words()
            .iter()
            .enumerate()
            .fold(0, |acc, (y, row)| acc | (row >> LAST & 1) << y)
    }

    #[inline]
    fn corner(&self, x: usize, y: usize) -> bool {
        self.current_words()[y] >> x & 1 == 1
    }

    /// True iff the edge or corner facing `direction` has a live cell,
    /// i.e. this chunk can seed births in that neighbor.
    pub fn has_live_on_edge(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.top_row() != 0,
            Direction::South => self.bottom_row() != 0,
            Direction::West => self.left_column() != 0,
            Direction::East => self.right_column() != 0,
            Direction::NorthWest => self.corner(0, 0),
            Direction::NorthEast => self.corner(LAST, 0),
            Direction::SouthWest => self.corner(0, LAST),
            Direction::SouthEast => self.corner(LAST, LAST),
        }
    }

    /// Replaces the border snapshot from a neighbor-lookup capability.
    ///
    /// Must run before [`Chunk::process_next_state`] in every tick; the
    /// lookup reads the neighbors' current buffers only.
    pub fn refresh_border<'a, F>(&mut self, lookup: F)
    where
        F: Fn(Direction) -> Option<&'a Chunk>,
    {
        self.border = Border::gather(lookup);
    }

    pub(crate) fn install_border(&mut self, border: Border) {
        self.border = border;
    }

    pub fn border(&self) -> &Border {
        &self.border
    }

    fn split_buffers(&mut self) -> (&[u64], &mut [u64]) {
        let (a, b) = self.buffers.split_at_mut(1);
        if self.current == 0 {
            (a[0].words(), b[0].words_mut())
        } else {
            (b[0].words(), a[0].words_mut())
        }
    }

    /// Computes generation t+1 into the non-current buffer.
    ///
    /// The current buffer is left untouched so peer chunks can keep
    /// reading it during the same tick. Interior columns of interior
    /// rows go through the bit-parallel adder chain; the frame (rows 0
    /// and 63, columns 0 and 63) is recomputed per cell through the
    /// rule table, substituting [`Border`] bits for the neighbors that
    /// fall outside the chunk.
    pub fn process_next_state(&mut self, rules: &RuleTable) {
        let border = self.border;
        let (cur, next) = self.split_buffers();

        for y in 1..LAST {
            next[y] = next_row_interior(cur[y - 1], cur[y], cur[y + 1]) & INTERIOR_COLUMNS;
        }

        let mut top = 0u64;
        let mut bottom = 0u64;
        for x in 0..CHUNK_SIZE {
            if rules.next_state(encode_neighborhood(cur, &border, x, 0)) {
                top |= 1 << x;
            }
            if rules.next_state(encode_neighborhood(cur, &border, x, LAST)) {
                bottom |= 1 << x;
            }
        }
        next[0] = top;
        next[LAST] = bottom;

        for y in 1..LAST {
            if rules.next_state(encode_neighborhood(cur, &border, 0, y)) {
                next[y] |= 1;
            }
            if rules.next_state(encode_neighborhood(cur, &border, LAST, y)) {
                next[y] |= 1 << LAST;
            }
        }
    }

    /// Flips the current-buffer selector.
    ///
    /// Callers must have finished [`Chunk::process_next_state`] for this
    /// chunk, and for board-wide consistency for every chunk of the
    /// tick, before swapping any of them.
    pub fn swap_to_next_state(&mut self) {
        self.current ^= 1;
    }

    /// True iff every cell of the current buffer is dead.
    pub fn is_empty(&self) -> bool {
        self.current_words().iter().all(|&row| row == 0)
    }

    /// Live-cell count of the current buffer.
    pub fn population(&self) -> u32 {
        self.buffers[self.current].count_ones()
    }

    /// Visits every live cell of the current buffer as (x, y).
    pub fn for_each_live(&self, mut visit: impl FnMut(usize, usize)) {
        for (y, &row) in self.current_words().iter().enumerate() {
            let mut bits = row;
            while bits != 0 {
                let x = bits.trailing_zeros() as usize;
                visit(x, y);
                bits &= bits - 1;
            }
        }
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn full_add(a: u64, b: u64, c: u64) -> (u64, u64) {
    (a ^ b ^ c, (a & b) | (b & c) | (a & c))
}

#[inline(always)]
fn half_add(a: u64, b: u64) -> (u64, u64) {
    (a ^ b, a & b)
}

/// Bit-parallel next state for one row given its two vertical
/// neighbors. Shifts feed dead cells at columns 0 and 63, so only the
/// interior columns of the result are valid.
fn next_row_interior(above: u64, row: u64, below: u64) -> u64 {
    let (a0, a1) = full_add(above << 1, above, above >> 1);
    let (b0, b1) = half_add(row << 1, row >> 1);
    let (c0, c1) = full_add(below << 1, below, below >> 1);

    // neighbor count per column: bit0 + 2*bit1 + 4*bit2
    let (bit0, carry0) = full_add(a0, b0, c0);
    let (ones, carry1) = full_add(a1, b1, c1);
    let (bit1, carry2) = half_add(ones, carry0);
    let (bit2, _) = half_add(carry1, carry2);

    // two or three neighbors: bit1 set, bit2 clear
    let two_or_three = !bit2 & bit1;
    (two_or_three & bit0) | (two_or_three & !bit0 & row)
}

/// Packs the 9-bit rule-table encoding for one cell, pulling neighbors
/// that fall outside the chunk from the border snapshot.
fn encode_neighborhood(cur: &[u64], border: &Border, x: usize, y: usize) -> u16 {
    const OFFSETS: [(isize, isize); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];
    let mut encoding = 0u16;
    for (bit, (dx, dy)) in OFFSETS.into_iter().enumerate() {
        if probe(cur, border, x as isize + dx, y as isize + dy) {
            encoding |= 1 << bit;
        }
    }
    if cur[y] >> x & 1 == 1 {
        encoding |= 1 << CENTER_BIT;
    }
    encoding
}

/// Reads a cell at local coordinates extended by one ring: in-range
/// coordinates come from the current buffer, the ring from the border.
fn probe(cur: &[u64], border: &Border, x: isize, y: isize) -> bool {
    const SIDE: isize = CHUNK_SIZE as isize;
    debug_assert!((-1..=SIDE).contains(&x) && (-1..=SIDE).contains(&y));
    if y == -1 {
        if x == -1 {
            return border.top_left;
        }
        if x == SIDE {
            return border.top_right;
        }
        return border.top >> x & 1 == 1;
    }
    if y == SIDE {
        if x == -1 {
            return border.bottom_left;
        }
        if x == SIDE {
            return border.bottom_right;
        }
        return border.bottom >> x & 1 == 1;
    }
    if x == -1 {
        return border.left >> y & 1 == 1;
    }
    if x == SIDE {
        return border.right >> y & 1 == 1;
    }
    cur[y as usize] >> x & 1 == 1
}
