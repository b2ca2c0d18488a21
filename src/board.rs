//! Sparse board of chunks and the tick driver.

use crate::chunk::{Border, Chunk, Direction, CHUNK_SIZE};
use crate::coords::chunk_and_local;
use crate::rule::RuleTable;
use ahash::AHashMap as HashMap;
use anyhow::Result;
use rayon::prelude::*;
use std::fmt::{self, Write};

const SIDE: i64 = CHUNK_SIZE as i64;

type ChunkCoord = (i64, i64);

/// Bounding rectangle over chunk coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Bounds {
    min_x: i64,
    max_x: i64,
    min_y: i64,
    max_y: i64,
}

impl Bounds {
    fn single((x, y): ChunkCoord) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn expand(&mut self, (x, y): ChunkCoord) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }
}

/// An unbounded Game-of-Life board backed by a sparse map of 64x64
/// chunks.
///
/// The board is the sole owner of its chunks: they are created lazily
/// when live cells (or live cells adjacent to them) appear, and
/// reclaimed once fully dead. One [`Board::update`] advances every
/// chunk by a generation in lockstep.
pub struct Board {
    chunks: HashMap<ChunkCoord, Chunk>,
    bounds: Option<Bounds>,
    rules: &'static RuleTable,
    generation: u64,
}

impl Board {
    pub fn new() -> Self {
        Self {
            chunks: HashMap::new(),
            bounds: None,
            rules: RuleTable::global(),
            generation: 0,
        }
    }

    fn touch(&mut self, coord: ChunkCoord) {
        match &mut self.bounds {
            Some(bounds) => bounds.expand(coord),
            None => self.bounds = Some(Bounds::single(coord)),
        }
    }

    /// Sets the cell at global (x, y).
    ///
    /// The owning chunk is created only when `value` is true; clearing
    /// a cell in untracked space is a no-op.
    pub fn set_point(&mut self, x: i64, y: i64, value: bool) -> Result<()> {
        let (coord, (lx, ly)) = chunk_and_local(x, y);
        if !value && !self.chunks.contains_key(&coord) {
            return Ok(());
        }
        self.touch(coord);
        self.chunks
            .entry(coord)
            .or_insert_with(Chunk::new)
            .set_cell(lx, ly, value)
    }

    /// Reads the cell at global (x, y). Pure query: untracked space is
    /// dead and no chunk is ever created here.
    pub fn get_point(&self, x: i64, y: i64) -> bool {
        let (coord, (lx, ly)) = chunk_and_local(x, y);
        match self.chunks.get(&coord) {
            Some(chunk) => chunk
                .get_cell(lx, ly)
                .expect("a bug in Board::get_point: split local coordinate out of range"),
            None => false,
        }
    }

    /// Advances the whole board by one generation.
    ///
    /// Phases run to completion across all chunks, in order:
    /// 1. materialize missing neighbors of chunks with live edge cells,
    ///    so births across chunk boundaries are never dropped;
    /// 2. gather every chunk's border from its neighbors' current
    ///    buffers (missing neighbor = dead edge), then install them;
    /// 3. compute every chunk's next buffer (chunks are independent
    ///    here, so this phase runs on the rayon pool);
    /// 4. swap all chunks to the new generation, then prune fully-dead
    ///    chunks and shrink the bounding rectangle to the survivors.
    pub fn update(&mut self) {
        self.grow_frontier();
        self.refresh_borders();

        let rules = self.rules;
        self.chunks
            .par_iter_mut()
            .for_each(|(_, chunk)| chunk.process_next_state(rules));

        for chunk in self.chunks.values_mut() {
            chunk.swap_to_next_state();
        }

        self.prune_dead();
        self.generation += 1;
    }

    /// Creates the missing neighbors every chunk with live edge cells
    /// will feed this tick.
    fn grow_frontier(&mut self) {
        let mut wanted: Vec<ChunkCoord> = Vec::new();
        for (&(cx, cy), chunk) in self.chunks.iter() {
            for direction in Direction::ALL {
                if !chunk.has_live_on_edge(direction) {
                    continue;
                }
                let (dx, dy) = direction.offset();
                let coord = (cx + dx, cy + dy);
                if !self.chunks.contains_key(&coord) {
                    wanted.push(coord);
                }
            }
        }
        for coord in wanted {
            self.touch(coord);
            self.chunks.entry(coord).or_insert_with(Chunk::new);
        }
    }

    /// Captures a consistent border snapshot for every chunk before any
    /// next buffer is written.
    fn refresh_borders(&mut self) {
        let coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        let chunks = &self.chunks;
        let borders: Vec<Border> = coords
            .par_iter()
            .map(|&(cx, cy)| {
                Border::gather(|direction| {
                    let (dx, dy) = direction.offset();
                    chunks.get(&(cx + dx, cy + dy))
                })
            })
            .collect();
        for (coord, border) in coords.iter().zip(borders) {
            if let Some(chunk) = self.chunks.get_mut(coord) {
                chunk.install_border(border);
            }
        }
    }

    fn prune_dead(&mut self) {
        self.chunks.retain(|_, chunk| !chunk.is_empty());
        self.bounds = self.chunks.keys().copied().fold(None, |acc, coord| {
            Some(match acc {
                Some(mut bounds) => {
                    bounds.expand(coord);
                    bounds
                }
                None => Bounds::single(coord),
            })
        });
    }

    /// Total live cells across all chunks.
    pub fn population(&self) -> u64 {
        self.chunks
            .values()
            .map(|chunk| chunk.population() as u64)
            .sum()
    }

    /// Generations simulated since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of materialized chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Cell-coordinate bounding rectangle (min_x, min_y, max_x, max_y)
    /// of the tracked region, or None while the board is empty.
    pub fn bounds(&self) -> Option<(i64, i64, i64, i64)> {
        self.bounds.map(|b| {
            (
                b.min_x * SIDE,
                b.min_y * SIDE,
                (b.max_x + 1) * SIDE - 1,
                (b.max_y + 1) * SIDE - 1,
            )
        })
    }

    /// Visits every live cell as global (x, y), chunk by chunk.
    pub fn for_each_live(&self, mut visit: impl FnMut(i64, i64)) {
        for (&(cx, cy), chunk) in self.chunks.iter() {
            chunk.for_each_live(|lx, ly| visit(cx * SIDE + lx as i64, cy * SIDE + ly as i64));
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Renders the tracked region row-major through [`Board::get_point`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
            return Ok(());
        };
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                f.write_char(if self.get_point(x, y) { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
