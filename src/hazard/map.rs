//! Hazard ("mine") grid on the cells between board intersections
//!
//! Hazard cell `(x, y)` is the square whose corners are intersections
//! `(x, y)`, `(x + 1, y)`, `(x, y + 1)` and `(x + 1, y + 1)`, so the grid is one
//! smaller than the board on each axis.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Pos, BOARD_SIZE};
use crate::error::HazardError;

/// Hazard grid size (14x14)
pub const HAZARD_SIZE: usize = BOARD_SIZE - 1;
pub const HAZARD_CELLS: usize = HAZARD_SIZE * HAZARD_SIZE; // 196

#[inline]
fn cell_index(x: usize, y: usize) -> usize {
    x * HAZARD_SIZE + y
}

#[inline]
fn checked_cell(x: i32, y: i32) -> Option<(usize, usize)> {
    #[allow(clippy::cast_sign_loss)]
    HazardMap::in_bounds(x, y).then(|| (x as usize, y as usize))
}

/// In-bounds cells of the 3x3 square centred on `(x, y)`, the centre included.
pub fn neighborhood(x: usize, y: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::with_capacity(9);
    for dx in -1i32..=1 {
        for dy in -1i32..=1 {
            if let Some(cell) = checked_cell(x as i32 + dx, y as i32 + dy) {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Hidden hazards plus the per-cell adjacency counts shown as hints.
///
/// `counts[c]` is always the number of hazards in the 3x3 square around `c`,
/// `c` itself included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardMap {
    hazards: [bool; HAZARD_CELLS],
    counts: [u8; HAZARD_CELLS],
}

impl HazardMap {
    /// An empty field.
    pub fn new() -> Self {
        Self {
            hazards: [false; HAZARD_CELLS],
            counts: [0; HAZARD_CELLS],
        }
    }

    /// Build from explicit hazard cells. Out-of-range cells are skipped.
    pub fn with_hazards<I: IntoIterator<Item = (i32, i32)>>(cells: I) -> Self {
        let mut map = Self::new();
        for (x, y) in cells {
            if let Some((x, y)) = checked_cell(x, y) {
                map.hazards[cell_index(x, y)] = true;
            }
        }
        map.recompute_counts();
        map
    }

    /// Scatter `floor(196 * density)` hazards uniformly at random.
    pub fn with_density<R: Rng>(density: f64, rng: &mut R) -> Result<Self, HazardError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(HazardError::InvalidDensity(density));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hazard_count = (HAZARD_CELLS as f64 * density) as usize;

        let mut cells: Vec<usize> = (0..HAZARD_CELLS).collect();
        cells.shuffle(rng);

        let mut map = Self::new();
        for &idx in cells.iter().take(hazard_count) {
            map.hazards[idx] = true;
        }
        map.recompute_counts();
        Ok(map)
    }

    #[inline]
    pub fn in_bounds(x: i32, y: i32) -> bool {
        x >= 0 && x < HAZARD_SIZE as i32 && y >= 0 && y < HAZARD_SIZE as i32
    }

    /// Bounds-checked; off-grid cells are never hazards.
    #[inline]
    pub fn is_hazard(&self, x: i32, y: i32) -> bool {
        checked_cell(x, y).is_some_and(|(x, y)| self.hazards[cell_index(x, y)])
    }

    /// Hint number for a cell, 0 off the grid.
    #[inline]
    pub fn adjacent_count(&self, x: i32, y: i32) -> u8 {
        checked_cell(x, y).map_or(0, |(x, y)| self.counts[cell_index(x, y)])
    }

    pub fn hazard_count(&self) -> usize {
        self.hazards.iter().filter(|&&h| h).count()
    }

    /// Hazard cells, as `Pos` in hazard-grid coordinates.
    pub fn hazards(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..HAZARD_CELLS)
            .filter(move |&idx| self.hazards[idx])
            .map(|idx| Pos::new((idx / HAZARD_SIZE) as u8, (idx % HAZARD_SIZE) as u8))
    }

    /// Hint numbers as rows indexed `[x][y]`.
    pub fn hints(&self) -> Vec<Vec<u8>> {
        (0..HAZARD_SIZE)
            .map(|x| (0..HAZARD_SIZE).map(|y| self.counts[cell_index(x, y)]).collect())
            .collect()
    }

    /// The four hazard cells touching intersection `pos`.
    #[inline]
    pub fn cells_around(pos: Pos) -> [(i32, i32); 4] {
        let (x, y) = (i32::from(pos.x), i32::from(pos.y));
        [(x - 1, y - 1), (x - 1, y), (x, y - 1), (x, y)]
    }

    /// Whether a stone on `pos` sets off a hazard.
    #[inline]
    pub fn triggers_at(&self, pos: Pos) -> bool {
        Self::cells_around(pos)
            .iter()
            .any(|&(x, y)| self.is_hazard(x, y))
    }

    /// Detonate every hazard touching `pos` and, transitively, every hazard
    /// adjacent to a detonated one.
    ///
    /// Returns the cleared cells in detonation order. Counts stay consistent.
    pub fn detonate(&mut self, pos: Pos) -> Vec<Pos> {
        let mut stack: Vec<(usize, usize)> = Self::cells_around(pos)
            .iter()
            .filter_map(|&(x, y)| checked_cell(x, y))
            .collect();
        let mut cleared = Vec::new();

        while let Some((x, y)) = stack.pop() {
            if !self.hazards[cell_index(x, y)] {
                continue;
            }
            self.clear_cell(x, y);
            cleared.push(Pos::new(x as u8, y as u8));
            stack.extend(
                neighborhood(x, y)
                    .into_iter()
                    .filter(|&(nx, ny)| self.hazards[cell_index(nx, ny)]),
            );
        }

        cleared
    }

    /// Remove one hazard and decrement the counts it contributed to.
    fn clear_cell(&mut self, x: usize, y: usize) {
        self.hazards[cell_index(x, y)] = false;
        for (nx, ny) in neighborhood(x, y) {
            let c = &mut self.counts[cell_index(nx, ny)];
            *c = c.saturating_sub(1);
        }
    }

    fn recompute_counts(&mut self) {
        for x in 0..HAZARD_SIZE {
            for y in 0..HAZARD_SIZE {
                let count = neighborhood(x, y)
                    .into_iter()
                    .filter(|&(nx, ny)| self.hazards[cell_index(nx, ny)])
                    .count();
                self.counts[cell_index(x, y)] = count as u8;
            }
        }
    }
}

impl Default for HazardMap {
    fn default() -> Self {
        Self::new()
    }
}
