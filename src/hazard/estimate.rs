//! Hazard probability estimate derived from hint numbers
//!
//! Each positive hint spreads `hint / neighbours` over its 3x3 square, damped
//! by averaging with the value already there. Cells start at 0.5.

use crate::board::Pos;

use super::map::{neighborhood, HazardMap, HAZARD_CELLS, HAZARD_SIZE};

/// Starting probability for every cell.
pub const PRIOR: f64 = 0.5;

/// Risk above which a non-triggering move is penalised.
pub const RISK_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct HazardEstimate {
    probs: [f64; HAZARD_CELLS],
}

impl HazardEstimate {
    /// No information: every cell at the prior.
    pub fn uniform() -> Self {
        Self {
            probs: [PRIOR; HAZARD_CELLS],
        }
    }

    /// Estimate from hint rows indexed `[x][y]`.
    ///
    /// Short or ragged input is fine: entries outside the grid are skipped,
    /// missing ones contribute nothing.
    pub fn from_hints<R: AsRef<[u8]>>(hints: &[R]) -> Self {
        let mut estimate = Self::uniform();

        for (x, row) in hints.iter().enumerate().take(HAZARD_SIZE) {
            for (y, &hint) in row.as_ref().iter().enumerate().take(HAZARD_SIZE) {
                if hint == 0 {
                    continue;
                }
                let cells = neighborhood(x, y);
                let share = f64::from(hint) / cells.len() as f64;
                for (nx, ny) in cells {
                    let p = &mut estimate.probs[nx * HAZARD_SIZE + ny];
                    *p = (*p + share) / 2.0;
                }
            }
        }

        for p in &mut estimate.probs {
            *p = p.clamp(0.0, 1.0);
        }
        estimate
    }

    /// Estimate from the hints a hazard map exposes.
    pub fn from_map(map: &HazardMap) -> Self {
        Self::from_hints(&map.hints())
    }

    /// Probability for a hazard cell, 0 off the grid.
    #[inline]
    pub fn probability(&self, x: i32, y: i32) -> f64 {
        if HazardMap::in_bounds(x, y) {
            #[allow(clippy::cast_sign_loss)]
            let idx = x as usize * HAZARD_SIZE + y as usize;
            self.probs[idx]
        } else {
            0.0
        }
    }

    /// Highest probability among the hazard cells touching intersection `pos`.
    pub fn risk_at(&self, pos: Pos) -> f64 {
        HazardMap::cells_around(pos)
            .iter()
            .map(|&(x, y)| self.probability(x, y))
            .fold(0.0, f64::max)
    }
}

impl Default for HazardEstimate {
    fn default() -> Self {
        Self::uniform()
    }
}
