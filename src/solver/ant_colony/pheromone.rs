use itertools::Itertools;

use crate::error::DegenerateTour;

/// Trail intensities between node pairs. Kept symmetric: every write to
/// (i, j) is mirrored to (j, i).
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl PheromoneMatrix {
    pub fn new(n: usize, initial: f64) -> Self {
        PheromoneMatrix {
            n,
            cells: vec![initial; n * n],
        }
    }

    #[inline]
    pub fn intensity(&self, from: usize, to: usize) -> f64 {
        self.cells[from * self.n + to]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// `τ ← τ·(1 − ρ)` over the whole matrix.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        self.cells.iter_mut().for_each(|tau| *tau *= keep);
    }

    /// Add `amount / cost` along every edge of `path`. Returns the per-edge
    /// deposit, or a warning when `cost` cannot be divided by.
    pub fn deposit(&mut self, path: &[usize], cost: f64, amount: f64) -> Result<f64, DegenerateTour> {
        if !cost.is_finite() || cost <= 0.0 {
            return Err(DegenerateTour { cost });
        }
        let delta = amount / cost;
        for (&from, &to) in path.iter().tuple_windows() {
            self.cells[from * self.n + to] += delta;
            self.cells[to * self.n + from] += delta;
        }
        Ok(delta)
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }
}
