use rand::Rng;
use tracing::trace;

use crate::distance::matrix::DistanceMatrix;
use crate::solver::ant_colony::pheromone::PheromoneMatrix;

/// Per-ant walk state.
struct Ant {
    path: Vec<usize>,
    current: usize,
}

impl Ant {
    fn new(start: usize, num_nodes: usize) -> Self {
        let mut path = Vec::with_capacity(num_nodes);
        path.push(start);
        Ant {
            path,
            current: start,
        }
    }

    fn visit(&mut self, node: usize) {
        self.path.push(node);
        self.current = node;
    }
}

/// Builds one open path per call from a read-only view of the colony.
#[derive(Debug, Clone, Copy)]
pub struct TourConstructor<'a> {
    distances: &'a DistanceMatrix,
    pheromones: &'a PheromoneMatrix,
    alpha: f64,
    beta: f64,
}

impl<'a> TourConstructor<'a> {
    pub fn new(
        distances: &'a DistanceMatrix,
        pheromones: &'a PheromoneMatrix,
        alpha: f64,
        beta: f64,
    ) -> Self {
        debug_assert_eq!(distances.len(), pheromones.len());
        TourConstructor {
            distances,
            pheromones,
            alpha,
            beta,
        }
    }

    /// Walk from `start` through every other node and finish on `end`.
    /// `end` stays out of the candidate set until nothing else is left.
    pub fn construct<R: Rng + ?Sized>(&self, start: usize, end: usize, rng: &mut R) -> Vec<usize> {
        debug_assert_ne!(start, end);
        let n = self.distances.len();
        let mut ant = Ant::new(start, n);
        let mut candidates: Vec<usize> = (0..n).filter(|&i| i != start && i != end).collect();

        while !candidates.is_empty() {
            let pick = self.select_next(ant.current, &candidates, rng);
            ant.visit(candidates.remove(pick));
        }
        ant.visit(end);

        trace!("Constructed path: {:?}", ant.path);
        ant.path
    }

    /// `τ^α · (1/d)^β`; a NaN product (zero trail over a zero distance) counts as 0.
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        let tau = self.pheromones.intensity(from, to);
        let eta = 1.0 / self.distances.distance(from, to);
        let w = tau.powf(self.alpha) * eta.powf(self.beta);
        if w.is_nan() {
            0.0
        } else {
            w
        }
    }

    /// Roulette-wheel pick; returns an index into `candidates`.
    fn select_next<R: Rng + ?Sized>(&self, current: usize, candidates: &[usize], rng: &mut R) -> usize {
        let weights: Vec<f64> = candidates.iter().map(|&u| self.weight(current, u)).collect();

        // Coincident nodes give an infinite weight; they win outright, ties uniformly.
        let unbounded: Vec<usize> = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_infinite())
            .map(|(i, _)| i)
            .collect();
        if !unbounded.is_empty() {
            return unbounded[rng.gen_range(0..unbounded.len())];
        }

        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return rng.gen_range(0..candidates.len());
        }

        let mut target = rng.gen::<f64>() * total;
        for (i, &w) in weights.iter().enumerate() {
            if target < w {
                return i;
            }
            target -= w;
        }
        // Rounding left `target` past the last bucket.
        weights
            .iter()
            .rposition(|&w| w > 0.0)
            .unwrap_or(candidates.len() - 1)
    }
}
