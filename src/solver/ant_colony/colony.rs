use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, span, warn, Level};

use crate::config::AcoConfig;
use crate::distance::matrix::DistanceMatrix;
use crate::domain::types::{IterationRecord, Node, RunState, Tour};
use crate::error::{AcoError, AcoResult};
use crate::evaluation::fitness::{find_distance, mean_cost};

use super::construction::TourConstructor;
use super::convergence::ConvergenceTracker;
use super::pheromone::PheromoneMatrix;

/// Drives the colony one iteration at a time. Owns the pheromone matrix;
/// ants only ever see it through a shared borrow.
#[derive(Debug, Clone)]
pub struct AntColony {
    config: AcoConfig,
    nodes: Vec<Node>,
    start: usize,
    end: usize,
    distances: DistanceMatrix,
    pheromones: PheromoneMatrix,
    rng: ChaCha8Rng,
    state: RunState,
    tracker: ConvergenceTracker,
}

impl AntColony {
    /// Validate everything up front; a colony that builds can always iterate.
    pub fn new(nodes: &[Node], start_id: usize, end_id: usize, config: AcoConfig) -> AcoResult<Self> {
        config.validate()?;
        let distances = DistanceMatrix::from_nodes(nodes)?;

        let mut seen = HashSet::with_capacity(nodes.len());
        if let Some(dup) = nodes.iter().find(|node| !seen.insert(node.id)) {
            return Err(AcoError::input(format!("duplicate node id {}", dup.id)));
        }

        let start = index_of(nodes, start_id, "start")?;
        let end = index_of(nodes, end_id, "end")?;
        if start == end {
            return Err(AcoError::input(format!(
                "start and end must differ, both are node {start_id}"
            )));
        }

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            "Colony ready: {} nodes, {} ants, start {} -> end {}",
            nodes.len(),
            config.num_ants,
            start_id,
            end_id
        );
        distances.log_rows();

        Ok(AntColony {
            pheromones: PheromoneMatrix::new(nodes.len(), config.initial_pheromone),
            config,
            nodes: nodes.to_vec(),
            start,
            end,
            distances,
            rng,
            state: RunState::default(),
            tracker: ConvergenceTracker::new(),
        })
    }

    /// Construct, evaporate, deposit, record. Always advances by exactly
    /// one iteration, including past `max_iterations`.
    pub fn run_one_iteration(&mut self) -> IterationRecord {
        let iteration = self.state.iteration + 1;
        let iter_span = span!(Level::DEBUG, "iteration", iter = iteration);
        let _iter_guard = iter_span.enter();

        let paths = {
            let span = span!(Level::DEBUG, "construct");
            let _g = span.enter();
            self.construct_paths()
        };
        let costs: Vec<f64> = paths
            .iter()
            .map(|path| find_distance(path, &self.distances))
            .collect();

        let degenerate_tours = self.update_pheromones(&paths, &costs);

        let best_idx = (0..costs.len())
            .min_by(|&a, &b| costs[a].total_cmp(&costs[b]))
            .unwrap_or(0);
        let best_tour = self.to_tour(&paths[best_idx], costs[best_idx]);
        let mean = mean_cost(&costs);

        debug!(
            "iteration best {:.4}, mean {:.4}, degenerate {}",
            best_tour.cost, mean, degenerate_tours
        );

        if self.state.offer(&best_tour) {
            info!(
                "New best at iteration {}: cost = {:.4}",
                iteration, best_tour.cost
            );
        }
        self.state.iteration = iteration;

        let record = IterationRecord {
            iteration,
            best_cost: best_tour.cost,
            best_tour,
            mean_cost: mean,
            best_so_far_cost: self.state.best_cost(),
            degenerate_tours,
        };
        self.tracker.record(record.clone());
        record
    }

    /// Run until `max_iterations` iterations have been performed in total.
    pub fn run_to_completion(&mut self) -> Option<&Tour> {
        let loop_span = span!(
            Level::INFO,
            "colony_run",
            total_iterations = self.config.max_iterations
        );
        let _loop_guard = loop_span.enter();

        while !self.is_complete() {
            self.run_one_iteration();
        }
        self.best_tour()
    }

    pub fn best_tour(&self) -> Option<&Tour> {
        self.state.best.as_ref()
    }

    /// `f64::INFINITY` before the first iteration.
    pub fn best_cost(&self) -> f64 {
        self.state.best_cost()
    }

    pub fn history(&self) -> &[IterationRecord] {
        self.tracker.records()
    }

    pub fn tracker(&self) -> &ConvergenceTracker {
        &self.tracker
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn iteration(&self) -> usize {
        self.state.iteration
    }

    pub fn is_complete(&self) -> bool {
        self.state.iteration >= self.config.max_iterations
    }

    /// Fraction of `max_iterations` done, capped at 1.
    pub fn progress(&self) -> f64 {
        (self.state.iteration as f64 / self.config.max_iterations as f64).min(1.0)
    }

    pub fn pheromones(&self) -> &PheromoneMatrix {
        &self.pheromones
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn config(&self) -> &AcoConfig {
        &self.config
    }

    pub fn start_id(&self) -> usize {
        self.nodes[self.start].id
    }

    pub fn end_id(&self) -> usize {
        self.nodes[self.end].id
    }

    /// One seed per ant from the master rng, then independent walks in
    /// parallel. Collecting in ant order keeps runs reproducible.
    fn construct_paths(&mut self) -> Vec<Vec<usize>> {
        let seeds: Vec<u64> = (0..self.config.num_ants).map(|_| self.rng.gen()).collect();
        let constructor = TourConstructor::new(
            &self.distances,
            &self.pheromones,
            self.config.alpha,
            self.config.beta,
        );
        let (start, end) = (self.start, self.end);

        seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                constructor.construct(start, end, &mut rng)
            })
            .collect()
    }

    /// Evaporate the whole matrix, then lay down every ant's deposit.
    /// Returns how many deposits were skipped.
    fn update_pheromones(&mut self, paths: &[Vec<usize>], costs: &[f64]) -> usize {
        self.pheromones.evaporate(self.config.evaporation_rate);

        let mut degenerate = 0;
        for (path, &cost) in paths.iter().zip(costs) {
            if let Err(warning) = self
                .pheromones
                .deposit(path, cost, self.config.deposit_factor)
            {
                warn!("{}", warning);
                degenerate += 1;
            }
        }
        degenerate
    }

    fn to_tour(&self, path: &[usize], cost: f64) -> Tour {
        Tour {
            node_ids: path.iter().map(|&i| self.nodes[i].id).collect(),
            cost,
        }
    }
}

fn index_of(nodes: &[Node], id: usize, role: &str) -> AcoResult<usize> {
    nodes
        .iter()
        .position(|node| node.id == id)
        .ok_or_else(|| AcoError::input(format!("{role} node id {id} is not in the node set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Node> {
        (0..n)
            .map(|i| Node::new(100 + i, format!("n{i}"), i as f64, (i * i) as f64 * 0.1))
            .collect()
    }

    fn seeded(num_ants: usize, max_iterations: usize) -> AcoConfig {
        AcoConfig {
            num_ants,
            max_iterations,
            ..AcoConfig::default()
        }
        .with_seed(17)
    }

    #[test]
    fn rejects_bad_endpoints_and_ids() {
        let nodes = line(4);
        let cases = [
            AntColony::new(&nodes, 100, 100, seeded(2, 5)),
            AntColony::new(&nodes, 100, 7, seeded(2, 5)),
            AntColony::new(&nodes, 9, 103, seeded(2, 5)),
        ];
        for result in cases {
            assert!(matches!(result, Err(AcoError::InvalidInput { .. })));
        }

        let mut dup = line(3);
        dup[2].id = 100;
        assert!(matches!(
            AntColony::new(&dup, 100, 101, seeded(2, 5)),
            Err(AcoError::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_zero_ants() {
        let err = AntColony::new(&line(4), 100, 103, seeded(0, 5)).unwrap_err();
        assert!(matches!(err, AcoError::InvalidConfig { field: "num_ants", .. }));
    }

    #[test]
    fn nothing_to_report_before_first_iteration() {
        let colony = AntColony::new(&line(4), 100, 103, seeded(2, 5)).unwrap();
        assert!(colony.best_tour().is_none());
        assert_eq!(colony.best_cost(), f64::INFINITY);
        assert!(colony.history().is_empty());
        assert_eq!(colony.progress(), 0.0);
        assert_eq!(colony.start_id(), 100);
        assert_eq!(colony.end_id(), 103);
    }

    #[test]
    fn iteration_records_use_node_ids() {
        let mut colony = AntColony::new(&line(5), 102, 100, seeded(4, 3)).unwrap();
        let record = colony.run_one_iteration();
        assert_eq!(record.iteration, 1);
        assert_eq!(record.best_tour.start(), Some(102));
        assert_eq!(record.best_tour.end(), Some(100));
        assert!(record.mean_cost >= record.best_cost);
        assert_eq!(record.best_so_far_cost, record.best_cost);
        assert_eq!(record.degenerate_tours, 0);
        assert_eq!(colony.history().len(), 1);
    }

    #[test]
    fn pheromone_update_follows_evaporate_then_deposit() {
        let nodes = line(3);
        let config = AcoConfig {
            evaporation_rate: 0.5,
            deposit_factor: 10.0,
            initial_pheromone: 2.0,
            ..seeded(1, 1)
        };
        let mut colony = AntColony::new(&nodes, 100, 102, config).unwrap();
        let record = colony.run_one_iteration();
        // Only path is 100 -> 101 -> 102.
        let delta = 10.0 / record.best_cost;
        let tau = colony.pheromones();
        assert!((tau.intensity(0, 1) - (1.0 + delta)).abs() < 1e-9);
        assert!((tau.intensity(2, 1) - (1.0 + delta)).abs() < 1e-9);
        assert!((tau.intensity(0, 2) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_nodes_count_degenerate_tours() {
        let nodes = vec![
            Node::new(1, "a", 3.0, 3.0),
            Node::new(2, "b", 3.0, 3.0),
            Node::new(3, "c", 3.0, 3.0),
        ];
        let mut colony = AntColony::new(&nodes, 1, 3, seeded(3, 2)).unwrap();
        let record = colony.run_one_iteration();
        assert_eq!(record.best_cost, 0.0);
        assert_eq!(record.degenerate_tours, 3);
        assert_eq!(colony.best_tour().map(|t| t.len()), Some(3));
    }

    #[test]
    fn run_to_completion_stops_at_max_iterations() {
        let mut colony = AntColony::new(&line(6), 100, 105, seeded(3, 7)).unwrap();
        assert!(colony.run_to_completion().is_some());
        assert_eq!(colony.iteration(), 7);
        assert!(colony.is_complete());
        assert_eq!(colony.progress(), 1.0);
        colony.run_one_iteration();
        assert_eq!(colony.history().len(), 8);
        assert_eq!(colony.progress(), 1.0);
    }
}
