//! Ant Colony Optimization for open-path TSP: visit every node once, from a
//! fixed start node to a fixed end node.
//!
//! Build an [`AntColony`] once per run, then step it with
//! [`AntColony::run_one_iteration`] or finish with
//! [`AntColony::run_to_completion`].

pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod solver;

pub use config::AcoConfig;
pub use distance::matrix::DistanceMatrix;
pub use domain::types::{IterationRecord, Node, RunState, Tour};
pub use error::{AcoError, AcoResult, DegenerateTour};
pub use solver::ant_colony::{AntColony, ConvergenceTracker, PheromoneMatrix, TourConstructor};
