use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn new(id: usize, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Node {
            id,
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// A complete open path: every node id once, start first, end last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub node_ids: Vec<usize>,
    pub cost: f64,
}

impl Tour {
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn start(&self) -> Option<usize> {
        self.node_ids.first().copied()
    }

    pub fn end(&self) -> Option<usize> {
        self.node_ids.last().copied()
    }

    /// Consecutive (from, to) id pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.node_ids.iter().copied().tuple_windows()
    }

    /// 1-based visit order of `id`, as shown next to each node on a map.
    pub fn position_of(&self, id: usize) -> Option<usize> {
        self.node_ids.iter().position(|&x| x == id).map(|p| p + 1)
    }

    /// Node names in visit order, joined with arrows. Unknown ids print as `#id`.
    pub fn labels(&self, nodes: &[Node]) -> String {
        self.node_ids
            .iter()
            .map(|id| match nodes.iter().find(|n| n.id == *id) {
                Some(node) => node.name.clone(),
                None => format!("#{id}"),
            })
            .join(" -> ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based.
    pub iteration: usize,
    pub best_tour: Tour,
    pub best_cost: f64,
    pub mean_cost: f64,
    /// Best cost across all iterations up to and including this one.
    pub best_so_far_cost: f64,
    /// Tours whose deposit was skipped this iteration.
    pub degenerate_tours: usize,
}

/// Best solution seen so far. Its cost never increases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    pub best: Option<Tour>,
    pub iteration: usize,
}

impl RunState {
    pub fn best_cost(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |t| t.cost)
    }

    /// Replace the best tour only on strict improvement.
    pub fn offer(&mut self, candidate: &Tour) -> bool {
        if candidate.cost < self.best_cost() {
            self.best = Some(candidate.clone());
            true
        } else {
            false
        }
    }
}
