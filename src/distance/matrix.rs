use tracing::{debug, info};

use crate::domain::types::Node;
use crate::error::{AcoError, AcoResult};

/// Pairwise Euclidean distances over (lat, lon), stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for `nodes`, in the order given.
    pub fn from_nodes(nodes: &[Node]) -> AcoResult<Self> {
        if nodes.len() < 2 {
            return Err(AcoError::input(format!(
                "not enough nodes to form a path: got {}, need at least 2",
                nodes.len()
            )));
        }
        if let Some(bad) = nodes
            .iter()
            .find(|node| !node.lat.is_finite() || !node.lon.is_finite())
        {
            return Err(AcoError::input(format!(
                "node {} ({}) has non-finite coordinates ({}, {})",
                bad.id, bad.name, bad.lat, bad.lon
            )));
        }

        let n = nodes.len();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean(&nodes[i], &nodes[j]);
                cells[i * n + j] = d;
                cells[j * n + i] = d;
            }
        }

        info!("Built distance matrix for {} nodes", n);
        Ok(DistanceMatrix { n, cells })
    }

    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.cells[from * self.n + to]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.cells[from * self.n..(from + 1) * self.n]
    }

    pub fn log_rows(&self) {
        debug!("Distance matrix:");
        for i in 0..self.n {
            debug!("{:?}", self.row(i));
        }
    }
}

pub fn euclidean(a: &Node, b: &Node) -> f64 {
    let lat_diff = a.lat - b.lat;
    let lon_diff = a.lon - b.lon;
    (lat_diff * lat_diff + lon_diff * lon_diff).sqrt()
}
