use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::types::Node;

/// `count` nodes scattered uniformly over the given (lat, lon) box.
/// Same seed, same nodes.
pub fn generate_random_nodes(
    count: usize,
    seed: u64,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
) -> Vec<Node> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let nodes: Vec<Node> = (0..count)
        .map(|id| {
            let lat = rng.gen_range(lat_range.0..lat_range.1);
            let lon = rng.gen_range(lon_range.0..lon_range.1);
            Node::new(id, format!("Node {:02}", id + 1), lat, lon)
        })
        .collect();

    info!("Generated {} random nodes (seed {})", nodes.len(), seed);
    nodes
}

/// Corners of the unit square, counter-clockwise from the origin:
/// 0 (0,0), 1 (0,1), 2 (1,1), 3 (1,0).
pub fn unit_square() -> Vec<Node> {
    vec![
        Node::new(0, "SW", 0.0, 0.0),
        Node::new(1, "NW", 0.0, 1.0),
        Node::new(2, "NE", 1.0, 1.0),
        Node::new(3, "SE", 1.0, 0.0),
    ]
}
