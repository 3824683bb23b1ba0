use itertools::Itertools;

use crate::distance::matrix::DistanceMatrix;

/// Open-path cost: sum of consecutive edge distances, no closing edge.
pub fn find_distance(path: &[usize], dm: &DistanceMatrix) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(&from, &to)| dm.distance(from, to))
        .sum()
}

/// Mean of a non-empty slice of costs; `NaN` when empty.
pub fn mean_cost(costs: &[f64]) -> f64 {
    costs.iter().sum::<f64>() / costs.len() as f64
}
