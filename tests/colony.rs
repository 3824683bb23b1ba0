use aco_path::fixtures::data_generator::{generate_random_nodes, unit_square};
use aco_path::{AcoConfig, AcoError, AntColony, Node, Tour};

fn seeded(num_ants: usize, max_iterations: usize, seed: u64) -> AcoConfig {
    AcoConfig {
        num_ants,
        max_iterations,
        ..AcoConfig::default()
    }
    .with_seed(seed)
}

fn assert_valid_tour(tour: &Tour, nodes: &[Node], start: usize, end: usize) {
    assert_eq!(tour.len(), nodes.len());
    assert_eq!(tour.start(), Some(start));
    assert_eq!(tour.end(), Some(end));
    let mut ids = tour.node_ids.clone();
    ids.sort_unstable();
    let mut expected: Vec<usize> = nodes.iter().map(|n| n.id).collect();
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[test]
fn unit_square_converges_to_shortest_open_path() {
    // Both Hamiltonian paths 0-1-3-2 and 0-3-1-2 cost 1 + sqrt(2) + 1.
    let expected = 2.0 + 2f64.sqrt();
    let mut colony = AntColony::new(&unit_square(), 0, 2, seeded(10, 50, 2024)).unwrap();

    let best = colony.run_to_completion().cloned().unwrap();
    assert!((best.cost - expected).abs() < 1e-9, "best cost {}", best.cost);
    assert!(best.node_ids == vec![0, 1, 3, 2] || best.node_ids == vec![0, 3, 1, 2]);
    assert_eq!(colony.history().len(), 50);
}

#[test]
fn finds_the_straight_walk_along_a_line() {
    // Input order is scrambled; the optimum visits them by latitude.
    let nodes: Vec<Node> = [4usize, 0, 6, 2, 7, 1, 5, 3]
        .iter()
        .map(|&k| Node::new(10 + k, format!("p{k}"), k as f64, 0.0))
        .collect();
    let mut colony = AntColony::new(&nodes, 10, 17, seeded(10, 40, 8)).unwrap();

    let best = colony.run_to_completion().cloned().unwrap();
    assert!((best.cost - 7.0).abs() < 1e-9, "best cost {}", best.cost);
    assert_eq!(best.node_ids, (10..18).collect::<Vec<_>>());
}

#[test]
fn single_node_is_invalid_input() {
    let nodes = vec![Node::new(0, "alone", 1.0, 1.0)];
    let err = AntColony::new(&nodes, 0, 0, AcoConfig::default()).unwrap_err();
    assert!(matches!(err, AcoError::InvalidInput { .. }), "{err}");
}

#[test]
fn full_evaporation_is_invalid_config() {
    let config = AcoConfig {
        evaporation_rate: 1.0,
        ..AcoConfig::default()
    };
    let err = AntColony::new(&unit_square(), 0, 2, config).unwrap_err();
    assert!(matches!(
        err,
        AcoError::InvalidConfig {
            field: "evaporation_rate",
            ..
        }
    ));
}

#[test]
fn non_finite_coordinates_are_invalid_input() {
    let mut nodes = unit_square();
    nodes[1].lat = f64::INFINITY;
    assert!(matches!(
        AntColony::new(&nodes, 0, 2, AcoConfig::default()),
        Err(AcoError::InvalidInput { .. })
    ));
}

#[test]
fn every_tour_is_a_valid_open_path() {
    let nodes = generate_random_nodes(20, 3, (0.0, 10.0), (0.0, 10.0));
    let configs = [
        seeded(5, 10, 1),
        AcoConfig { alpha: 0.0, ..seeded(5, 10, 2) },
        AcoConfig { beta: 0.0, ..seeded(5, 10, 3) },
        AcoConfig { evaporation_rate: 0.0, deposit_factor: 0.0, ..seeded(5, 10, 4) },
        AcoConfig { alpha: 4.0, beta: 9.0, initial_pheromone: 1e-3, ..seeded(5, 10, 5) },
    ];
    for config in configs {
        let mut colony = AntColony::new(&nodes, 7, 12, config).unwrap();
        for _ in 0..10 {
            let record = colony.run_one_iteration();
            assert_valid_tour(&record.best_tour, &nodes, 7, 12);
        }
        assert_valid_tour(colony.best_tour().unwrap(), &nodes, 7, 12);
    }
}

#[test]
fn best_cost_never_increases() {
    let nodes = generate_random_nodes(25, 11, (0.0, 100.0), (0.0, 100.0));
    let mut colony = AntColony::new(&nodes, 0, 24, seeded(8, 60, 99)).unwrap();

    let mut previous = f64::INFINITY;
    for _ in 0..60 {
        let record = colony.run_one_iteration();
        let best = colony.best_cost();
        assert!(best <= previous);
        assert!(best <= record.best_cost);
        assert_eq!(best, record.best_so_far_cost);
        previous = best;
    }

    let so_far: Vec<f64> = colony.history().iter().map(|r| r.best_so_far_cost).collect();
    assert!(so_far.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(colony.tracker().best_cost(), Some(colony.best_cost()));
}

#[test]
fn single_ant_runs_are_reproducible_with_a_seed() {
    let nodes = generate_random_nodes(15, 4, (0.0, 1.0), (0.0, 1.0));
    let run = || {
        let mut colony = AntColony::new(&nodes, 3, 9, seeded(1, 20, 1234)).unwrap();
        (0..20)
            .map(|_| colony.run_one_iteration().best_tour)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn many_ant_runs_are_reproducible_with_a_seed() {
    let nodes = generate_random_nodes(18, 6, (0.0, 1.0), (0.0, 1.0));
    let run = || {
        let mut colony = AntColony::new(&nodes, 0, 17, seeded(16, 15, 77)).unwrap();
        colony.run_to_completion();
        colony.history().to_vec()
    };
    assert_eq!(run(), run());
}

#[test]
fn reading_the_best_tour_has_no_side_effects() {
    let nodes = generate_random_nodes(10, 9, (0.0, 1.0), (0.0, 1.0));
    let mut colony = AntColony::new(&nodes, 0, 9, seeded(4, 10, 5)).unwrap();
    colony.run_one_iteration();

    let first = colony.best_tour().cloned();
    let second = colony.best_tour().cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(colony.history().len(), 1);
    assert_eq!(colony.iteration(), 1);
}
