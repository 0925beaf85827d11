// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use eikonal_front::core::{CostMap, Grid, Point};
use eikonal_front::engine::PropagationEngine;
use eikonal_front::error::FrontError;
use eikonal_front::io::format_grid;
use eikonal_front::harness::{run_variants, Variant};
use eikonal_front::neighborhood::{GridNeighborhood, NeighborhoodPolicy, Topology};
use eikonal_front::transit::{EdgeTransit, SimplexTransit, TransitKind, TransitPolicy};

const SQRT_2: f64 = std::f64::consts::SQRT_2;

fn default_grid() -> Grid {
    Grid::new(1.0, Point::new(-5.0, -5.0), Point::new(15.0, 15.0)).unwrap()
}

fn square_grid(half_width: f64) -> Grid {
    Grid::new(
        1.0,
        Point::new(-half_width, -half_width),
        Point::new(half_width, half_width),
    )
    .unwrap()
}

fn origin() -> Point {
    Point::new(0.0, 0.0)
}

/// Run a variant until the whole grid is costed.
fn exhaust(variant: Variant, grid: Grid, eps: f64) -> CostMap {
    let (rows, cols) = grid.shape().unwrap();
    let cells = rows * cols;
    variant.engine(grid, eps).unwrap().run(origin(), cells).unwrap()
}

/// Mean absolute deviation from the Euclidean distance to the origin.
fn mean_error(costs: &CostMap) -> f64 {
    let total: f64 = costs
        .iter()
        .map(|(p, c)| (c - p.distance(&origin())).abs())
        .sum();
    total / costs.len() as f64
}

/// Zero iterations: only the seed, at cost 0.
#[test]
fn zero_iterations_yield_seed_only() {
    for variant in Variant::STANDARD {
        let costs = variant.engine(default_grid(), 0.01).unwrap().run(origin(), 0).unwrap();
        assert_eq!(costs.len(), 1, "{}", variant);
        assert_eq!(costs[&origin()], 0.0);
    }
}

/// One Dijkstra iteration on the 4-neighborhood costs exactly the four axis neighbors.
#[test]
fn one_quad_edge_iteration() {
    let variant = Variant::new(Topology::Quad, TransitKind::Edge);
    let costs = variant.engine(square_grid(5.0), 0.01).unwrap().run(origin(), 1).unwrap();

    let mut expected = CostMap::new();
    expected.insert(origin(), 0.0);
    for (x, y) in [(1.0, 0.0), (0.0, -1.0), (-1.0, 0.0), (0.0, 1.0)] {
        expected.insert(Point::new(x, y), 1.0);
    }
    assert_eq!(costs, expected);
}

/// One Dijkstra iteration on the 8-neighborhood: axes at 1, diagonals at sqrt(2).
#[test]
fn one_octo_edge_iteration() {
    let variant = Variant::new(Topology::Octo, TransitKind::Edge);
    let costs = variant.engine(default_grid(), 0.01).unwrap().run(origin(), 1).unwrap();

    assert_eq!(costs.len(), 9);
    for (x, y) in [(1.0, 0.0), (0.0, -1.0), (-1.0, 0.0), (0.0, 1.0)] {
        assert_eq!(costs[&Point::new(x, y)], 1.0);
    }
    for (x, y) in [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)] {
        assert!((costs[&Point::new(x, y)] - SQRT_2).abs() < 1e-12);
    }
}

/// With the seed as the lone costed neighbor, simplex transit is a plain hop.
#[test]
fn first_simplex_iteration_matches_dijkstra_on_quad() {
    let grid = default_grid();
    let edge = Variant::new(Topology::Quad, TransitKind::Edge)
        .engine(grid, 0.01)
        .unwrap()
        .run(origin(), 1)
        .unwrap();
    let simplex = Variant::new(Topology::Quad, TransitKind::Simplex)
        .engine(grid, 0.01)
        .unwrap()
        .run(origin(), 1)
        .unwrap();
    assert_eq!(edge, simplex);
}

/// Two runs with the same configuration produce identical maps.
#[test]
fn runs_are_repeatable() {
    for variant in Variant::STANDARD {
        let engine = variant.engine(default_grid(), 0.01).unwrap();
        let first = engine.run(origin(), 300).unwrap();
        let second = engine.run(origin(), 300).unwrap();
        assert_eq!(first, second, "{}", variant);
    }
}

/// Interior points have 4 or 8 neighbors, fewer on the border.
#[test]
fn neighborhood_sizes() {
    let grid = default_grid();
    let quad = GridNeighborhood::quad(grid);
    let octo = GridNeighborhood::octo(grid);

    assert_eq!(quad.neighbors(Point::new(3.0, 4.0)).len(), 4);
    assert_eq!(octo.neighbors(Point::new(3.0, 4.0)).len(), 8);
    // Edge of the grid.
    assert_eq!(quad.neighbors(Point::new(-5.0, 4.0)).len(), 3);
    assert_eq!(octo.neighbors(Point::new(-5.0, 4.0)).len(), 5);
    // Corner.
    assert_eq!(quad.neighbors(Point::new(15.0, 15.0)).len(), 2);
    assert_eq!(octo.neighbors(Point::new(15.0, 15.0)).len(), 3);
}

/// No run accepts more points than requested, and every costed point lies on the grid.
#[test]
fn costed_points_stay_on_grid() {
    let grid = default_grid();
    for variant in Variant::STANDARD {
        let costs = variant.engine(grid, 0.01).unwrap().run(origin(), 300).unwrap();
        assert!(costs.keys().all(|p| grid.contains(p)), "{}", variant);
        // 300 accepted points plus their open neighbors.
        assert!(costs.len() > 300, "{}", variant);
        assert!(costs.values().all(|c| c.is_finite() && *c >= 0.0));
    }
}

/// Running past the number of cells stops when the frontier empties.
#[test]
fn exhaustion_costs_every_cell() {
    let grid = square_grid(4.0);
    for variant in Variant::STANDARD {
        let costs = variant.engine(grid, 0.05).unwrap().run(origin(), 10_000).unwrap();
        assert_eq!(costs.len(), 81, "{}", variant);
    }
}

/// Dijkstra on the 4-grid measures the Manhattan distance.
#[test]
fn quad_dijkstra_is_manhattan() {
    let costs = exhaust(Variant::new(Topology::Quad, TransitKind::Edge), square_grid(6.0), 0.01);
    for (p, c) in &costs {
        assert_eq!(*c, p.x.abs() + p.y.abs(), "at {}", p);
    }
}

/// Dijkstra on the 8-grid measures the octile distance.
#[test]
fn octo_dijkstra_is_octile() {
    let costs = exhaust(Variant::new(Topology::Octo, TransitKind::Edge), square_grid(6.0), 0.01);
    for (p, c) in &costs {
        let (a, b) = (p.x.abs(), p.y.abs());
        let octile = SQRT_2 * a.min(b) + (a - b).abs();
        assert!((c - octile).abs() < 1e-9, "at {}: {} vs {}", p, c, octile);
    }
}

/// Interpolated costs never undercut the straight-line distance, and fast
/// marching tracks it more closely than Dijkstra on both topologies.
#[test]
fn fast_marching_is_closer_to_euclidean() {
    let grid = square_grid(10.0);
    for topology in [Topology::Quad, Topology::Octo] {
        let edge = exhaust(Variant::new(topology, TransitKind::Edge), grid, 0.01);
        let simplex = exhaust(Variant::new(topology, TransitKind::Simplex), grid, 0.01);

        for costs in [&edge, &simplex] {
            for (p, c) in costs {
                assert!(*c >= p.distance(&origin()) - 1e-9, "{}: {} at {}", topology, c, p);
            }
        }
        let (edge_err, simplex_err) = (mean_error(&edge), mean_error(&simplex));
        assert!(
            simplex_err < edge_err,
            "{}: fast marching error {} not below Dijkstra error {}",
            topology,
            simplex_err,
            edge_err
        );
    }
}

/// Sampling an edge only at its ends reduces simplex transit to edge transit.
#[test]
fn unit_eps_simplex_is_dijkstra() {
    let grid = square_grid(5.0);
    for topology in [Topology::Quad, Topology::Octo] {
        let edge = exhaust(Variant::new(topology, TransitKind::Edge), grid, 1.0);
        let simplex = exhaust(Variant::new(topology, TransitKind::Simplex), grid, 1.0);
        assert_eq!(edge, simplex, "{}", topology);
    }
}

/// A finer sampling never gives a higher transit cost.
#[test]
fn finer_eps_lowers_transit_cost() {
    let p = origin();
    let neighbors = [Point::new(1.0, 0.0), Point::new(0.0, -1.0)];
    let mut costs = CostMap::new();
    costs.insert(neighbors[0], 1.0);
    costs.insert(neighbors[1], 1.3);

    let cost = |eps: f64| SimplexTransit::new(eps).unwrap().transit(p, &neighbors, &costs).unwrap();
    let hop = EdgeTransit.transit(p, &neighbors, &costs).unwrap();

    let (coarse, fine, finest) = (cost(0.1), cost(0.01), cost(0.001));
    assert!(coarse < hop);
    assert!(fine <= coarse + 1e-12);
    assert!(finest <= fine + 1e-12);
}

/// Custom policies plug in as closures.
#[test]
fn closure_policies() {
    // A 1D line of unit-spaced points from 0 to 10.
    let line = |p: Point| -> Vec<Point> {
        [p.x - 1.0, p.x + 1.0]
            .into_iter()
            .filter(|x| (0.0..=10.0).contains(x))
            .map(|x| Point::new(x, 0.0))
            .collect()
    };
    // Every hop costs double its length.
    let doubled = |p: Point, neighbors: &[Point], costs: &CostMap| {
        EdgeTransit
            .transit(p, neighbors, costs)
            .map(|c| c + neighbors.iter().map(|n| p.distance(n)).fold(f64::INFINITY, f64::min))
    };
    let engine = PropagationEngine::new(line, doubled);
    let costs = engine.run(Point::new(0.0, 0.0), 100).unwrap();

    assert_eq!(costs.len(), 11);
    for (p, c) in &costs {
        assert_eq!(*c, 2.0 * p.x, "at {}", p);
    }
}

/// Policies can be borrowed, or boxed and chosen at runtime.
#[test]
fn borrowed_and_boxed_policies() {
    let grid = default_grid();
    let hood = GridNeighborhood::octo(grid);
    let simplex = SimplexTransit::new(0.01).unwrap();
    let expected = PropagationEngine::new(hood.clone(), simplex)
        .run(origin(), 150)
        .unwrap();

    let borrowed = PropagationEngine::new(&hood, &simplex);
    assert_eq!(borrowed.run(origin(), 150).unwrap(), expected);
    assert_eq!(borrowed.neighborhood().grid().step(), 1.0);
    assert_eq!(borrowed.transit().eps(), 0.01);

    for use_simplex in [false, true] {
        let transit: Box<dyn TransitPolicy> = if use_simplex {
            Box::new(simplex)
        } else {
            Box::new(EdgeTransit)
        };
        let neighborhood: Box<dyn NeighborhoodPolicy> = Box::new(hood.clone());
        let boxed = PropagationEngine::new(neighborhood, transit);
        let costs = boxed.run(origin(), 150).unwrap();
        if use_simplex {
            assert_eq!(costs, expected);
        } else {
            let edge = PropagationEngine::new(&hood, EdgeTransit).run(origin(), 150).unwrap();
            assert_eq!(costs, edge);
        }
    }
}

/// Finite sampling steps too small to advance the sample position are refused.
#[test]
fn sub_epsilon_sampling_is_refused() {
    assert!(matches!(
        SimplexTransit::new(1e-17),
        Err(FrontError::InvalidEpsilon(_))
    ));
    assert!(matches!(
        Variant::new(Topology::Octo, TransitKind::Simplex).engine(default_grid(), 1e-17),
        Err(FrontError::InvalidEpsilon(_))
    ));
}

/// A grid too fine to lay out still propagates, but is not printed.
#[test]
fn fine_grid_propagates_but_is_not_printed() {
    let fine = Grid::new(1e-300, Point::new(0.0, 0.0), Point::new(1.0, 1.0)).unwrap();
    let engine = Variant::new(Topology::Quad, TransitKind::Edge).engine(fine, 0.01).unwrap();
    let costs = engine.run(origin(), 1).unwrap();
    assert_eq!(costs.len(), 3);
    assert!(costs.contains_key(&Point::new(1e-300, 0.0)));
    assert!(costs.contains_key(&Point::new(0.0, 1e-300)));
    assert!(matches!(
        format_grid(&costs, &fine),
        Err(FrontError::GridTooLarge { .. })
    ));
}

/// Simplex transit refuses neighborhoods that cannot form a simplex edge.
#[test]
fn simplex_on_single_neighbor_chain_fails() {
    let chain = |p: Point| -> Vec<Point> {
        if p.x < 3.0 {
            vec![Point::new(p.x + 1.0, 0.0)]
        } else {
            Vec::new()
        }
    };
    let engine = PropagationEngine::new(chain, SimplexTransit::new(0.01).unwrap());
    let result = engine.run(Point::new(0.0, 0.0), 10);
    assert!(matches!(
        result,
        Err(FrontError::DegenerateNeighborhood { count: 1, .. })
    ));
}

/// An engine is shared read-only by concurrent runs.
#[test]
fn shared_engine_across_threads() {
    let engine = Variant::new(Topology::Octo, TransitKind::Simplex)
        .engine(default_grid(), 0.01)
        .unwrap();
    let reference = engine.run(origin(), 200).unwrap();

    let results: Vec<CostMap> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| engine.run(origin(), 200).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for costs in results {
        assert_eq!(costs, reference);
    }
}

/// Concurrent variant runs agree with the standalone engines.
#[test]
fn run_variants_matches_engines() {
    let grid = default_grid();
    let results = run_variants(grid, 0.01, &Variant::STANDARD, origin(), 300, Some(2)).unwrap();
    assert_eq!(results.len(), 4);
    for (variant, costs) in results {
        let expected = variant.engine(grid, 0.01).unwrap().run(origin(), 300).unwrap();
        assert_eq!(costs, expected, "{}", variant);
    }
}

/// Invalid configuration is reported before any propagation.
#[test]
fn invalid_configuration() {
    assert!(matches!(
        Grid::new(0.0, Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
        Err(FrontError::InvalidGridStep(_))
    ));
    assert!(matches!(
        Grid::new(1.0, Point::new(2.0, 0.0), Point::new(1.0, 1.0)),
        Err(FrontError::InvalidBounds { .. })
    ));
    assert!(matches!(
        Variant::new(Topology::Quad, TransitKind::Simplex).engine(default_grid(), 0.0),
        Err(FrontError::InvalidEpsilon(_))
    ));
    // Edge transit ignores eps.
    assert!(Variant::new(Topology::Quad, TransitKind::Edge)
        .engine(default_grid(), 0.0)
        .is_ok());
    assert!(matches!(
        run_variants(default_grid(), 0.01, &Variant::STANDARD, Point::new(-6.0, 0.0), 10, None),
        Err(FrontError::InvalidSeed { .. })
    ));
}
