// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use crate::core::{Grid, Point};
use crate::error::{FrontError, Result};

/// Axis-aligned directions, clockwise from east.
pub const QUAD_DIRECTIONS: [Point; 4] = [
    Point::new(1.0, 0.0),
    Point::new(0.0, -1.0),
    Point::new(-1.0, 0.0),
    Point::new(0.0, 1.0),
];

/// Axis-aligned and diagonal directions, clockwise from east.
pub const OCTO_DIRECTIONS: [Point; 8] = [
    Point::new(1.0, 0.0),
    Point::new(1.0, -1.0),
    Point::new(0.0, -1.0),
    Point::new(-1.0, -1.0),
    Point::new(-1.0, 0.0),
    Point::new(-1.0, 1.0),
    Point::new(0.0, 1.0),
    Point::new(1.0, 1.0),
];

/// Produces the ordered neighbors of a point.
///
/// Implementations must be pure: the same point always yields the same
/// sequence. Consecutive entries (wrapping last to first) are treated as
/// triangle edges by simplex transit, so the order must go around the point.
pub trait NeighborhoodPolicy {
    /// Ordered neighbors of `p`.
    fn neighbors(&self, p: Point) -> Vec<Point>;
}

impl<F> NeighborhoodPolicy for F
where
    F: Fn(Point) -> Vec<Point>,
{
    fn neighbors(&self, p: Point) -> Vec<Point> {
        self(p)
    }
}

impl NeighborhoodPolicy for Box<dyn NeighborhoodPolicy + '_> {
    fn neighbors(&self, p: Point) -> Vec<Point> {
        (**self).neighbors(p)
    }
}

impl NeighborhoodPolicy for &dyn NeighborhoodPolicy {
    fn neighbors(&self, p: Point) -> Vec<Point> {
        (**self).neighbors(p)
    }
}

/// Connectivity of the standard grid neighborhoods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Topology {
    /// 4-connected.
    Quad,
    /// 8-connected.
    Octo,
}

impl Topology {
    /// Clockwise unit directions of this topology.
    pub fn directions(self) -> &'static [Point] {
        match self {
            Topology::Quad => &QUAD_DIRECTIONS,
            Topology::Octo => &OCTO_DIRECTIONS,
        }
    }

    /// Number of neighbors of a point far from the boundary.
    pub fn degree(self) -> usize {
        self.directions().len()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} neighbors", self.degree())
    }
}

/// Neighborhood on an implicit grid along a fixed list of directions.
///
/// Grid parameters belong to the instance: differently configured
/// neighborhoods can coexist without affecting each other.
#[derive(Debug, Clone, PartialEq)]
pub struct GridNeighborhood {
    grid: Grid,
    directions: Vec<Point>,
}

impl GridNeighborhood {
    /// 4-connected neighborhood on `grid`.
    pub fn quad(grid: Grid) -> Self {
        Self::from_topology(grid, Topology::Quad)
    }

    /// 8-connected neighborhood on `grid`.
    pub fn octo(grid: Grid) -> Self {
        Self::from_topology(grid, Topology::Octo)
    }

    /// Standard neighborhood of the given topology on `grid`.
    pub fn from_topology(grid: Grid, topology: Topology) -> Self {
        GridNeighborhood {
            grid,
            directions: topology.directions().to_vec(),
        }
    }

    /// Neighborhood along caller-supplied directions, which should go around
    /// the point in clockwise order.
    ///
    /// # Errors
    /// Returns an error if `directions` is empty.
    pub fn with_directions(grid: Grid, directions: Vec<Point>) -> Result<Self> {
        if directions.is_empty() {
            return Err(FrontError::EmptyDirections);
        }
        Ok(GridNeighborhood { grid, directions })
    }

    /// The grid this neighborhood is restricted to.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Directions in visiting order.
    pub fn directions(&self) -> &[Point] {
        &self.directions
    }
}

impl NeighborhoodPolicy for GridNeighborhood {
    fn neighbors(&self, p: Point) -> Vec<Point> {
        self.grid.neighbors(&p, &self.directions)
    }
}

impl NeighborhoodPolicy for &GridNeighborhood {
    fn neighbors(&self, p: Point) -> Vec<Point> {
        (**self).neighbors(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(1.0, Point::new(-5.0, -5.0), Point::new(5.0, 5.0)).unwrap()
    }

    /// Signed area of the triangle (p, a, b); negative when a -> b turns clockwise around p.
    fn cross(p: Point, a: Point, b: Point) -> f64 {
        (a.x - p.x) * (b.y - p.y) - (a.y - p.y) * (b.x - p.x)
    }

    #[test]
    fn quad_interior_has_four() {
        let n = GridNeighborhood::quad(grid()).neighbors(Point::new(1.0, -2.0));
        assert_eq!(
            n,
            vec![
                Point::new(2.0, -2.0),
                Point::new(1.0, -3.0),
                Point::new(0.0, -2.0),
                Point::new(1.0, -1.0),
            ]
        );
    }

    #[test]
    fn octo_interior_has_eight() {
        let n = GridNeighborhood::octo(grid()).neighbors(Point::new(0.0, 0.0));
        assert_eq!(n.len(), 8);
        assert_eq!(n[1], Point::new(1.0, -1.0));
        assert_eq!(n[7], Point::new(1.0, 1.0));
    }

    #[test]
    fn octo_corner_has_three() {
        let n = GridNeighborhood::octo(grid()).neighbors(Point::new(-5.0, -5.0));
        assert_eq!(
            n,
            vec![
                Point::new(-4.0, -5.0),
                Point::new(-5.0, -4.0),
                Point::new(-4.0, -4.0),
            ]
        );
    }

    #[test]
    fn directions_are_clockwise() {
        let origin = Point::new(0.0, 0.0);
        for topology in [Topology::Quad, Topology::Octo] {
            let dirs = topology.directions();
            for (i, &a) in dirs.iter().enumerate() {
                let b = dirs[(i + 1) % dirs.len()];
                assert!(
                    cross(origin, a, b) < 0.0,
                    "{:?}: {} -> {} is not clockwise",
                    topology,
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn instances_do_not_share_grid_parameters() {
        let small = GridNeighborhood::quad(
            Grid::new(0.5, Point::new(0.0, 0.0), Point::new(1.0, 1.0)).unwrap(),
        );
        let large = GridNeighborhood::quad(grid());
        let p = Point::new(0.0, 0.0);
        assert_eq!(small.neighbors(p), vec![Point::new(0.5, 0.0), Point::new(0.0, 0.5)]);
        assert_eq!(large.neighbors(p).len(), 4);
    }

    #[test]
    fn custom_directions_keep_their_grid() {
        let hood = GridNeighborhood::with_directions(
            grid(),
            vec![Point::new(1.0, 0.0), Point::new(-1.0, 0.0)],
        )
        .unwrap();
        assert_eq!(hood.grid(), &grid());
        assert_eq!(hood.grid().step(), 1.0);
        assert_eq!(hood.directions().len(), 2);
        assert_eq!(
            hood.neighbors(Point::new(5.0, 0.0)),
            vec![Point::new(4.0, 0.0)]
        );
    }

    #[test]
    fn borrowed_and_boxed_delegate() {
        let hood = GridNeighborhood::octo(grid());
        let p = Point::new(-5.0, 2.0);
        let expected = hood.neighbors(p);

        fn around<N: NeighborhoodPolicy>(policy: N, p: Point) -> Vec<Point> {
            policy.neighbors(p)
        }
        assert_eq!(around(&hood, p), expected);
        let object: &dyn NeighborhoodPolicy = &hood;
        assert_eq!(around(object, p), expected);
        let boxed: Box<dyn NeighborhoodPolicy> = Box::new(hood.clone());
        assert_eq!(around(boxed, p), expected);
    }

    #[test]
    fn with_directions_rejects_empty() {
        let result = GridNeighborhood::with_directions(grid(), Vec::new());
        assert!(matches!(result, Err(FrontError::EmptyDirections)));
    }

    #[test]
    fn closure_is_a_policy() {
        let line = |p: Point| vec![Point::new(p.x + 1.0, p.y), Point::new(p.x - 1.0, p.y)];
        assert_eq!(
            line.neighbors(Point::new(0.0, 0.0)),
            vec![Point::new(1.0, 0.0), Point::new(-1.0, 0.0)]
        );
    }

    #[test]
    fn topology_display() {
        assert_eq!(Topology::Quad.to_string(), "4 neighbors");
        assert_eq!(Topology::Octo.to_string(), "8 neighbors");
    }
}
