// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use crate::core::{has_cost, CostMap, Point};
use crate::error::{FrontError, Result};

/// Computes the cost of reaching an open point from its costed neighbors.
pub trait TransitPolicy {
    /// Minimal cost to reach `p` given its ordered `neighbors` and the costs
    /// computed so far.
    ///
    /// # Errors
    /// Returns [`FrontError::NoCostedNeighbor`] if no neighbor of `p` is costed.
    fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64>;
}

impl<F> TransitPolicy for F
where
    F: Fn(Point, &[Point], &CostMap) -> Result<f64>,
{
    fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64> {
        self(p, neighbors, costs)
    }
}

impl TransitPolicy for Box<dyn TransitPolicy + '_> {
    fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64> {
        (**self).transit(p, neighbors, costs)
    }
}

impl TransitPolicy for &dyn TransitPolicy {
    fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64> {
        (**self).transit(p, neighbors, costs)
    }
}

/// Borrowed built-in policies delegate to the policy they point to.
macro_rules! impl_transit_for_ref {
    ($($policy:ty),+) => {
        $(
            impl TransitPolicy for &$policy {
                fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64> {
                    (**self).transit(p, neighbors, costs)
                }
            }
        )+
    };
}

impl_transit_for_ref!(EdgeTransit, SimplexTransit, Transit);

/// Cost of a straight hop from the costed point `n` to `p`.
#[inline]
fn hop(p: &Point, n: &Point, costs: &CostMap) -> f64 {
    costs[n] + p.distance(n)
}

/// Consecutive pairs of `items`, closing the loop from the last back to the first.
fn tour<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> {
    items.iter().zip(items.iter().cycle().skip(1))
}

/// Transit along graph edges: the cheapest single hop from a costed neighbor.
///
/// Combined with a grid neighborhood this is Dijkstra's algorithm on the grid graph.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeTransit;

impl TransitPolicy for EdgeTransit {
    fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64> {
        let mincost = neighbors
            .iter()
            .filter(|n| has_cost(n, costs))
            .map(|n| hop(&p, n, costs))
            .fold(f64::INFINITY, f64::min);

        if mincost == f64::INFINITY {
            return Err(FrontError::NoCostedNeighbor { point: p });
        }
        Ok(mincost)
    }
}

/// Transit through the simplexes around a point.
///
/// Each pair of consecutive neighbors forms a triangle with the point; the
/// cost is minimized over positions along the opposite edge, with the cost
/// interpolated linearly between its two ends. Positions are sampled every
/// `eps` of the edge. Combined with a grid neighborhood this approximates the
/// Fast Marching Method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexTransit {
    eps: f64,
}

impl SimplexTransit {
    /// Create a simplex transit sampling each edge every `eps`.
    ///
    /// # Errors
    /// Returns an error if `eps` is not in [`f64::EPSILON`, 1]. Smaller steps
    /// would stop advancing the sample position before it reaches the far end.
    pub fn new(eps: f64) -> Result<Self> {
        if !(f64::EPSILON..=1.0).contains(&eps) {
            return Err(FrontError::InvalidEpsilon(eps));
        }
        Ok(SimplexTransit { eps })
    }

    /// Sampling resolution along an edge.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Minimal cost over the samples of the edge `[pj, pk]`, both ends costed.
    fn across_edge(&self, p: &Point, pj: &Point, pk: &Point, costs: &CostMap) -> f64 {
        let (cj, ck) = (costs[pj], costs[pk]);
        let mut mincost = f64::INFINITY;
        // Accumulated on purpose: the last sample may land just short of or
        // past 1 depending on the rounding of eps.
        let mut z = 0.0;
        while z <= 1.0 {
            let n = Point::new(z * pj.x + (1.0 - z) * pk.x, z * pj.y + (1.0 - z) * pk.y);
            let c = z * cj + (1.0 - z) * ck + p.distance(&n);
            if c < mincost {
                mincost = c;
            }
            z += self.eps;
        }
        mincost
    }
}

impl TransitPolicy for SimplexTransit {
    fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64> {
        // Fewer than two neighbors cannot form a simplex edge.
        if neighbors.len() < 2 {
            return Err(FrontError::DegenerateNeighborhood {
                point: p,
                count: neighbors.len(),
            });
        }

        let mut costed = neighbors.iter().filter(|n| has_cost(n, costs));
        let first = costed.next();
        let mut mincost = f64::INFINITY;

        match (first, costed.next()) {
            (None, _) => return Err(FrontError::NoCostedNeighbor { point: p }),
            // A lone costed neighbor (e.g. the seed) has no edge to interpolate along.
            (Some(only), None) => mincost = hop(&p, only, costs),
            (Some(_), Some(_)) => {
                for (pj, pk) in tour(neighbors) {
                    let c = match (has_cost(pj, costs), has_cost(pk, costs)) {
                        (true, true) => self.across_edge(&p, pj, pk, costs),
                        (true, false) => hop(&p, pj, costs),
                        (false, true) => hop(&p, pk, costs),
                        (false, false) => continue,
                    };
                    if c < mincost {
                        mincost = c;
                    }
                }
            }
        }

        if mincost == f64::INFINITY {
            return Err(FrontError::NoCostedNeighbor { point: p });
        }
        Ok(mincost)
    }
}

/// Which transit a propagation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TransitKind {
    /// Cheapest neighbor edge (Dijkstra).
    Edge,
    /// Interpolation across neighbor edges (Fast Marching).
    Simplex,
}

impl fmt::Display for TransitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitKind::Edge => write!(f, "Dijkstra"),
            TransitKind::Simplex => write!(f, "Fast marching"),
        }
    }
}

/// A transit chosen at runtime among the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transit {
    /// See [`EdgeTransit`].
    Edge(EdgeTransit),
    /// See [`SimplexTransit`].
    Simplex(SimplexTransit),
}

impl Transit {
    /// Build the transit of the given kind; `eps` is only used by the simplex transit.
    ///
    /// # Errors
    /// Returns an error if a simplex transit is requested with an invalid `eps`.
    pub fn new(kind: TransitKind, eps: f64) -> Result<Self> {
        match kind {
            TransitKind::Edge => Ok(Transit::Edge(EdgeTransit)),
            TransitKind::Simplex => SimplexTransit::new(eps).map(Transit::Simplex),
        }
    }

    /// The kind of this transit.
    pub fn kind(&self) -> TransitKind {
        match self {
            Transit::Edge(_) => TransitKind::Edge,
            Transit::Simplex(_) => TransitKind::Simplex,
        }
    }
}

impl TransitPolicy for Transit {
    fn transit(&self, p: Point, neighbors: &[Point], costs: &CostMap) -> Result<f64> {
        match self {
            Transit::Edge(t) => t.transit(p, neighbors, costs),
            Transit::Simplex(t) => t.transit(p, neighbors, costs),
        }
    }
}
