// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{FrontError, Result};

/// A point of the plane.
///
/// Equality and hashing compare the exact bit patterns of both coordinates:
/// two computed points are the same key only if their floating representations
/// match bit for bit. In particular `0.0` and `-0.0` are distinct.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Arrival cost of every point reached by a propagation run.
///
/// A point absent from the map, or mapped to `+inf`, is open.
pub type CostMap = HashMap<Point, f64>;

/// Whether `p` already holds a finite cost in `costs`.
#[inline]
pub fn has_cost(p: &Point, costs: &CostMap) -> bool {
    costs.get(p).is_some_and(|c| c.is_finite())
}

/// Compute the neighbors of `p` on a grid of spacing `step` bounded by the
/// inclusive rectangle `[min, max]`.
///
/// Each direction yields the candidate `p + d * step`; candidates outside the
/// rectangle are dropped and survivors keep the order of `directions`.
pub fn neighbors_grid(
    p: &Point,
    step: f64,
    min: &Point,
    max: &Point,
    directions: &[Point],
) -> Vec<Point> {
    let mut neighbors = Vec::with_capacity(directions.len());
    for d in directions {
        let n = Point::new(p.x + d.x * step, p.y + d.y * step);
        if min.x <= n.x && n.x <= max.x && min.y <= n.y && n.y <= max.y {
            neighbors.push(n);
        }
    }
    neighbors
}

/// Largest number of `f64` cells a single allocation can hold.
const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<f64>();

/// An implicit square grid: a spacing and an inclusive bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    step: f64,
    min: Point,
    max: Point,
}

impl Grid {
    /// Create a grid with the given spacing and corners.
    ///
    /// # Parameters
    /// - `step`: Length of an orthogonal edge (must be positive and finite)
    /// - `min`: Corner with minimal coordinates
    /// - `max`: Corner with maximal coordinates (`min <= max` on both axes)
    ///
    /// # Errors
    /// Returns an error if the step is invalid, if a corner is not finite, or
    /// if the corners are not ordered componentwise.
    pub fn new(step: f64, min: Point, max: Point) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(FrontError::InvalidGridStep(step));
        }
        if !min.is_finite() || !max.is_finite() || min.x > max.x || min.y > max.y {
            return Err(FrontError::InvalidBounds { min, max });
        }
        Ok(Grid { step, min, max })
    }

    /// Grid spacing.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Corner with minimal coordinates.
    pub fn min(&self) -> Point {
        self.min
    }

    /// Corner with maximal coordinates.
    pub fn max(&self) -> Point {
        self.max
    }

    /// Whether `p` lies inside the inclusive bounding rectangle.
    pub fn contains(&self, p: &Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Neighbors of `p` along `directions`, restricted to this grid.
    pub fn neighbors(&self, p: &Point, directions: &[Point]) -> Vec<Point> {
        neighbors_grid(p, self.step, &self.min, &self.max, directions)
    }

    /// Abscissae of the grid columns, from `min.x` upward.
    ///
    /// # Errors
    /// Returns an error if the grid is too large to lay out (see [`shape`](Self::shape)).
    pub fn columns(&self) -> Result<Vec<f64>> {
        let (_, n) = self.shape()?;
        Ok((0..n).map(|i| self.min.x + i as f64 * self.step).collect())
    }

    /// Ordinates of the grid rows, from `max.y` downward.
    ///
    /// # Errors
    /// Returns an error if the grid is too large to lay out (see [`shape`](Self::shape)).
    pub fn rows(&self) -> Result<Vec<f64>> {
        let (n, _) = self.shape()?;
        Ok((0..n).map(|i| self.max.y - i as f64 * self.step).collect())
    }

    /// Number of rows and columns, checking that the whole grid can be laid
    /// out as one dense array of `f64`.
    ///
    /// # Errors
    /// Returns an error if either axis or the total cell count is too large.
    pub fn shape(&self) -> Result<(usize, usize)> {
        let rows = Self::cell_count(self.max.y - self.min.y, self.step)?;
        let cols = Self::cell_count(self.max.x - self.min.x, self.step)?;
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_CELLS => Ok((rows, cols)),
            _ => Err(FrontError::GridTooLarge {
                extent: (self.max.x - self.min.x).max(self.max.y - self.min.y),
                step: self.step,
            }),
        }
    }

    /// Check that `seed` can start a propagation on this grid.
    ///
    /// # Errors
    /// Returns an error if the seed is not finite or lies outside the bounds.
    pub fn check_seed(&self, seed: &Point) -> Result<()> {
        if !seed.is_finite() {
            return Err(FrontError::InvalidSeed {
                seed: *seed,
                reason: "coordinates must be finite".to_string(),
            });
        }
        if !self.contains(seed) {
            return Err(FrontError::InvalidSeed {
                seed: *seed,
                reason: format!("outside domain [{}, {}]", self.min, self.max),
            });
        }
        Ok(())
    }

    fn cell_count(extent: f64, step: f64) -> Result<usize> {
        // Absorb the rounding of extents that are exact multiples of the step.
        let intervals = (extent / step + 1e-9).floor();
        // Also rejects an infinite quotient.
        if !(intervals < MAX_CELLS as f64) {
            return Err(FrontError::GridTooLarge { extent, step });
        }
        Ok(intervals as usize + 1)
    }
}
