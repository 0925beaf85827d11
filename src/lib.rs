// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! Single-seed front propagation over implicit 2D grids.
//!
//! A cost front grows from a seed point, one cheapest open point at a time,
//! driven by a priority queue. What a "neighbor" is and how the cost of
//! reaching a point is computed are pluggable: a grid neighborhood with edge
//! transit gives Dijkstra's algorithm, while simplex transit interpolates
//! across neighbor edges and approximates the Fast Marching Method for the
//! eikonal equation |∇u| = 1.

#![warn(missing_docs)]

/// Points, cost maps and grid geometry.
pub mod core;
/// The propagation engine.
pub mod engine;
/// Error types for the library.
pub mod error;
/// Timing trials and concurrent variant runs.
pub mod harness;
/// Text printing and file export of cost maps.
pub mod io;
/// Neighborhood policies.
pub mod neighborhood;
/// Transit policies.
pub mod transit;

pub use crate::core::{has_cost, neighbors_grid, CostMap, Grid, Point};
pub use crate::engine::{ProgressInfo, PropagationEngine};
pub use crate::error::{FrontError, Result};
pub use crate::harness::{TimingStats, Variant};
pub use crate::neighborhood::{GridNeighborhood, NeighborhoodPolicy, Topology};
pub use crate::transit::{EdgeTransit, SimplexTransit, Transit, TransitKind, TransitPolicy};
