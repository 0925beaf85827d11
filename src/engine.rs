// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::core::{has_cost, CostMap, Point};
use crate::error::{FrontError, Result};
use crate::neighborhood::NeighborhoodPolicy;
use crate::transit::TransitPolicy;

/// Progress information passed to the optional callback.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInfo {
    /// Number of points accepted so far.
    pub iterations: usize,
    /// Current number of entries in the frontier.
    pub frontier_size: usize,
    /// Number of points holding a cost.
    pub costed: usize,
    /// Elapsed time since the run started.
    pub elapsed: Duration,
}

/// A frontier entry: a point and the cost it held when pushed.
///
/// Costs are only ever added to the map during a run, never lowered or
/// overwritten, so the stored cost always equals a lookup in the live map.
#[derive(Debug, Clone, Copy)]
struct FrontEntry {
    cost: f64,
    point: Point,
}

impl PartialEq for FrontEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}

impl Eq for FrontEntry {}

impl PartialOrd for FrontEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontEntry {
    // Reversed so that the max-heap pops the cheapest point first. Ties are
    // left to the heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

/// Open points ordered by increasing cost.
#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<FrontEntry>,
}

impl Frontier {
    fn push(&mut self, point: Point, costs: &CostMap) {
        let cost = costs.get(&point).copied().unwrap_or(f64::INFINITY);
        self.heap.push(FrontEntry { cost, point });
    }

    fn pop(&mut self) -> Option<Point> {
        self.heap.pop().map(|entry| entry.point)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Propagates a cost front from a single seed.
///
/// The engine pairs a neighborhood with a transit. It holds no run state:
/// every call to [`run`](Self::run) allocates its own cost map and frontier,
/// so one engine can serve any number of runs, including concurrent ones
/// when its policies are `Sync`.
///
/// Costs are never revised once assigned. This departs from exact Dijkstra
/// relaxation: a point keeps the cost computed from the front as it stood
/// when the point was first reached.
pub struct PropagationEngine<N, T> {
    neighborhood: N,
    transit: T,
    progress_interval: Duration,
    progress_callback: Option<Box<dyn Fn(ProgressInfo) + Send + Sync>>,
}

impl<N, T> PropagationEngine<N, T>
where
    N: NeighborhoodPolicy,
    T: TransitPolicy,
{
    /// Create an engine from a neighborhood and a transit policy.
    pub fn new(neighborhood: N, transit: T) -> Self {
        PropagationEngine {
            neighborhood,
            transit,
            progress_interval: Duration::from_millis(500),
            progress_callback: None,
        }
    }

    /// Set a progress callback that will be invoked periodically during runs (builder method).
    pub fn with_progress(mut self, callback: Box<dyn Fn(ProgressInfo) + Send + Sync>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Set the minimum delay between two progress reports (builder method).
    /// Default is 500ms; zero reports after every iteration.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// The neighborhood policy.
    pub fn neighborhood(&self) -> &N {
        &self.neighborhood
    }

    /// The transit policy.
    pub fn transit(&self) -> &T {
        &self.transit
    }

    /// Propagate the front from `seed` for at most `iterations` accepted points.
    ///
    /// The seed gets cost 0. Each iteration accepts the cheapest open point
    /// and costs every neighbor of it that has no cost yet. The run stops
    /// early when the frontier empties.
    ///
    /// # Errors
    /// Returns an error if an accepted point has no neighbor, or if the
    /// transit policy fails for a neighbor. No partial map is returned.
    pub fn run(&self, seed: Point, iterations: usize) -> Result<CostMap> {
        self.run_with_progress(seed, iterations, None)
    }

    /// Same as [`run`](Self::run), reporting progress to `progress_cb`
    /// (overrides the builder-set callback).
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub fn run_with_progress(
        &self,
        seed: Point,
        iterations: usize,
        progress_cb: Option<&(dyn Fn(ProgressInfo) + Sync)>,
    ) -> Result<CostMap> {
        let report: Option<&(dyn Fn(ProgressInfo) + Sync)> = match progress_cb {
            Some(cb) => Some(cb),
            None => self
                .progress_callback
                .as_deref()
                .map(|cb| cb as &(dyn Fn(ProgressInfo) + Sync)),
        };

        tracing::debug!(%seed, iterations, "propagation started");
        let start_time = Instant::now();
        let mut last_progress = Duration::ZERO;

        let mut costs = CostMap::new();
        let mut front = Frontier::default();
        costs.insert(seed, 0.0);
        front.push(seed, &costs);

        let mut done = 0;
        while done < iterations {
            let Some(accepted) = front.pop() else {
                break;
            };
            tracing::trace!(%accepted, cost = costs[&accepted], "accepted");

            let around = self.neighborhood.neighbors(accepted);
            if around.is_empty() {
                return Err(FrontError::EmptyNeighborhood { point: accepted });
            }

            for n in around {
                if has_cost(&n, &costs) {
                    continue;
                }
                let ncost = self
                    .transit
                    .transit(n, &self.neighborhood.neighbors(n), &costs)?;
                tracing::trace!(point = %n, cost = ncost, "costed");
                costs.insert(n, ncost);
                front.push(n, &costs);
            }
            done += 1;

            if let Some(cb) = report {
                let elapsed = start_time.elapsed();
                if elapsed >= last_progress + self.progress_interval {
                    last_progress = elapsed;
                    cb(ProgressInfo {
                        iterations: done,
                        frontier_size: front.len(),
                        costed: costs.len(),
                        elapsed,
                    });
                }
            }
        }

        tracing::debug!(
            iterations = done,
            costed = costs.len(),
            open = front.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "propagation finished"
        );
        Ok(costs)
    }
}
