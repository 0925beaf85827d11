// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::core::{CostMap, Grid, Point};
use crate::engine::PropagationEngine;
use crate::error::{FrontError, Result};
use crate::neighborhood::{GridNeighborhood, NeighborhoodPolicy, Topology};
use crate::transit::{Transit, TransitKind, TransitPolicy};

/// A neighborhood topology paired with a transit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    /// Grid connectivity.
    pub topology: Topology,
    /// Transit computation.
    pub transit: TransitKind,
}

impl Variant {
    /// Dijkstra and Fast Marching on 4- and 8-connected grids.
    pub const STANDARD: [Variant; 4] = [
        Variant::new(Topology::Quad, TransitKind::Edge),
        Variant::new(Topology::Quad, TransitKind::Simplex),
        Variant::new(Topology::Octo, TransitKind::Edge),
        Variant::new(Topology::Octo, TransitKind::Simplex),
    ];

    /// Pair a topology with a transit kind.
    pub const fn new(topology: Topology, transit: TransitKind) -> Self {
        Variant { topology, transit }
    }

    /// Build the engine of this variant on `grid`; `eps` only matters for simplex transit.
    ///
    /// # Errors
    /// Returns an error if `eps` is invalid for a simplex transit.
    pub fn engine(&self, grid: Grid, eps: f64) -> Result<PropagationEngine<GridNeighborhood, Transit>> {
        Ok(PropagationEngine::new(
            GridNeighborhood::from_topology(grid, self.topology),
            Transit::new(self.transit, eps)?,
        ))
    }

    /// Short identifier usable in file names, e.g. `edge_quad`.
    pub fn slug(&self) -> String {
        let transit = match self.transit {
            TransitKind::Edge => "edge",
            TransitKind::Simplex => "simplex",
        };
        let topology = match self.topology {
            Topology::Quad => "quad",
            Topology::Octo => "octo",
        };
        format!("{}_{}", transit, topology)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.transit, self.topology)
    }
}

/// Wall-clock statistics over repeated runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    /// Number of runs measured.
    pub trials: usize,
    /// Mean run time.
    pub mean: Duration,
    /// Sample standard deviation of the run time.
    pub std_dev: Duration,
}

impl fmt::Display for TimingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean time: {:.9} s, sd: {:.9} s ({} trials)",
            self.mean.as_secs_f64(),
            self.std_dev.as_secs_f64(),
            self.trials
        )
    }
}

/// Time `trials` independent runs of `engine` from `seed`.
///
/// Each trial allocates a fresh cost map and frontier.
///
/// # Errors
/// Returns an error if `trials < 2` or if any run fails.
pub fn evaluate<N, T>(
    engine: &PropagationEngine<N, T>,
    seed: Point,
    iterations: usize,
    trials: usize,
) -> Result<TimingStats>
where
    N: NeighborhoodPolicy,
    T: TransitPolicy,
{
    if trials < 2 {
        return Err(FrontError::InvalidTrials(trials));
    }

    // Welford's online mean and variance, in seconds.
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for t in 0..trials {
        let start = Instant::now();
        let costs = engine.run(seed, iterations)?;
        let secs = start.elapsed().as_secs_f64();
        drop(costs);

        let delta = secs - mean;
        mean += delta / (t + 1) as f64;
        m2 += delta * (secs - mean);
    }
    let variance = m2 / (trials - 1) as f64;

    let stats = TimingStats {
        trials,
        mean: Duration::from_secs_f64(mean),
        std_dev: Duration::from_secs_f64(variance.max(0.0).sqrt()),
    };
    tracing::debug!(
        trials,
        mean_s = stats.mean.as_secs_f64(),
        sd_s = stats.std_dev.as_secs_f64(),
        "evaluation finished"
    );
    Ok(stats)
}

/// Run every variant from `seed` on `grid`, returning the cost maps in the
/// order of `variants`.
///
/// Variants run concurrently on a dedicated pool of `threads` workers
/// (default: number of available cores). Each run owns its state, so the
/// results do not depend on the thread count.
///
/// # Errors
/// Returns the first error among the runs, or an error if the pool cannot be built.
pub fn run_variants(
    grid: Grid,
    eps: f64,
    variants: &[Variant],
    seed: Point,
    iterations: usize,
    threads: Option<usize>,
) -> Result<Vec<(Variant, CostMap)>> {
    grid.check_seed(&seed)?;
    let engines = variants
        .iter()
        .map(|v| v.engine(grid, eps).map(|e| (*v, e)))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|e| FrontError::Other(e.to_string()))?;

    pool.install(|| {
        engines
            .par_iter()
            .map(|(variant, engine)| {
                tracing::info!(%variant, %seed, iterations, "running variant");
                engine.run(seed, iterations).map(|costs| (*variant, costs))
            })
            .collect()
    })
}
