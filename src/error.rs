// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use crate::core::Point;

/// Errors that can occur while configuring policies, propagating a front,
/// or exporting a cost map.
#[derive(Debug)]
pub enum FrontError {
    /// Grid step is not positive and finite.
    InvalidGridStep(f64),
    /// Grid corners are not finite or not ordered componentwise.
    InvalidBounds {
        /// The corner with minimal coordinates.
        min: Point,
        /// The corner with maximal coordinates.
        max: Point,
    },
    /// Simplex sampling resolution is outside [`f64::EPSILON`, 1].
    InvalidEpsilon(f64),
    /// A neighborhood was configured without any direction.
    EmptyDirections,
    /// The grid has too many cells along an axis to be laid out.
    GridTooLarge {
        /// Extent of the grid along the offending axis.
        extent: f64,
        /// Grid spacing.
        step: f64,
    },
    /// Seed is unusable for the configured grid.
    InvalidSeed {
        /// The seed coordinates.
        seed: Point,
        /// Explanation of why it's invalid.
        reason: String,
    },
    /// Timing evaluation needs at least two trials.
    InvalidTrials(usize),
    /// The neighborhood of an accepted point is empty.
    EmptyNeighborhood {
        /// The accepted point.
        point: Point,
    },
    /// A cyclic tour of neighbor edges was requested over fewer than two neighbors.
    DegenerateNeighborhood {
        /// The point whose transit was being computed.
        point: Point,
        /// Number of neighbors that were supplied.
        count: usize,
    },
    /// A transit was computed for a point with no costed neighbor.
    NoCostedNeighbor {
        /// The point whose transit was being computed.
        point: Point,
    },
    /// Unsupported file format (unrecognized extension).
    UnsupportedFileFormat(String),
    /// I/O error occurred.
    IoError(std::io::Error),
    /// Other error with a descriptive message.
    Other(String),
}

impl fmt::Display for FrontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontError::InvalidGridStep(step) => {
                write!(
                    f,
                    "invalid grid step: {} (must be positive and finite)",
                    step
                )
            }
            FrontError::InvalidBounds { min, max } => {
                write!(
                    f,
                    "invalid grid bounds: min {} and max {} (must be finite with min <= max)",
                    min, max
                )
            }
            FrontError::InvalidEpsilon(eps) => {
                write!(f, "invalid sampling resolution: {} (must be within [f64::EPSILON, 1])", eps)
            }
            FrontError::EmptyDirections => write!(f, "neighborhood has no direction"),
            FrontError::GridTooLarge { extent, step } => {
                write!(f, "grid too large: extent {} with step {} has too many cells", extent, step)
            }
            FrontError::InvalidSeed { seed, reason } => {
                write!(f, "invalid seed at {}: {}", seed, reason)
            }
            FrontError::InvalidTrials(trials) => {
                write!(f, "invalid trial count: {} (must be >= 2)", trials)
            }
            FrontError::EmptyNeighborhood { point } => {
                write!(f, "empty neighborhood around {}", point)
            }
            FrontError::DegenerateNeighborhood { point, count } => {
                write!(
                    f,
                    "degenerate neighborhood around {}: {} neighbor(s) (need >= 2)",
                    point, count
                )
            }
            FrontError::NoCostedNeighbor { point } => {
                write!(f, "no costed neighbor to transit from at {}", point)
            }
            FrontError::UnsupportedFileFormat(ext) => {
                write!(f, "unsupported file format: {}", ext)
            }
            FrontError::IoError(e) => write!(f, "I/O error: {}", e),
            FrontError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FrontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrontError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FrontError {
    fn from(e: std::io::Error) -> Self {
        FrontError::IoError(e)
    }
}

/// Convenience type alias for Results with FrontError.
pub type Result<T> = std::result::Result<T, FrontError>;
