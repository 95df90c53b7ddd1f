//! Solver trait and configuration.

use crate::geometry::{Boundary, Geometry};
use crate::result::MarkerResult;
use crate::Result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Piece sort key for one optimizer attempt.
///
/// Every key sorts descending; the multi-strategy sweep runs the full cross
/// product of sort keys and search modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortKey {
    /// Decreasing area.
    #[default]
    Area,
    /// Decreasing bounding-box height.
    Height,
    /// Decreasing bounding-box width.
    Width,
}

impl SortKey {
    /// All sweep keys, in attempt order.
    pub fn all() -> [SortKey; 3] {
        [SortKey::Area, SortKey::Height, SortKey::Width]
    }

    /// Short name used in attempt descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            SortKey::Area => "area",
            SortKey::Height => "height",
            SortKey::Width => "width",
        }
    }
}

/// Common configuration for the nesting solver.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Required spacing between pieces in millimeters. Zero means pieces may
    /// touch but not overlap.
    pub spacing: f64,

    /// Trial rotation angles in degrees. 180 is always added by the
    /// optimizer regardless of this list.
    pub rotations_deg: Vec<f64>,

    /// Adds corner-seeded attempts to the strategy sweep.
    pub corner_seeding: bool,

    /// Number of threads for the strategy sweep (0 = auto, 1 = sequential).
    pub threads: usize,

    /// Wall-clock budget in milliseconds, checked only between whole
    /// attempts (0 = unlimited).
    pub time_limit_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            rotations_deg: vec![0.0, 180.0],
            corner_seeding: false,
            threads: 0,
            time_limit_ms: 0,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spacing between pieces.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Sets the trial rotation angles in degrees.
    pub fn with_rotations_deg(mut self, angles: Vec<f64>) -> Self {
        self.rotations_deg = angles;
        self
    }

    /// Enables or disables corner-seeded attempts.
    pub fn with_corner_seeding(mut self, enabled: bool) -> Self {
        self.corner_seeding = enabled;
        self
    }

    /// Sets the thread count for the strategy sweep.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }
}

/// Trait for nesting solvers.
pub trait Solver {
    /// The geometry type this solver handles.
    type Geometry: Geometry;
    /// The boundary type this solver handles.
    type Boundary: Boundary;

    /// Solves the nesting problem.
    fn solve(
        &self,
        geometries: &[Self::Geometry],
        boundary: &Self::Boundary,
    ) -> Result<MarkerResult>;

    /// Cancels an ongoing solve. Takes effect between whole attempts, never
    /// mid-placement.
    fn cancel(&self);
}
