//! Solve result representation.

use crate::geometry::GeometryId;
use crate::placement::Placement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Millimeters per yard, for material-consumption reporting.
const MM_PER_YARD: f64 = 1000.0 / 1.09361;

/// Result of one marker nesting solve.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarkerResult {
    /// True when at least one piece was placed.
    pub success: bool,

    /// Final placements for all successfully placed piece instances.
    pub placements: Vec<Placement>,

    /// IDs of patterns with at least one instance that could not be placed.
    pub unplaced: Vec<GeometryId>,

    /// Total number of piece instances requested (quantities expanded).
    pub total_count: usize,

    /// Consumed roll length in millimeters: max placed Y plus spacing.
    pub used_length_mm: f64,

    /// Packing efficiency in percent, clamped to at most 99.9.
    pub efficiency: f64,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,

    /// Description of the winning strategy attempt.
    pub strategy: Option<String>,
}

impl MarkerResult {
    /// Creates a new empty (unsuccessful) result.
    pub fn new() -> Self {
        Self {
            success: false,
            placements: Vec::new(),
            unplaced: Vec::new(),
            total_count: 0,
            used_length_mm: 0.0,
            efficiency: 0.0,
            computation_time_ms: 0,
            strategy: None,
        }
    }

    /// Returns the number of placed piece instances.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns true if every requested instance was placed.
    ///
    /// A shortfall signals an infeasible or height-constrained layout, not
    /// an error.
    pub fn all_placed(&self) -> bool {
        self.placed_count() == self.total_count
    }

    /// Consumed length in centimeters.
    pub fn used_length_cm(&self) -> f64 {
        self.used_length_mm / 10.0
    }

    /// Consumed length in meters.
    pub fn used_length_m(&self) -> f64 {
        self.used_length_mm / 1000.0
    }

    /// Consumed length in yards.
    pub fn used_length_yd(&self) -> f64 {
        self.used_length_mm / MM_PER_YARD
    }

    /// Efficiency as a display string.
    pub fn efficiency_percent(&self) -> String {
        format!("{:.1}%", self.efficiency)
    }

    /// Removes duplicate entries from the unplaced list.
    pub fn deduplicate_unplaced(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.unplaced.retain(|id| seen.insert(id.clone()));
    }
}

impl Default for MarkerResult {
    fn default() -> Self {
        Self::new()
    }
}
