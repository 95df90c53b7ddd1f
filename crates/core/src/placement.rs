//! Placement of a single piece instance.

use crate::geometry::GeometryId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The final, world-space position of one placed piece.
///
/// A placement is only ever created for a collision-free, in-bounds result;
/// partially valid placements never exist.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Identifier of the source pattern.
    pub id: GeometryId,

    /// Instance index within the pattern's quantity (0-based).
    pub instance: usize,

    /// Reference offset on the sheet, millimeters.
    pub x: f64,

    /// Reference offset on the sheet, millimeters.
    pub y: f64,

    /// Chosen rotation angle in degrees.
    pub rotation_deg: f64,

    /// World-space transformed ring, the only externally consumed
    /// per-piece output.
    pub ring: Vec<(f64, f64)>,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        id: GeometryId,
        instance: usize,
        x: f64,
        y: f64,
        rotation_deg: f64,
        ring: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            id,
            instance,
            x,
            y,
            rotation_deg,
            ring,
        }
    }
}
