//! Sheet (material roll) boundary.

use marknest_core::geometry::Boundary;
use marknest_core::{Error, Result, AABB2D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Working height used for effectively unbounded rolls; only caps the
/// placement search, never the reported consumed length.
const STRIP_SOFT_CAP: f64 = 1.0e7;

/// A rectangular sheet of material with a fixed width and an optionally
/// unbounded length, plus implicit origin at the bottom-left corner.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    /// Fixed roll width in millimeters.
    width: f64,

    /// Working height bound in millimeters.
    height: f64,

    /// True when the sheet length is effectively unbounded (strip packing).
    infinite_length: bool,
}

impl Sheet {
    /// Creates a bounded rectangular sheet.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            infinite_length: false,
        }
    }

    /// Creates an effectively unbounded strip of the given width.
    pub fn strip(width: f64) -> Self {
        Self {
            width,
            height: STRIP_SOFT_CAP,
            infinite_length: true,
        }
    }

    /// Returns the roll width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the working height bound.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns whether the length is effectively unbounded.
    pub fn is_infinite(&self) -> bool {
        self.infinite_length
    }

    /// Returns the sheet rectangle as a ring.
    pub fn exterior(&self) -> Vec<(f64, f64)> {
        vec![
            (0.0, 0.0),
            (self.width, 0.0),
            (self.width, self.height),
            (0.0, self.height),
        ]
    }

    /// Checks that every vertex of a ring lies within the sheet.
    pub fn contains_ring(&self, ring: &[(f64, f64)]) -> bool {
        const EPS: f64 = 1e-6;
        ring.iter().all(|&(x, y)| {
            x >= -EPS && x <= self.width + EPS && y >= -EPS && y <= self.height + EPS
        })
    }
}

impl Boundary for Sheet {
    fn measure(&self) -> f64 {
        if self.infinite_length {
            f64::INFINITY
        } else {
            self.width * self.height
        }
    }

    fn aabb_2d(&self) -> AABB2D {
        AABB2D::new(0.0, 0.0, self.width, self.height)
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0.0 {
            return Err(Error::InvalidBoundary("width must be positive".into()));
        }
        if self.height <= 0.0 {
            return Err(Error::InvalidBoundary("height must be positive".into()));
        }
        Ok(())
    }

    fn contains_point(&self, point: (f64, f64)) -> bool {
        point.0 >= 0.0 && point.0 <= self.width && point.1 >= 0.0 && point.1 <= self.height
    }
}
