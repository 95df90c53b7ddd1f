//! Core geometry and boundary traits.

use crate::transform::AABB2D;
use crate::Result;

/// Unique identifier for a pattern.
pub type GeometryId = String;

/// Trait for geometric shapes that can be nested.
pub trait Geometry: Clone + Send + Sync {
    /// Returns the unique identifier for this geometry.
    fn id(&self) -> &GeometryId;

    /// Returns the number of copies to place.
    fn quantity(&self) -> usize;

    /// Returns the absolute area of this geometry.
    fn measure(&self) -> f64;

    /// Returns the axis-aligned bounding box.
    fn aabb_2d(&self) -> AABB2D;

    /// Validates the geometry and returns an error if invalid.
    fn validate(&self) -> Result<()>;
}

/// Trait for boundaries/containers that hold geometries.
pub trait Boundary: Clone + Send + Sync {
    /// Returns the area of this boundary.
    fn measure(&self) -> f64;

    /// Returns the axis-aligned bounding box.
    fn aabb_2d(&self) -> AABB2D;

    /// Validates the boundary and returns an error if invalid.
    fn validate(&self) -> Result<()>;

    /// Checks if a point is inside the boundary.
    fn contains_point(&self, point: (f64, f64)) -> bool;
}
