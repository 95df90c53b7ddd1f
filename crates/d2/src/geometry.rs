//! Pattern geometry and piece expansion.

use crate::classify::{KeywordTable, PieceRole};
use crate::clip;
use geo::{Area, Centroid, Coord, LineString, Polygon as GeoPolygon};
use marknest_core::geom::polygon::{bounds, rotate_deg, translate};
use marknest_core::geometry::{Geometry, GeometryId};
use marknest_core::{Error, Result, AABB2D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Directional buffer widths around a piece, millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeBuffers {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl EdgeBuffers {
    /// Uniform buffer on all four sides.
    pub fn uniform(amount: f64) -> Self {
        Self {
            top: amount,
            bottom: amount,
            left: amount,
            right: amount,
        }
    }

    /// True when no side has a positive buffer.
    pub fn is_zero(&self) -> bool {
        self.top <= 0.0 && self.bottom <= 0.0 && self.left <= 0.0 && self.right <= 0.0
    }
}

/// One logical cut-pattern entry: an immutable polygon ring plus label and
/// required copy count.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pattern {
    /// Unique identifier.
    id: GeometryId,

    /// Classification label (role keywords are matched against this).
    label: String,

    /// Polygon ring in millimeters, implicit closure.
    exterior: Vec<(f64, f64)>,

    /// Number of copies to place.
    quantity: usize,

    /// Optional directional buffers applied before packing.
    buffers: Option<EdgeBuffers>,
}

impl Pattern {
    /// Creates a new pattern with the given ID. The label defaults to the ID.
    pub fn new(id: impl Into<GeometryId>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            exterior: Vec::new(),
            quantity: 1,
            buffers: None,
        }
    }

    /// Sets the polygon ring. A duplicated closing point is dropped.
    pub fn with_polygon(mut self, mut vertices: Vec<(f64, f64)>) -> Self {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        self.exterior = vertices;
        self
    }

    /// Sets the classification label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the quantity to place.
    pub fn with_quantity(mut self, n: usize) -> Self {
        self.quantity = n;
        self
    }

    /// Sets directional buffers around the piece.
    pub fn with_buffers(mut self, buffers: EdgeBuffers) -> Self {
        self.buffers = Some(buffers);
        self
    }

    /// Creates a rectangular pattern.
    pub fn rectangle(id: impl Into<GeometryId>, width: f64, height: f64) -> Self {
        Self::new(id).with_polygon(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, height),
            (0.0, height),
        ])
    }

    /// Returns the raw exterior ring.
    pub fn exterior(&self) -> &[(f64, f64)] {
        &self.exterior
    }

    /// Returns the classification label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the configured buffers, if any.
    pub fn buffers(&self) -> Option<EdgeBuffers> {
        self.buffers
    }

    /// Returns the ring that actually gets packed: the exterior grown by the
    /// directional buffers, normalized so its bounding-box minimum corner
    /// sits at the origin.
    pub fn packing_ring(&self) -> Vec<(f64, f64)> {
        let ring = match self.buffers {
            Some(b) if !b.is_zero() => {
                clip::directional_buffer(&self.exterior, b.top, b.bottom, b.left, b.right)
            }
            _ => self.exterior.clone(),
        };

        let b = bounds(&ring);
        translate(&ring, -b.min_x, -b.min_y)
    }

    /// Converts to a geo crate polygon.
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        let exterior = LineString::from(
            self.exterior
                .iter()
                .map(|&(x, y)| Coord { x, y })
                .collect::<Vec<_>>(),
        );
        GeoPolygon::new(exterior, vec![])
    }

    /// Returns the centroid of the pattern.
    pub fn centroid(&self) -> (f64, f64) {
        match self.to_geo_polygon().centroid() {
            Some(c) => (c.x(), c.y()),
            None => (0.0, 0.0),
        }
    }

    /// Computes the AABB of the packing ring at a rotation (degrees).
    pub fn aabb_at_rotation(&self, rotation_deg: f64) -> AABB2D {
        bounds(&rotate_deg(&self.packing_ring(), rotation_deg))
    }

    /// Returns the packing-ring dimensions at a rotation (degrees).
    pub fn dimensions_at_rotation(&self, rotation_deg: f64) -> (f64, f64) {
        let b = self.aabb_at_rotation(rotation_deg);
        (b.width(), b.height())
    }
}

impl Geometry for Pattern {
    fn id(&self) -> &GeometryId {
        &self.id
    }

    fn quantity(&self) -> usize {
        self.quantity
    }

    fn measure(&self) -> f64 {
        self.to_geo_polygon().unsigned_area()
    }

    fn aabb_2d(&self) -> AABB2D {
        bounds(&self.exterior)
    }

    fn validate(&self) -> Result<()> {
        if self.exterior.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "pattern '{}' must have at least 3 vertices",
                self.id
            )));
        }

        if self.quantity == 0 {
            return Err(Error::InvalidGeometry(format!(
                "quantity for '{}' must be at least 1",
                self.id
            )));
        }

        Ok(())
    }
}

/// Placement state of one piece instance. `Placed` is terminal within a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceState {
    Unplaced,
    Placed { x: f64, y: f64, rotation_deg: f64 },
}

/// One placeable instance of a pattern.
///
/// A pattern requiring N copies expands into N independent pieces sharing
/// the base ring content, each owning its own placement state.
#[derive(Debug, Clone)]
pub struct Piece {
    /// Source pattern identifier.
    pub id: GeometryId,

    /// Instance index within the pattern's quantity (0-based).
    pub instance: usize,

    /// Buffered, origin-normalized base ring.
    pub ring: Vec<(f64, f64)>,

    /// Absolute area of the base ring.
    pub area: f64,

    /// Classified role.
    pub role: PieceRole,

    /// Placement state, written once per successful placement.
    pub state: PieceState,
}

impl Piece {
    /// Base-ring width.
    pub fn width(&self) -> f64 {
        bounds(&self.ring).width()
    }

    /// Base-ring height.
    pub fn height(&self) -> f64 {
        bounds(&self.ring).height()
    }

    /// True once the piece has been placed.
    pub fn is_placed(&self) -> bool {
        matches!(self.state, PieceState::Placed { .. })
    }
}

/// Expands patterns into independent piece instances, classifying each by
/// its label.
pub fn expand_pieces(patterns: &[Pattern], table: &KeywordTable) -> Vec<Piece> {
    let mut pieces = Vec::new();

    for pattern in patterns {
        let ring = pattern.packing_ring();
        let area = marknest_core::geom::polygon::area(&ring);
        let role = table.classify(pattern.label());

        for instance in 0..pattern.quantity() {
            pieces.push(Piece {
                id: pattern.id().clone(),
                instance,
                ring: ring.clone(),
                area,
                role,
                state: PieceState::Unplaced,
            });
        }
    }

    pieces
}
