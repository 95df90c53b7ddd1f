//! # Marknest 2D
//!
//! NFP-based 2D marker nesting for fabric cut patterns.
//!
//! This crate lays out irregular cut-pattern pieces on a fixed-width,
//! effectively unbounded material roll so that the consumed length is
//! minimized. The solver re-runs a bottom-left-fill placement pipeline over
//! several piece sort orders, with and without NFP-guided candidate search,
//! and keeps the most efficient attempt. Pieces are grouped by garment role
//! (body, sleeve, strip, leg) so large panels anchor the marker, curved
//! sleeve pairs interlock under alternating rotation, and banding strips
//! fill residual gaps last.
//!
//! ## Quick Start
//!
//! ```rust
//! use marknest_d2::{Config, Nester2D, Pattern, Sheet, Solver};
//!
//! // Patterns in millimeters, quantities expanded by the engine.
//! let patterns = vec![
//!     Pattern::rectangle("FRONT", 400.0, 300.0)
//!         .with_label("FRONT BODY")
//!         .with_quantity(2),
//!     Pattern::rectangle("SLEEVE", 250.0, 200.0).with_quantity(2),
//! ];
//!
//! // A 1500 mm wide roll of effectively unbounded length.
//! let sheet = Sheet::strip(1500.0);
//!
//! let config = Config::new()
//!     .with_spacing(5.0)
//!     .with_rotations_deg(vec![0.0, 180.0]);
//!
//! let nester = Nester2D::new(config);
//! let result = nester.solve(&patterns, &sheet).unwrap();
//!
//! println!(
//!     "placed {}/{} pieces, {:.1} cm used, efficiency {}",
//!     result.placed_count(),
//!     result.total_count,
//!     result.used_length_cm(),
//!     result.efficiency_percent()
//! );
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod boundary;
pub mod classify;
pub mod clip;
pub mod collision;
pub mod expert;
pub mod geometry;
pub mod nester;
pub mod nfp;
pub mod search;

// Re-exports
pub use boundary::Sheet;
pub use classify::{KeywordTable, PieceRole};
pub use collision::PlacedLayout;
pub use geometry::{expand_pieces, EdgeBuffers, Pattern, Piece, PieceState};
pub use nester::Nester2D;
pub use nfp::{candidate_positions, compute_ifp, compute_nfp, NfpCache};
pub use marknest_core::{
    Boundary, Config, Error, Geometry, GeometryId, MarkerResult, Placement, Result, Solver,
    SortKey, AABB2D,
};
