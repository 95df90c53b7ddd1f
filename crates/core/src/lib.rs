//! # Marknest Core
//!
//! Core traits and abstractions for the marknest marker nesting engine.
//!
//! This crate provides the foundational types shared by the engine crates:
//!
//! - **Geometry traits**: [`Geometry`], [`Boundary`]
//! - **Solver trait**: [`Solver`] with its [`Config`]
//! - **Polygon primitives**: [`geom::polygon`] (shoelace area, bounds,
//!   rotation, containment, ring distance)
//! - **Result types**: [`MarkerResult`], [`Placement`]
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geom;
pub mod geometry;
pub mod placement;
pub mod result;
pub mod solver;
pub mod transform;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{Boundary, Geometry, GeometryId};
pub use placement::Placement;
pub use result::MarkerResult;
pub use solver::{Config, Solver, SortKey};
pub use transform::AABB2D;
