//! Error types shared across the workspace.

use thiserror::Error;

/// Errors produced by the nesting engine.
///
/// Expected outcomes of a solve (a piece that fits nowhere, a failed NFP
/// computation) are reported through result values, never through this type.
#[derive(Debug, Error)]
pub enum Error {
    /// A pattern ring is malformed (too few vertices, zero quantity, ...).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A sheet definition is malformed (non-positive width, ...).
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),

    /// Internal invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;
