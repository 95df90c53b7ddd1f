//! Plain-coordinate geometry helpers shared by the engine crates.

pub mod polygon;
