//! Voxel surface input contract for the render bridges
//!
//! The editor's voxel volume is owned elsewhere; the render bridges only
//! consume its *surface* as batches of colored quads, one batch per spatial
//! block. This crate defines that contract ([`SurfaceSource`]) plus a small
//! block-grid reference implementation ([`BlockGrid`]) used by tests and
//! tooling.

mod grid;
mod surface;

pub use grid::BlockGrid;
pub use surface::{BLOCK_SIZE, CORNERS_PER_QUAD, SurfaceSource, SurfaceVertex};

// Re-export glam for convenience
pub use glam;
