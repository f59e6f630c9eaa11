use glam::IVec3;

/// Edge length of a spatial block, in voxels
pub const BLOCK_SIZE: i32 = 16;

/// Corners per generated quad
pub const CORNERS_PER_QUAD: usize = 4;

/// One corner of a surface quad: position plus flat face color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceVertex {
    /// Corner position in voxel/world coordinates
    pub pos: [f32; 3],
    /// RGBA face color (all four corners of a quad carry the same color)
    pub color: [u8; 4],
}

/// Surface of a voxel volume, exposed as per-block quad batches
///
/// Implementors own the voxel data; the render bridges only ever see the
/// generated quads. Quads are emitted as groups of four consecutive
/// [`SurfaceVertex`] values in counter-clockwise order when viewed from
/// outside the solid, so that the triangle split `(0,1,2)` / `(2,3,0)`
/// keeps a consistent winding.
pub trait SurfaceSource {
    /// Cheap fingerprint of the voxel content
    ///
    /// Stable across calls as long as the content is unchanged; any content
    /// change must produce a different key. Callers use it to detect change
    /// without deep comparison.
    fn content_key(&self) -> u64;

    /// Origins of all blocks that may contribute quads
    ///
    /// Includes the empty neighbors of occupied blocks so that face
    /// generation can look across block boundaries. Order is deterministic
    /// for a given content.
    fn block_origins(&self) -> Vec<IVec3>;

    /// Append the quad corners for one block, returning the quad count
    ///
    /// An empty block appends nothing and returns 0; that is not an error.
    fn block_quads(&self, origin: IVec3, out: &mut Vec<SurfaceVertex>) -> usize;
}
