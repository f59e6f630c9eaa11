use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::IVec3;

use crate::surface::{BLOCK_SIZE, SurfaceSource, SurfaceVertex};

const BLOCK_VOXELS: usize = (BLOCK_SIZE * BLOCK_SIZE * BLOCK_SIZE) as usize;

/// Face direction for voxel faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Top,    // +Y
    Bottom, // -Y
    Left,   // -X
    Right,  // +X
    Front,  // +Z
    Back,   // -Z
}

const ALL_FACES: [Face; 6] = [
    Face::Top,
    Face::Bottom,
    Face::Left,
    Face::Right,
    Face::Front,
    Face::Back,
];

impl Face {
    /// Offset to the neighbor voxel this face borders
    fn offset(self) -> IVec3 {
        match self {
            Face::Top => IVec3::new(0, 1, 0),
            Face::Bottom => IVec3::new(0, -1, 0),
            Face::Left => IVec3::new(-1, 0, 0),
            Face::Right => IVec3::new(1, 0, 0),
            Face::Front => IVec3::new(0, 0, 1),
            Face::Back => IVec3::new(0, 0, -1),
        }
    }

    /// Get the four vertices for this face in counter-clockwise order when viewed from outside
    fn vertices(self, x: f32, y: f32, z: f32) -> [[f32; 3]; 4] {
        let size = 1.0;
        match self {
            Face::Top => [
                [x, y + size, z],
                [x, y + size, z + size],
                [x + size, y + size, z + size],
                [x + size, y + size, z],
            ],
            Face::Bottom => [
                [x, y, z],
                [x + size, y, z],
                [x + size, y, z + size],
                [x, y, z + size],
            ],
            Face::Left => [
                [x, y, z + size],
                [x, y + size, z + size],
                [x, y + size, z],
                [x, y, z],
            ],
            Face::Right => [
                [x + size, y, z],
                [x + size, y + size, z],
                [x + size, y + size, z + size],
                [x + size, y, z + size],
            ],
            Face::Front => [
                [x + size, y, z + size],
                [x + size, y + size, z + size],
                [x, y + size, z + size],
                [x, y, z + size],
            ],
            Face::Back => [
                [x, y, z],
                [x, y + size, z],
                [x + size, y + size, z],
                [x + size, y, z],
            ],
        }
    }
}

/// One 16x16x16 block of RGBA voxels
struct Block {
    voxels: Vec<[u8; 4]>,
    solid: u32,
}

impl Block {
    fn new() -> Self {
        Self {
            voxels: vec![[0; 4]; BLOCK_VOXELS],
            solid: 0,
        }
    }

    fn index(local: IVec3) -> usize {
        ((local.z * BLOCK_SIZE + local.y) * BLOCK_SIZE + local.x) as usize
    }
}

/// Sparse voxel volume made of 16x16x16 RGBA blocks
///
/// Reference implementation of [`SurfaceSource`]: a face is emitted wherever
/// a solid voxel meets empty space, with neighbor lookups crossing block
/// boundaries. A voxel is solid iff its alpha is nonzero.
pub struct BlockGrid {
    // Keyed by block origin; BTreeMap keeps iteration deterministic for
    // content keys and block listings.
    blocks: BTreeMap<[i32; 3], Block>,
}

impl BlockGrid {
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Set a voxel color; a zero-alpha color clears the voxel
    pub fn set(&mut self, pos: IVec3, color: [u8; 4]) {
        if color[3] == 0 {
            self.clear(pos);
            return;
        }
        let (origin, local) = split_pos(pos);
        let block = self
            .blocks
            .entry(origin.to_array())
            .or_insert_with(Block::new);
        let idx = Block::index(local);
        if block.voxels[idx][3] == 0 {
            block.solid += 1;
        }
        block.voxels[idx] = color;
    }

    /// Clear a voxel; empty blocks are pruned so content keys stay canonical
    pub fn clear(&mut self, pos: IVec3) {
        let (origin, local) = split_pos(pos);
        let Some(block) = self.blocks.get_mut(&origin.to_array()) else {
            return;
        };
        let idx = Block::index(local);
        if block.voxels[idx][3] != 0 {
            block.voxels[idx] = [0; 4];
            block.solid -= 1;
            if block.solid == 0 {
                self.blocks.remove(&origin.to_array());
            }
        }
    }

    /// Get a voxel color, or `None` if the voxel is empty
    pub fn get(&self, pos: IVec3) -> Option<[u8; 4]> {
        let (origin, local) = split_pos(pos);
        let block = self.blocks.get(&origin.to_array())?;
        let color = block.voxels[Block::index(local)];
        (color[3] != 0).then_some(color)
    }
}

impl Default for BlockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceSource for BlockGrid {
    fn content_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for (origin, block) in &self.blocks {
            origin.hash(&mut hasher);
            block.voxels.hash(&mut hasher);
        }
        hasher.finish()
    }

    fn block_origins(&self) -> Vec<IVec3> {
        let mut origins = BTreeSet::new();
        for origin in self.blocks.keys() {
            let origin = IVec3::from_array(*origin);
            origins.insert(origin.to_array());
            for face in ALL_FACES {
                origins.insert((origin + face.offset() * BLOCK_SIZE).to_array());
            }
        }
        origins.into_iter().map(IVec3::from_array).collect()
    }

    fn block_quads(&self, origin: IVec3, out: &mut Vec<SurfaceVertex>) -> usize {
        let Some(block) = self.blocks.get(&origin.to_array()) else {
            return 0;
        };
        let mut quads = 0;
        for lz in 0..BLOCK_SIZE {
            for ly in 0..BLOCK_SIZE {
                for lx in 0..BLOCK_SIZE {
                    let local = IVec3::new(lx, ly, lz);
                    let color = block.voxels[Block::index(local)];
                    if color[3] == 0 {
                        continue;
                    }
                    let pos = origin + local;
                    for face in ALL_FACES {
                        // Neighbor lookup crosses block boundaries.
                        if self.get(pos + face.offset()).is_some() {
                            continue;
                        }
                        let corners =
                            face.vertices(pos.x as f32, pos.y as f32, pos.z as f32);
                        for corner in corners {
                            out.push(SurfaceVertex { pos: corner, color });
                        }
                        quads += 1;
                    }
                }
            }
        }
        tracing::trace!("[block_quads] {} quads at {:?}", quads, origin);
        quads
    }
}

fn split_pos(pos: IVec3) -> (IVec3, IVec3) {
    let origin = IVec3::new(
        pos.x.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
        pos.y.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
        pos.z.div_euclid(BLOCK_SIZE) * BLOCK_SIZE,
    );
    (origin, pos - origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn test_empty_grid_has_no_blocks() {
        let grid = BlockGrid::new();
        assert!(grid.block_origins().is_empty());

        let mut out = Vec::new();
        assert_eq!(grid.block_quads(IVec3::ZERO, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_voxel_emits_six_quads() {
        let mut grid = BlockGrid::new();
        grid.set(IVec3::new(1, 2, 3), RED);

        let mut out = Vec::new();
        let quads = grid.block_quads(IVec3::ZERO, &mut out);
        assert_eq!(quads, 6);
        assert_eq!(out.len(), 6 * 4);
        assert!(out.iter().all(|v| v.color == RED));
    }

    #[test]
    fn test_adjacent_voxels_cull_shared_faces() {
        let mut grid = BlockGrid::new();
        grid.set(IVec3::new(0, 0, 0), RED);
        grid.set(IVec3::new(1, 0, 0), BLUE);

        let mut out = Vec::new();
        // Two cubes sharing one face: 12 faces minus the 2 hidden ones.
        assert_eq!(grid.block_quads(IVec3::ZERO, &mut out), 10);
    }

    #[test]
    fn test_culling_crosses_block_boundaries() {
        let mut grid = BlockGrid::new();
        grid.set(IVec3::new(15, 0, 0), RED);
        grid.set(IVec3::new(16, 0, 0), BLUE);

        let mut out = Vec::new();
        let left = grid.block_quads(IVec3::ZERO, &mut out);
        let right = grid.block_quads(IVec3::new(16, 0, 0), &mut out);
        assert_eq!(left, 5, "face against the neighbor block must be culled");
        assert_eq!(right, 5);
    }

    #[test]
    fn test_block_origins_include_neighbors() {
        let mut grid = BlockGrid::new();
        grid.set(IVec3::new(0, 0, 0), RED);

        let origins = grid.block_origins();
        assert_eq!(origins.len(), 7, "occupied block plus six face neighbors");
        assert!(origins.contains(&IVec3::ZERO));
        assert!(origins.contains(&IVec3::new(-16, 0, 0)));
        assert!(origins.contains(&IVec3::new(0, 16, 0)));
    }

    #[test]
    fn test_content_key_stable_and_change_sensitive() {
        let mut grid = BlockGrid::new();
        grid.set(IVec3::new(1, 1, 1), RED);

        let k1 = grid.content_key();
        assert_eq!(k1, grid.content_key(), "key must be stable without edits");

        grid.set(IVec3::new(2, 1, 1), BLUE);
        let k2 = grid.content_key();
        assert_ne!(k1, k2, "content change must change the key");

        // Removing the voxel again restores the original content and key.
        grid.clear(IVec3::new(2, 1, 1));
        assert_eq!(grid.content_key(), k1);
    }

    #[test]
    fn test_clear_prunes_empty_blocks() {
        let mut grid = BlockGrid::new();
        let empty_key = grid.content_key();
        grid.set(IVec3::new(40, 0, 0), RED);
        grid.clear(IVec3::new(40, 0, 0));

        assert!(grid.block_origins().is_empty());
        assert_eq!(grid.content_key(), empty_key);
    }

    #[test]
    fn test_zero_alpha_set_clears() {
        let mut grid = BlockGrid::new();
        grid.set(IVec3::ZERO, RED);
        grid.set(IVec3::ZERO, [10, 10, 10, 0]);
        assert!(grid.get(IVec3::ZERO).is_none());
    }
}
