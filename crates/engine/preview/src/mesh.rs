use glam::Vec3;
use voxel::{BLOCK_SIZE, CORNERS_PER_QUAD, SurfaceSource, SurfaceVertex};

/// Triangle corners produced per quad (two triangles)
const CORNERS_PER_QUAD_SPLIT: usize = 6;

/// Renderer-native triangle mesh, rebuilt wholesale on every content change
///
/// Geometry is quad-derived: every quad contributes four vertices, two
/// triangles with a fixed diagonal split, and six corner-color entries (one
/// per triangle corner, all equal to the quad's flat color).
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    /// Per-triangle-corner RGBA, parallel to `triangles` (3 entries per
    /// triangle)
    pub corner_colors: Vec<[u8; 4]>,
}

impl TriangleMesh {
    pub fn quad_count(&self) -> usize {
        self.triangles.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Convert the voxel surface into a triangle mesh
///
/// Iterates every block the source reports, accumulating vertex offsets
/// across blocks so multi-block volumes produce one contiguous mesh. The
/// quad batch buffer is sized for the worst case (every voxel in a block
/// showing all six faces) and reused between blocks. Empty blocks
/// contribute nothing.
pub fn build_triangle_mesh<S: SurfaceSource + ?Sized>(source: &S) -> TriangleMesh {
    let mut mesh = TriangleMesh::default();
    let worst_case = (BLOCK_SIZE * BLOCK_SIZE * BLOCK_SIZE) as usize * 6 * CORNERS_PER_QUAD;
    let mut batch: Vec<SurfaceVertex> = Vec::with_capacity(worst_case);

    let origins = source.block_origins();
    let mut blocks_used = 0;
    for origin in &origins {
        batch.clear();
        let quads = source.block_quads(*origin, &mut batch);
        if quads == 0 {
            continue;
        }
        blocks_used += 1;
        append_quads(&mut mesh, &batch[..quads * CORNERS_PER_QUAD]);
    }

    tracing::debug!(
        "[build_triangle_mesh] {} quads from {}/{} blocks",
        mesh.quad_count(),
        blocks_used,
        origins.len()
    );
    mesh
}

fn append_quads(mesh: &mut TriangleMesh, corners: &[SurfaceVertex]) {
    for quad in corners.chunks_exact(CORNERS_PER_QUAD) {
        let base = mesh.positions.len() as u32;
        for corner in quad {
            mesh.positions.push(Vec3::from_array(corner.pos));
        }
        // Fixed diagonal split: (0,1,2) and (2,3,0).
        mesh.triangles.push([base, base + 1, base + 2]);
        mesh.triangles.push([base + 2, base + 3, base]);
        // The quad's flat color fills all six triangle corners.
        let color = quad[0].color;
        for _ in 0..CORNERS_PER_QUAD_SPLIT {
            mesh.corner_colors.push(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use voxel::BlockGrid;

    /// Source emitting a fixed list of quads from a single block
    struct FixedQuads {
        corners: Vec<SurfaceVertex>,
    }

    impl FixedQuads {
        fn new(quads: &[[u8; 4]]) -> Self {
            let mut corners = Vec::new();
            for (i, color) in quads.iter().enumerate() {
                let x = i as f32;
                for pos in [
                    [x, 0.0, 0.0],
                    [x + 1.0, 0.0, 0.0],
                    [x + 1.0, 1.0, 0.0],
                    [x, 1.0, 0.0],
                ] {
                    corners.push(SurfaceVertex { pos, color: *color });
                }
            }
            Self { corners }
        }
    }

    impl SurfaceSource for FixedQuads {
        fn content_key(&self) -> u64 {
            1
        }

        fn block_origins(&self) -> Vec<IVec3> {
            vec![IVec3::ZERO]
        }

        fn block_quads(&self, _origin: IVec3, out: &mut Vec<SurfaceVertex>) -> usize {
            out.extend_from_slice(&self.corners);
            self.corners.len() / CORNERS_PER_QUAD
        }
    }

    #[test]
    fn test_counts_per_quad() {
        let source = FixedQuads::new(&[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]);
        let mesh = build_triangle_mesh(&source);

        assert_eq!(mesh.quad_count(), 3);
        assert_eq!(mesh.positions.len(), 3 * 4);
        assert_eq!(mesh.triangles.len(), 3 * 2);
        assert_eq!(mesh.corner_colors.len(), 3 * 6);
    }

    #[test]
    fn test_fixed_diagonal_split() {
        let source = FixedQuads::new(&[[255, 255, 255, 255]]);
        let mesh = build_triangle_mesh(&source);

        assert_eq!(mesh.triangles[0], [0, 1, 2]);
        assert_eq!(mesh.triangles[1], [2, 3, 0]);
    }

    #[test]
    fn test_quad_color_fills_all_six_corners() {
        let red = [200, 10, 10, 255];
        let green = [10, 200, 10, 255];
        let source = FixedQuads::new(&[red, green]);
        let mesh = build_triangle_mesh(&source);

        assert!(mesh.corner_colors[..6].iter().all(|c| *c == red));
        assert!(mesh.corner_colors[6..].iter().all(|c| *c == green));
    }

    #[test]
    fn test_empty_source_yields_empty_mesh() {
        let grid = BlockGrid::new();
        let mesh = build_triangle_mesh(&grid);
        assert!(mesh.is_empty());
        assert!(mesh.corner_colors.is_empty());
    }

    #[test]
    fn test_multi_block_offsets_accumulate() {
        let mut grid = BlockGrid::new();
        // Two isolated voxels in different blocks: 12 quads total.
        grid.set(IVec3::new(0, 0, 0), [255, 0, 0, 255]);
        grid.set(IVec3::new(40, 0, 0), [0, 255, 0, 255]);

        let mesh = build_triangle_mesh(&grid);
        assert_eq!(mesh.quad_count(), 12);
        assert_eq!(mesh.positions.len(), 48);

        // Every index must reference a real vertex, and the second block's
        // triangles must start past the first block's vertices.
        let max = mesh.triangles.iter().flatten().copied().max().unwrap();
        assert_eq!(max as usize, mesh.positions.len() - 1);
    }

    #[test]
    fn test_triangles_stay_within_their_quad() {
        let mut grid = BlockGrid::new();
        grid.set(IVec3::new(3, 3, 3), [9, 9, 9, 255]);

        let mesh = build_triangle_mesh(&grid);
        for (i, pair) in mesh.triangles.chunks_exact(2).enumerate() {
            let base = (i * 4) as u32;
            assert_eq!(pair[0], [base, base + 1, base + 2]);
            assert_eq!(pair[1], [base + 2, base + 3, base]);
        }
    }
}
