use glam::{Mat4, Vec3};
use voxel::SurfaceSource;

use crate::config::PreviewConfig;
use crate::graph::{ShaderGraph, light_graph, surface_graph};
use crate::mesh::{TriangleMesh, build_triangle_mesh};

/// Perspective camera with a fixed look-at transform
#[derive(Debug, Clone)]
pub struct CameraDesc {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in radians
    pub fov: f32,
    pub transform: Mat4,
    pub exposure: f32,
}

/// A mesh plus the shader applied to it
#[derive(Debug, Clone)]
pub struct MeshDesc {
    pub mesh: TriangleMesh,
    /// Index into [`SceneDesc::shaders`]
    pub shader: usize,
}

/// An instance binding a mesh to a world transform
#[derive(Debug, Clone)]
pub struct ObjectDesc {
    pub name: String,
    /// Index into [`SceneDesc::meshes`]
    pub mesh: usize,
    pub transform: Mat4,
}

/// A point light with its emission shader
#[derive(Debug, Clone)]
pub struct LightDesc {
    pub position: Vec3,
    /// Index into [`SceneDesc::shaders`]
    pub shader: usize,
}

/// Complete scene description handed to the engine
///
/// Exclusively owned by one session and rebuilt from scratch on every voxel
/// content change; nothing in it is reused across rebuilds.
#[derive(Debug, Clone)]
pub struct SceneDesc {
    pub camera: CameraDesc,
    pub shaders: Vec<ShaderGraph>,
    pub meshes: Vec<MeshDesc>,
    pub objects: Vec<ObjectDesc>,
    pub lights: Vec<LightDesc>,
}

/// Assemble a fresh scene from the current voxel surface
///
/// One surface shader, one mesh, one object at the origin, one point light.
pub fn build_scene<S: SurfaceSource + ?Sized>(source: &S, config: &PreviewConfig) -> SceneDesc {
    let camera = CameraDesc {
        width: config.resolution[0],
        height: config.resolution[1],
        fov: config.fov_degrees.to_radians(),
        transform: Mat4::from_translation(Vec3::new(0.0, 0.0, -config.camera_distance)),
        exposure: config.exposure,
    };

    let surface = surface_graph(&config.color_attribute, config.surface);
    let light = light_graph(Vec3::from_array(config.light_color), config.light_strength);

    SceneDesc {
        camera,
        shaders: vec![surface, light],
        meshes: vec![MeshDesc {
            mesh: build_triangle_mesh(source),
            shader: 0,
        }],
        objects: vec![ObjectDesc {
            name: "voxels".into(),
            mesh: 0,
            transform: Mat4::IDENTITY,
        }],
        lights: vec![LightDesc {
            position: Vec3::from_array(config.light_position),
            shader: 1,
        }],
    }
}
