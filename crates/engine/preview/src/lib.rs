//! Embedded-engine preview bridge
//!
//! Turns the editor's voxel surface into a scene the embedded path-tracing
//! engine can render, and keeps a progressive-sampling session alive across
//! frames. The engine itself is an external collaborator behind the
//! [`RenderEngine`]/[`RenderSession`] seam; this crate owns everything up to
//! that boundary:
//!
//! - quad-batch to triangle-mesh marshaling ([`build_triangle_mesh`])
//! - shader-graph construction ([`surface_graph`], [`light_graph`])
//! - scene assembly ([`build_scene`])
//! - session lifecycle keyed on the voxel content key ([`PreviewBridge`])
//! - GL presentation glue for the engine's accumulated buffer ([`present`])

mod bridge;
mod config;
mod engine;
mod graph;
mod mesh;
pub mod present;
mod scene;

pub use bridge::PreviewBridge;
pub use config::PreviewConfig;
pub use engine::{
    BufferParams, DeviceInfo, DeviceKind, EngineError, Progress, RenderEngine, RenderSession,
    SessionParams, Viewport,
};
pub use graph::{
    NodeKind, ShaderGraph, ShaderLink, ShaderNode, SurfaceStyle, light_graph, surface_graph,
};
pub use mesh::{TriangleMesh, build_triangle_mesh};
pub use scene::{CameraDesc, LightDesc, MeshDesc, ObjectDesc, SceneDesc, build_scene};
