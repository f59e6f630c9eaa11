//! External ray-tracer bridge
//!
//! Runs the external ray-tracing program as a background job: serialize the
//! scene through the [`SceneExporter`] seam, spawn the renderer against the
//! scene file, and let the editor poll for the finished image without ever
//! blocking a frame. Cancellation is advisory: the caller flags the job and
//! the result is discarded when the worker eventually finishes (unless a
//! configured timeout kills a hung renderer first).

mod config;
mod export;
mod job;
mod texture;

pub use config::RaytraceConfig;
pub use export::{ExportError, SceneExporter};
pub use job::{JobError, JobState, Raytracer};
pub use texture::{OutputTexture, TextureError};
