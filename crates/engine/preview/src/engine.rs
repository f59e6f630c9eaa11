//! Seam between the bridge and the embedded render engine
//!
//! The engine is an opaque third-party library; the bridge only needs to
//! enumerate its compute devices, hand it a finished [`SceneDesc`], and
//! drive the resulting session (reset, start, draw, progress). Everything
//! behind these traits (device management, sampling, accumulation) is the
//! engine's own business.

use serde::{Deserialize, Serialize};

use crate::scene::SceneDesc;

/// Compute device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceKind {
    #[default]
    Cpu,
    Gpu,
}

/// One enumerated compute device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub kind: DeviceKind,
    pub description: String,
}

/// Progressive-sampling parameters, fixed for a session's lifetime
#[derive(Debug, Clone, Copy)]
pub struct SessionParams {
    pub progressive: bool,
    pub samples: u32,
    pub start_resolution: u32,
}

/// Output buffer dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferParams {
    pub width: u32,
    pub height: u32,
}

/// Output rectangle the accumulated buffer is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Human-readable progress strings read back each frame
///
/// Content is engine-defined and passed through uninterpreted; callers may
/// log or display it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub status: String,
    pub substatus: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no render device available")]
    NoDevice,
    #[error("session creation failed: {0}")]
    Session(String),
}

/// One progressive render session bound to a single scene
///
/// Sampling runs inside the engine's own worker threads; `draw` only
/// presents whatever has accumulated so far and never waits for sampling.
pub trait RenderSession {
    /// Reset accumulation buffers for a fresh sampling run
    fn reset(&mut self, buffer: &BufferParams, samples: u32);

    /// Start (or restart) asynchronous progressive sampling
    fn start(&mut self);

    /// Draw the current accumulated buffer into the output rectangle
    fn draw(&mut self, viewport: &Viewport);

    /// Read back the engine's progress strings
    fn progress(&self) -> Progress;
}

/// The embedded render engine
pub trait RenderEngine {
    type Session: RenderSession;

    /// Enumerate compute devices, in the engine's preference order
    fn available_devices(&self) -> Vec<DeviceInfo>;

    /// Create a session owning `scene`, bound to the given device
    fn create_session(
        &mut self,
        device: &DeviceInfo,
        params: &SessionParams,
        scene: SceneDesc,
    ) -> Result<Self::Session, EngineError>;
}
