use voxel::SurfaceSource;

use crate::config::PreviewConfig;
use crate::engine::{
    BufferParams, DeviceInfo, EngineError, Progress, RenderEngine, RenderSession, SessionParams,
    Viewport,
};
use crate::present;
use crate::scene::build_scene;

struct Active<S> {
    session: S,
    content_key: u64,
}

/// Per-frame bridge between the editor and the embedded render engine
///
/// Holds one progressive session keyed on the voxel content key. Every
/// frame it either reuses the session (unchanged key) or drops it and
/// rebuilds scene + session from scratch (changed key), then draws whatever
/// the engine has accumulated so far. Sampling itself runs inside the
/// engine; nothing here blocks on it.
///
/// Owned by the editor's render thread; not `Sync` by design.
pub struct PreviewBridge<E: RenderEngine> {
    engine: E,
    config: PreviewConfig,
    device: DeviceInfo,
    session_params: SessionParams,
    buffer_params: BufferParams,
    viewport: Viewport,
    active: Option<Active<E::Session>>,
}

impl<E: RenderEngine> PreviewBridge<E> {
    /// Select a compute device and store session parameters
    ///
    /// Prefers the configured device kind; if no such device exists the
    /// first enumerated device is used instead. Only an empty device list
    /// is an error. No scene or session is created yet.
    pub fn new(engine: E, config: PreviewConfig) -> Result<Self, EngineError> {
        let devices = engine.available_devices();
        let device = match devices.iter().find(|d| d.kind == config.device) {
            Some(device) => device.clone(),
            None => {
                let first = devices.first().cloned().ok_or(EngineError::NoDevice)?;
                tracing::debug!(
                    "[preview] no {:?} device, using {}",
                    config.device,
                    first.description
                );
                first
            }
        };

        let session_params = SessionParams {
            progressive: true,
            samples: config.samples,
            start_resolution: config.start_resolution,
        };
        let buffer_params = BufferParams {
            width: config.resolution[0],
            height: config.resolution[1],
        };
        let viewport = Viewport {
            x: 0,
            y: 0,
            width: config.resolution[0] as i32,
            height: config.resolution[1] as i32,
        };

        Ok(Self {
            engine,
            config,
            device,
            session_params,
            buffer_params,
            viewport,
            active: None,
        })
    }

    /// The device the bridge settled on
    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Output rectangle the accumulated buffer is drawn into
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Render one frame of the preview
    ///
    /// If the voxel content key changed since the last call (or this is the
    /// first call), the previous session is destroyed and a fresh scene and
    /// session are built and started. In all cases the engine then draws
    /// its current accumulated buffer and the progress strings are read
    /// back. Never blocks on sampling.
    pub fn render_frame<S: SurfaceSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<Progress, EngineError> {
        let key = source.content_key();

        if let Some(active) = &mut self.active {
            if active.content_key == key {
                active.session.draw(&self.viewport);
                return Ok(active.session.progress());
            }
        }

        // Content changed: the old scene and session are destroyed first,
        // never partially reused.
        self.active = None;
        let scene = build_scene(source, &self.config);
        let mut session = self
            .engine
            .create_session(&self.device, &self.session_params, scene)?;
        session.reset(&self.buffer_params, self.session_params.samples);
        session.start();
        tracing::debug!("[preview] rebuilt session for content key {:#x}", key);

        let active = self.active.insert(Active {
            session,
            content_key: key,
        });
        active.session.draw(&self.viewport);
        Ok(active.session.progress())
    }

    /// Render one frame into the current GL context
    ///
    /// Binds the preview's output viewport before the engine draws; callers
    /// restore their own GL state afterwards.
    ///
    /// # Safety
    /// Requires a valid GL context to be current on the calling thread.
    pub unsafe fn render_frame_gl<S: SurfaceSource + ?Sized>(
        &mut self,
        gl: &glow::Context,
        source: &S,
    ) -> Result<Progress, EngineError> {
        unsafe {
            present::bind_output_viewport(gl, &self.viewport);
        }
        self.render_frame(source)
    }
}
