//! GL glue for presenting the engine's accumulated buffer
//!
//! The engine draws its own framebuffer contents; the bridge only prepares
//! the output rectangle on the editor's already-current GL context. Callers
//! own the context and restore their own state after the frame.

use glow::HasContext;

use crate::engine::Viewport;

/// Bind the preview output rectangle on the current GL context
///
/// Sets the viewport to the preview rectangle and unbinds any shader
/// program so the engine's draw starts from neutral pipeline state.
///
/// # Safety
/// Requires a valid GL context to be current on the calling thread.
pub unsafe fn bind_output_viewport(gl: &glow::Context, viewport: &Viewport) {
    unsafe {
        gl.viewport(viewport.x, viewport.y, viewport.width, viewport.height);
        gl.use_program(None);
    }
}
