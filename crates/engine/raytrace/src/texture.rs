use std::path::Path;

use glow::HasContext;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode output image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decoded renderer output, kept in memory until the job is restarted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTexture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top-left origin
    pub rgba: Vec<u8>,
}

impl OutputTexture {
    /// Decode an image file into RGBA8
    pub fn from_file(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Upload the pixels as a GL texture for display
    ///
    /// # Safety
    /// Requires a valid GL context to be current on the calling thread.
    pub unsafe fn upload(&self, gl: &glow::Context) -> Result<glow::Texture, String> {
        unsafe {
            let texture = gl
                .create_texture()
                .map_err(|e| format!("Failed to create texture: {}", e))?;

            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                self.width as i32,
                self.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(&self.rgba)),
            );

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(texture)
        }
    }
}
