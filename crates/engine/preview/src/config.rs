use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::engine::DeviceKind;
use crate::graph::SurfaceStyle;

/// Configuration for the embedded-engine preview
///
/// Defaults reproduce the editor's historical fixed parameters; a RON file
/// can override any subset of fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Output resolution [width, height]
    #[serde(default = "default_resolution")]
    pub resolution: [u32; 2],

    /// Vertical field of view in degrees
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f32,

    /// Distance from the camera to the origin along -Z
    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,

    /// Film exposure
    #[serde(default = "default_exposure")]
    pub exposure: f32,

    /// Progressive sample budget per session
    #[serde(default = "default_samples")]
    pub samples: u32,

    /// Resolution progressive sampling starts at
    #[serde(default = "default_start_resolution")]
    pub start_resolution: u32,

    /// Preferred compute device; falls back to the first enumerated device
    #[serde(default)]
    pub device: DeviceKind,

    /// Closure terminating the voxel surface shader
    #[serde(default)]
    pub surface: SurfaceStyle,

    /// Name of the mesh color attribute the surface shader reads
    #[serde(default = "default_color_attribute")]
    pub color_attribute: String,

    /// Point light position
    #[serde(default = "default_light_position")]
    pub light_position: [f32; 3],

    /// Point light emission color
    #[serde(default = "default_light_color")]
    pub light_color: [f32; 3],

    /// Point light emission strength
    #[serde(default = "default_light_strength")]
    pub light_strength: f32,
}

fn default_resolution() -> [u32; 2] {
    [256, 256]
}

fn default_fov_degrees() -> f32 {
    45.0
}

fn default_camera_distance() -> f32 {
    10.0
}

fn default_exposure() -> f32 {
    1.0
}

fn default_samples() -> u32 {
    20
}

fn default_start_resolution() -> u32 {
    64
}

fn default_color_attribute() -> String {
    "Col".to_string()
}

fn default_light_position() -> [f32; 3] {
    [0.0, 0.0, -3.0]
}

fn default_light_color() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}

fn default_light_strength() -> f32 {
    1000.0
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            fov_degrees: default_fov_degrees(),
            camera_distance: default_camera_distance(),
            exposure: default_exposure(),
            samples: default_samples(),
            start_resolution: default_start_resolution(),
            device: DeviceKind::default(),
            surface: SurfaceStyle::default(),
            color_attribute: default_color_attribute(),
            light_position: default_light_position(),
            light_color: default_light_color(),
            light_strength: default_light_strength(),
        }
    }
}

impl PreviewConfig {
    /// Load configuration from a RON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: PreviewConfig = ron::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_historical_parameters() {
        let config = PreviewConfig::default();
        assert_eq!(config.resolution, [256, 256]);
        assert_eq!(config.fov_degrees, 45.0);
        assert_eq!(config.samples, 20);
        assert_eq!(config.start_resolution, 64);
        assert_eq!(config.color_attribute, "Col");
        assert_eq!(config.light_position, [0.0, 0.0, -3.0]);
        assert_eq!(config.light_strength, 1000.0);
        assert_eq!(config.device, DeviceKind::Cpu);
        assert_eq!(config.surface, SurfaceStyle::Diffuse);
    }

    #[test]
    fn test_partial_ron_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(resolution: (512, 512), samples: 64)").unwrap();

        let config = PreviewConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.resolution, [512, 512]);
        assert_eq!(config.samples, 64);
        // Unspecified fields keep their defaults.
        assert_eq!(config.fov_degrees, 45.0);
    }
}
