use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the external ray-tracer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaytraceConfig {
    /// Renderer executable, resolved through `PATH` unless absolute
    #[serde(default = "default_program")]
    pub program: String,

    /// Antialiasing threshold passed to the renderer
    #[serde(default = "default_antialias_threshold")]
    pub antialias_threshold: f32,

    /// Directory scene, image and log files are written to
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Kill a renderer that runs longer than this many seconds
    ///
    /// Unset means wait forever, matching the renderer's own behavior.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_program() -> String {
    "povray".to_string()
}

fn default_antialias_threshold() -> f32 {
    0.1
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Default for RaytraceConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            antialias_threshold: default_antialias_threshold(),
            work_dir: default_work_dir(),
            timeout_secs: None,
        }
    }
}

impl RaytraceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Load configuration from a RON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: RaytraceConfig = ron::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RaytraceConfig::default();
        assert_eq!(config.program, "povray");
        assert_eq!(config.antialias_threshold, 0.1);
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.work_dir, std::env::temp_dir());
    }

    #[test]
    fn test_partial_ron_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(program: \"povray39\", timeout_secs: Some(120))").unwrap();

        let config = RaytraceConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.program, "povray39");
        assert_eq!(config.timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.antialias_threshold, 0.1);
    }
}
