use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Scene-description export, owned by the editor's export subsystem
///
/// Black-box contract: given the current mesh and viewport, produce a file
/// the external renderer can consume at `path`. What goes into the file is
/// entirely the exporter's business.
pub trait SceneExporter {
    fn export(&self, path: &Path, width: u32, height: u32) -> Result<(), ExportError>;
}
