use thiserror::Error;

/// Why the image provider could not produce a raster for a view.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The view kind cannot be rasterized (schedules, legends without content).
    #[error("{0}")]
    Unsupported(String),
    /// The export ran but failed.
    #[error("export failed: {0}")]
    Failed(String),
    #[error("failed to read exported image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode exported image: {0}")]
    Decode(#[from] image::ImageError),
    /// The export produced a zero-sized raster.
    #[error("exported image is empty")]
    Empty,
}

/// Failure conditions of the preview pipeline.
///
/// None of these are fatal: the session turns each of them into a
/// well-defined state (placeholder content or fallback placement) and keeps
/// polling.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("preview not available: {0}")]
    ExportFailure(#[from] ExportError),
    #[error("reference panel window not found")]
    WindowNotFound,
    #[error("image has no pixels")]
    EmptyImage,
}

pub type Result<T, E = PreviewError> = std::result::Result<T, E>;
