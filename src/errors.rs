use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for the segmentation engine
#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Metadata serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    /// Requested rank is outside `0 < nth < total` (total includes the background).
    #[error("Component rank {nth} out of range for {total} labelled components")]
    ComponentRank { nth: usize, total: usize },

    #[error("Source image has no pixels")]
    EmptyImage,

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),

    #[error("Window error: {0}")]
    Window(String),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, SegmentError>;
