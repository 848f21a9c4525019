//! Custom error types for rechroma.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the rechroma library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to create the output directory.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model asset file is missing.
    #[error("model asset not found: {path}")]
    MissingAsset { path: PathBuf },

    /// Failed to load the ONNX graph.
    #[error("failed to load ONNX model {name}: {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: ort::Error,
    },

    /// Failed to read the cluster-point table.
    #[error("failed to read cluster-point table {path}: {source}")]
    ClusterTable {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A session command was issued before an image was opened.
    #[error("no image has been opened")]
    NoImageOpen,

    /// Save was requested before any image was colorized.
    #[error("no image has been colorized to save")]
    NothingColorized,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

/// Result type alias for rechroma operations.
pub type Result<T> = std::result::Result<T, Error>;
