//! Error types for haar-cascade

use thiserror::Error;

use crate::primitives::{Rectangle, Size};

/// Errors raised while building, training or applying a detector
#[derive(Debug, Error)]
pub enum Error {
    /// Threshold search needs a minimum number of weighted examples
    #[error("insufficient training data: need at least {required} examples, got {actual}")]
    InsufficientTrainingData { required: usize, actual: usize },

    /// The selected weak classifier has an error that yields no usable beta
    #[error("degenerate weak classifier: weighted error {error} is outside (0, 1)")]
    DegenerateWeakClassifier { error: f64 },

    /// A rectangle or pixel query falls outside the image
    #[error("{rect:?} is out of range for a {width}x{height} image")]
    OutOfRange {
        rect: Rectangle,
        width: u32,
        height: u32,
    },

    /// Template grid could not be parsed into a mask
    #[error("invalid mask template `{name}`: {reason}")]
    InvalidMaskTemplate { name: String, reason: String },

    /// The classifier has nothing to decide with
    #[error("undetermined classification: {0}")]
    Undetermined(String),

    /// An image does not match the size a model was trained on
    #[error("image size mismatch: expected {expected:?}, got {actual:?}")]
    ImageSizeMismatch { expected: Size, actual: Size },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for detector operations
pub type Result<T> = std::result::Result<T, Error>;
