//! Error types for the validation helpers.

use thiserror::Error;

/// Invalid-argument failures reported by the validators.
///
/// Every variant carries enough context to tell the caller which value was
/// rejected and which constraint it broke.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Alignment is not one of left/center/right/top/bottom.
    #[error("incorrect alignment value \"{0}\"")]
    InvalidAlignment(String),

    /// Orientation is not horizontal/vertical.
    #[error("invalid orientation value \"{0}\"")]
    InvalidOrientation(String),

    /// Position is not one of the eight compass positions.
    #[error("invalid position value \"{0}\"")]
    InvalidPosition(String),

    /// Color is not a sequence at all.
    #[error("color must be a tuple or list, got {0}")]
    ColorNotSequence(String),

    /// Color has the wrong number of elements.
    #[error("color must be a tuple or list of 3 or 4 numbers, got {len} elements")]
    ColorArity {
        /// Number of elements found.
        len: usize,
    },

    /// A color channel is not an integer.
    #[error("\"{value}\" in element {index} of color {color} must be an integer")]
    ColorChannelType {
        /// Channel index (3 = alpha).
        index: usize,
        /// Offending element.
        value: String,
        /// Whole color as given.
        color: String,
    },

    /// A color channel is outside 0..=255.
    #[error("\"{value}\" in element {index} of color {color} must be a number between 0 and 255")]
    ColorChannelRange {
        /// Channel index (3 = alpha).
        index: usize,
        /// Offending value.
        value: i64,
        /// Whole color as given.
        color: String,
    },

    /// Vector is not a sequence.
    #[error("vector {0} must be a list or tuple of 2 items")]
    VectorNotSequence(String),

    /// Vector does not have exactly two elements.
    #[error("vector {vector} must contain 2 items only")]
    VectorArity {
        /// Vector as given.
        vector: String,
    },

    /// A vector element is not a number.
    #[error("each item of {vector} vector must be integer or float")]
    VectorElementType {
        /// Vector as given.
        vector: String,
    },

    /// Surface size is negative, not finite, or too large to allocate.
    #[error(
        "surface width and height must be between 0 and {max}, got {width}x{height}",
        max = u32::MAX
    )]
    SurfaceSize {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
}

/// Result type alias for validation helpers.
pub type ValidationResult<T> = Result<T, ValidationError>;
