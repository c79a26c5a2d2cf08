//! Error types for filter configuration and buffer validation.
//!
//! Only structurally invalid input is an error. Data-dependent edge cases
//! (empty regions, black pixels, window coordinates past the border) are
//! resolved inside the filters and never surface here.

use thiserror::Error;

/// Errors raised while configuring a filter or wrapping a pixel buffer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A tone curve needs at least two control points.
    #[error("Tone curve needs at least 2 control points, got {count}")]
    TooFewControlPoints { count: usize },

    /// Control point x values must be strictly increasing.
    #[error("Control point {index} does not have a strictly increasing x value")]
    NonIncreasingControlPoints { index: usize },

    /// Control point coordinates must be finite numbers.
    #[error("Control point {index} has a non-finite coordinate")]
    NonFiniteControlPoint { index: usize },

    /// Window mode names are `min` and `max`.
    #[error("Unknown window mode: {0}")]
    InvalidWindowMode(String),

    /// Pixel slice length does not match `width * height * 4`.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}
