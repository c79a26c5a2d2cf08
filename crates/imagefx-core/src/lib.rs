//! imagefx Core - canvas pixel filters
//!
//! This crate provides the CPU implementation of the canvas filters used by
//! imagefx: histogram equalization chained through a Catmull-Rom tone curve,
//! and a windowed min/max rank filter. All filters mutate a caller-owned RGBA
//! buffer in place.

pub mod buffer;
pub mod curve;
pub mod equalize;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod window;

pub use buffer::{PixelBuffer, Region};
pub use curve::{apply_tone_curve, ToneCurve, ToneCurveLut};
pub use equalize::{equalize, EqualizeScope};
pub use error::FilterError;
pub use filter::{AutoHistogramFilter, FilterConfig, ImageFilter, MinMaxFilter};
pub use histogram::{compute_histogram, CumulativeHistogram, Histogram};
pub use window::{apply_window_filter, radius_for_blocksize, WindowMode};

use serde::{Deserialize, Serialize};

/// Tone curve control point
///
/// Serialized as an `[x, y]` pair. Deserializes from either a pair or an
/// `{ "x": .., "y": .. }` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ControlPointRepr", into = "(f64, f64)")]
pub struct ControlPoint {
    /// Input level (0.0 to 255.0)
    pub x: f64,
    /// Output level (0.0 to 255.0)
    pub y: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ControlPointRepr {
    Pair(f64, f64),
    Object { x: f64, y: f64 },
}

impl From<ControlPointRepr> for ControlPoint {
    fn from(repr: ControlPointRepr) -> Self {
        match repr {
            ControlPointRepr::Pair(x, y) | ControlPointRepr::Object { x, y } => Self { x, y },
        }
    }
}

impl From<ControlPoint> for (f64, f64) {
    fn from(p: ControlPoint) -> Self {
        (p.x, p.y)
    }
}

/// Validated control points: at least two, finite, strictly increasing in x.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointSet {
    points: Vec<ControlPoint>,
}

impl Default for ControlPointSet {
    fn default() -> Self {
        Self {
            // Identity mapping
            points: Self::identity_points(),
        }
    }
}

impl ControlPointSet {
    /// Validate control points in the order given.
    pub fn new(points: Vec<ControlPoint>) -> Result<Self, FilterError> {
        if points.len() < 2 {
            return Err(FilterError::TooFewControlPoints {
                count: points.len(),
            });
        }
        for (index, p) in points.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(FilterError::NonFiniteControlPoint { index });
            }
        }
        for (index, pair) in points.windows(2).enumerate() {
            if pair[1].x <= pair[0].x {
                return Err(FilterError::NonIncreasingControlPoints { index: index + 1 });
            }
        }
        Ok(Self { points })
    }

    /// Sort by x (larger y first on ties) and validate.
    ///
    /// Duplicate x values still fail validation after sorting.
    pub fn sorted(mut points: Vec<ControlPoint>) -> Result<Self, FilterError> {
        points.sort_by(|a, b| a.x.total_cmp(&b.x).then(b.y.total_cmp(&a.y)));
        Self::new(points)
    }

    /// The default `{(0, 0), (255, 255)}` points.
    pub fn identity_points() -> Vec<ControlPoint> {
        vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(255.0, 255.0)]
    }

    /// Check if this is exactly the default identity set.
    pub fn is_identity(&self) -> bool {
        self.points == Self::identity_points()
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a validated set holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<ControlPoint> {
        self.points
    }
}
