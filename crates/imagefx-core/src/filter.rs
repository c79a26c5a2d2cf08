//! Filter interface and the flat configuration record.
//!
//! Each filter exposes the same three capabilities to the host: apply to a
//! 2D pixel buffer, report whether applying would be a no-op, and describe
//! itself as a [`FilterConfig`] record. Records are internally tagged by
//! `type`:
//!
//! ```json
//! { "type": "AutoHistogramFilter", "points": [[0, 0], [255, 255]] }
//! { "type": "MinMaxvalue", "blocksize": 3, "mode": "min" }
//! ```
//!
//! Building a filter from a record and turning it back into a record yields
//! identical parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, Region};
use crate::curve::ToneCurve;
use crate::equalize::{equalize, EqualizeScope};
use crate::error::FilterError;
use crate::window::{apply_window_filter, radius_for_blocksize, WindowMode};
use crate::{ControlPoint, ControlPointSet};

/// Default block size for the min/max filter.
pub const DEFAULT_BLOCKSIZE: u32 = 3;

/// Capabilities the host needs from a filter.
pub trait ImageFilter: fmt::Debug + Send + Sync {
    /// Apply the filter to the buffer in place.
    fn apply_to_2d(&self, buffer: &mut PixelBuffer<'_>);

    /// Check if applying the filter would leave every buffer unchanged.
    fn is_neutral_state(&self) -> bool;

    /// Describe the filter as a configuration record.
    fn to_config(&self) -> FilterConfig;
}

// ============================================================================
// Configuration Records
// ============================================================================

/// Flat, serializable filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FilterConfig {
    #[serde(rename = "AutoHistogramFilter")]
    AutoHistogram(AutoHistogramConfig),
    #[serde(rename = "MinMaxvalue")]
    MinMax(MinMaxConfig),
}

impl FilterConfig {
    /// The record's `type` tag.
    pub fn filter_type(&self) -> &'static str {
        match self {
            FilterConfig::AutoHistogram(_) => "AutoHistogramFilter",
            FilterConfig::MinMax(_) => "MinMaxvalue",
        }
    }

    /// Build the filter this record describes.
    pub fn build(&self) -> Result<Box<dyn ImageFilter>, FilterError> {
        Ok(match self {
            FilterConfig::AutoHistogram(config) => {
                Box::new(AutoHistogramFilter::from_config(config)?)
            }
            FilterConfig::MinMax(config) => Box::new(MinMaxFilter::from_config(config)),
        })
    }
}

/// Parameters of the equalize + tone curve filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoHistogramConfig {
    /// Tone curve control points, strictly increasing in x
    pub points: Vec<ControlPoint>,
    /// Histogram sampling region; the whole image when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(skip_serializing_if = "is_full_image")]
    pub scope: EqualizeScope,
}

impl Default for AutoHistogramConfig {
    fn default() -> Self {
        Self {
            points: ControlPointSet::identity_points(),
            region: None,
            scope: EqualizeScope::FullImage,
        }
    }
}

fn is_full_image(scope: &EqualizeScope) -> bool {
    *scope == EqualizeScope::FullImage
}

/// Parameters of the min/max window filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinMaxConfig {
    pub blocksize: u32,
    pub mode: WindowMode,
}

impl Default for MinMaxConfig {
    fn default() -> Self {
        Self {
            blocksize: DEFAULT_BLOCKSIZE,
            mode: WindowMode::Min,
        }
    }
}

// ============================================================================
// Equalize + Tone Curve
// ============================================================================

/// Histogram equalization followed by a Catmull-Rom tone curve.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoHistogramFilter {
    curve: ToneCurve,
    region: Option<Region>,
    scope: EqualizeScope,
}

impl Default for AutoHistogramFilter {
    fn default() -> Self {
        Self::new(&ControlPointSet::default())
    }
}

impl AutoHistogramFilter {
    pub fn new(points: &ControlPointSet) -> Self {
        Self {
            curve: ToneCurve::build(points),
            region: None,
            scope: EqualizeScope::FullImage,
        }
    }

    pub fn from_config(config: &AutoHistogramConfig) -> Result<Self, FilterError> {
        let points = ControlPointSet::new(config.points.clone())?;
        Ok(Self {
            curve: ToneCurve::build(&points),
            region: config.region,
            scope: config.scope,
        })
    }

    /// Sample the histogram from `region` instead of the whole image.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_scope(mut self, scope: EqualizeScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn curve(&self) -> &ToneCurve {
        &self.curve
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn scope(&self) -> EqualizeScope {
        self.scope
    }
}

impl ImageFilter for AutoHistogramFilter {
    fn apply_to_2d(&self, buffer: &mut PixelBuffer<'_>) {
        let region = self.region.unwrap_or_else(|| buffer.full_region());
        equalize(buffer, region, Some(&self.curve), self.scope);
    }

    /// Equalization changes any image with a spread of levels, so this filter
    /// is never neutral.
    fn is_neutral_state(&self) -> bool {
        false
    }

    fn to_config(&self) -> FilterConfig {
        FilterConfig::AutoHistogram(AutoHistogramConfig {
            points: self.curve.points().to_vec(),
            region: self.region,
            scope: self.scope,
        })
    }
}

// ============================================================================
// Min/Max Window
// ============================================================================

/// Local minimum or maximum over a square window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinMaxFilter {
    blocksize: u32,
    mode: WindowMode,
}

impl Default for MinMaxFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKSIZE, WindowMode::Min)
    }
}

impl MinMaxFilter {
    pub fn new(blocksize: u32, mode: WindowMode) -> Self {
        Self { blocksize, mode }
    }

    pub fn from_config(config: &MinMaxConfig) -> Self {
        Self::new(config.blocksize, config.mode)
    }

    pub fn blocksize(&self) -> u32 {
        self.blocksize
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn radius(&self) -> u32 {
        radius_for_blocksize(self.blocksize)
    }
}

impl ImageFilter for MinMaxFilter {
    fn apply_to_2d(&self, buffer: &mut PixelBuffer<'_>) {
        apply_window_filter(buffer, self.radius(), self.mode);
    }

    /// Block sizes of 0 or 1 give a zero radius, which changes nothing.
    fn is_neutral_state(&self) -> bool {
        self.radius() == 0
    }

    fn to_config(&self) -> FilterConfig {
        FilterConfig::MinMax(MinMaxConfig {
            blocksize: self.blocksize,
            mode: self.mode,
        })
    }
}
