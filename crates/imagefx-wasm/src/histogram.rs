//! Histogram computation WASM bindings.
//!
//! This module lets the UI inspect the distribution the equalizer works from:
//! the red-channel histogram of a region, its running sum and the normalized
//! cumulative curve.

use imagefx_core::histogram::{compute_histogram as compute_histogram_core, CumulativeHistogram};
use imagefx_core::Region;
use wasm_bindgen::prelude::*;

use crate::types::pixel_buffer;

/// Output scale of the normalized cumulative histogram.
const NORMALIZED_SCALE: f64 = 255.0;

/// Histogram result accessible from JavaScript.
#[wasm_bindgen]
pub struct JsHistogram {
    bins: Vec<u32>,
    cumulative: Vec<f64>,
    normalized: Vec<f64>,
    total: f64,
    max_value: u32,
}

#[wasm_bindgen]
impl JsHistogram {
    /// Get red channel histogram (256 bins).
    pub fn bins(&self) -> Vec<u32> {
        self.bins.clone()
    }

    /// Get the cumulative histogram (256 entries).
    pub fn cumulative(&self) -> Vec<f64> {
        self.cumulative.clone()
    }

    /// Get the cumulative histogram scaled to 0-255.
    ///
    /// Empty when the region holds no pixels.
    pub fn normalized(&self) -> Vec<f64> {
        self.normalized.clone()
    }

    /// Number of pixels binned.
    #[wasm_bindgen(getter)]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Largest bin count, for normalizing the display.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }
}

/// Compute the red-channel histogram of a region of RGBA pixel data.
///
/// # Arguments
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `x1`, `y1`, `x2`, `y2` - Half-open region; clamped to the image
///
/// # Example (TypeScript)
/// ```typescript
/// const hist = compute_histogram(imageData.data, w, h, 0, 0, w, h);
/// const bins = hist.bins();          // Uint32Array[256]
/// const ncdf = hist.normalized();    // Float64Array[256]
/// hist.free();
/// ```
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn compute_histogram(
    mut pixels: Vec<u8>,
    width: u32,
    height: u32,
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
) -> Result<JsHistogram, JsValue> {
    let buffer = pixel_buffer(&mut pixels, width, height)?;
    let hist = compute_histogram_core(&buffer, Region::new(x1, y1, x2, y2));
    let cdf = CumulativeHistogram::from_histogram(&hist);

    Ok(JsHistogram {
        bins: hist.bins.to_vec(),
        cumulative: cdf.cdf.iter().map(|&c| c as f64).collect(),
        normalized: cdf
            .normalize(NORMALIZED_SCALE)
            .map(|ncdf| ncdf.to_vec())
            .unwrap_or_default(),
        total: cdf.total() as f64,
        max_value: hist.max_value(),
    })
}
