//! Tone curve WASM bindings.
//!
//! This module exposes the Catmull-Rom tone curve to JavaScript for curve
//! previews in the UI and for standalone curve application.

use imagefx_core::curve::{apply_tone_curve as core_apply, ToneCurve, ToneCurveLut};
use imagefx_core::{ControlPoint, ControlPointSet};
use wasm_bindgen::prelude::*;

use crate::types::{config_error, to_js_error};

/// JavaScript-accessible tone curve.
///
/// # Example (TypeScript)
/// ```typescript
/// const curve = new JsToneCurve([[0, 0], [64, 40], [255, 255]]);
/// const y = curve.evaluate(100);     // 0-255
/// const lut = curve.get_lut();       // Uint8Array[256]
/// curve.free();
/// ```
#[wasm_bindgen]
pub struct JsToneCurve {
    curve: ToneCurve,
    lut: ToneCurveLut,
}

#[wasm_bindgen]
impl JsToneCurve {
    /// Build a curve from control points.
    ///
    /// # Arguments
    /// * `points` - Array of `[x, y]` pairs or `{x, y}` objects, strictly increasing in x
    ///
    /// # Errors
    /// Returns an error if points cannot be deserialized or are malformed
    #[wasm_bindgen(constructor)]
    pub fn new(points: JsValue) -> Result<JsToneCurve, JsValue> {
        let points: Vec<ControlPoint> = serde_wasm_bindgen::from_value(points)
            .map_err(|e| config_error("Invalid curve points", e))?;
        let set = ControlPointSet::new(points).map_err(to_js_error)?;
        Ok(Self::from_set(&set))
    }

    /// Build a curve from control points in any order.
    #[wasm_bindgen(js_name = fromUnsortedPoints)]
    pub fn from_unsorted_points(points: JsValue) -> Result<JsToneCurve, JsValue> {
        let points: Vec<ControlPoint> = serde_wasm_bindgen::from_value(points)
            .map_err(|e| config_error("Invalid curve points", e))?;
        let set = ControlPointSet::sorted(points).map_err(to_js_error)?;
        Ok(Self::from_set(&set))
    }

    /// Identity curve through (0, 0) and (255, 255).
    pub fn identity() -> JsToneCurve {
        Self::from_set(&ControlPointSet::default())
    }

    /// Evaluate the curve at input level `x` (0-255 output).
    pub fn evaluate(&self, x: f64) -> u8 {
        self.curve.evaluate(x)
    }

    /// Check if this curve produces no change.
    pub fn is_identity(&self) -> bool {
        self.lut.is_identity()
    }

    /// Get raw LUT data (256 bytes) for visualization.
    ///
    /// Returns a Vec<u8> where lut[i] = output value for input i.
    pub fn get_lut(&self) -> Vec<u8> {
        self.lut.lut.to_vec()
    }

    /// Apply the curve to the RGB samples of RGBA pixel data in place.
    pub fn apply(&self, pixels: &mut [u8]) {
        core_apply(pixels, &self.lut);
    }
}

impl JsToneCurve {
    fn from_set(set: &ControlPointSet) -> Self {
        let curve = ToneCurve::build(set);
        let lut = ToneCurveLut::from_curve(&curve);
        Self { curve, lut }
    }
}
