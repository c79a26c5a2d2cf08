//! Canvas filter WASM bindings.
//!
//! A `JsFilter` wraps either core filter behind the same three methods the
//! canvas host calls: `applyTo2d`, `isNeutralState` and `toObject`. Filters are
//! created from typed constructors or from a plain configuration object:
//!
//! ```typescript
//! const eq = JsFilter.autoHistogram([[0, 0], [128, 150], [255, 255]]);
//! const min = JsFilter.minMax(5, "min");
//! const restored = filterFromObject({ type: "MinMaxvalue", blocksize: 5, mode: "min" });
//!
//! if (!min.isNeutralState()) {
//!   ctx.putImageData(min.applyTo2d(ctx.getImageData(0, 0, w, h)), 0, 0);
//! }
//! ```

use imagefx_core::filter::{AutoHistogramFilter, FilterConfig, ImageFilter, MinMaxFilter};
use imagefx_core::{ControlPoint, ControlPointSet, WindowMode};
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use web_sys::ImageData;

use crate::types::{config_error, pixel_buffer, to_js_error};

/// A configured canvas filter.
#[wasm_bindgen]
pub struct JsFilter {
    inner: Box<dyn ImageFilter>,
}

#[wasm_bindgen]
impl JsFilter {
    /// Histogram equalization chained through a tone curve.
    ///
    /// # Arguments
    /// * `points` - Array of `[x, y]` pairs or `{x, y}` objects, strictly increasing in x
    #[wasm_bindgen(js_name = autoHistogram)]
    pub fn auto_histogram(points: JsValue) -> Result<JsFilter, JsValue> {
        let points: Vec<ControlPoint> = serde_wasm_bindgen::from_value(points)
            .map_err(|e| config_error("Invalid curve points", e))?;
        let set = ControlPointSet::new(points).map_err(to_js_error)?;
        Ok(Self::from_filter(AutoHistogramFilter::new(&set)))
    }

    /// Local minimum or maximum over a square window.
    ///
    /// # Arguments
    /// * `blocksize` - Window side; 0 or 1 is a no-op
    /// * `mode` - `"min"` or `"max"`
    #[wasm_bindgen(js_name = minMax)]
    pub fn min_max(blocksize: u32, mode: &str) -> Result<JsFilter, JsValue> {
        let mode: WindowMode = mode.parse().map_err(to_js_error)?;
        Ok(Self::from_filter(MinMaxFilter::new(blocksize, mode)))
    }

    /// The configuration record's `type` tag.
    #[wasm_bindgen(getter, js_name = filterType)]
    pub fn filter_type(&self) -> String {
        self.inner.to_config().filter_type().to_string()
    }

    /// Filter canvas `ImageData`, returning a new `ImageData` of the same size.
    #[wasm_bindgen(js_name = applyTo2d)]
    pub fn apply_to_2d(&self, image_data: &ImageData) -> Result<ImageData, JsValue> {
        let width = image_data.width();
        let height = image_data.height();
        let mut pixels = image_data.data().0;

        self.apply_to_pixels(&mut pixels, width, height)?;

        ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_slice()), width, height)
    }

    /// Filter raw RGBA pixel data in place.
    #[wasm_bindgen(js_name = applyToPixels)]
    pub fn apply_to_pixels(&self, pixels: &mut [u8], width: u32, height: u32) -> Result<(), JsValue> {
        let mut buffer = pixel_buffer(pixels, width, height)?;
        self.inner.apply_to_2d(&mut buffer);
        Ok(())
    }

    /// Check if applying this filter would change nothing.
    #[wasm_bindgen(js_name = isNeutralState)]
    pub fn is_neutral_state(&self) -> bool {
        self.inner.is_neutral_state()
    }

    /// Describe the filter as a plain configuration object.
    #[wasm_bindgen(js_name = toObject)]
    pub fn to_object(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.to_config())
            .map_err(|e| config_error("Failed to serialize filter", e))
    }
}

impl JsFilter {
    fn from_filter(filter: impl ImageFilter + 'static) -> Self {
        Self {
            inner: Box::new(filter),
        }
    }

    pub(crate) fn from_config(config: &FilterConfig) -> Result<Self, JsValue> {
        let inner = config.build().map_err(to_js_error)?;
        Ok(Self { inner })
    }
}

/// Build a filter from a configuration object such as
/// `{ type: "AutoHistogramFilter", points: [[0, 0], [255, 255]] }`.
#[wasm_bindgen(js_name = filterFromObject)]
pub fn filter_from_object(object: JsValue) -> Result<JsFilter, JsValue> {
    let config: FilterConfig = serde_wasm_bindgen::from_value(object)
        .map_err(|e| config_error("Invalid filter configuration", e))?;
    JsFilter::from_config(&config)
}
