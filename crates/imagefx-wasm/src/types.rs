//! Shared helpers for crossing the JS boundary.
//!
//! Core errors become JS `Error` objects, and raw RGBA slices coming from
//! `ImageData` are wrapped into core pixel buffers.

use imagefx_core::{FilterError, PixelBuffer};
use wasm_bindgen::prelude::*;

/// Convert a core error into a JS `Error`, logging it to the console.
pub(crate) fn to_js_error(err: FilterError) -> JsValue {
    let message = err.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

/// Convert a serde-wasm-bindgen error into a JS `Error`.
pub(crate) fn config_error(context: &str, err: serde_wasm_bindgen::Error) -> JsValue {
    let message = format!("{}: {}", context, err);
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

/// Wrap an RGBA slice, reporting a size mismatch as a JS error.
pub(crate) fn pixel_buffer(
    pixels: &mut [u8],
    width: u32,
    height: u32,
) -> Result<PixelBuffer<'_>, JsValue> {
    PixelBuffer::new(pixels, width, height).map_err(to_js_error)
}
