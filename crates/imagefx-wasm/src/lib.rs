//! imagefx WASM - WebAssembly bindings for imagefx
//!
//! This crate exposes the imagefx-core canvas filters to a JavaScript canvas
//! host.
//!
//! # Module Structure
//!
//! - `filter` - Equalize/tone-curve and min/max filters over `ImageData`
//! - `curve` - Standalone tone curve evaluation and LUTs
//! - `histogram` - Region histograms for UI display
//! - `types` - Error conversion and pixel buffer helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { filterFromObject } from '@imagefx/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const filter = filterFromObject({ type: "MinMaxvalue", blocksize: 3, mode: "max" });
//! const out = filter.applyTo2d(ctx.getImageData(0, 0, w, h));
//! ctx.putImageData(out, 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod curve;
mod filter;
mod histogram;
mod types;

// Re-export public types
pub use curve::JsToneCurve;
pub use filter::{filter_from_object, JsFilter};
pub use histogram::{compute_histogram, JsHistogram};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
