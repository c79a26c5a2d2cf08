//! Global histogram equalization with an optional tone curve.
//!
//! ## Algorithm
//! 1. Red-channel histogram over the sampled region
//! 2. Cumulative histogram, normalized so its last entry is 255
//! 3. Every pixel in scope is scaled by `ncdf[R] / R` on R, G and B
//! 4. The equalized channels are remapped through the tone curve, if any
//!
//! The red sample is the equalization key for all three channels, so hue is
//! roughly preserved while brightness follows the equalized distribution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::{PixelBuffer, Region, CHANNELS};
use crate::curve::{ToneCurve, ToneCurveLut};
use crate::histogram::{compute_histogram, CumulativeHistogram, Histogram, NUM_BINS};

/// Output scale for 8-bit remapping.
const OUTPUT_SCALE: f64 = 255.0;

/// Which pixels the equalization remaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EqualizeScope {
    /// Remap every pixel, whatever region the histogram was sampled from.
    #[default]
    FullImage,
    /// Remap only the pixels inside the sampled region.
    RegionOnly,
}

/// Equalize `buffer` in place using the histogram of `region`.
///
/// # Arguments
/// * `buffer` - RGBA pixel buffer, mutated in place
/// * `region` - Rectangle the histogram is sampled from
/// * `curve` - Optional tone curve applied after equalization
/// * `scope` - Whether the remap covers the whole buffer or only `region`
///
/// Alpha is never modified. An empty region or a single-level distribution
/// leaves the equalization step as a pass-through; the tone curve still runs.
pub fn equalize(
    buffer: &mut PixelBuffer<'_>,
    region: Region,
    curve: Option<&ToneCurve>,
    scope: EqualizeScope,
) {
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        ?region,
        ?scope,
        tone_curve = curve.is_some(),
        "equalizing histogram"
    );

    let hist = compute_histogram(buffer, region);
    let ratios = equalization_ratios(&hist);
    let lut = curve
        .map(ToneCurveLut::from_curve)
        .filter(|lut| !lut.is_identity());

    if ratios.is_none() && lut.is_none() {
        return;
    }

    let target = match scope {
        EqualizeScope::FullImage => buffer.full_region(),
        EqualizeScope::RegionOnly => region.clamp_to(buffer.width(), buffer.height()),
    };
    if target.is_empty() {
        return;
    }

    for y in target.y1..target.y2 {
        let row_start = buffer.index(target.x1, y);
        let row_end = buffer.index(target.x2, y);
        for px in buffer.data_mut()[row_start..row_end].chunks_exact_mut(CHANNELS) {
            if let Some(ratios) = &ratios {
                let ratio = ratios[px[0] as usize];
                px[0] = scale_channel(px[0], ratio);
                px[1] = scale_channel(px[1], ratio);
                px[2] = scale_channel(px[2], ratio);
            }
            if let Some(lut) = &lut {
                px[0] = lut.map(px[0]);
                px[1] = lut.map(px[1]);
                px[2] = lut.map(px[2]);
            }
        }
    }
}

/// Per-level scale factors `ncdf[lev] / lev`.
///
/// Level 0 maps to a ratio of 1 so black pixels pass through. Returns `None`
/// when the histogram has no spread to equalize: no pixels at all, or every
/// pixel on the same level.
pub fn equalization_ratios(hist: &Histogram) -> Option<[f64; NUM_BINS]> {
    if hist.occupied_bins() <= 1 {
        debug!(
            pixels = hist.total(),
            "degenerate histogram, skipping equalization"
        );
        return None;
    }

    let ncdf = CumulativeHistogram::from_histogram(hist).normalize(OUTPUT_SCALE)?;

    let mut ratios = [1.0f64; NUM_BINS];
    for (lev, ratio) in ratios.iter_mut().enumerate().skip(1) {
        *ratio = ncdf[lev] / lev as f64;
    }
    Some(ratios)
}

#[inline]
fn scale_channel(value: u8, ratio: f64) -> u8 {
    (value as f64 * ratio).clamp(0.0, 255.0).round() as u8
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = (u32, u32, Vec<u8>)> {
        (1u32..=12, 1u32..=12).prop_flat_map(|(w, h)| {
            (
                Just(w),
                Just(h),
                prop::collection::vec(any::<u8>(), (w * h * 4) as usize),
            )
        })
    }

    proptest! {
        /// Property: alpha and black (R == 0) pixels are never changed.
        #[test]
        fn prop_alpha_and_black_preserved((w, h, original) in image_strategy()) {
            let mut data = original.clone();
            let mut buf = PixelBuffer::new(&mut data, w, h).unwrap();
            let region = buf.full_region();
            equalize(&mut buf, region, None, EqualizeScope::FullImage);

            for (before, after) in original.chunks_exact(4).zip(data.chunks_exact(4)) {
                prop_assert_eq!(before[3], after[3]);
                if before[0] == 0 {
                    prop_assert_eq!(before, after);
                }
            }
        }

        /// Property: the brightest red level always maps to 255.
        #[test]
        fn prop_max_level_maps_to_white((w, h, original) in image_strategy()) {
            let mut data = original.clone();
            let mut buf = PixelBuffer::new(&mut data, w, h).unwrap();
            let hist = compute_histogram(&buf, buf.full_region());
            prop_assume!(hist.occupied_bins() > 1);

            let region = buf.full_region();
            equalize(&mut buf, region, None, EqualizeScope::FullImage);

            let max_red = original.chunks_exact(4).map(|p| p[0]).max().unwrap();
            for (before, after) in original.chunks_exact(4).zip(data.chunks_exact(4)) {
                if before[0] == max_red {
                    prop_assert_eq!(after[0], 255);
                }
            }
        }
    }
}
