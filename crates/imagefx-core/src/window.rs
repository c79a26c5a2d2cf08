//! Windowed min/max rank filter.
//!
//! For every pixel the filter looks at a square window of side `2 * radius`
//! (offsets `-radius..radius` on both axes) in the unmodified input, and writes
//! the window's minimum or maximum red sample into R, G and B. Coordinates past
//! the border are clamped, so edge pixels reuse the boundary row or column.
//!
//! # Algorithm
//!
//! Clamping a contiguous run of offsets yields a contiguous run of in-bounds
//! coordinates, so the window is always a rectangle of real pixels and its
//! extremum separates into a row pass followed by a column pass. This costs
//! O(W·H·radius) instead of O(W·H·radius²) with identical output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::FilterError;

/// Which order statistic the window filter writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    #[default]
    Min,
    Max,
}

impl WindowMode {
    /// Reduce window samples to the selected extremum.
    #[inline]
    fn reduce(self, samples: impl Iterator<Item = u8>) -> u8 {
        match self {
            WindowMode::Min => samples.fold(u8::MAX, u8::min),
            WindowMode::Max => samples.fold(u8::MIN, u8::max),
        }
    }
}

impl FromStr for WindowMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(WindowMode::Min),
            "max" => Ok(WindowMode::Max),
            other => Err(FilterError::InvalidWindowMode(other.to_string())),
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMode::Min => f.write_str("min"),
            WindowMode::Max => f.write_str("max"),
        }
    }
}

/// Window radius for a block size: `floor(blocksize / 2)`.
#[inline]
pub fn radius_for_blocksize(blocksize: u32) -> u32 {
    blocksize / 2
}

/// Apply the min/max window filter in place.
///
/// # Arguments
/// * `buffer` - RGBA pixel buffer, mutated in place
/// * `radius` - Half the window side; 0 leaves the buffer untouched
/// * `mode` - Minimum or maximum
///
/// All reads come from a snapshot of the red channel taken before the first
/// write. Alpha is never modified.
pub fn apply_window_filter(buffer: &mut PixelBuffer<'_>, radius: u32, mode: WindowMode) {
    if radius == 0 || buffer.is_empty() {
        return;
    }

    debug!(
        width = buffer.width(),
        height = buffer.height(),
        radius,
        ?mode,
        "applying window filter"
    );

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let radius = radius as usize;
    let snapshot = buffer.red_plane();

    // Row pass: extremum over each pixel's horizontal span
    let mut rows = vec![0u8; width * height];
    for y in 0..height {
        let src = &snapshot[y * width..(y + 1) * width];
        let dst = &mut rows[y * width..(y + 1) * width];
        for (x, out) in dst.iter_mut().enumerate() {
            let (lo, hi) = window_span(x, radius, width);
            *out = mode.reduce(src[lo..=hi].iter().copied());
        }
    }

    // Column pass over the row extrema, written straight into the output
    let data = buffer.data_mut();
    for y in 0..height {
        let (lo, hi) = window_span(y, radius, height);
        for x in 0..width {
            let value = mode.reduce((lo..=hi).map(|yy| rows[yy * width + x]));
            let idx = (y * width + x) * CHANNELS;
            data[idx] = value;
            data[idx + 1] = value;
            data[idx + 2] = value;
        }
    }
}

/// Inclusive span of clamped coordinates covered by offsets `-radius..radius`.
#[inline]
fn window_span(center: usize, radius: usize, len: usize) -> (usize, usize) {
    let lo = center.saturating_sub(radius);
    let hi = (center + radius - 1).min(len - 1);
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct per-pixel scan with clamped reads.
    pub(super) fn brute_force(
        data: &[u8],
        width: u32,
        height: u32,
        radius: u32,
        mode: WindowMode,
    ) -> Vec<u8> {
        let mut out = data.to_vec();
        if radius == 0 {
            return out;
        }
        let (w, h, r) = (width as i64, height as i64, radius as i64);
        for y in 0..h {
            for x in 0..w {
                let mut min_value = 255u8;
                let mut max_value = 0u8;
                for dy in -r..r {
                    for dx in -r..r {
                        let sy = (y + dy).clamp(0, h - 1);
                        let sx = (x + dx).clamp(0, w - 1);
                        let v = data[((sy * w + sx) * 4) as usize];
                        min_value = min_value.min(v);
                        max_value = max_value.max(v);
                    }
                }
                let value = match mode {
                    WindowMode::Min => min_value,
                    WindowMode::Max => max_value,
                };
                let idx = ((y * w + x) * 4) as usize;
                out[idx] = value;
                out[idx + 1] = value;
                out[idx + 2] = value;
            }
        }
        out
    }

    fn gray(levels: &[u8]) -> Vec<u8> {
        levels.iter().flat_map(|&v| [v, v, v, 255]).collect()
    }

    fn run(data: &mut [u8], width: u32, height: u32, radius: u32, mode: WindowMode) {
        let mut buf = PixelBuffer::new(data, width, height).unwrap();
        apply_window_filter(&mut buf, radius, mode);
    }

    #[test]
    fn test_radius_for_blocksize() {
        assert_eq!(radius_for_blocksize(0), 0);
        assert_eq!(radius_for_blocksize(1), 0);
        assert_eq!(radius_for_blocksize(2), 1);
        assert_eq!(radius_for_blocksize(3), 1);
        assert_eq!(radius_for_blocksize(7), 3);
    }

    #[test]
    fn test_radius_zero_is_noop() {
        let original: Vec<u8> = (0..36).map(|i| (i * 7) as u8).collect();
        let mut data = original.clone();
        run(&mut data, 3, 3, 0, WindowMode::Max);
        assert_eq!(data, original);
    }

    #[test]
    fn test_min_whole_image_window() {
        let mut levels = [10u8; 9];
        levels[0] = 250;
        let mut data = gray(&levels);

        run(&mut data, 3, 3, 3, WindowMode::Min);

        assert_eq!(data, gray(&[10; 9]));
    }

    #[test]
    fn test_max_whole_image_window() {
        let mut levels = [10u8; 9];
        levels[0] = 250;
        let mut data = gray(&levels);

        run(&mut data, 3, 3, 3, WindowMode::Max);

        assert_eq!(data, gray(&[250; 9]));
    }

    #[test]
    fn test_min_writes_red_into_all_channels() {
        // Only red drives the result; green and blue are overwritten.
        let mut data = vec![
            90, 1, 2, 255, //
            30, 200, 200, 255, //
        ];
        run(&mut data, 2, 1, 1, WindowMode::Min);
        // Pixel 0 window: x in {-1, 0} -> clamped {0}
        assert_eq!(&data[..4], &[90, 90, 90, 255]);
        // Pixel 1 window: x in {0, 1}
        assert_eq!(&data[4..], &[30, 30, 30, 255]);
    }

    #[test]
    fn test_window_is_anchored_up_left() {
        // Single bright pixel at (1, 1); radius 1 covers offsets -1..=0
        let mut levels = [10u8; 9];
        levels[4] = 200;
        let mut data = gray(&levels);

        run(&mut data, 3, 3, 1, WindowMode::Max);

        #[rustfmt::skip]
        let expected = gray(&[
            10, 10, 10,
            10, 200, 200,
            10, 200, 200,
        ]);
        assert_eq!(data, expected);
    }

    #[test]
    fn test_alpha_untouched() {
        let mut data = vec![10, 10, 10, 1, 20, 20, 20, 2, 30, 30, 30, 3, 40, 40, 40, 4];
        run(&mut data, 2, 2, 2, WindowMode::Max);
        assert_eq!([data[3], data[7], data[11], data[15]], [1, 2, 3, 4]);
    }

    #[test]
    fn test_matches_brute_force_5x5() {
        let levels: Vec<u8> = (0..25u32).map(|i| ((i * 37 + 11) % 256) as u8).collect();
        let original = gray(&levels);

        for radius in 0..=4 {
            for mode in [WindowMode::Min, WindowMode::Max] {
                let expected = brute_force(&original, 5, 5, radius, mode);
                let mut data = original.clone();
                run(&mut data, 5, 5, radius, mode);
                assert_eq!(data, expected, "radius={} mode={:?}", radius, mode);
            }
        }
    }

    #[test]
    fn test_single_pixel_image() {
        let mut data = vec![77, 1, 2, 3];
        run(&mut data, 1, 1, 5, WindowMode::Min);
        assert_eq!(data, vec![77, 77, 77, 3]);
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("min".parse::<WindowMode>(), Ok(WindowMode::Min));
        assert_eq!("max".parse::<WindowMode>(), Ok(WindowMode::Max));
        assert_eq!(
            "median".parse::<WindowMode>(),
            Err(FilterError::InvalidWindowMode("median".to_string()))
        );
        assert_eq!(WindowMode::Max.to_string(), "max");
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&WindowMode::Max).unwrap(), "\"max\"");
        let mode: WindowMode = serde_json::from_str("\"min\"").unwrap();
        assert_eq!(mode, WindowMode::Min);
    }
}
