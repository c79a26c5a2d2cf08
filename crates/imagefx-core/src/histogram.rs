//! Red-channel histogram and cumulative distribution over an image region.
//!
//! The red sample doubles as the intensity key for equalization, so only the
//! red channel is binned.

use crate::buffer::{PixelBuffer, Region, CHANNELS};

/// Number of histogram bins (one per 8-bit level).
pub const NUM_BINS: usize = 256;

/// Histogram of red sample values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// Pixel count per level (256 bins)
    pub bins: [u32; NUM_BINS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            bins: [0; NUM_BINS],
        }
    }
}

impl Histogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of binned pixels.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Number of bins holding at least one pixel.
    pub fn occupied_bins(&self) -> usize {
        self.bins.iter().filter(|&&c| c > 0).count()
    }

    /// Find the largest bin count
    pub fn max_value(&self) -> u32 {
        *self.bins.iter().max().unwrap_or(&0)
    }
}

/// Compute the red-channel histogram of `region` (clamped to the buffer).
///
/// # Arguments
/// * `buffer` - RGBA pixel buffer
/// * `region` - Pixel rectangle to sample; columns `x1..x2`, rows `y1..y2`
///
/// # Performance
/// Single pass over the region, constant memory (1KB for bins).
pub fn compute_histogram(buffer: &PixelBuffer<'_>, region: Region) -> Histogram {
    let mut hist = Histogram::new();
    let region = region.clamp_to(buffer.width(), buffer.height());

    if region.is_empty() {
        return hist;
    }

    let data = buffer.data();
    for y in region.y1..region.y2 {
        let row_start = buffer.index(region.x1, y);
        let row_end = buffer.index(region.x2, y);
        for px in data[row_start..row_end].chunks_exact(CHANNELS) {
            hist.bins[bin_for(px[0])] += 1;
        }
    }

    hist
}

/// Bin for an 8-bit sample: `floor(sample / 255 * (NUM_BINS - 1))`.
///
/// With 256 bins this is the sample itself.
#[inline]
fn bin_for(sample: u8) -> usize {
    sample as usize * (NUM_BINS - 1) / 255
}

/// Running sum of a histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeHistogram {
    pub cdf: [u64; NUM_BINS],
}

impl CumulativeHistogram {
    /// Build the cumulative histogram: `cdf[0] = hist[0]`, `cdf[i] = cdf[i-1] + hist[i]`.
    pub fn from_histogram(hist: &Histogram) -> Self {
        let mut cdf = [0u64; NUM_BINS];
        let mut running = 0u64;
        for (slot, &count) in cdf.iter_mut().zip(hist.bins.iter()) {
            running += count as u64;
            *slot = running;
        }
        Self { cdf }
    }

    /// Total pixel count (last entry).
    pub fn total(&self) -> u64 {
        self.cdf[NUM_BINS - 1]
    }

    /// Scale so the last entry equals `scale`.
    ///
    /// Returns `None` for an empty distribution, where the division is undefined.
    pub fn normalize(&self, scale: f64) -> Option<[f64; NUM_BINS]> {
        let total = self.total();
        if total == 0 {
            return None;
        }

        let total = total as f64;
        let mut ncdf = [0.0f64; NUM_BINS];
        for (slot, &c) in ncdf.iter_mut().zip(self.cdf.iter()) {
            *slot = c as f64 / total * scale;
        }
        Some(ncdf)
    }
}
