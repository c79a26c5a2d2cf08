//! Tone curve evaluation using a Catmull-Rom (cubic Hermite) spline.
//!
//! The spline is parametric in `t`, so it cannot be evaluated directly at an
//! input level `x`. Instead the `t` whose x coordinate matches the query is
//! found by bisection, and the y coordinate at that `t` is the output level.
//! Tangents use the uniform Catmull-Rom estimate: half the difference of the
//! neighboring points, one-sided at the two ends.

use tracing::warn;

use crate::buffer::CHANNELS;
use crate::{ControlPoint, ControlPointSet};

/// Bisection accepts a candidate once its x is this close to the query.
const CONVERGENCE_THRESHOLD: f64 = 0.01;

/// Upper bound on bisection steps per evaluation.
const MAX_BISECTION_STEPS: u32 = 32;

// ============================================================================
// Spline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tangent {
    x: f64,
    y: f64,
}

/// Catmull-Rom tone curve built from a validated control point set.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneCurve {
    points: Vec<ControlPoint>,
    tangents: Vec<Tangent>,
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::build(&ControlPointSet::default())
    }
}

impl ToneCurve {
    /// Build the curve and its tangents.
    pub fn build(set: &ControlPointSet) -> Self {
        let points = set.points().to_vec();
        let tangents = compute_tangents(&points);
        Self { points, tangents }
    }

    /// Identity curve through (0, 0) and (255, 255).
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Check if the curve is the default identity mapping.
    pub fn is_identity(&self) -> bool {
        self.points == ControlPointSet::identity_points()
    }

    /// Evaluate the curve at input level `x`, rounded and clamped to 0-255.
    pub fn evaluate(&self, x: f64) -> u8 {
        to_level(self.level_at(x))
    }

    /// Evaluate the curve at input level `x` without rounding or clamping.
    ///
    /// Inputs left of the first control point (and NaN) return the first
    /// point's y; inputs right of the last control point return the last
    /// point's y.
    pub fn level_at(&self, x: f64) -> f64 {
        let n = self.points.len();
        let first = self.points[0];
        let last = self.points[n - 1];

        if !(x >= first.x) {
            return first.y;
        }
        if x > last.x {
            return last.y;
        }

        for i in 0..n - 1 {
            if x >= self.points[i].x && x <= self.points[i + 1].x {
                return self.solve_segment(i, x);
            }
        }

        last.y
    }

    /// Bisect segment `i` for the `t` whose x matches the query.
    fn solve_segment(&self, i: usize, x: f64) -> f64 {
        let left = self.points[i];
        let right = self.points[i + 1];
        let m_left = self.tangents[i];
        let m_right = self.tangents[i + 1];

        let mut t = 0.5;
        let mut low = 0.0;
        let mut high = 1.0;
        let mut closest = (f64::INFINITY, left.y);

        for _ in 0..MAX_BISECTION_STEPS {
            let (px, py) = hermite(left, m_left, right, m_right, t);
            let error = (px - x).abs();
            if error < CONVERGENCE_THRESHOLD {
                return py;
            }
            if error < closest.0 {
                closest = (error, py);
            }

            if x > px {
                low = t;
            } else {
                high = t;
            }
            t = 0.5 * (low + high);
        }

        warn!(
            x,
            segment = i,
            error = closest.0,
            "tone curve bisection did not converge, using closest candidate"
        );
        closest.1
    }
}

/// Catmull-Rom tangents under uniform parametrization.
fn compute_tangents(points: &[ControlPoint]) -> Vec<Tangent> {
    let n = points.len();
    if n < 2 {
        return vec![Tangent { x: 0.0, y: 0.0 }; n];
    }

    (0..n)
        .map(|i| {
            let (prev, next) = match i {
                0 => (points[0], points[1]),
                i if i == n - 1 => (points[n - 2], points[n - 1]),
                i => (points[i - 1], points[i + 1]),
            };
            Tangent {
                x: 0.5 * (next.x - prev.x),
                y: 0.5 * (next.y - prev.y),
            }
        })
        .collect()
}

/// Point on the Hermite segment at parameter `t`.
#[inline]
fn hermite(
    left: ControlPoint,
    m_left: Tangent,
    right: ControlPoint,
    m_right: Tangent,
    t: f64,
) -> (f64, f64) {
    let h00 = (1.0 + 2.0 * t) * (1.0 - t) * (1.0 - t);
    let h10 = t * (1.0 - t) * (1.0 - t);
    let h01 = t * t * (3.0 - 2.0 * t);
    let h11 = t * t * (t - 1.0);

    let px = h00 * left.x + h10 * m_left.x + h01 * right.x + h11 * m_right.x;
    let py = h00 * left.y + h10 * m_left.y + h01 * right.y + h11 * m_right.y;
    (px, py)
}

#[inline]
fn to_level(y: f64) -> u8 {
    y.clamp(0.0, 255.0).round() as u8
}

// ============================================================================
// LUT Type
// ============================================================================

/// Pre-computed 256-entry lookup table for efficient curve application.
///
/// Pixel samples are integers, so evaluating every level once gives the same
/// result as evaluating the curve per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneCurveLut {
    /// LUT values: lut[input] = output
    pub lut: [u8; 256],
}

impl ToneCurveLut {
    /// Generate LUT from a tone curve.
    pub fn from_curve(curve: &ToneCurve) -> Self {
        // Fast path for identity curve
        if curve.is_identity() {
            return Self::identity();
        }

        let mut lut = [0u8; 256];
        for (i, lut_value) in lut.iter_mut().enumerate() {
            *lut_value = curve.evaluate(i as f64);
        }

        Self { lut }
    }

    /// Create identity LUT (no change).
    pub fn identity() -> Self {
        let mut lut = [0u8; 256];
        for (i, lut_value) in lut.iter_mut().enumerate() {
            *lut_value = i as u8;
        }
        Self { lut }
    }

    /// Check if this LUT is identity.
    pub fn is_identity(&self) -> bool {
        self.lut.iter().enumerate().all(|(i, &v)| v == i as u8)
    }

    #[inline]
    pub fn map(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }
}

impl Default for ToneCurveLut {
    fn default() -> Self {
        Self::identity()
    }
}

// ============================================================================
// Curve Application
// ============================================================================

/// Apply tone curve LUT to the R, G and B samples of RGBA pixels in place.
///
/// Alpha is left untouched.
pub fn apply_tone_curve(pixels: &mut [u8], lut: &ToneCurveLut) {
    if lut.is_identity() {
        return;
    }

    for chunk in pixels.chunks_exact_mut(CHANNELS) {
        chunk[0] = lut.map(chunk[0]);
        chunk[1] = lut.map(chunk[1]);
        chunk[2] = lut.map(chunk[2]);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> ToneCurve {
        let points = points
            .iter()
            .map(|&(x, y)| ControlPoint::new(x, y))
            .collect();
        ToneCurve::build(&ControlPointSet::new(points).unwrap())
    }

    fn s_curve() -> ToneCurve {
        curve(&[
            (0.0, 0.0),
            (64.0, 48.0),
            (128.0, 140.0),
            (192.0, 210.0),
            (255.0, 255.0),
        ])
    }

    #[test]
    fn test_tangents_catmull_rom() {
        let c = curve(&[(0.0, 0.0), (100.0, 50.0), (255.0, 255.0)]);
        assert_eq!(c.tangents[0], Tangent { x: 50.0, y: 25.0 });
        assert_eq!(c.tangents[1], Tangent { x: 127.5, y: 127.5 });
        assert_eq!(c.tangents[2], Tangent { x: 77.5, y: 102.5 });
    }

    #[test]
    fn test_identity_curve_rounds_input() {
        let c = ToneCurve::identity();
        for i in 0..=255u8 {
            assert_eq!(c.evaluate(i as f64), i, "identity mismatch at {}", i);
        }
    }

    #[test]
    fn test_identity_lut() {
        let lut = ToneCurveLut::identity();
        assert!(lut.is_identity());
        for i in 0..256 {
            assert_eq!(lut.lut[i], i as u8);
        }
    }

    #[test]
    fn test_lut_matches_evaluate() {
        let c = s_curve();
        let lut = ToneCurveLut::from_curve(&c);
        for i in 0..=255u8 {
            assert_eq!(lut.map(i), c.evaluate(i as f64));
        }
    }

    #[test]
    fn test_identity_curve_lut_matches_slow_path() {
        let c = ToneCurve::identity();
        for i in 0..=255u8 {
            assert_eq!(ToneCurveLut::from_curve(&c).map(i), c.evaluate(i as f64));
        }
    }

    #[test]
    fn test_s_curve_increases_contrast() {
        let lut = ToneCurveLut::from_curve(&s_curve());

        // Shadows should be darker
        assert!(lut.lut[64] < 64, "Shadows not darkened");
        // Highlights should be brighter
        assert!(lut.lut[192] > 192, "Highlights not brightened");
    }

    #[test]
    fn test_monotonicity() {
        let c = s_curve();

        let mut prev = 0u8;
        for i in 0..=255u8 {
            let y = c.evaluate(i as f64);
            assert!(
                y >= prev,
                "Monotonicity violated at x={}: y={} < prev_y={}",
                i,
                y,
                prev
            );
            prev = y;
        }
    }

    #[test]
    fn test_control_points_preserved() {
        let c = s_curve();
        assert_eq!(c.evaluate(0.0), 0);
        assert_eq!(c.evaluate(64.0), 48);
        assert_eq!(c.evaluate(128.0), 140);
        assert_eq!(c.evaluate(192.0), 210);
        assert_eq!(c.evaluate(255.0), 255);
    }

    #[test]
    fn test_out_of_range_clamps_to_endpoints() {
        let c = curve(&[(10.0, 20.0), (200.0, 240.0)]);
        assert_eq!(c.evaluate(0.0), 20);
        assert_eq!(c.evaluate(-50.0), 20);
        assert_eq!(c.evaluate(201.0), 240);
        assert_eq!(c.evaluate(255.0), 240);
        assert_eq!(c.evaluate(f64::NAN), 20);
    }

    #[test]
    fn test_output_clamped() {
        let c = curve(&[(0.0, -40.0), (255.0, 400.0)]);
        assert_eq!(c.evaluate(0.0), 0);
        assert_eq!(c.evaluate(255.0), 255);
    }

    #[test]
    fn test_inverted_curve() {
        let lut = ToneCurveLut::from_curve(&curve(&[(0.0, 255.0), (255.0, 0.0)]));

        assert_eq!(lut.lut[0], 255, "Black should map to white");
        assert_eq!(lut.lut[255], 0, "White should map to black");
        assert!(lut.lut[64] > lut.lut[192]);
    }

    #[test]
    fn test_pathological_points_terminate() {
        // Tangents far steeper than the first segment's chord make x(t)
        // non-monotonic inside that segment.
        let c = curve(&[(0.0, 0.0), (1.0, 200.0), (255.0, 255.0)]);
        for i in 0..=10 {
            let x = i as f64 / 10.0;
            let _ = c.evaluate(x);
        }
    }

    #[test]
    fn test_apply_tone_curve_identity() {
        let original = vec![0, 64, 128, 255, 192, 255, 100, 7];
        let mut pixels = original.clone();

        apply_tone_curve(&mut pixels, &ToneCurveLut::identity());

        assert_eq!(pixels, original);
    }

    #[test]
    fn test_apply_tone_curve_preserves_alpha() {
        let mut pixels = vec![64, 64, 64, 17, 192, 192, 192, 99];
        let lut = ToneCurveLut::from_curve(&s_curve());

        apply_tone_curve(&mut pixels, &lut);

        assert!(pixels[0] < 64, "Dark pixel not darkened");
        assert!(pixels[4] > 192, "Bright pixel not brightened");
        assert_eq!(pixels[3], 17);
        assert_eq!(pixels[7], 99);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
