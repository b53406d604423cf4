//! Finger layout solver.
//!
//! Fingers alternate between the two bodies along the seam: the run
//! starts and ends with an A finger, so the count is always odd. The
//! solver picks the largest odd count whose fingers stay above the
//! minimum width, then stretches the widths to fill the seam exactly
//! and centers the run with equal margins.

use joint_types::ResolvedParameters;

/// User parameters normalized into a solvable form. Independent of any
/// particular seam; one normalization serves every seam of a joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingParams {
    pub min_fingers: i64,
    pub max_fingers: i64,
    pub min_finger_width: f64,
    pub max_finger_width: f64,
    pub finger_ratio: f64,
    /// Width of an A finger per unit of B finger, `(1 - ratio) / ratio`.
    pub ratio_a_per_b: f64,
    /// Width of a B finger per unit of A finger, `ratio / (1 - ratio)`.
    pub ratio_b_per_a: f64,
    pub margin: f64,
    pub bit_diameter: f64,
    pub bit_radius: f64,
}

/// Finger layout for one seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingSolution {
    /// Total finger count, odd. B slots number `fingers / 2`.
    pub fingers: i64,
    pub width_a: f64,
    pub width_b: f64,
    /// Leftover seam length on each end after tiling.
    pub margin: f64,
}

impl TilingSolution {
    pub fn slot_count(&self) -> i64 {
        self.fingers / 2
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

impl TilingParams {
    /// Normalizes raw parameter values. Finger counts are forced odd and
    /// at least 3; the maximum is measured inclusively by the user but
    /// the solver wants the largest reachable odd count, hence the -1
    /// before rounding down to odd. Widths are kept wide enough for the
    /// bit to pass, and the ratio is clamped to the range the width
    /// limits can realize.
    pub fn normalize(params: &ResolvedParameters) -> Self {
        let bit_diameter = params.bit_diameter.max(0.0);
        let min_fingers = ((params.min_fingers as i64).max(3)) | 1;
        let max_fingers = ((params.max_fingers as i64 - 1).max(min_fingers)) | 1;
        let min_finger_width = params.min_finger_width.max(bit_diameter).max(0.0001);
        let max_finger_width = params.max_finger_width.max(min_finger_width);
        let finger_ratio = clamp(
            params.finger_ratio,
            min_finger_width / (min_finger_width + max_finger_width),
            max_finger_width / (min_finger_width + max_finger_width),
        );
        Self {
            min_fingers,
            max_fingers,
            min_finger_width,
            max_finger_width,
            finger_ratio,
            ratio_a_per_b: (1.0 - finger_ratio) / finger_ratio,
            ratio_b_per_a: finger_ratio / (1.0 - finger_ratio),
            margin: params.margin.max(0.0),
            bit_diameter,
            bit_radius: bit_diameter / 2.0,
        }
    }

    /// Solves the layout for a seam of the given length. Returns `None`
    /// when even the minimum finger count does not fit.
    pub fn solve(&self, length_with_margins: f64) -> Option<TilingSolution> {
        let length = length_with_margins - 2.0 * self.margin;

        let mut width_a = if self.finger_ratio < 0.5 {
            (self.min_finger_width * self.ratio_a_per_b).min(self.max_finger_width)
        } else {
            self.min_finger_width
        };
        let raw = 2.0 * (length / width_a - 1.0) / (1.0 + self.ratio_b_per_a);
        if !raw.is_finite() {
            return None;
        }
        let fingers = ((raw.floor() as i64) | 1).min(self.max_fingers);
        if fingers < self.min_fingers {
            return None;
        }

        let half = (fingers / 2) as f64;
        width_a = length / ((1.0 + self.ratio_b_per_a) * half + 1.0);
        if width_a > self.max_finger_width {
            width_a = self.max_finger_width;
        }
        let mut width_b = width_a * self.ratio_b_per_a;
        if width_b > self.max_finger_width {
            width_b = self.max_finger_width;
            width_a = self.max_finger_width * self.ratio_a_per_b;
        }
        let tiled = width_a + half * (width_a + width_b);
        Some(TilingSolution {
            fingers,
            width_a,
            width_b,
            margin: (length_with_margins - tiled) / 2.0,
        })
    }
}
