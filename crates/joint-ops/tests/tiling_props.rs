//! Property-based tests for the finger layout solver.

use proptest::prelude::*;

use joint_ops::TilingParams;
use joint_types::ResolvedParameters;

fn arb_params() -> impl Strategy<Value = ResolvedParameters> {
    (
        3.0f64..9.0,
        5.0f64..40.0,
        0.5f64..5.0,
        1.0f64..20.0,
        0.05f64..0.95,
        0.0f64..2.0,
        0.0f64..1.0,
    )
        .prop_map(
            |(min_fingers, max_fingers, min_w, extra_w, ratio, margin, bit)| {
                ResolvedParameters {
                    min_fingers,
                    max_fingers,
                    min_finger_width: min_w,
                    max_finger_width: min_w + extra_w,
                    finger_ratio: ratio,
                    margin,
                    bit_diameter: bit,
                }
            },
        )
}

const TOL: f64 = 1e-9;

proptest! {
    #[test]
    fn solutions_tile_the_seam_exactly(
        params in arb_params(),
        length in 1.0f64..200.0,
    ) {
        let tiling = TilingParams::normalize(&params);
        if let Some(s) = tiling.solve(length) {
            prop_assert_eq!(s.fingers % 2, 1, "finger count must be odd");
            prop_assert!(s.fingers >= tiling.min_fingers);
            prop_assert!(s.fingers <= tiling.max_fingers);
            prop_assert!(s.width_a >= tiling.min_finger_width - 1e-6);
            prop_assert!(s.width_b >= tiling.min_finger_width - 1e-6);
            prop_assert!(s.width_a <= tiling.max_finger_width + TOL);
            prop_assert!(s.width_b <= tiling.max_finger_width + TOL);

            // Fingers plus both margins reproduce the seam length.
            let tiled = s.width_a
                + (s.fingers / 2) as f64 * (s.width_a + s.width_b);
            prop_assert!(
                (tiled + 2.0 * s.margin - length).abs() < 1e-6,
                "tiled={} margin={} length={}", tiled, s.margin, length
            );

            // The solver never shrinks the requested end margin.
            prop_assert!(s.margin >= tiling.margin - 1e-6);
        }
    }
}

proptest! {
    #[test]
    fn finger_count_grows_with_seam_length(
        params in arb_params(),
        length in 1.0f64..100.0,
        growth in 0.1f64..100.0,
    ) {
        let tiling = TilingParams::normalize(&params);
        if let Some(short) = tiling.solve(length) {
            let long = tiling.solve(length + growth);
            prop_assert!(long.is_some(), "longer seam must stay solvable");
            prop_assert!(long.unwrap().fingers >= short.fingers);
        }
    }
}

proptest! {
    #[test]
    fn normalization_is_solver_safe(params in arb_params()) {
        let tiling = TilingParams::normalize(&params);
        prop_assert_eq!(tiling.min_fingers % 2, 1);
        prop_assert_eq!(tiling.max_fingers % 2, 1);
        prop_assert!(tiling.min_fingers >= 3);
        prop_assert!(tiling.max_fingers >= tiling.min_fingers);
        prop_assert!(tiling.min_finger_width >= tiling.bit_diameter);
        prop_assert!(tiling.max_finger_width >= tiling.min_finger_width);
        prop_assert!(tiling.finger_ratio > 0.0 && tiling.finger_ratio < 1.0);
        prop_assert!(tiling.margin >= 0.0);
        // The width ratios are consistent inverses.
        prop_assert!((tiling.ratio_a_per_b * tiling.ratio_b_per_a - 1.0).abs() < 1e-9);
    }
}
