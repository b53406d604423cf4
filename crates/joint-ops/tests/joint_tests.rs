//! End-to-end joint computation against the mock kernel.
//!
//! The corner scenario is two boards meeting at a right angle, where the
//! mock's box semantics are exact: board A stands in the YZ plane and
//! board B lies flat, butting against A's inner side.

use joint_types::ResolvedParameters;
use joint_ops::{compute_box_joint, OperationSet};
use kernel_port::{BodyIntrospect, BodyRef, BooleanKind, FaceId, MockKernel};
use nalgebra::{Point3, Vector3};

fn params(bit_diameter: f64) -> ResolvedParameters {
    ResolvedParameters {
        min_fingers: 3.0,
        max_fingers: 33.0,
        min_finger_width: 2.0,
        max_finger_width: 6.0,
        finger_ratio: 0.5,
        margin: 0.0,
        bit_diameter,
    }
}

struct Corner {
    kernel: MockKernel,
    body_a: BodyRef,
    body_b: BodyRef,
    face_a: FaceId,
    face_b: FaceId,
}

fn corner(seam_length: f64) -> Corner {
    let mut kernel = MockKernel::new();
    let body_a = kernel.add_box_body(
        "A",
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 5.0, seam_length),
    );
    let body_b = kernel.add_box_body(
        "B",
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(6.0, 1.0, seam_length),
    );
    let face_a = kernel.find_face(&body_a.id, -Vector3::x()).unwrap();
    let face_b = kernel.find_face(&body_b.id, -Vector3::y()).unwrap();
    Corner {
        kernel,
        body_a,
        body_b,
        face_a,
        face_b,
    }
}

fn compute(corner: &mut Corner, bit_diameter: f64) -> OperationSet {
    let faces = [corner.face_a, corner.face_b];
    compute_box_joint(&mut corner.kernel, &params(bit_diameter), &faces).unwrap()
}

#[test]
fn three_finger_corner_yields_one_slot_pair() {
    let mut c = corner(7.5);
    let ops = compute(&mut c, 0.0);

    // 3 fingers means one B slot: one cut from A, one addition to B.
    assert_eq!(ops.len(), 2);
    let cut = &ops.operations()[0];
    let add = &ops.operations()[1];
    assert_eq!(cut.kind, BooleanKind::Difference);
    assert_eq!(cut.target.id, c.body_a.id);
    assert_eq!(add.kind, BooleanKind::Union);
    assert_eq!(add.target.id, c.body_b.id);

    // The slot is the middle third of the seam, spanning the full
    // overlap cross-section.
    for op in ops.operations() {
        let bounds = c.kernel.bounding_box(&op.tool).unwrap();
        assert!((bounds.min.x - 0.0).abs() < 1e-9);
        assert!((bounds.max.x - 1.0).abs() < 1e-9);
        assert!((bounds.min.y - 0.0).abs() < 1e-9);
        assert!((bounds.max.y - 1.0).abs() < 1e-9);
        assert!((bounds.min.z - 2.5).abs() < 1e-9);
        assert!((bounds.max.z - 5.0).abs() < 1e-9);
    }
}

#[test]
fn targets_are_registered_in_selection_order() {
    let mut c = corner(7.5);
    let ops = compute(&mut c, 0.0);
    let ids: Vec<_> = ops.targets().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![c.body_a.id, c.body_b.id]);
}

#[test]
fn short_seam_keeps_targets_but_emits_no_operations() {
    // A 4-unit seam cannot fit three 2.5-unit fingers.
    let mut c = corner(4.0);
    let ops = compute(&mut c, 0.0);
    assert!(ops.is_empty());
    assert_eq!(ops.targets().len(), 2);
}

#[test]
fn single_face_selection_is_a_no_op() {
    let mut c = corner(7.5);
    let faces = [c.face_a];
    let ops = compute_box_joint(&mut c.kernel, &params(0.0), &faces).unwrap();
    assert!(ops.is_empty());
    assert!(ops.targets().is_empty());
}

#[test]
fn tool_relief_stays_inside_the_seam() {
    let mut c = corner(7.5);
    let ops = compute(&mut c, 0.635);

    assert_eq!(ops.len(), 2);
    // Coves and dog bones inflate the templates, but the overlap
    // intersection clamps every tool back into the seam region.
    for op in ops.operations() {
        let bounds = c.kernel.bounding_box(&op.tool).unwrap();
        assert!(bounds.min.x >= -1e-9 && bounds.max.x <= 1.0 + 1e-9);
        assert!(bounds.min.y >= -1e-9 && bounds.max.y <= 1.0 + 1e-9);
        assert!(bounds.min.z >= -1e-9 && bounds.max.z <= 7.5 + 1e-9);
    }
}

#[test]
fn longer_seam_emits_more_slot_pairs() {
    // 12.5 units fit five 2.5-unit fingers: two B slots.
    let mut c = corner(12.5);
    let ops = compute(&mut c, 0.0);
    assert_eq!(ops.len(), 4);
    assert_eq!(ops.for_target(&c.body_a.id).count(), 2);
    assert_eq!(ops.for_target(&c.body_b.id).count(), 2);

    // Slots sit at the second and fourth fifths of the seam.
    let cuts: Vec<_> = ops.for_target(&c.body_a.id).collect();
    let first = c.kernel.bounding_box(&cuts[0].tool).unwrap();
    let second = c.kernel.bounding_box(&cuts[1].tool).unwrap();
    let mut starts = [first.min.z, second.min.z];
    starts.sort_by(f64::total_cmp);
    assert!((starts[0] - 2.5).abs() < 1e-9);
    assert!((starts[1] - 7.5).abs() < 1e-9);
}
