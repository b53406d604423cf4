//! Reconciliation against the mock kernel and mock document.
//!
//! Uses the same right-angle corner the joint tests use: board A stands
//! in the YZ plane and board B lies flat against its inner side, with a
//! 7.5-unit seam that tiles into three fingers.

use feature_sync::{reconcile, CombineKind, MockDocument};
use joint_ops::{compute_box_joint, OperationSet};
use joint_types::ResolvedParameters;
use kernel_port::{BodyIntrospect, BodyRef, FaceId, Kernel, MockKernel};
use nalgebra::{Point3, Vector3};

fn params() -> ResolvedParameters {
    ResolvedParameters {
        min_fingers: 3.0,
        max_fingers: 33.0,
        min_finger_width: 2.0,
        max_finger_width: 6.0,
        finger_ratio: 0.5,
        margin: 0.0,
        bit_diameter: 0.0,
    }
}

struct Corner {
    kernel: MockKernel,
    body_a: BodyRef,
    body_b: BodyRef,
    face_a: FaceId,
    face_b: FaceId,
}

fn corner() -> Corner {
    let mut kernel = MockKernel::new();
    let body_a = kernel.add_box_body(
        "A",
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 5.0, 7.5),
    );
    let body_b = kernel.add_box_body(
        "B",
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(6.0, 1.0, 7.5),
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

fn compute(c: &mut Corner) -> OperationSet {
    let faces = [c.face_a, c.face_b];
    compute_box_joint(&mut c.kernel, &params(), &faces).unwrap()
}

#[test]
fn initial_pass_creates_a_triple_per_body() {
    let mut c = corner();
    let ops = compute(&mut c);
    let mut doc = MockDocument::new();

    let features = reconcile(&mut c.kernel, &mut doc, &ops, &[], true).unwrap();

    assert_eq!(features.len(), 6);
    assert_eq!(doc.timeline(), &features[..]);

    // Base, join, intersect for A, then the same for B.
    assert_eq!(doc.source_body_name(features[0]), Some("A *"));
    assert_eq!(doc.source_body_name(features[3]), Some("B *"));
    let (target, base, kind, keep) = doc.combine_info(features[1]).unwrap();
    assert_eq!((target, base, kind, keep), (c.body_a.id, features[0], CombineKind::Join, true));
    let (target, base, kind, keep) = doc.combine_info(features[2]).unwrap();
    assert_eq!(
        (target, base, kind, keep),
        (c.body_a.id, features[0], CombineKind::Intersect, false)
    );
    let (target, _, kind, keep) = doc.combine_info(features[4]).unwrap();
    assert_eq!((target, kind, keep), (c.body_b.id, CombineKind::Join, true));
    let (target, _, kind, keep) = doc.combine_info(features[5]).unwrap();
    assert_eq!((target, kind, keep), (c.body_b.id, CombineKind::Intersect, false));
}

#[test]
fn base_bodies_carry_the_applied_operations() {
    let mut c = corner();
    let ops = compute(&mut c);
    let mut doc = MockDocument::new();
    let features = reconcile(&mut c.kernel, &mut doc, &ops, &[], true).unwrap();

    // The mock's difference leaves the target box untouched, so A's base
    // keeps A's bounds; B's base absorbs the slot tool that reaches into
    // A's territory.
    let base_a = c.kernel.bounding_box(doc.base_body(features[0]).unwrap()).unwrap();
    assert!((base_a.min.x - 0.0).abs() < 1e-9);
    assert!((base_a.max.x - 1.0).abs() < 1e-9);
    assert!((base_a.max.y - 5.0).abs() < 1e-9);

    let base_b = c.kernel.bounding_box(doc.base_body(features[3]).unwrap()).unwrap();
    assert!((base_b.min.x - 0.0).abs() < 1e-9);
    assert!((base_b.max.x - 6.0).abs() < 1e-9);
    assert!((base_b.max.y - 1.0).abs() < 1e-9);

    // The seed sphere was sized to cover the final body.
    let seed = c.kernel.bounding_box(doc.base_seed(features[3]).unwrap()).unwrap();
    assert!(seed.min.x <= base_b.min.x && seed.max.x >= base_b.max.x);
    assert!(seed.min.z <= base_b.min.z && seed.max.z >= base_b.max.z);
}

#[test]
fn second_pass_updates_features_in_place() {
    let mut c = corner();
    let ops = compute(&mut c);
    let mut doc = MockDocument::new();
    let first = reconcile(&mut c.kernel, &mut doc, &ops, &[], true).unwrap();

    let ops = compute(&mut c);
    let second = reconcile(&mut c.kernel, &mut doc, &ops, &first, false).unwrap();

    assert_eq!(first, second);
    assert_eq!(doc.timeline().len(), 6);
}

#[test]
fn empty_operation_set_deletes_triples_when_allowed() {
    let mut c = corner();
    let ops = compute(&mut c);
    let mut doc = MockDocument::new();
    let features = reconcile(&mut c.kernel, &mut doc, &ops, &[], true).unwrap();

    let resulting =
        reconcile(&mut c.kernel, &mut doc, &OperationSet::new(), &features, true).unwrap();
    assert!(resulting.is_empty());
    assert!(doc.timeline().is_empty());
}

#[test]
fn empty_operation_set_retains_triples_when_deletion_is_disallowed() {
    let mut c = corner();
    let ops = compute(&mut c);
    let mut doc = MockDocument::new();
    let features = reconcile(&mut c.kernel, &mut doc, &ops, &[], true).unwrap();

    let resulting =
        reconcile(&mut c.kernel, &mut doc, &OperationSet::new(), &features, false).unwrap();
    assert_eq!(resulting, features);
    assert_eq!(doc.timeline().len(), 6);
}

#[test]
fn retained_base_rebuilds_from_the_current_solid() {
    let mut kernel = MockKernel::new();
    let mut doc = MockDocument::new();
    let body = kernel.add_box_body(
        "A",
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 1.0),
    );
    let mut ops = OperationSet::new();
    ops.add_target_body(body.clone());
    let features = reconcile(&mut kernel, &mut doc, &ops, &[], true).unwrap();

    // The body was edited between passes: same identity, new solid.
    let mut edited = body;
    edited.handle = kernel
        .create_box(Point3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 2.0, 2.0))
        .unwrap();
    let mut ops = OperationSet::new();
    ops.add_target_body(edited);
    let second = reconcile(&mut kernel, &mut doc, &ops, &features, false).unwrap();

    assert_eq!(second, features);
    let base = kernel
        .bounding_box(doc.base_body(features[0]).unwrap())
        .unwrap();
    assert!((base.max.x - 2.0).abs() < 1e-9);
}

#[test]
fn new_body_triple_is_appended_after_retained_ones() {
    let mut kernel = MockKernel::new();
    let mut doc = MockDocument::new();
    let a = kernel.add_box_body(
        "A",
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 1.0),
    );
    let mut ops = OperationSet::new();
    ops.add_target_body(a.clone());
    let first = reconcile(&mut kernel, &mut doc, &ops, &[], true).unwrap();
    assert_eq!(first.len(), 3);

    // The second pass sees a new body, registered ahead of the old one.
    let b = kernel.add_box_body(
        "B",
        Point3::new(5.0, 0.0, 0.0),
        Point3::new(6.0, 1.0, 1.0),
    );
    let mut ops = OperationSet::new();
    ops.add_target_body(b.clone());
    ops.add_target_body(a.clone());
    let second = reconcile(&mut kernel, &mut doc, &ops, &first, true).unwrap();

    assert_eq!(second.len(), 6);
    assert_eq!(&second[..3], &first[..]);
    assert_eq!(doc.timeline(), &second[..]);
    assert_eq!(doc.source_body_name(second[3]), Some("B *"));
    let (target, base, kind, keep) = doc.combine_info(second[4]).unwrap();
    assert_eq!((target, base, kind, keep), (b.id, second[3], CombineKind::Join, true));
}

#[test]
fn new_bodies_are_skipped_when_creation_is_disallowed() {
    let mut c = corner();
    let ops = compute(&mut c);
    let mut doc = MockDocument::new();

    let resulting = reconcile(&mut c.kernel, &mut doc, &ops, &[], false).unwrap();
    assert!(resulting.is_empty());
    assert!(doc.timeline().is_empty());
}
