//! Per-seam coordinate frame.

use joint_types::{JointFrame, Plane};
use kernel_port::FacePlane;
use nalgebra::{Unit, Vector3};

/// The working frame of one seam plus the inward normals of the two
/// selected faces. Origin sits on the line where the two face planes
/// meet, Z runs along that line, Y is face A's inward normal.
#[derive(Debug, Clone)]
pub struct SeamFrame {
    pub frame: JointFrame,
    pub a_inward: Unit<Vector3<f64>>,
    pub b_inward: Unit<Vector3<f64>>,
}

/// Builds the seam frame, or `None` when the two selected faces are
/// parallel and never meet.
pub fn build_seam_frame(face_a: &FacePlane, face_b: &FacePlane) -> Option<SeamFrame> {
    let a_inward = face_a.inward_normal();
    let b_inward = face_b.inward_normal();
    let plane_a = Plane {
        origin: face_a.plane.origin,
        normal: a_inward,
    };
    let plane_b = Plane {
        origin: face_b.plane.origin,
        normal: b_inward,
    };

    let edge = plane_b.intersect_plane(&plane_a)?;
    let y = a_inward.into_inner();
    let z = edge.direction;
    let x = y.cross(&z);
    Some(SeamFrame {
        frame: JointFrame::from_axes(edge.origin, x, y, z),
        a_inward,
        b_inward,
    })
}
