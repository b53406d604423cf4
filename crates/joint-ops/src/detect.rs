//! Seam detection.
//!
//! A seam is a triple of faces: the two selected outside faces plus the
//! face of body B that butts up against body A. The butting face is
//! found among the planar neighbors of face B: it must be parallel to
//! face A at a nonzero distance, and must overlap an exterior face of
//! body A when imprinted onto the shared plane.

use kernel_port::{FaceId, KernelBundle};
use tracing::trace;

use crate::error::JointError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seam {
    pub face_a: FaceId,
    pub face_b: FaceId,
    pub butting_face: FaceId,
}

/// Finds every seam among the selected faces, considering each ordered
/// pair in turn. Selection order decides seam order, so recomputes see
/// the same seams in the same sequence.
pub fn find_seams<K: KernelBundle + ?Sized>(
    kernel: &mut K,
    faces: &[FaceId],
) -> Result<Vec<Seam>, JointError> {
    let mut seams = Vec::new();
    for (i, &face_a) in faces.iter().enumerate() {
        for (j, &face_b) in faces.iter().enumerate() {
            if i == j {
                continue;
            }
            butting_faces(kernel, face_a, face_b, &mut seams)?;
        }
    }
    Ok(seams)
}

fn butting_faces<K: KernelBundle + ?Sized>(
    kernel: &mut K,
    face_a: FaceId,
    face_b: FaceId,
    seams: &mut Vec<Seam>,
) -> Result<(), JointError> {
    let body_a = kernel.face_body(face_a)?;
    let body_b = kernel.face_body(face_b)?;
    if body_a.id == body_b.id {
        return Ok(());
    }
    let Some(plane_a) = kernel.face_plane(face_a)? else {
        trace!(?face_a, "face A is not planar");
        return Ok(());
    };
    if kernel.face_plane(face_b)?.is_none() {
        trace!(?face_b, "face B is not planar");
        return Ok(());
    }

    let shell_a = kernel.shell_faces(&body_a.id);
    for edge in kernel.face_edges(face_b) {
        for candidate in kernel.edge_faces(edge) {
            if candidate == face_b {
                continue;
            }
            let Some(candidate_plane) = kernel.face_plane(candidate)? else {
                continue;
            };
            if !candidate_plane.plane.is_parallel_to(&plane_a.plane) {
                continue;
            }
            if candidate_plane.plane.is_coplanar_to(&plane_a.plane) {
                // Zero distance to face A leaves no room for fingers.
                continue;
            }

            // The candidate must press against an exterior face of body A.
            for &exterior in &shell_a {
                let Some(exterior_plane) = kernel.face_plane(exterior)? else {
                    continue;
                };
                if !candidate_plane.plane.is_coplanar_to(&exterior_plane.plane) {
                    continue;
                }
                if kernel.imprint_overlaps(candidate, exterior)? {
                    trace!(?face_a, ?face_b, ?candidate, "seam found");
                    seams.push(Seam {
                        face_a,
                        face_b,
                        butting_face: candidate,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_port::{BodyIntrospect, MockKernel};
    use nalgebra::{Point3, Vector3};

    /// Two boards meeting at a right angle: A stands in the YZ plane,
    /// B lies flat and butts against A's +X side.
    fn corner_scenario(kernel: &mut MockKernel) -> (FaceId, FaceId) {
        let a = kernel.add_box_body("A", Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 5.0, 7.5));
        let b = kernel.add_box_body("B", Point3::new(1.0, 0.0, 0.0), Point3::new(6.0, 1.0, 7.5));
        let face_a = kernel.find_face(&a.id, -Vector3::x()).unwrap();
        let face_b = kernel.find_face(&b.id, -Vector3::y()).unwrap();
        (face_a, face_b)
    }

    #[test]
    fn corner_produces_one_seam_per_direction() {
        let mut kernel = MockKernel::new();
        let (face_a, face_b) = corner_scenario(&mut kernel);
        let seams = find_seams(&mut kernel, &[face_a, face_b]).unwrap();
        // (A, B) finds B's end face butting on A; (B, A) finds nothing
        // because no face of A is parallel to face B at a distance with
        // an overlapping exterior face on B.
        assert_eq!(seams.len(), 1);
        assert_eq!(seams[0].face_a, face_a);
        assert_eq!(seams[0].face_b, face_b);
        let butting = kernel.face_plane(seams[0].butting_face).unwrap().unwrap();
        assert!((butting.plane.origin.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn faces_on_one_body_make_no_seam() {
        let mut kernel = MockKernel::new();
        let a = kernel.add_box_body("A", Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 5.0, 7.5));
        let fa = kernel.find_face(&a.id, -Vector3::x()).unwrap();
        let fb = kernel.find_face(&a.id, -Vector3::y()).unwrap();
        assert!(find_seams(&mut kernel, &[fa, fb]).unwrap().is_empty());
    }

    #[test]
    fn separated_bodies_make_no_seam() {
        let mut kernel = MockKernel::new();
        let a = kernel.add_box_body("A", Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 5.0, 7.5));
        let b = kernel.add_box_body("B", Point3::new(3.0, 0.0, 0.0), Point3::new(8.0, 1.0, 7.5));
        let fa = kernel.find_face(&a.id, -Vector3::x()).unwrap();
        let fb = kernel.find_face(&b.id, -Vector3::y()).unwrap();
        assert!(find_seams(&mut kernel, &[fa, fb]).unwrap().is_empty());
    }
}
