//! Top-level joint computation.

use joint_types::ResolvedParameters;
use kernel_port::{FaceId, KernelBundle};
use tracing::debug;

use crate::detect::find_seams;
use crate::error::JointError;
use crate::ops::OperationSet;
use crate::solids::synthesize_seam;
use crate::tiling::TilingParams;

/// Computes the full box joint for the selected outside faces.
///
/// Every selected face's body is registered as a target even when no
/// seam produces operations for it, so downstream reconciliation keeps
/// its features alive. Fewer than two faces yields an empty set.
pub fn compute_box_joint<K: KernelBundle + ?Sized>(
    kernel: &mut K,
    params: &ResolvedParameters,
    faces: &[FaceId],
) -> Result<OperationSet, JointError> {
    let mut ops = OperationSet::new();
    if faces.len() < 2 {
        return Ok(ops);
    }

    let tiling = TilingParams::normalize(params);

    for &face in faces {
        ops.add_target_body(kernel.face_body(face)?);
    }

    let seams = find_seams(kernel, faces)?;
    debug!(seams = seams.len(), "seam detection complete");
    for seam in &seams {
        synthesize_seam(kernel, seam, &tiling, &mut ops)?;
    }
    Ok(ops)
}
