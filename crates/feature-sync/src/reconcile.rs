//! The base/combine reconciler.
//!
//! Each target body is represented in the document by a feature triple:
//! a base feature holding the fully modified copy of the body, a join
//! combine that unions the A-side material, and an intersect combine
//! that trims to the B-side material. This module walks the existing
//! triples and the freshly computed operation set and brings the two
//! into agreement, updating features in place wherever possible so
//! their identity (and downstream references) survive recomputes.

use std::collections::HashMap;

use joint_ops::brep::containing_sphere;
use joint_ops::OperationSet;
use joint_types::{BodyId, FeatureId};
use kernel_port::{BodyRef, KernelBundle};
use tracing::{debug, trace};

use crate::error::SyncError;
use crate::port::{CombineKind, DocumentPort};

/// Applies the operation set to the document.
///
/// `existing` lists the features from the previous pass in timeline
/// order, grouped in (base, join, intersect) triples; a trailing
/// partial group is ignored. With `allow_create_delete` the set of
/// triples may grow and shrink; without it, only existing triples are
/// updated and bodies without one are left alone.
///
/// Returns the resulting features in timeline order: retained triples
/// first, in their original relative order, then newly created ones.
pub fn reconcile<K, D>(
    kernel: &mut K,
    doc: &mut D,
    ops: &OperationSet,
    existing: &[FeatureId],
    allow_create_delete: bool,
) -> Result<Vec<FeatureId>, SyncError>
where
    K: KernelBundle + ?Sized,
    D: DocumentPort + ?Sized,
{
    let mut order: Vec<BodyRef> = Vec::new();
    let mut existing_by: HashMap<BodyId, [FeatureId; 3]> = HashMap::new();

    for chunk in existing.chunks_exact(3) {
        let (base, join, intersect) = (chunk[0], chunk[1], chunk[2]);
        let stored = doc.combine_target(join)?;
        // The stored ref's handle predates this pass; the computation
        // registered a fresh ref for any body it still touches.
        let fresh = ops.targets().iter().find(|t| t.id == stored.id);
        if fresh.is_none() && allow_create_delete {
            // Tool-then-target teardown order.
            debug!(body = %stored.id, "deleting stale feature triple");
            doc.delete_feature(intersect)?;
            doc.delete_feature(join)?;
            doc.delete_feature(base)?;
        } else {
            let target = fresh.cloned().unwrap_or(stored);
            if !order.iter().any(|t| t.id == target.id) {
                order.push(target.clone());
            }
            existing_by
                .entry(target.id)
                .or_insert([base, join, intersect]);
        }
    }

    if allow_create_delete {
        for target in ops.targets() {
            if !order.iter().any(|t| t.id == target.id) {
                order.push(target.clone());
            }
        }
    }

    let mut resulting: Vec<FeatureId> = Vec::new();
    for target in &order {
        let triple = existing_by.get(&target.id).copied();

        // Apply the accumulated operations to a copy of the body.
        let mut modified = kernel.copy_solid(&target.handle)?;
        for op in ops.for_target(&target.id) {
            modified = kernel.boolean_op(modified, &op.tool, op.kind)?;
        }

        let base = match triple {
            Some([base, _, _]) => {
                doc.roll_after(base)?;
                doc.update_base_body(base, modified)?;
                trace!(body = %target.id, %base, "updated base feature");
                base
            }
            None => {
                let seed = containing_sphere(kernel, &modified)?;
                let at = match resulting.last() {
                    Some(&last) => doc.roll_after(last)?,
                    None => doc.timeline_end(),
                };
                let base = doc.create_base_feature(at, seed, modified)?;
                debug!(body = %target.id, %base, "created base feature");
                base
            }
        };
        doc.set_source_body_name(base, &format!("{} *", target.name))?;
        resulting.push(base);

        let combines = [
            (triple.map(|t| t[1]), CombineKind::Join, true),
            (triple.map(|t| t[2]), CombineKind::Intersect, false),
        ];
        for (existing_combine, kind, keep_tools) in combines {
            let feature = match existing_combine {
                Some(feature) => {
                    if doc.combine_target(feature)?.id != target.id {
                        doc.set_combine_target(feature, target)?;
                    }
                    feature
                }
                None => {
                    let at = doc.roll_after(*resulting.last().unwrap_or(&base))?;
                    let feature =
                        doc.create_combine_feature(at, target, base, kind, keep_tools)?;
                    debug!(body = %target.id, %feature, ?kind, "created combine feature");
                    feature
                }
            };
            resulting.push(feature);
        }
    }

    Ok(resulting)
}
