//! Per-seam solid construction.
//!
//! All geometry here is authored in the seam's nominal frame: X across
//! the seam, Y into body A, Z along the mating edge. A template pair is
//! built once per seam (the cutter removes material from body A, the
//! joiner adds it to body B) and then stamped along Z, once per B slot.
//!
//! With a nonzero bit diameter the templates also carry tool relief:
//! coves round the inside corners the bit cannot sharpen, and dog bones
//! clear the corners the mating finger must reach into. Relief pieces
//! that collapse to nothing at extreme joint angles are skipped when the
//! kernel reports the construction as degenerate.

use joint_types::{z_translation, Line3, POINT_TOLERANCE};
use kernel_port::{BooleanKind, Curve3, KernelBundle, KernelError, SolidHandle};
use nalgebra::{Point3, Vector3};
use tracing::{debug, trace};

use crate::brep::{circle_sheet, sheet_from_curves, triangle_sheet};
use crate::detect::Seam;
use crate::error::JointError;
use crate::frame::build_seam_frame;
use crate::ops::{BooleanOperation, OperationSet};
use crate::tiling::{TilingParams, TilingSolution};

/// Builds the joint for one seam and appends its boolean operations.
/// Returns false when the seam does not admit a joint (parallel faces,
/// empty overlap, or too few fingers).
pub fn synthesize_seam<K: KernelBundle + ?Sized>(
    kernel: &mut K,
    seam: &Seam,
    tiling: &TilingParams,
    ops: &mut OperationSet,
) -> Result<bool, JointError> {
    let body_a = kernel.face_body(seam.face_a)?;
    let body_b = kernel.face_body(seam.face_b)?;
    let (Some(plane_a), Some(plane_b), Some(butting)) = (
        kernel.face_plane(seam.face_a)?,
        kernel.face_plane(seam.face_b)?,
        kernel.face_plane(seam.butting_face)?,
    ) else {
        return Ok(false);
    };

    let Some(seam_frame) = build_seam_frame(&plane_a, &plane_b) else {
        trace!("selected faces are parallel; skipping seam");
        return Ok(false);
    };
    let frame = seam_frame.frame.clone();

    // Sweep the butting face across to body A to bound the joint region.
    let sweep_dir = seam_frame.b_inward.cross(&frame.z_axis);
    let sweep_line = Line3::new(frame.origin, sweep_dir);
    let p_b_doc = butting
        .plane
        .intersect_line(&sweep_line)
        .ok_or_else(|| JointError::DegenerateSeam {
            reason: "butting face is parallel to the sweep direction".to_string(),
        })?;
    let sweep_vector = frame.origin - p_b_doc;
    let butting_sheet = kernel.copy_face(seam.butting_face)?;
    let overlap = kernel.create_oblique_prism(&butting_sheet, sweep_vector)?;
    let overlap = kernel.boolean_op(overlap, &body_a.handle, BooleanKind::Intersection)?;
    let overlap = kernel.transform(overlap, &frame.to_nominal)?;
    let bounds = kernel.bounding_box(&overlap)?;
    let (min, max) = (bounds.min, bounds.max);
    if max.x - min.x < POINT_TOLERANCE || max.y - min.y < POINT_TOLERANCE {
        trace!("overlap region is empty; skipping seam");
        return Ok(false);
    }

    let Some(solution) = tiling.solve(max.z - min.z) else {
        debug!(seam_length = max.z - min.z, "seam too short for minimum finger count");
        return Ok(false);
    };
    debug!(
        fingers = solution.fingers,
        width_a = solution.width_a,
        width_b = solution.width_b,
        margin = solution.margin,
        "seam layout solved"
    );
    let TilingSolution {
        width_a,
        width_b,
        margin,
        ..
    } = solution;

    // Template for a single B finger, full overlap cross-section by one
    // B width tall.
    let mut finger = kernel.create_box(
        min,
        Vector3::new(max.x - min.x, max.y - min.y, width_b),
    )?;

    // Reference points of the finger cross-section at z = minZ.
    let at_z = |p: Point3<f64>, z: f64| Point3::new(p.x, p.y, z);
    let p_o = at_z(frame.to_nominal.transform_point(&frame.origin), min.z);
    let p_b = at_z(frame.to_nominal.transform_point(&p_b_doc), min.z);
    let v_ob = p_b - p_o;
    let v_ob_perp = Vector3::new(v_ob.y, -v_ob.x, 0.0);

    let is_acute = p_b.x > p_o.x + POINT_TOLERANCE;
    let is_obtuse = p_b.x < p_o.x - POINT_TOLERANCE;

    let (p_i, p_a, p_ae, v_obe, p_be);
    if is_obtuse {
        // Joint angle over 90 degrees: the finger tip overhangs, so the
        // template is sloped back to the reachable profile.
        p_i = Point3::new(max.x + v_ob.x, max.y, min.z);
        p_a = Point3::new(max.x, min.y, min.z);
        p_ae = Point3::new(p_i.x.max(p_o.x), min.y, min.z);
        let l_ob = Line3::new(p_o, v_ob);
        let l_be_i = Line3::new(p_i, v_ob_perp);
        let mut reach = l_ob.intersect_line(&l_be_i).ok_or_else(|| {
            JointError::DegenerateSeam {
                reason: "slope construction lines do not meet".to_string(),
            }
        })?;
        if reach.y < min.y {
            reach = p_o;
        }
        v_obe = reach - p_o;
        p_be = p_o + v_obe;

        match triangle_sheet(kernel, p_i, p_ae, p_a) {
            Ok(section) => {
                let slope = kernel.create_prism(&section, width_b)?;
                finger = kernel.boolean_op(finger, &slope, BooleanKind::Difference)?;
            }
            Err(err) if err.is_degenerate() => trace!(%err, "tip slope too small"),
            Err(err) => return Err(err.into()),
        }
        match triangle_sheet(kernel, p_i, p_b, p_be) {
            Ok(section) => {
                let slope = kernel.create_prism(&section, -(width_a + margin))?;
                finger = kernel.boolean_op(finger, &slope, BooleanKind::Union)?;
                let slope = kernel.create_prism(&section, width_b + width_a + margin)?;
                finger = kernel.boolean_op(finger, &slope, BooleanKind::Union)?;
            }
            Err(err) if err.is_degenerate() => trace!(%err, "root slope too small"),
            Err(err) => return Err(err.into()),
        }
    } else {
        p_i = Point3::new(max.x, max.y, min.z);
        p_a = Point3::new(max.x - v_ob.x, min.y, min.z);
        p_ae = p_a;
        v_obe = v_ob;
        p_be = p_b;
    }

    let (cutter, joiner);
    if tiling.bit_radius > 0.0 {
        if v_ob.norm() < POINT_TOLERANCE {
            return Err(JointError::DegenerateSeam {
                reason: "seam origin lies on the butting face".to_string(),
            });
        }
        let (c, j) =
            add_tool_relief(kernel, finger, tiling, &solution, ToolReliefFrame {
                min,
                p_o,
                p_i,
                p_a,
                p_ae,
                p_be,
                v_ob,
                v_obe,
                v_ob_perp,
                is_acute,
            })?;
        cutter = c;
        joiner = j;
    } else {
        cutter = finger.clone();
        joiner = finger;
    }

    // Stamp the templates along the seam, one pair per B slot.
    for i in 0..solution.slot_count() {
        let lift = z_translation(margin + width_a + i as f64 * (width_a + width_b));

        let slot = kernel.copy_solid(&cutter)?;
        let slot = kernel.transform(slot, &lift)?;
        let slot = kernel.boolean_op(slot, &overlap, BooleanKind::Intersection)?;
        let slot = kernel.transform(slot, &frame.to_joint)?;
        ops.add(BooleanOperation::difference(body_a.clone(), slot));

        let peg = kernel.copy_solid(&joiner)?;
        let peg = kernel.transform(peg, &lift)?;
        let peg = kernel.boolean_op(peg, &overlap, BooleanKind::Intersection)?;
        let peg = kernel.transform(peg, &frame.to_joint)?;
        ops.add(BooleanOperation::union(body_b.clone(), peg));
    }
    Ok(true)
}

/// Cross-section geometry the tool relief is built from.
struct ToolReliefFrame {
    min: Point3<f64>,
    p_o: Point3<f64>,
    p_i: Point3<f64>,
    p_a: Point3<f64>,
    p_ae: Point3<f64>,
    p_be: Point3<f64>,
    v_ob: Vector3<f64>,
    v_obe: Vector3<f64>,
    v_ob_perp: Vector3<f64>,
    is_acute: bool,
}

/// Splits the finger template into the A-side cutter and B-side joiner
/// and carves the cove and dog-bone relief for a round bit into each.
fn add_tool_relief<K: KernelBundle + ?Sized>(
    kernel: &mut K,
    finger: SolidHandle,
    tiling: &TilingParams,
    solution: &TilingSolution,
    geo: ToolReliefFrame,
) -> Result<(SolidHandle, SolidHandle), JointError> {
    use std::f64::consts::PI;

    let radius = tiling.bit_radius;
    let width_b = solution.width_b;
    let translate_up = z_translation(width_b);
    let degenerate = |what: &str| JointError::DegenerateSeam {
        reason: format!("{what} construction lines do not meet"),
    };

    let v_oa = Vector3::new(geo.p_a.x - geo.p_o.x, 0.0, 0.0);
    let v_obc = geo.v_ob * (-radius / geo.v_ob.norm()) + geo.v_obe;
    let v_oa_perp = Vector3::new(-v_oa.y, v_oa.x, 0.0);

    // Arc centers sit one radius inside each finger flank.
    let p_ac = Point3::new(geo.p_ae.x - radius, geo.p_ae.y, geo.p_ae.z);
    let p_bc = geo.p_o + v_obc;

    let v_ae_i = geo.p_i - geo.p_ae;
    let v_be_i = geo.p_i - geo.p_be;
    let l_ae_i = Line3::new(geo.p_ae, v_ae_i);
    let l_be_i = Line3::new(geo.p_be, v_be_i);
    let l_ac_ic = Line3::new(p_ac, v_ae_i);
    let l_bc_ic = Line3::new(p_bc, v_be_i);
    let p_ia = p_bc + v_be_i;
    let p_ib = Point3::new(geo.p_i.x - radius, geo.p_i.y, geo.p_i.z);
    let p_ic = l_ac_ic
        .intersect_line(&l_bc_ic)
        .ok_or_else(|| degenerate("inner corner"))?;
    let v_ac_ic = p_ic - p_ac;
    let v_bc_ic = p_ic - p_bc;
    let p_iae = l_ae_i
        .intersect_line(&l_bc_ic)
        .ok_or_else(|| degenerate("A-flank relief"))?;
    let p_ibe = l_be_i
        .intersect_line(&l_ac_ic)
        .ok_or_else(|| degenerate("B-flank relief"))?;
    let v_ae_iae = p_iae - geo.p_ae;
    let v_be_ibe = p_ibe - geo.p_be;

    let at_z = |p: Point3<f64>, z: f64| Point3::new(p.x, p.y, z);
    let z_up = geo.min.z + radius;
    let z_down = geo.min.z - radius;
    let p_ae_up = at_z(geo.p_ae, z_up);
    let p_ae_down = at_z(geo.p_ae, z_down);
    let p_be_up = at_z(geo.p_be, z_up);
    let p_be_down = at_z(geo.p_be, z_down);
    let p_ac_up = at_z(p_ac, z_up);
    let p_ac_down = at_z(p_ac, z_down);
    let p_bc_up = at_z(p_bc, z_up);
    let p_bc_down = at_z(p_bc, z_down);

    let mut cutter = finger;
    let mut joiner = kernel.copy_solid(&cutter)?;

    // Coves on the B flank: rounded inside corners for the B fingers.
    let cove_section = sheet_from_curves(
        kernel,
        &[
            Curve3::Arc {
                center: p_bc_down,
                normal: geo.v_ob_perp,
                reference: geo.v_ob,
                radius,
                start_angle: 0.0,
                end_angle: 0.5 * PI,
            },
            Curve3::Arc {
                center: p_bc_up,
                normal: geo.v_ob_perp,
                reference: geo.v_ob,
                radius,
                start_angle: 1.5 * PI,
                end_angle: 0.0,
            },
            Curve3::Line {
                start: p_be_up,
                end: p_be_down,
            },
        ],
    )?;
    let cove = kernel.create_oblique_prism(&cove_section, v_be_ibe)?;
    cutter = kernel.boolean_op(cutter, &cove, BooleanKind::Union)?;
    let cove = kernel.transform(cove, &translate_up)?;
    cutter = kernel.boolean_op(cutter, &cove, BooleanKind::Union)?;
    let cove = kernel.create_oblique_prism(&cove_section, v_bc_ic)?;
    joiner = kernel.boolean_op(joiner, &cove, BooleanKind::Union)?;
    let cove = kernel.transform(cove, &translate_up)?;
    joiner = kernel.boolean_op(joiner, &cove, BooleanKind::Union)?;

    // Coves on the A flank.
    let cove_section = sheet_from_curves(
        kernel,
        &[
            Curve3::Arc {
                center: p_ac_up,
                normal: v_oa_perp,
                reference: v_oa,
                radius,
                start_angle: 0.0,
                end_angle: 0.5 * PI,
            },
            Curve3::Arc {
                center: p_ac_down,
                normal: v_oa_perp,
                reference: v_oa,
                radius,
                start_angle: 1.5 * PI,
                end_angle: 0.0,
            },
            Curve3::Line {
                start: p_ae_down,
                end: p_ae_up,
            },
        ],
    )?;
    let cove = kernel.create_oblique_prism(&cove_section, v_ac_ic)?;
    cutter = kernel.boolean_op(cutter, &cove, BooleanKind::Difference)?;
    let cove = kernel.transform(cove, &translate_up)?;
    cutter = kernel.boolean_op(cutter, &cove, BooleanKind::Difference)?;
    let cove = kernel.create_oblique_prism(&cove_section, v_ae_iae)?;
    joiner = kernel.boolean_op(joiner, &cove, BooleanKind::Difference)?;
    let cove = kernel.transform(cove, &translate_up)?;
    joiner = kernel.boolean_op(joiner, &cove, BooleanKind::Difference)?;

    let acute_points = geo.is_acute.then(|| {
        let p_ic_down = at_z(p_ic, z_down);
        (
            p_ic_down,
            at_z(p_ia, z_down),
            at_z(p_ib, z_down),
            p_ic_down + v_oa_perp,
            p_ic_down + geo.v_ob_perp,
        )
    });

    // Dog bones on the inside face of body A.
    let bone_section = circle_sheet(kernel, p_ic, v_oa_perp, radius)?;
    let bone = kernel.create_oblique_prism(&bone_section, v_ae_i)?;
    cutter = kernel.boolean_op(cutter, &bone, BooleanKind::Union)?;
    let bone = kernel.transform(bone, &translate_up)?;
    cutter = kernel.boolean_op(cutter, &bone, BooleanKind::Union)?;
    if let Some((p_ic_down, _, p_ib_down, p_ua_down, _)) = acute_points {
        match kernel.create_oblique_prism(&bone_section, v_oa_perp) {
            Ok(bone) => {
                cutter = kernel.boolean_op(cutter, &bone, BooleanKind::Union)?;
                let bone = kernel.transform(bone, &translate_up)?;
                cutter = kernel.boolean_op(cutter, &bone, BooleanKind::Union)?;
            }
            Err(err @ KernelError::OsculatingCurves { .. }) => {
                trace!(%err, "A dog bone tangent to flank")
            }
            Err(err) => return Err(err.into()),
        }
        match triangle_sheet(kernel, p_ic_down, p_ua_down, p_ib_down) {
            Ok(section) => {
                let wedge = kernel.create_oblique_prism(
                    &section,
                    Vector3::new(0.0, 0.0, width_b + tiling.bit_diameter),
                )?;
                cutter = kernel.boolean_op(cutter, &wedge, BooleanKind::Union)?;
            }
            Err(err @ KernelError::WireSelfIntersects { .. }) => {
                trace!(%err, "A dog-bone wedge too small")
            }
            Err(err) => return Err(err.into()),
        }
    }

    // Dog bones on the inside face of body B.
    let bone_section = circle_sheet(kernel, p_ic, geo.v_ob_perp, radius)?;
    let bone = kernel.create_oblique_prism(&bone_section, v_be_i)?;
    joiner = kernel.boolean_op(joiner, &bone, BooleanKind::Difference)?;
    let bone = kernel.transform(bone, &translate_up)?;
    joiner = kernel.boolean_op(joiner, &bone, BooleanKind::Difference)?;
    if let Some((p_ic_down, p_ia_down, _, _, p_ub_down)) = acute_points {
        match kernel.create_oblique_prism(&bone_section, geo.v_ob_perp) {
            Ok(bone) => {
                joiner = kernel.boolean_op(joiner, &bone, BooleanKind::Difference)?;
                let bone = kernel.transform(bone, &translate_up)?;
                joiner = kernel.boolean_op(joiner, &bone, BooleanKind::Difference)?;
            }
            Err(err @ KernelError::OsculatingCurves { .. }) => {
                trace!(%err, "B dog bone tangent to flank")
            }
            Err(err) => return Err(err.into()),
        }
        match triangle_sheet(kernel, p_ic_down, p_ub_down, p_ia_down) {
            Ok(section) => {
                let wedge = kernel.create_oblique_prism(
                    &section,
                    Vector3::new(0.0, 0.0, tiling.bit_diameter),
                )?;
                joiner = kernel.boolean_op(joiner, &wedge, BooleanKind::Difference)?;
                let wedge = kernel.transform(wedge, &translate_up)?;
                joiner = kernel.boolean_op(joiner, &wedge, BooleanKind::Difference)?;
            }
            Err(err @ KernelError::WireSelfIntersects { .. }) => {
                trace!(%err, "B dog-bone wedge too small")
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok((cutter, joiner))
}
