//! Small construction helpers over the kernel port.

use kernel_port::{Curve3, Kernel, KernelBundle, KernelResult, SheetHandle, SolidHandle};
use nalgebra::{Point3, Vector3};

/// Wire-then-face in one step. The curves must form a closed planar loop.
pub fn sheet_from_curves<K: Kernel + ?Sized>(
    kernel: &mut K,
    curves: &[Curve3],
) -> KernelResult<SheetHandle> {
    let (wire, _) = kernel.create_wire_from_curves(curves)?;
    kernel.create_face_from_planar_wires(&[wire])
}

pub fn triangle_sheet<K: Kernel + ?Sized>(
    kernel: &mut K,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> KernelResult<SheetHandle> {
    sheet_from_curves(
        kernel,
        &[
            Curve3::Line { start: a, end: b },
            Curve3::Line { start: b, end: c },
            Curve3::Line { start: c, end: a },
        ],
    )
}

pub fn circle_sheet<K: Kernel + ?Sized>(
    kernel: &mut K,
    center: Point3<f64>,
    normal: Vector3<f64>,
    radius: f64,
) -> KernelResult<SheetHandle> {
    sheet_from_curves(
        kernel,
        &[Curve3::Circle {
            center,
            normal,
            radius,
        }],
    )
}

/// A sphere guaranteed to contain the given solid: centered on its
/// bounding box, radius the half-diagonal plus one unit.
pub fn containing_sphere<K: KernelBundle + ?Sized>(
    kernel: &mut K,
    body: &SolidHandle,
) -> KernelResult<SolidHandle> {
    let bounds = kernel.bounding_box(body)?;
    let radius = bounds.extents().norm() / 2.0 + 1.0;
    kernel.create_sphere(bounds.center(), radius)
}
