use joint_types::BodyId;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::types::{
    Aabb, BodyRef, BooleanKind, Curve3, EdgeId, FaceId, FacePlane, KernelError, SheetHandle,
    SolidHandle, WireHandle,
};

pub type KernelResult<T> = Result<T, KernelError>;

/// Construction and modification operations on the host geometry kernel.
///
/// Calls that modify a solid consume its handle and return the handle of
/// the resulting solid; the consumed handle stays readable (its geometry
/// is frozen) but can no longer be passed to mutating calls.
pub trait Kernel {
    /// Axis-aligned box from a corner and positive extents.
    fn create_box(
        &mut self,
        corner: Point3<f64>,
        extents: Vector3<f64>,
    ) -> KernelResult<SolidHandle>;

    fn create_sphere(&mut self, center: Point3<f64>, radius: f64) -> KernelResult<SolidHandle>;

    /// Builds a wire from a curve chain. Returns the wire and whether the
    /// chain closed onto itself.
    fn create_wire_from_curves(&mut self, curves: &[Curve3])
        -> KernelResult<(WireHandle, bool)>;

    /// Builds a planar sheet bounded by closed wires. The first wire is
    /// the outer loop.
    fn create_face_from_planar_wires(
        &mut self,
        wires: &[WireHandle],
    ) -> KernelResult<SheetHandle>;

    /// Extrudes a sheet along its own normal. Negative heights extrude
    /// against the normal.
    fn create_prism(&mut self, base: &SheetHandle, height: f64) -> KernelResult<SolidHandle>;

    /// Extrudes a sheet along an arbitrary direction vector whose length
    /// is the extrusion distance.
    fn create_oblique_prism(
        &mut self,
        base: &SheetHandle,
        direction: Vector3<f64>,
    ) -> KernelResult<SolidHandle>;

    /// Copies a document face into a standalone sheet body.
    fn copy_face(&mut self, face: FaceId) -> KernelResult<SheetHandle>;

    fn boolean_op(
        &mut self,
        target: SolidHandle,
        tool: &SolidHandle,
        kind: BooleanKind,
    ) -> KernelResult<SolidHandle>;

    fn transform(
        &mut self,
        body: SolidHandle,
        matrix: &Matrix4<f64>,
    ) -> KernelResult<SolidHandle>;

    fn copy_solid(&mut self, body: &SolidHandle) -> KernelResult<SolidHandle>;

    /// Whether two faces overlap over a finite area when imprinted onto a
    /// common plane. False whenever the faces are not coplanar.
    fn imprint_overlaps(&mut self, a: FaceId, b: FaceId) -> KernelResult<bool>;
}

/// Read-only topology queries against document bodies.
pub trait BodyIntrospect {
    fn face_body(&self, face: FaceId) -> KernelResult<BodyRef>;

    /// The face's plane, or `None` for non-planar faces.
    fn face_plane(&self, face: FaceId) -> KernelResult<Option<FacePlane>>;

    fn face_edges(&self, face: FaceId) -> Vec<EdgeId>;

    fn edge_faces(&self, edge: EdgeId) -> Vec<FaceId>;

    /// Outer-shell faces of a body, in deterministic order.
    fn shell_faces(&self, body: &BodyId) -> Vec<FaceId>;

    fn bounding_box(&self, body: &SolidHandle) -> KernelResult<Aabb>;
}

/// Convenience supertrait for code that needs both halves of the port.
pub trait KernelBundle: Kernel + BodyIntrospect {
    fn as_introspect(&self) -> &dyn BodyIntrospect;
}

impl<T: Kernel + BodyIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn BodyIntrospect {
        self
    }
}
