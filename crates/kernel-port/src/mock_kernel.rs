//! Deterministic in-memory kernel for tests.
//!
//! Solids are modeled by their axis-aligned bounding boxes: unions
//! enclose, intersections clip, differences leave the target box
//! unchanged. For right-angle scenarios built from axis-aligned boxes
//! the resulting boxes are exact, which is enough to exercise seam
//! detection, sweep measurement, and reconciliation end to end.

use std::collections::HashMap;

use joint_types::{BodyId, Plane, POINT_TOLERANCE};
use nalgebra::{Matrix4, Point3, Vector3};

use crate::traits::{BodyIntrospect, Kernel, KernelResult};
use crate::types::{
    Aabb, BodyRef, BooleanKind, Curve3, EdgeId, FaceId, FacePlane, KernelError, SheetHandle,
    SolidHandle, WireHandle,
};

const AREA_TOLERANCE: f64 = 1e-9;

struct MockWire {
    points: Vec<Point3<f64>>,
    plane: Option<Plane>,
    closed: bool,
}

struct MockSheet {
    plane: Plane,
    bounds: Aabb,
}

struct MockFace {
    body: BodyId,
    plane: Plane,
    normal_reversed: bool,
    bounds: Aabb,
    edges: Vec<EdgeId>,
}

struct MockBody {
    name: String,
    handle: SolidHandle,
    faces: Vec<FaceId>,
}

#[derive(Default)]
pub struct MockKernel {
    next_id: u64,
    solids: HashMap<u64, Aabb>,
    sheets: HashMap<u64, MockSheet>,
    wires: HashMap<u64, MockWire>,
    faces: HashMap<u64, MockFace>,
    edges: HashMap<u64, Vec<FaceId>>,
    bodies: HashMap<BodyId, MockBody>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Registers an axis-aligned box as a document body with six planar
    /// faces and twelve edges. Face normals point outward.
    pub fn add_box_body(&mut self, name: &str, min: Point3<f64>, max: Point3<f64>) -> BodyRef {
        let handle = SolidHandle(self.next());
        self.solids.insert(handle.0, Aabb::new(min, max));
        let body_id = BodyId::new();

        let mut face_ids = Vec::with_capacity(6);
        let mut normals = Vec::with_capacity(6);
        for axis in 0..3 {
            for (pin, sign) in [(min[axis], -1.0), (max[axis], 1.0)] {
                let mut normal = Vector3::zeros();
                normal[axis] = sign;
                let mut origin = nalgebra::center(&min, &max);
                origin[axis] = pin;
                let mut fmin = min;
                let mut fmax = max;
                fmin[axis] = pin;
                fmax[axis] = pin;
                let id = FaceId(self.next());
                self.faces.insert(
                    id.0,
                    MockFace {
                        body: body_id,
                        plane: Plane::new(origin, normal),
                        normal_reversed: false,
                        bounds: Aabb::new(fmin, fmax),
                        edges: Vec::new(),
                    },
                );
                face_ids.push(id);
                normals.push(normal);
            }
        }

        // One edge per pair of orthogonal faces.
        for i in 0..face_ids.len() {
            for j in (i + 1)..face_ids.len() {
                if normals[i].dot(&normals[j]).abs() > POINT_TOLERANCE {
                    continue;
                }
                let edge = EdgeId(self.next());
                self.edges.insert(edge.0, vec![face_ids[i], face_ids[j]]);
                for id in [face_ids[i], face_ids[j]] {
                    if let Some(face) = self.faces.get_mut(&id.0) {
                        face.edges.push(edge);
                    }
                }
            }
        }

        self.bodies.insert(
            body_id,
            MockBody {
                name: name.to_string(),
                handle: handle.clone(),
                faces: face_ids,
            },
        );
        BodyRef {
            id: body_id,
            handle,
            name: name.to_string(),
        }
    }

    /// Finds the face of `body` whose outward normal matches `outward`.
    pub fn find_face(&self, body: &BodyId, outward: Vector3<f64>) -> Option<FaceId> {
        let dir = outward.normalize();
        self.bodies.get(body)?.faces.iter().copied().find(|id| {
            self.faces
                .get(&id.0)
                .map(|f| f.plane.normal.dot(&dir) > 1.0 - 1e-6)
                .unwrap_or(false)
        })
    }

    fn solid(&self, handle: &SolidHandle) -> KernelResult<Aabb> {
        self.solids
            .get(&handle.0)
            .copied()
            .ok_or_else(|| KernelError::EntityNotFound {
                entity: format!("solid #{}", handle.0),
            })
    }

    fn sheet(&self, handle: &SheetHandle) -> KernelResult<&MockSheet> {
        self.sheets
            .get(&handle.0)
            .ok_or_else(|| KernelError::EntityNotFound {
                entity: format!("sheet #{}", handle.0),
            })
    }

    fn face(&self, id: FaceId) -> KernelResult<&MockFace> {
        self.faces
            .get(&id.0)
            .ok_or_else(|| KernelError::EntityNotFound {
                entity: format!("face #{}", id.0),
            })
    }

    fn insert_solid(&mut self, bounds: Aabb) -> SolidHandle {
        let handle = SolidHandle(self.next());
        self.solids.insert(handle.0, bounds);
        handle
    }
}

fn bounds_of(points: &[Point3<f64>]) -> Aabb {
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    Aabb::new(min, max)
}

/// Newell's method; the result's magnitude is twice the polygon area.
fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut n = Vector3::zeros();
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

fn in_plane_axes(normal: &Vector3<f64>, reference: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let n = normal.normalize();
    let u = (reference - n * reference.dot(&n)).normalize();
    let v = n.cross(&u);
    (u, v)
}

fn any_perpendicular(normal: &Vector3<f64>) -> Vector3<f64> {
    let pick = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    normal.cross(&pick)
}

impl Kernel for MockKernel {
    fn create_box(
        &mut self,
        corner: Point3<f64>,
        extents: Vector3<f64>,
    ) -> KernelResult<SolidHandle> {
        if extents.x <= 0.0 || extents.y <= 0.0 || extents.z <= 0.0 {
            return Err(KernelError::Other {
                message: format!("box extents must be positive, got {extents:?}"),
            });
        }
        Ok(self.insert_solid(Aabb::new(corner, corner + extents)))
    }

    fn create_sphere(&mut self, center: Point3<f64>, radius: f64) -> KernelResult<SolidHandle> {
        if radius <= 0.0 {
            return Err(KernelError::Other {
                message: format!("sphere radius must be positive, got {radius}"),
            });
        }
        let r = Vector3::repeat(radius);
        Ok(self.insert_solid(Aabb::new(center - r, center + r)))
    }

    fn create_wire_from_curves(
        &mut self,
        curves: &[Curve3],
    ) -> KernelResult<(WireHandle, bool)> {
        if curves.is_empty() {
            return Err(KernelError::Other {
                message: "wire needs at least one curve".to_string(),
            });
        }
        let mut points = Vec::new();
        let mut endpoints: Vec<(Point3<f64>, Point3<f64>)> = Vec::new();
        let mut plane = None;
        let mut has_closed_curve = false;
        for curve in curves {
            match curve {
                Curve3::Line { start, end } => {
                    points.push(*start);
                    points.push(*end);
                    endpoints.push((*start, *end));
                }
                Curve3::Arc {
                    center,
                    normal,
                    reference,
                    radius,
                    start_angle,
                    end_angle,
                } => {
                    if *radius < POINT_TOLERANCE {
                        return Err(KernelError::WireSelfIntersects {
                            reason: "arc radius is zero".to_string(),
                        });
                    }
                    let (u, v) = in_plane_axes(normal, reference);
                    let at = |angle: f64| {
                        center + (u * angle.cos() + v * angle.sin()) * *radius
                    };
                    for dir in [u, -u, v, -v] {
                        points.push(center + dir * *radius);
                    }
                    endpoints.push((at(*start_angle), at(*end_angle)));
                    plane.get_or_insert(Plane::new(*center, *normal));
                }
                Curve3::Circle {
                    center,
                    normal,
                    radius,
                } => {
                    if *radius < POINT_TOLERANCE {
                        return Err(KernelError::WireSelfIntersects {
                            reason: "circle radius is zero".to_string(),
                        });
                    }
                    let (u, v) = in_plane_axes(normal, &any_perpendicular(normal));
                    for dir in [u, -u, v, -v] {
                        points.push(center + dir * *radius);
                    }
                    has_closed_curve = true;
                    plane.get_or_insert(Plane::new(*center, *normal));
                }
            }
        }

        let chain_tol = 1e-6;
        let chained = endpoints.windows(2).all(|pair| {
            nalgebra::distance(&pair[0].1, &pair[1].0) < chain_tol
        });
        let closed = has_closed_curve
            || (chained
                && !endpoints.is_empty()
                && nalgebra::distance(
                    &endpoints[endpoints.len() - 1].1,
                    &endpoints[0].0,
                ) < chain_tol);

        let handle = WireHandle(self.next());
        self.wires.insert(
            handle.0,
            MockWire {
                points,
                plane,
                closed,
            },
        );
        Ok((handle, closed))
    }

    fn create_face_from_planar_wires(
        &mut self,
        wires: &[WireHandle],
    ) -> KernelResult<SheetHandle> {
        let outer = wires.first().ok_or_else(|| KernelError::Other {
            message: "face needs at least one wire".to_string(),
        })?;
        let wire = self
            .wires
            .get(&outer.0)
            .ok_or_else(|| KernelError::EntityNotFound {
                entity: format!("wire #{}", outer.0),
            })?;
        if !wire.closed {
            return Err(KernelError::Other {
                message: "outer wire is not closed".to_string(),
            });
        }
        let plane = match wire.plane {
            Some(plane) => plane,
            None => {
                let n = newell_normal(&wire.points);
                if n.norm() / 2.0 < AREA_TOLERANCE {
                    return Err(KernelError::WireSelfIntersects {
                        reason: "wire encloses no area".to_string(),
                    });
                }
                Plane::new(wire.points[0], n)
            }
        };
        let bounds = bounds_of(&wire.points);
        let handle = SheetHandle(self.next());
        self.sheets.insert(handle.0, MockSheet { plane, bounds });
        Ok(handle)
    }

    fn create_prism(&mut self, base: &SheetHandle, height: f64) -> KernelResult<SolidHandle> {
        let normal = self.sheet(base)?.plane.normal.into_inner();
        self.create_oblique_prism(base, normal * height)
    }

    fn create_oblique_prism(
        &mut self,
        base: &SheetHandle,
        direction: Vector3<f64>,
    ) -> KernelResult<SolidHandle> {
        let sheet = self.sheet(base)?;
        let along = direction.dot(&sheet.plane.normal);
        if along.abs() < POINT_TOLERANCE {
            return Err(KernelError::OsculatingCurves {
                reason: "sweep direction lies in the section plane".to_string(),
            });
        }
        let swept = Aabb::new(sheet.bounds.min + direction, sheet.bounds.max + direction);
        let bounds = sheet.bounds.enclosing(&swept);
        Ok(self.insert_solid(bounds))
    }

    fn copy_face(&mut self, face: FaceId) -> KernelResult<SheetHandle> {
        let (plane, bounds) = {
            let f = self.face(face)?;
            (f.plane, f.bounds)
        };
        let handle = SheetHandle(self.next());
        self.sheets.insert(handle.0, MockSheet { plane, bounds });
        Ok(handle)
    }

    fn boolean_op(
        &mut self,
        target: SolidHandle,
        tool: &SolidHandle,
        kind: BooleanKind,
    ) -> KernelResult<SolidHandle> {
        let a = self.solid(&target)?;
        let b = self.solid(tool)?;
        let bounds = match kind {
            BooleanKind::Union => a.enclosing(&b),
            // A box minus anything still fits the original box.
            BooleanKind::Difference => a,
            BooleanKind::Intersection => {
                let mut i = a.intersection(&b);
                if i.is_empty() {
                    let c = nalgebra::center(&a.center(), &b.center());
                    i = Aabb::new(c, c);
                }
                i
            }
        };
        Ok(self.insert_solid(bounds))
    }

    fn transform(
        &mut self,
        body: SolidHandle,
        matrix: &Matrix4<f64>,
    ) -> KernelResult<SolidHandle> {
        let a = self.solid(&body)?;
        let mut corners = Vec::with_capacity(8);
        for x in [a.min.x, a.max.x] {
            for y in [a.min.y, a.max.y] {
                for z in [a.min.z, a.max.z] {
                    corners.push(matrix.transform_point(&Point3::new(x, y, z)));
                }
            }
        }
        Ok(self.insert_solid(bounds_of(&corners)))
    }

    fn copy_solid(&mut self, body: &SolidHandle) -> KernelResult<SolidHandle> {
        let bounds = self.solid(body)?;
        Ok(self.insert_solid(bounds))
    }

    fn imprint_overlaps(&mut self, a: FaceId, b: FaceId) -> KernelResult<bool> {
        let fa = self.face(a)?;
        let fb = self.face(b)?;
        if !fa.plane.is_coplanar_to(&fb.plane) {
            return Ok(false);
        }
        let overlap = fa.bounds.intersection(&fb.bounds);
        if overlap.is_empty() {
            return Ok(false);
        }
        let e = overlap.extents();
        let mut spans = [e.x, e.y, e.z];
        spans.sort_by(f64::total_cmp);
        // The two largest spans are the in-plane extents.
        Ok(spans[1] * spans[2] > AREA_TOLERANCE)
    }
}

impl BodyIntrospect for MockKernel {
    fn face_body(&self, face: FaceId) -> KernelResult<BodyRef> {
        let body_id = self.face(face)?.body;
        let body = self
            .bodies
            .get(&body_id)
            .ok_or_else(|| KernelError::EntityNotFound {
                entity: format!("body {body_id}"),
            })?;
        Ok(BodyRef {
            id: body_id,
            handle: body.handle.clone(),
            name: body.name.clone(),
        })
    }

    fn face_plane(&self, face: FaceId) -> KernelResult<Option<FacePlane>> {
        let f = self.face(face)?;
        Ok(Some(FacePlane {
            plane: f.plane,
            normal_reversed: f.normal_reversed,
        }))
    }

    fn face_edges(&self, face: FaceId) -> Vec<EdgeId> {
        self.faces
            .get(&face.0)
            .map(|f| f.edges.clone())
            .unwrap_or_default()
    }

    fn edge_faces(&self, edge: EdgeId) -> Vec<FaceId> {
        self.edges.get(&edge.0).cloned().unwrap_or_default()
    }

    fn shell_faces(&self, body: &BodyId) -> Vec<FaceId> {
        self.bodies
            .get(body)
            .map(|b| b.faces.clone())
            .unwrap_or_default()
    }

    fn bounding_box(&self, body: &SolidHandle) -> KernelResult<Aabb> {
        self.solid(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_body_has_six_faces_and_twelve_edges() {
        let mut kernel = MockKernel::new();
        let body = kernel.add_box_body("A", Point3::origin(), Point3::new(1.0, 2.0, 3.0));
        let faces = kernel.shell_faces(&body.id);
        assert_eq!(faces.len(), 6);
        for face in &faces {
            assert_eq!(kernel.face_edges(*face).len(), 4);
        }
        let edge_count: usize = kernel.edges.len();
        assert_eq!(edge_count, 12);
    }

    #[test]
    fn find_face_returns_outward_match() {
        let mut kernel = MockKernel::new();
        let body = kernel.add_box_body("A", Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let face = kernel.find_face(&body.id, -Vector3::x()).unwrap();
        let plane = kernel.face_plane(face).unwrap().unwrap();
        assert_relative_eq!(plane.plane.origin.x, 0.0);
        assert_relative_eq!(plane.inward_normal().x, 1.0);
    }

    #[test]
    fn booleans_follow_box_semantics() {
        let mut kernel = MockKernel::new();
        let a = kernel
            .create_box(Point3::origin(), Vector3::new(2.0, 2.0, 2.0))
            .unwrap();
        let b = kernel
            .create_box(Point3::new(1.0, 0.0, 0.0), Vector3::new(2.0, 2.0, 2.0))
            .unwrap();
        let i = kernel
            .boolean_op(a.clone(), &b, BooleanKind::Intersection)
            .unwrap();
        let bounds = kernel.bounding_box(&i).unwrap();
        assert_relative_eq!(bounds.min.x, 1.0);
        assert_relative_eq!(bounds.max.x, 2.0);

        let u = kernel.boolean_op(a.clone(), &b, BooleanKind::Union).unwrap();
        assert_relative_eq!(kernel.bounding_box(&u).unwrap().max.x, 3.0);

        // Consumed handles stay readable.
        assert_relative_eq!(kernel.bounding_box(&a).unwrap().max.x, 2.0);
    }

    #[test]
    fn degenerate_triangle_raises_self_intersection() {
        let mut kernel = MockKernel::new();
        let p = Point3::origin();
        let q = Point3::new(1.0, 0.0, 0.0);
        let (wire, closed) = kernel
            .create_wire_from_curves(&[
                Curve3::Line { start: p, end: q },
                Curve3::Line { start: q, end: p },
            ])
            .unwrap();
        assert!(closed);
        let err = kernel.create_face_from_planar_wires(&[wire]).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn in_plane_sweep_raises_osculating() {
        let mut kernel = MockKernel::new();
        let (wire, _) = kernel
            .create_wire_from_curves(&[Curve3::Circle {
                center: Point3::origin(),
                normal: Vector3::z(),
                radius: 0.5,
            }])
            .unwrap();
        let sheet = kernel.create_face_from_planar_wires(&[wire]).unwrap();
        let err = kernel
            .create_oblique_prism(&sheet, Vector3::new(1.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, KernelError::OsculatingCurves { .. }));
    }
}
