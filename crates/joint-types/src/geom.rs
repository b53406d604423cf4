//! Analytic planar geometry used by joint synthesis.
//!
//! Planes, infinite lines, and the per-seam joint coordinate frame. These
//! are exact computations over `nalgebra` types; no kernel round-trips.

use nalgebra::{Matrix3, Matrix4, Point3, Unit, Vector3};

/// Tolerance for coincidence tests on points and distances.
pub const POINT_TOLERANCE: f64 = 1e-8;

/// An unbounded plane given by a point on it and a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
}

impl Plane {
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            origin,
            normal: Unit::new_normalize(normal),
        }
    }

    /// Signed distance from `point` to the plane, along the normal.
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    pub fn is_parallel_to(&self, other: &Plane) -> bool {
        self.normal.cross(&other.normal).norm() < POINT_TOLERANCE
    }

    pub fn is_coplanar_to(&self, other: &Plane) -> bool {
        self.is_parallel_to(other) && self.signed_distance(&other.origin).abs() < POINT_TOLERANCE
    }

    /// Line of intersection with another plane, or `None` when parallel.
    pub fn intersect_plane(&self, other: &Plane) -> Option<Line3> {
        let n1 = self.normal.into_inner();
        let n2 = other.normal.into_inner();
        let dir = n1.cross(&n2);
        let denom = dir.norm_squared();
        if denom < POINT_TOLERANCE * POINT_TOLERANCE {
            return None;
        }
        let d1 = n1.dot(&self.origin.coords);
        let d2 = n2.dot(&other.origin.coords);
        let point = (n2.cross(&dir) * d1 + dir.cross(&n1) * d2) / denom;
        Some(Line3 {
            origin: Point3::from(point),
            direction: dir.normalize(),
        })
    }

    /// Intersection with an infinite line, or `None` when the line is
    /// parallel to the plane.
    pub fn intersect_line(&self, line: &Line3) -> Option<Point3<f64>> {
        let denom = self.normal.dot(&line.direction);
        if denom.abs() < POINT_TOLERANCE {
            return None;
        }
        let t = self.normal.dot(&(self.origin - line.origin)) / denom;
        Some(line.origin + line.direction * t)
    }
}

/// An unbounded line given by a point and a direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Line3 {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Intersection with another line, or `None` when the lines are
    /// parallel or skew beyond tolerance.
    pub fn intersect_line(&self, other: &Line3) -> Option<Point3<f64>> {
        let u = self.direction;
        let v = other.direction;
        let w = self.origin - other.origin;
        let a = u.dot(&u);
        let b = u.dot(&v);
        let c = v.dot(&v);
        let d = u.dot(&w);
        let e = v.dot(&w);
        let denom = a * c - b * b;
        if denom.abs() < POINT_TOLERANCE * (a * c).max(1.0) {
            return None;
        }
        let sc = (b * e - c * d) / denom;
        let tc = (a * e - b * d) / denom;
        let p1 = self.origin + u * sc;
        let p2 = other.origin + v * tc;
        if (p1 - p2).norm() > POINT_TOLERANCE.max(POINT_TOLERANCE * a.sqrt()) {
            return None;
        }
        Some(Point3::from((p1.coords + p2.coords) * 0.5))
    }
}

/// The per-seam working coordinate system: origin on the mating edge,
/// Z along the edge, Y the inward normal of face A, X = Y × Z.
///
/// `to_nominal` maps document space into the frame; `to_joint` is its
/// inverse. All per-seam geometry is authored in nominal space and mapped
/// back through `to_joint`.
#[derive(Debug, Clone, PartialEq)]
pub struct JointFrame {
    pub origin: Point3<f64>,
    pub x_axis: Unit<Vector3<f64>>,
    pub y_axis: Unit<Vector3<f64>>,
    pub z_axis: Unit<Vector3<f64>>,
    pub to_nominal: Matrix4<f64>,
    pub to_joint: Matrix4<f64>,
}

impl JointFrame {
    /// Build a frame from an origin and three orthonormal axes.
    pub fn from_axes(
        origin: Point3<f64>,
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
        z_axis: Vector3<f64>,
    ) -> Self {
        let x = Unit::new_normalize(x_axis);
        let y = Unit::new_normalize(y_axis);
        let z = Unit::new_normalize(z_axis);

        let rotation = Matrix3::from_columns(&[x.into_inner(), y.into_inner(), z.into_inner()]);
        let mut to_joint = rotation.to_homogeneous();
        to_joint.fixed_view_mut::<3, 1>(0, 3).copy_from(&origin.coords);

        // Orthonormal basis: the inverse is the transposed rotation.
        let inv_rotation = rotation.transpose();
        let mut to_nominal = inv_rotation.to_homogeneous();
        to_nominal
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&(-(inv_rotation * origin.coords)));

        Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: z,
            to_nominal,
            to_joint,
        }
    }
}

/// A translation along the nominal Z axis, as a homogeneous matrix.
pub fn z_translation(dz: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(0.0, 0.0, dz))
}
