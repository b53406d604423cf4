use joint_types::{BodyId, Plane};
use nalgebra::{Point3, Unit, Vector3};

/// Opaque handle to a transient solid in the geometry kernel.
/// Never persisted; valid only for the current kernel session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolidHandle(pub(crate) u64);

/// Opaque handle to a transient planar sheet (a standalone face body).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetHandle(pub(crate) u64);

/// Opaque handle to a transient wire body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WireHandle(pub(crate) u64);

/// Kernel-internal identifier of a face on a document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId(pub u64);

/// Kernel-internal identifier of an edge on a document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub u64);

/// A document body: stable identity plus the handle of its current solid
/// and its user-visible name.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRef {
    pub id: BodyId,
    pub handle: SolidHandle,
    pub name: String,
}

/// The plane of a planar face, plus whether the stored normal is reversed
/// with respect to the face's outward direction. When `normal_reversed`
/// is false the stored normal points outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlane {
    pub plane: Plane,
    pub normal_reversed: bool,
}

impl FacePlane {
    /// Normal pointing into the body's interior.
    pub fn inward_normal(&self) -> Unit<Vector3<f64>> {
        if self.normal_reversed {
            self.plane.normal
        } else {
            Unit::new_unchecked(-self.plane.normal.into_inner())
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn is_empty(&self) -> bool {
        let e = self.extents();
        e.x < 0.0 || e.y < 0.0 || e.z < 0.0
    }

    pub fn intersection(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        }
    }

    pub fn enclosing(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }
}

/// A bounded 3D curve used to author planar cross-section wires.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve3 {
    Line {
        start: Point3<f64>,
        end: Point3<f64>,
    },
    /// Circular arc by center. `reference` fixes the zero-angle direction
    /// in the plane defined by `normal`; angles are radians,
    /// counterclockwise about the normal.
    Arc {
        center: Point3<f64>,
        normal: Vector3<f64>,
        reference: Vector3<f64>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Circle {
        center: Point3<f64>,
        normal: Vector3<f64>,
        radius: f64,
    },
}

/// Kind of a solid-solid boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Union,
    Difference,
    Intersection,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    /// A cross-section wire degenerates to (near) zero area.
    #[error("wire self-intersects: {reason}")]
    WireSelfIntersects { reason: String },

    /// A swept construction collapses onto its own base curves.
    #[error("osculating curves: {reason}")]
    OsculatingCurves { reason: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("entity not found: {entity}")]
    EntityNotFound { entity: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

impl KernelError {
    /// Whether this error is one of the recognized degenerate-geometry
    /// signatures that joint synthesis treats as non-fatal.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Self::WireSelfIntersects { .. } | Self::OsculatingCurves { .. }
        )
    }
}
