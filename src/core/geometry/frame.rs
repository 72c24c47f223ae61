use crate::core::geometry::vector::{Vector3f, coordinate_system};
use crate::core::geometry::normal::Normal3f;

/// Orthonormal shading basis. Local `z` is the shading normal.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ReferenceFrame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl ReferenceFrame {
    pub fn new(x: Vector3f, y: Vector3f, z: Vector3f) -> Self {
        Self { x, y, z }
    }

    pub fn from_normal(n: &Normal3f) -> Self {
        let z = Vector3f::from(*n).normalize();
        let (x, y) = coordinate_system(&z);

        Self { x, y, z }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(self.x.dot(v), self.y.dot(v), self.z.dot(v))
    }

    pub fn from_local(&self, v: &Vector3f) -> Vector3f {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}
