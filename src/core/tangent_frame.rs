// Copyright @yucwang 2026

use crate::math::constants::Vector3f;

/// Orthonormal basis whose local `+z` is the given unit normal.
#[derive(Debug, Copy, Clone)]
pub struct TangentFrame {
    tangent: Vector3f,
    bitangent: Vector3f,
    normal: Vector3f,
}

impl TangentFrame {
    /// `normal` must be unit length.
    pub fn from_normal(normal: &Vector3f) -> Self {
        let up = if normal.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let tangent = normal.cross(&up).normalize();
        let bitangent = normal.cross(&tangent);
        Self { tangent, bitangent, normal: *normal }
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}
