// Copyright @yucwang 2026

use crate::math::constants::Vector3f;

/// Orthonormal basis around a shading normal; local `+z` is the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    pub tangent: Vector3f,
    pub bitangent: Vector3f,
    pub normal: Vector3f,
}

impl TangentFrame {
    pub fn new(normal: &Vector3f) -> Self {
        let up = if normal.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let tangent = normal.cross(&up).normalize();
        let bitangent = normal.cross(&tangent).normalize();
        Self { tangent, bitangent, normal: *normal }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.tangent), v.dot(&self.bitangent), v.dot(&self.normal))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}
