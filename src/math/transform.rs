// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Matrix4f, Vector3f, Vector4f };
use super::ray::Ray3f;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
    inv_matrix: Matrix4f
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity(),
               inv_matrix: Matrix4f::identity() }
    }
}

impl Transform {
    /// `None` for a singular matrix.
    pub fn try_new(matrix: Matrix4f) -> Option<Self> {
        matrix.try_inverse().map(|inv_matrix| Self { matrix, inv_matrix })
    }

    pub fn from_pair(matrix: Matrix4f, inv_matrix: Matrix4f) -> Self {
        Self { matrix, inv_matrix }
    }

    pub fn matrix(&self) -> &Matrix4f {
        &self.matrix
    }

    pub fn inv_matrix(&self) -> &Matrix4f {
        &self.inv_matrix
    }

    pub fn apply_point(&self, p: Vector3f) -> Vector3f {
        project(&self.matrix, p)
    }

    pub fn apply_vector(&self, v: Vector3f) -> Vector3f {
        self.matrix.fixed_slice::<3, 3>(0, 0) * v
    }

    // Normal transformation is different from point transformation.
    // Before transformation, we have n^Tx = 0
    // After transformation, we have (Sn)^T(Mx) = 0
    // Then, we will get: S = (M^{-1})^T
    pub fn apply_normal(&self, n: Vector3f) -> Vector3f {
        self.inv_matrix.fixed_slice::<3, 3>(0, 0).transpose() * n
    }

    pub fn inv_apply_point(&self, p: Vector3f) -> Vector3f {
        project(&self.inv_matrix, p)
    }

    pub fn inv_apply_vector(&self, v: Vector3f) -> Vector3f {
        self.inv_matrix.fixed_slice::<3, 3>(0, 0) * v
    }

    // The direction is not renormalized, so a local hit at `t` is also at
    // `t` along the world-space ray.
    pub fn inv_apply_ray(&self, ray: &Ray3f) -> Ray3f {
        let new_p = self.inv_apply_point(ray.origin());
        let new_d = self.inv_apply_vector(ray.dir());

        Ray3f::unnormalized(new_p, new_d)
    }
}

/// Homogeneous point transform followed by the perspective divide.
pub fn project(m: &Matrix4f, p: Vector3f) -> Vector3f {
    let h = m * Vector4f::new(p.x, p.y, p.z, 1.0);
    let w: Float = h.w;
    Vector3f::new(h.x / w, h.y / w, h.z / w)
}
