// Copyright @yucwang 2026

use crate::math::constants::{Matrix4f, Vector3f};
use crate::math::transform::Transform;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraError {
    /// `proj * view` has no inverse.
    Singular,
    NonFinite,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Singular => write!(f, "camera matrix is singular"),
            CameraError::NonFinite => write!(f, "camera matrix has non-finite entries"),
        }
    }
}

impl std::error::Error for CameraError {}

/// World-to-view (world to normalized device coordinates) and its inverse,
/// swapped as one unit between passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    world_to_view: Transform,
}

impl Default for CameraTransform {
    fn default() -> Self {
        let mut m = Matrix4f::identity();
        m[(2, 2)] = -1.0;
        Self { world_to_view: Transform::from_pair(m, m) }
    }
}

impl CameraTransform {
    pub fn from_view_proj(view: &Matrix4f, proj: &Matrix4f) -> Result<Self, CameraError> {
        Self::from_world_to_view(proj * view)
    }

    pub fn from_world_to_view(w2v: Matrix4f) -> Result<Self, CameraError> {
        if w2v.iter().any(|v| !v.is_finite()) {
            return Err(CameraError::NonFinite);
        }
        let world_to_view = Transform::try_new(w2v).ok_or(CameraError::Singular)?;
        Ok(Self { world_to_view })
    }

    pub fn world_to_view(&self) -> &Matrix4f {
        self.world_to_view.matrix()
    }

    pub fn view_to_world(&self) -> &Matrix4f {
        self.world_to_view.inv_matrix()
    }

    /// World-space point to normalized device coordinates.
    pub fn project(&self, p: &Vector3f) -> Vector3f {
        self.world_to_view.apply_point(*p)
    }

    /// Normalized device coordinates to a world-space point.
    pub fn unproject(&self, ndc: &Vector3f) -> Vector3f {
        self.world_to_view.inv_apply_point(*ndc)
    }
}
