// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// World-space distance along the (unit) ray direction.
    pub distance: Float,
    pub uv: Vector2f,
}

/// A single analytic surface. Shapes are grouped into a `Geometry` by
/// `shapes::group::ShapeGroup`.
pub trait Shape: Send + Sync {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<ShapeHit>;

    /// Unit outward normal at a point on the surface.
    fn normal_at(&self, position: &Vector3f, uv: &Vector2f) -> Vector3f;

    fn surface_area(&self) -> Float;
}
