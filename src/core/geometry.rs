// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};

/// Closest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: Float,
    pub primitive: usize,
    pub group: usize,
    pub uv: Vector2f,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Unit geometric normal, not yet flipped toward the ray.
    pub normal: Vector3f,
    pub texcoord: Vector2f,
}

/// Ray queries against the scene. Implementations own whatever spatial
/// index they need; the integrators only see these calls.
pub trait Geometry: Send + Sync {
    /// `None` when the ray escapes the scene.
    fn hit(&self, origin: &Vector3f, direction: &Vector3f) -> Option<RayHit>;

    /// Surface attributes at `position`, the point `hit.distance` along the
    /// ray that produced `hit`.
    fn calc_geometry(&self, hit: &RayHit, position: &Vector3f, direction: &Vector3f) -> SurfaceGeometry;

    fn material_id(&self, primitive: usize, group: usize) -> usize;

    /// Shadow test against a target `distance` away. Any nearer hit counts
    /// as a full blocker, including transmissive surfaces.
    fn occluded(&self, origin: &Vector3f, direction: &Vector3f, distance: Float) -> bool {
        match self.hit(origin, direction) {
            Some(hit) => hit.distance < distance,
            None => false,
        }
    }
}
