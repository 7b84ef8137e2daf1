// Copyright @yucwang 2026

use crate::core::shape::{Shape, ShapeHit};
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

/// The square `[-1, 1]^2` in the local `z = 0` plane, placed by `to_world`.
pub struct Rectangle {
    to_world: Transform,
    normal: Vector3f,
    area: Float,
}

impl Rectangle {
    pub fn new(to_world: Transform) -> Self {
        let dp_du = to_world.apply_vector(Vector3f::new(2.0, 0.0, 0.0));
        let dp_dv = to_world.apply_vector(Vector3f::new(0.0, 2.0, 0.0));
        let cross = dp_du.cross(&dp_dv);
        let area = cross.norm();
        let normal = if area > 0.0 {
            cross / area
        } else {
            to_world.apply_normal(Vector3f::new(0.0, 0.0, 1.0)).normalize()
        };

        Self { to_world, normal, area }
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }
}

impl Shape for Rectangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<ShapeHit> {
        // The local ray keeps the scaled direction, so its parameter is the
        // world-space distance.
        let local = self.to_world.inv_apply_ray(ray);
        let dir = local.dir();
        if dir.z.abs() < EPSILON * EPSILON {
            return None;
        }

        let t = -local.origin().z / dir.z;
        if !ray.test_segment(t) {
            return None;
        }

        let p = local.at(t);
        if p.x.abs() > 1.0 || p.y.abs() > 1.0 {
            return None;
        }

        Some(ShapeHit { distance: t, uv: Vector2f::new(0.5 * (p.x + 1.0), 0.5 * (p.y + 1.0)) })
    }

    fn normal_at(&self, _position: &Vector3f, _uv: &Vector2f) -> Vector3f {
        self.normal
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Matrix4f;

    fn floor(half_size: Float) -> Rectangle {
        // rotate +z onto +y, then scale
        let rotate = Matrix4f::new_rotation(Vector3f::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        let scale = Matrix4f::new_nonuniform_scaling(&Vector3f::new(half_size, half_size, 1.0));
        Rectangle::new(Transform::try_new(rotate * scale).unwrap())
    }

    #[test]
    fn test_transformed_rectangle() {
        let rect = floor(3.0);
        assert!((rect.normal() - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-5);
        assert!((rect.surface_area() - 36.0).abs() < 1e-3);

        let ray = Ray3f::new(Vector3f::new(2.5, 4.0, 0.5), Vector3f::new(0.0, -1.0, 0.0), Some(1e-4), None);
        let hit = rect.ray_intersection(&ray).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!(hit.uv.x > 0.5 && hit.uv.x <= 1.0);

        let outside = Ray3f::new(Vector3f::new(3.5, 4.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), Some(1e-4), None);
        assert!(rect.ray_intersection(&outside).is_none());
    }

    #[test]
    fn test_slanted_ray_distance_is_world_space() {
        let rect = floor(10.0);
        let dir = Vector3f::new(1.0, -1.0, 0.0);
        let ray = Ray3f::new(Vector3f::new(0.0, 2.0, 0.0), dir, Some(1e-4), None);
        let hit = rect.ray_intersection(&ray).unwrap();
        assert!((hit.distance - 2.0 * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let rect = floor(1.0);
        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), Some(1e-4), None);
        assert!(rect.ray_intersection(&ray).is_none());
    }
}
