// Copyright @yucwang 2026

use crate::core::shape::{Shape, ShapeHit};
use crate::math::constants::{Float, Vector2f, Vector3f, INV_2PI, INV_PI, PI};
use crate::math::ray::Ray3f;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius: radius.abs() }
    }

    pub fn center(&self) -> Vector3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    fn uv_of(&self, n: &Vector3f) -> Vector2f {
        let phi = n.y.atan2(n.x);
        let phi = if phi < 0.0 { phi + 2.0 * PI } else { phi };
        let theta = n.z.max(-1.0).min(1.0).acos();
        Vector2f::new(phi * INV_2PI, theta * INV_PI)
    }
}

impl Shape for Sphere {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<ShapeHit> {
        let oc = ray.origin() - self.center;
        let d = ray.dir();
        let a = d.dot(&d);
        let half_b = oc.dot(&d);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = (-half_b - root) / a;
        let far = (-half_b + root) / a;
        let t = if ray.test_segment(near) {
            near
        } else if ray.test_segment(far) {
            far
        } else {
            return None;
        };

        let n = (ray.at(t) - self.center) / self.radius;
        Some(ShapeHit { distance: t, uv: self.uv_of(&n) })
    }

    fn normal_at(&self, position: &Vector3f, _uv: &Vector2f) -> Vector3f {
        (position - self.center).normalize()
    }

    fn surface_area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_from_outside_and_inside() {
        let sphere = Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), Some(1e-4), None);
        let hit = sphere.ray_intersection(&ray).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        let n = sphere.normal_at(&ray.at(hit.distance), &hit.uv);
        assert!((n - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);

        let inside = Ray3f::new(Vector3f::new(0.0, 0.0, -5.0), Vector3f::new(1.0, 0.0, 0.0), Some(1e-4), None);
        let hit = sphere.ray_intersection(&inside).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_miss_and_behind() {
        let sphere = Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0);
        let miss = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), Some(1e-4), None);
        assert!(sphere.ray_intersection(&miss).is_none());
        let behind = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), Some(1e-4), None);
        assert!(sphere.ray_intersection(&behind).is_none());
    }

    #[test]
    fn test_uv_range() {
        let sphere = Sphere::new(Vector3f::zeros(), 2.0);
        let ray = Ray3f::new(Vector3f::new(-0.3, 5.0, 0.2), Vector3f::new(0.0, -1.0, 0.0), Some(1e-4), None);
        let hit = sphere.ray_intersection(&ray).unwrap();
        assert!(hit.uv.x >= 0.0 && hit.uv.x <= 1.0);
        assert!(hit.uv.y >= 0.0 && hit.uv.y <= 1.0);
        assert!((sphere.surface_area() - 16.0 * PI).abs() < 1e-4);
    }
}
