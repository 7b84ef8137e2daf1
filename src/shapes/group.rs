// Copyright @yucwang 2026

use crate::core::geometry::{Geometry, RayHit, SurfaceGeometry};
use crate::core::shape::Shape;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

/// Hits closer than this are treated as self-intersections.
const MIN_HIT_DISTANCE: Float = 1e-6;

/// Linear list of shapes, each bound to one material id. The shape index is
/// reported as the hit group; every shape is a single primitive.
#[derive(Default)]
pub struct ShapeGroup {
    shapes: Vec<(Box<dyn Shape>, usize)>,
}

impl ShapeGroup {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Adds a shape and returns its group id.
    pub fn add(&mut self, shape: Box<dyn Shape>, material_id: usize) -> usize {
        self.shapes.push((shape, material_id));
        self.shapes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Geometry for ShapeGroup {
    fn hit(&self, origin: &Vector3f, direction: &Vector3f) -> Option<RayHit> {
        let mut ray = Ray3f::new(*origin, *direction, Some(MIN_HIT_DISTANCE), None);
        let mut closest = None;
        for (group, (shape, _)) in self.shapes.iter().enumerate() {
            if let Some(hit) = shape.ray_intersection(&ray) {
                ray.max_t = hit.distance;
                closest = Some(RayHit { distance: hit.distance, primitive: 0, group, uv: hit.uv });
            }
        }
        closest
    }

    fn calc_geometry(&self, hit: &RayHit, position: &Vector3f, _direction: &Vector3f) -> SurfaceGeometry {
        let normal = match self.shapes.get(hit.group) {
            Some((shape, _)) => shape.normal_at(position, &hit.uv),
            None => Vector3f::new(0.0, 0.0, 1.0),
        };
        SurfaceGeometry { normal, texcoord: hit.uv }
    }

    /// `usize::MAX` for groups this scene does not contain, which no
    /// material table resolves.
    fn material_id(&self, _primitive: usize, group: usize) -> usize {
        self.shapes.get(group).map_or(usize::MAX, |(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::sphere::Sphere;

    #[test]
    fn test_closest_hit_wins() {
        let mut group = ShapeGroup::new();
        group.add(Box::new(Sphere::new(Vector3f::new(0.0, 0.0, -10.0), 1.0)), 4);
        group.add(Box::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0)), 7);
        assert_eq!(group.len(), 2);

        let origin = Vector3f::zeros();
        let dir = Vector3f::new(0.0, 0.0, -1.0);
        let hit = group.hit(&origin, &dir).unwrap();
        assert_eq!(hit.group, 1);
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(group.material_id(hit.primitive, hit.group), 7);

        let geometry = group.calc_geometry(&hit, &(origin + dir * hit.distance), &dir);
        assert!((geometry.normal - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_occlusion_and_miss() {
        let mut group = ShapeGroup::new();
        group.add(Box::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0)), 0);
        let dir = Vector3f::new(0.0, 0.0, -1.0);
        assert!(group.occluded(&Vector3f::zeros(), &dir, 10.0));
        assert!(!group.occluded(&Vector3f::zeros(), &dir, 3.0));
        assert!(group.hit(&Vector3f::zeros(), &Vector3f::new(0.0, 1.0, 0.0)).is_none());
        assert_eq!(group.material_id(0, 9), usize::MAX);
    }
}
