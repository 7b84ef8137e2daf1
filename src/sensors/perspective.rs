// Copyright @yucwang 2026

use crate::core::camera::{CameraError, CameraTransform};
use crate::math::constants::{Float, Matrix4f, Point3f, Vector3f};

/// Pinhole camera described the Mitsuba way: eye, target, up and a
/// vertical field of view. Produces the view and projection matrices the
/// engine composes into its world-to-view transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub origin: Vector3f,
    pub target: Vector3f,
    pub up: Vector3f,
    pub fov_y_radians: Float,
    pub aspect: Float,
    pub near_clip: Float,
    pub far_clip: Float,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            origin: Vector3f::new(0.0, 0.0, 5.0),
            target: Vector3f::zeros(),
            up: Vector3f::new(0.0, 1.0, 0.0),
            fov_y_radians: (45.0 as Float).to_radians(),
            aspect: 1.0,
            near_clip: 1e-2,
            far_clip: 1e4,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               aspect: Float,
               near_clip: Float,
               far_clip: Float) -> Self {
        Self { origin, target, up, fov_y_radians, aspect, near_clip, far_clip }
    }

    pub fn view_matrix(&self) -> Matrix4f {
        Matrix4f::look_at_rh(&Point3f::from(self.origin), &Point3f::from(self.target), &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4f {
        Matrix4f::new_perspective(self.aspect, self.fov_y_radians, self.near_clip, self.far_clip)
    }

    pub fn transform(&self) -> Result<CameraTransform, CameraError> {
        CameraTransform::from_view_proj(&self.view_matrix(), &self.projection_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_center() {
        let camera = PerspectiveCamera::new(Vector3f::new(1.0, 2.0, 6.0),
                                            Vector3f::new(1.0, 0.5, 0.0),
                                            Vector3f::new(0.0, 1.0, 0.0),
                                            (40.0 as Float).to_radians(),
                                            1.5,
                                            0.1,
                                            100.0);
        let transform = camera.transform().unwrap();
        let ndc = transform.project(&camera.target);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);

        // the near-plane point on the axis lies between eye and target
        let lens = transform.unproject(&Vector3f::new(0.0, 0.0, -1.0));
        let forward = (camera.target - camera.origin).normalize();
        assert!(((lens - camera.origin).dot(&forward) - 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_points_behind_the_camera_leave_the_view() {
        let camera = PerspectiveCamera::default();
        let transform = camera.transform().unwrap();
        let behind = transform.project(&Vector3f::new(0.0, 0.0, 8.0));
        assert!(!(behind.z > -1.0 && behind.z <= 1.0));
    }
}
