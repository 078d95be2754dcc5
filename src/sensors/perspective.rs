// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::{Ray3f, RayKind};

pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               aspect: Float) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
        }
    }
}

impl ComputationNode for PerspectiveCamera {
    fn describe(&self) -> String {
        format!("PerspectiveCamera: {{ origin: ({}, {}, {}), aspect: {} }}",
                self.origin.x, self.origin.y, self.origin.z, self.aspect)
    }
}

impl Sensor for PerspectiveCamera {
    fn ray_through(&self, uv: &Vector2f) -> Ray3f {
        let px = (2.0 * uv.x - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * uv.y) * self.tan_half_fov_y;

        let d_camera = Vector3f::new(px, py, 1.0).normalize();
        let dir = self.right * d_camera.x + self.up * d_camera.y
            + self.forward * d_camera.z;
        Ray3f::new(self.origin, dir, RayKind::Visibility)
    }
}
