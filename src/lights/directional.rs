// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::light::Light;
use crate::core::scene::Scene;
use crate::math::color::is_black;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::{Ray3f, RayKind};

/// Light infinitely far away along a fixed orientation.
pub struct DirectionalLight {
    orientation: Vector3f,
    color: Vector3f,
}

impl DirectionalLight {
    pub fn new(orientation: Vector3f, color: Vector3f) -> Self {
        Self { orientation: orientation.normalize(), color }
    }
}

impl ComputationNode for DirectionalLight {
    fn describe(&self) -> String {
        format!("DirectionalLight: {{ orientation: ({}, {}, {}) }}",
                self.orientation.x, self.orientation.y, self.orientation.z)
    }
}

impl Light for DirectionalLight {
    fn direction_to(&self, _p: &Vector3f) -> Vector3f {
        -self.orientation
    }

    fn color(&self) -> Vector3f {
        self.color
    }

    fn distance_attenuation(&self, _p: &Vector3f) -> Float {
        // The light sits at infinity, so falloff is meaningless.
        1.0
    }

    fn shadow_attenuation(&self, scene: &Scene, p: &Vector3f) -> Vector3f {
        let dir = self.direction_to(p);
        let mut transmittance = Vector3f::new(1.0, 1.0, 1.0);
        let mut curr = *p;

        // March toward the light, filtering through every transmissive
        // occluder on the way. Opaque occluders zero it out.
        loop {
            let ray = Ray3f::new(curr, dir, RayKind::Shadow);
            let hit = match scene.intersect(&ray) {
                Some(hit) => hit,
                None => return transmittance,
            };
            transmittance = transmittance.component_mul(&hit.material().kt(&hit.uv()));
            if is_black(&transmittance) {
                return transmittance;
            }
            curr = ray.at(hit.t());
        }
    }
}
