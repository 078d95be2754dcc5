// Copyright @yucwang 2026

use crate::core::computation_node::ComputationNode;
use crate::core::light::Light;
use crate::core::scene::Scene;
use crate::math::color::is_black;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::{Ray3f, RayKind};

/// Positional light with the classic constant/linear/quadratic falloff.
pub struct PointLight {
    position: Vector3f,
    color: Vector3f,
    constant_term: Float,
    linear_term: Float,
    quadratic_term: Float,
}

impl PointLight {
    pub fn new(position: Vector3f, color: Vector3f) -> Self {
        Self::with_falloff(position, color, 0.0, 1.0, 0.0)
    }

    pub fn with_falloff(position: Vector3f, color: Vector3f,
                        constant_term: Float, linear_term: Float,
                        quadratic_term: Float) -> Self {
        Self { position, color, constant_term, linear_term, quadratic_term }
    }
}

impl ComputationNode for PointLight {
    fn describe(&self) -> String {
        format!("PointLight: {{ position: ({}, {}, {}) }}",
                self.position.x, self.position.y, self.position.z)
    }
}

impl Light for PointLight {
    fn direction_to(&self, p: &Vector3f) -> Vector3f {
        (self.position - p).normalize()
    }

    fn color(&self) -> Vector3f {
        self.color
    }

    fn distance_attenuation(&self, p: &Vector3f) -> Float {
        let l = self.position - p;
        let d = l.norm();
        let denom = self.constant_term + self.linear_term * d
            + self.quadratic_term * d * d;
        (1.0 / denom).min(1.0)
    }

    fn shadow_attenuation(&self, scene: &Scene, p: &Vector3f) -> Vector3f {
        let dir = self.direction_to(p);
        // Distance to the light, fixed at the start of the march. Hits
        // past it lie beyond the light and do not occlude.
        let max_t = (self.position - p).norm();

        let mut transmittance = Vector3f::new(1.0, 1.0, 1.0);
        let mut curr = *p;
        loop {
            let ray = Ray3f::new(curr, dir, RayKind::Shadow);
            let hit = match scene.intersect(&ray) {
                Some(hit) => hit,
                None => return transmittance,
            };
            if hit.t() > max_t {
                return transmittance;
            }
            transmittance = transmittance.component_mul(&hit.material().kt(&hit.uv()));
            if is_black(&transmittance) {
                return transmittance;
            }
            curr = ray.at(hit.t());
        }
    }
}
