// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::core::geometry::Geometry;
use crate::core::interaction::Intersection;
use crate::core::material::Material;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f, RAY_EPSILON};
use crate::math::ray::Ray3f;
use std::sync::Arc;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float, material: Arc<Material>) -> Self {
        Self { center, radius, material }
    }
}

impl ComputationNode for Sphere {
    fn describe(&self) -> String {
        format!("Sphere: {{ center: ({}, {}, {}), radius: {} }}",
                self.center.x, self.center.y, self.center.z, self.radius)
    }
}

impl Geometry for Sphere {
    fn bounding_box(&self) -> AABB {
        let half = Vector3f::new(self.radius, self.radius, self.radius);
        AABB::new(self.center - half, self.center + half)
    }

    fn intersect(&self, ray: &Ray3f) -> Option<Intersection> {
        let p = ray.origin() - self.center;
        let d = ray.dir();

        let a = d.norm_squared();
        let b = p.dot(&d) * 2.0;
        let c = p.norm_squared() - self.radius * self.radius;

        let delta = b * b - 4.0 * a * c;
        if delta < 0.0 {
            return None;
        }
        let delta = delta.sqrt();

        let t = ((-b - delta) / 2.0 / a).min((-b + delta) / 2.0 / a);
        if t < RAY_EPSILON || t > ray.max_t {
            return None;
        }

        let n = (ray.at(t) - self.center).normalize();
        let uv = Self::spherical_uv(&n);
        Some(Intersection::new(t, n, uv, Arc::clone(&self.material)))
    }
}

impl Sphere {
    fn spherical_uv(n: &Vector3f) -> Vector2f {
        let pi = std::f32::consts::PI;
        let u = 0.5 + n.z.atan2(n.x) / (2.0 * pi);
        let v = n.y.max(-1.0).min(1.0).acos() / pi;
        Vector2f::new(u, v)
    }
}
