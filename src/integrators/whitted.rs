// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::intersector::SceneIntersector;
use crate::math::color::clamp01;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::{Ray3f, RayKind};

/// Refractive index of the ambient medium surrounding the scene.
pub const AMBIENT_INDEX: Float = 1.003;

/// Classic Whitted recursion: local Blinn-Phong shading at the nearest
/// hit, plus reflected and refracted continuation rays while the depth
/// budget lasts.
pub struct WhittedIntegrator {
    max_depth: u32,
}

impl WhittedIntegrator {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    fn trace_ray(&self, intersector: &mut SceneIntersector, ray: &Ray3f,
                 thresh: &Vector3f, depth: u32) -> Vector3f {
        let isect = match intersector.intersect(ray) {
            Some(isect) => isect,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };

        let q = ray.at(isect.t());
        let uv = isect.uv();
        let material = isect.material().clone();
        let mut radiance = material.shade(intersector.scene(), ray, &isect);

        let depth_left = self.max_depth.saturating_sub(depth);
        if depth_left > 0 {
            if material.is_reflective(&uv) {
                let r = Self::reflect_direction(&isect.n(), &(-ray.dir()));
                let reflected = Ray3f::new(q, r, RayKind::Reflection);
                radiance += material.kr(&uv)
                    .component_mul(&self.trace_ray(intersector, &reflected,
                                                   thresh, depth + 1));
            }

            let mut depth = depth;
            let entering = ray.dir().dot(&isect.n()) < 0.0;
            let (n_i, n_t, axis) = if entering {
                // Crossing into the medium consumes a depth unit even
                // when total internal reflection kills the ray below.
                depth += 1;
                (AMBIENT_INDEX, material.index(&uv), isect.n())
            } else {
                (material.index(&uv), AMBIENT_INDEX, -isect.n())
            };

            if Self::not_tir(n_i, n_t, &(-ray.dir()), &isect.n())
                && material.is_transmissive(&uv) {
                let t = Self::refract_direction(n_i, n_t, &axis, &ray.dir());
                // A ray leaving the medium behaves like a primary ray
                // again, so the far face of the same body shades with
                // its outward normal.
                let kind = if entering { RayKind::Refraction } else { RayKind::Visibility };
                let refracted = Ray3f::new(q, t, kind);
                radiance += material.kt(&uv)
                    .component_mul(&self.trace_ray(intersector, &refracted,
                                                   thresh, depth));
            }
        }

        radiance
    }

    /// True when the incident angle stays below the critical angle, so a
    /// refracted ray exists.
    fn not_tir(n_i: Float, n_t: Float, d: &Vector3f, n: &Vector3f) -> bool {
        let sin_i = d.cross(n).norm() / d.norm() / n.norm();
        sin_i < n_t / n_i
    }

    fn reflect_direction(n: &Vector3f, d: &Vector3f) -> Vector3f {
        (n * 2.0 - d).normalize()
    }

    /// Snell refraction around `n`, which must point against the
    /// incident direction `d`.
    fn refract_direction(n_i: Float, n_t: Float, n: &Vector3f, d: &Vector3f) -> Vector3f {
        let cos_i = n.dot(d);
        let ratio = n_i / n_t;
        let sin_t2 = ratio * ratio * (1.0 - cos_i * cos_i);
        (d * ratio - n * (ratio * cos_i + (1.0 - sin_t2).sqrt())).normalize()
    }
}

impl Integrator for WhittedIntegrator {
    fn trace(&self, intersector: &mut SceneIntersector, uv: Vector2f) -> Vector3f {
        intersector.invalidate();

        let camera = match intersector.scene().camera() {
            Some(camera) => camera,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };
        let ray = camera.ray_through(&uv);
        let radiance = self.trace_ray(intersector, &ray,
                                      &Vector3f::new(1.0, 1.0, 1.0), 0);
        clamp01(&radiance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::{Material, MaterialParameter};
    use crate::core::scene::Scene;
    use crate::lights::point::PointLight;
    use crate::sensors::perspective::PerspectiveCamera;
    use crate::shapes::sphere::Sphere;
    use crate::shapes::triangle_mesh::{TriangleFace, TriangleMesh};
    use std::sync::Arc;

    // Square in the z = plane_z plane, normal facing +z.
    fn quad(plane_z: Float, half: Float,
            material: Arc<Material>) -> Vec<Arc<TriangleFace>> {
        let mut mesh = TriangleMesh::new(material);
        mesh.add_vertex(Vector3f::new(-half, -half, plane_z));
        mesh.add_vertex(Vector3f::new(half, -half, plane_z));
        mesh.add_vertex(Vector3f::new(half, half, plane_z));
        mesh.add_vertex(Vector3f::new(-half, half, plane_z));
        assert!(mesh.add_face(0, 1, 2));
        assert!(mesh.add_face(0, 2, 3));
        mesh.into_faces().expect("valid mesh")
    }

    fn emissive(color: Vector3f) -> Arc<Material> {
        Arc::new(Material::new()
            .with_emissive(MaterialParameter::constant(color)))
    }

    fn default_camera() -> Box<PerspectiveCamera> {
        Box::new(PerspectiveCamera::new(Vector3f::new(0.0, 0.0, 0.0),
                                        Vector3f::new(0.0, 0.0, -1.0),
                                        Vector3f::new(0.0, 1.0, 0.0),
                                        std::f32::consts::FRAC_PI_2, 1.0))
    }

    #[test]
    fn test_miss_is_black() {
        let mut scene = Scene::new();
        scene.set_camera(default_camera());

        let integrator = WhittedIntegrator::new(3);
        let mut intersector = SceneIntersector::new(&scene);
        let color = integrator.trace(&mut intersector, Vector2f::new(0.5, 0.5));
        assert_eq!(color, Vector3f::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_missing_camera_is_black() {
        let scene = Scene::new();
        let integrator = WhittedIntegrator::new(3);
        let mut intersector = SceneIntersector::new(&scene);
        let color = integrator.trace(&mut intersector, Vector2f::new(0.5, 0.5));
        assert_eq!(color, Vector3f::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_emissive_output_is_clamped() {
        let mut scene = Scene::new();
        for face in quad(-5.0, 20.0, emissive(Vector3f::new(2.0, 0.5, 0.0))) {
            scene.add_object(face);
        }
        scene.set_camera(default_camera());
        scene.build_bvh();

        let integrator = WhittedIntegrator::new(0);
        let mut intersector = SceneIntersector::new(&scene);
        let color = integrator.trace(&mut intersector, Vector2f::new(0.5, 0.5));
        assert!((color - Vector3f::new(1.0, 0.5, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_reflection_respects_depth_budget() {
        // Mirror at z = -5 facing the camera, emissive wall behind the
        // camera at z = +5. Only the bounced ray can see the wall.
        let mirror = Arc::new(Material::new()
            .with_reflective(MaterialParameter::constant(Vector3f::new(1.0, 1.0, 1.0))));

        let mut scene = Scene::new();
        for face in quad(-5.0, 20.0, mirror) {
            scene.add_object(face);
        }
        for face in quad(5.0, 20.0, emissive(Vector3f::new(0.3, 0.6, 0.9))) {
            scene.add_object(face);
        }
        scene.set_camera(default_camera());
        scene.build_bvh();

        let uv = Vector2f::new(0.5, 0.5);

        let mut intersector = SceneIntersector::new(&scene);
        let shallow = WhittedIntegrator::new(0).trace(&mut intersector, uv);
        assert_eq!(shallow, Vector3f::new(0.0, 0.0, 0.0));

        let deep = WhittedIntegrator::new(1).trace(&mut intersector, uv);
        assert!((deep - Vector3f::new(0.3, 0.6, 0.9)).norm() < 1e-5);
    }

    #[test]
    fn test_reflect_direction_at_normal_incidence() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let r = WhittedIntegrator::reflect_direction(&n, &n);
        assert!((r - n).norm() < 1e-6);
    }

    #[test]
    fn test_refract_direction_straight_through() {
        // Normal incidence bends nothing regardless of the index ratio.
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let d = Vector3f::new(0.0, 0.0, -1.0);
        let t = WhittedIntegrator::refract_direction(AMBIENT_INDEX, 1.5, &n, &d);
        assert!((t - d).norm() < 1e-6);
    }

    #[test]
    fn test_not_tir_thresholds() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        // Entering a dense medium never reflects totally.
        let steep = Vector3f::new(0.9, 0.0, 0.436).normalize();
        assert!(WhittedIntegrator::not_tir(AMBIENT_INDEX, 1.5, &steep, &n));

        // Leaving it does, above the critical angle (about 42 degrees
        // for glass against the ambient medium).
        let above = Vector3f::new(0.707, 0.0, 0.707);
        assert!(!WhittedIntegrator::not_tir(1.5, AMBIENT_INDEX, &above, &n));
        let below = Vector3f::new(0.5, 0.0, 0.866);
        assert!(WhittedIntegrator::not_tir(1.5, AMBIENT_INDEX, &below, &n));
    }

    #[test]
    fn test_total_internal_reflection_kills_the_ray() {
        // Glass sheet at z = 0, emissive wall above it. A ray striking
        // the back face above the critical angle transmits nothing; a
        // steeper one leaks the wall's emission through.
        let glass = Arc::new(Material::new()
            .with_transmissive(MaterialParameter::constant(Vector3f::new(1.0, 1.0, 1.0)))
            .with_index(1.5));

        let mut scene = Scene::new();
        for face in quad(0.0, 10.0, glass) {
            scene.add_object(face);
        }
        for face in quad(5.0, 30.0, emissive(Vector3f::new(0.0, 0.8, 0.0))) {
            scene.add_object(face);
        }
        scene.build_bvh();

        let integrator = WhittedIntegrator::new(2);
        let mut intersector = SceneIntersector::new(&scene);
        let thresh = Vector3f::new(1.0, 1.0, 1.0);

        let grazing = Ray3f::new(Vector3f::new(-1.0, 0.0, -1.0),
                                 Vector3f::new(0.707, 0.0, 0.707),
                                 RayKind::Refraction);
        let blocked = integrator.trace_ray(&mut intersector, &grazing, &thresh, 0);
        assert_eq!(blocked, Vector3f::new(0.0, 0.0, 0.0));

        let steep = Ray3f::new(Vector3f::new(-0.577, 0.0, -1.0),
                               Vector3f::new(0.5, 0.0, 0.866),
                               RayKind::Refraction);
        let through = integrator.trace_ray(&mut intersector, &steep, &thresh, 0);
        assert!((through.y - 0.8).abs() < 1e-5);
        assert_eq!(through.x, 0.0);
    }

    #[test]
    fn test_ambient_and_emissive_only_sphere() {
        let material = Arc::new(Material::new()
            .with_ambient(MaterialParameter::constant(Vector3f::new(0.2, 0.2, 0.2)))
            .with_emissive(MaterialParameter::constant(Vector3f::new(0.05, 0.1, 0.15))));

        let mut scene = Scene::new();
        scene.add_object(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0,
                                              material)));
        scene.set_ambient(Vector3f::new(0.5, 0.5, 0.5));
        scene.set_camera(default_camera());
        scene.build_bvh();

        let integrator = WhittedIntegrator::new(3);
        let mut intersector = SceneIntersector::new(&scene);
        let color = integrator.trace(&mut intersector, Vector2f::new(0.5, 0.5));

        // No lights: shading is exactly ke + ka * ambient.
        assert!((color - Vector3f::new(0.15, 0.2, 0.25)).norm() < 1e-6);
    }

    #[test]
    fn test_mirror_corridor_terminates() {
        // Two mirrors facing each other trap the ray; only the depth
        // budget ends the recursion.
        let mirror = Arc::new(Material::new()
            .with_reflective(MaterialParameter::constant(Vector3f::new(1.0, 1.0, 1.0))));

        let mut scene = Scene::new();
        for face in quad(-5.0, 20.0, Arc::clone(&mirror)) {
            scene.add_object(face);
        }
        // The far mirror winds the other way so its normal faces -z.
        let mut far = TriangleMesh::new(mirror);
        far.add_vertex(Vector3f::new(-20.0, -20.0, 5.0));
        far.add_vertex(Vector3f::new(20.0, -20.0, 5.0));
        far.add_vertex(Vector3f::new(20.0, 20.0, 5.0));
        far.add_vertex(Vector3f::new(-20.0, 20.0, 5.0));
        assert!(far.add_face(0, 2, 1));
        assert!(far.add_face(0, 3, 2));
        for face in far.into_faces().expect("valid mesh") {
            scene.add_object(face);
        }
        scene.set_camera(default_camera());
        scene.build_bvh();

        let integrator = WhittedIntegrator::new(6);
        let mut intersector = SceneIntersector::new(&scene);
        let color = integrator.trace(&mut intersector, Vector2f::new(0.5, 0.5));
        // Nothing emits, so all the bouncing sums to black.
        assert_eq!(color, Vector3f::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_lit_sphere_brighter_than_ambient() {
        let material = Arc::new(Material::new()
            .with_ambient(MaterialParameter::constant(Vector3f::new(0.1, 0.1, 0.1)))
            .with_diffuse(MaterialParameter::constant(Vector3f::new(0.8, 0.8, 0.8))));

        let mut scene = Scene::new();
        scene.add_object(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, 0.0), 1.0,
                                              material)));
        scene.add_light(Box::new(PointLight::with_falloff(
            Vector3f::new(0.0, 10.0, 0.0), Vector3f::new(1.0, 1.0, 1.0),
            1.0, 0.0, 0.0)));
        scene.set_ambient(Vector3f::new(0.1, 0.1, 0.1));
        scene.set_camera(Box::new(PerspectiveCamera::new(
            Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0), std::f32::consts::FRAC_PI_6, 1.0)));
        scene.build_bvh();

        // Pixel (1, 1) of a 3x3 image looks at the sphere's upper-left
        // quarter, where the light is visible.
        let uv = Vector2f::new(1.0 / 3.0, 1.0 / 3.0);
        let integrator = WhittedIntegrator::new(2);
        let mut intersector = SceneIntersector::new(&scene);
        let color = integrator.trace(&mut intersector, uv);

        for channel in 0..3 {
            assert!(color[channel] > 0.05, "channel {} too dark: {}", channel, color[channel]);
            assert!(color[channel] < 1.0, "channel {} saturated", channel);
        }
    }
}
