// Copyright @yucwang 2026

use crate::core::interaction::Intersection;
use crate::core::scene::Scene;
use crate::math::color::{is_black, luminance};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::{Ray3f, RayKind};
use crate::textures::texture_map::TextureMap;
use std::sync::Arc;

/// One weighted material coefficient: a constant color, or a color looked
/// up from a texture map at the hit point's surface coordinates.
#[derive(Clone)]
pub struct MaterialParameter {
    value: Vector3f,
    map: Option<Arc<TextureMap>>,
}

impl MaterialParameter {
    pub fn constant(value: Vector3f) -> Self {
        Self { value, map: None }
    }

    pub fn textured(map: Arc<TextureMap>) -> Self {
        Self { value: Vector3f::new(1.0, 1.0, 1.0), map: Some(map) }
    }

    pub fn value(&self, uv: &Vector2f) -> Vector3f {
        match &self.map {
            Some(map) => map.sample(uv),
            None => self.value,
        }
    }

    /// Scalar view of the parameter, luma-weighted when texture-backed.
    pub fn intensity(&self, uv: &Vector2f) -> Float {
        match &self.map {
            Some(map) => luminance(&map.sample(uv)),
            None => luminance(&self.value),
        }
    }
}

#[derive(Clone)]
pub struct Material {
    ke: MaterialParameter,
    ka: MaterialParameter,
    kd: MaterialParameter,
    ks: MaterialParameter,
    kr: MaterialParameter,
    kt: MaterialParameter,
    shininess: MaterialParameter,
    index: MaterialParameter,
}

impl Default for Material {
    fn default() -> Self {
        let black = || MaterialParameter::constant(Vector3f::new(0.0, 0.0, 0.0));
        Self {
            ke: black(),
            ka: black(),
            kd: black(),
            ks: black(),
            kr: black(),
            kt: black(),
            shininess: MaterialParameter::constant(Vector3f::new(1.0, 1.0, 1.0)),
            index: MaterialParameter::constant(Vector3f::new(1.0, 1.0, 1.0)),
        }
    }
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emissive(mut self, ke: MaterialParameter) -> Self {
        self.ke = ke;
        self
    }

    pub fn with_ambient(mut self, ka: MaterialParameter) -> Self {
        self.ka = ka;
        self
    }

    pub fn with_diffuse(mut self, kd: MaterialParameter) -> Self {
        self.kd = kd;
        self
    }

    pub fn with_specular(mut self, ks: MaterialParameter) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_reflective(mut self, kr: MaterialParameter) -> Self {
        self.kr = kr;
        self
    }

    pub fn with_transmissive(mut self, kt: MaterialParameter) -> Self {
        self.kt = kt;
        self
    }

    pub fn with_shininess(mut self, shininess: Float) -> Self {
        self.shininess = MaterialParameter::constant(
            Vector3f::new(shininess, shininess, shininess));
        self
    }

    pub fn with_index(mut self, index: Float) -> Self {
        self.index = MaterialParameter::constant(Vector3f::new(index, index, index));
        self
    }

    pub fn ke(&self, uv: &Vector2f) -> Vector3f {
        self.ke.value(uv)
    }

    pub fn ka(&self, uv: &Vector2f) -> Vector3f {
        self.ka.value(uv)
    }

    pub fn kd(&self, uv: &Vector2f) -> Vector3f {
        self.kd.value(uv)
    }

    pub fn ks(&self, uv: &Vector2f) -> Vector3f {
        self.ks.value(uv)
    }

    pub fn kr(&self, uv: &Vector2f) -> Vector3f {
        self.kr.value(uv)
    }

    pub fn kt(&self, uv: &Vector2f) -> Vector3f {
        self.kt.value(uv)
    }

    pub fn shininess(&self, uv: &Vector2f) -> Float {
        self.shininess.intensity(uv)
    }

    pub fn index(&self, uv: &Vector2f) -> Float {
        self.index.intensity(uv)
    }

    /// Blinn-Phong local illumination with per-channel shadow and
    /// distance attenuation. The result is non-negative and unclamped;
    /// clamping happens once at the top of the recursion.
    pub fn shade(&self, scene: &Scene, ray: &Ray3f, isect: &Intersection) -> Vector3f {
        let uv = isect.uv();
        let mut radiance = self.ke(&uv) + self.ka(&uv).component_mul(&scene.ambient());

        let q = ray.at(isect.t());
        let mut n = isect.n();
        // A refraction ray views the surface from the inside.
        if ray.kind() == RayKind::Refraction {
            n = -n;
        }
        n.normalize_mut();
        let shininess = self.shininess(&uv);

        for light in scene.lights() {
            let l = light.direction_to(&q).normalize();
            if n.dot(&l) <= 0.0 {
                continue;
            }

            let v = (-ray.dir()).normalize();
            let h = ((v + l) / 2.0).normalize();
            let n_dot_h = n.dot(&h).max(0.0);

            let shadow = light.shadow_attenuation(scene, &q);
            let local = self.kd(&uv) * n.dot(&l)
                + self.ks(&uv) * n_dot_h.powf(shininess);
            let weighted = (light.distance_attenuation(&q) * local).component_mul(&shadow);
            radiance += light.color().component_mul(&weighted);
        }

        radiance
    }

    pub fn is_reflective(&self, uv: &Vector2f) -> bool {
        !is_black(&self.kr(uv))
    }

    pub fn is_transmissive(&self, uv: &Vector2f) -> bool {
        !is_black(&self.kt(uv))
    }
}
