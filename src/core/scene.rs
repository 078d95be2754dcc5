// Copyright @yucwang 2026

use crate::core::bvh::Bvh;
use crate::core::geometry::Geometry;
use crate::core::interaction::Intersection;
use crate::core::light::Light;
use crate::core::sensor::Sensor;
use crate::math::aabb::AABB;
use crate::math::constants::Vector3f;
use crate::math::ray::Ray3f;
use log::debug;
use std::sync::Arc;

/// A loaded scene: primitives, lights, ambient color, camera, and the
/// acceleration structure built over the primitives. Mutation happens
/// during loading only; the scene is read-only while tracing, so it can
/// be shared across render workers without locking.
pub struct Scene {
    objects: Vec<Arc<dyn Geometry>>,
    lights: Vec<Box<dyn Light>>,
    ambient: Vector3f,
    camera: Option<Box<dyn Sensor>>,
    scene_bounds: AABB,
    bvh: Option<Bvh>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            ambient: Vector3f::new(0.0, 0.0, 0.0),
            camera: None,
            scene_bounds: AABB::default(),
            bvh: None,
        }
    }

    pub fn add_object(&mut self, object: Arc<dyn Geometry>) {
        self.objects.push(object);
        self.bvh = None;
    }

    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
    }

    pub fn set_ambient(&mut self, ambient: Vector3f) {
        self.ambient = ambient;
    }

    pub fn ambient(&self) -> Vector3f {
        self.ambient
    }

    pub fn set_camera(&mut self, camera: Box<dyn Sensor>) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&dyn Sensor> {
        self.camera.as_ref().map(|c| c.as_ref())
    }

    pub fn objects(&self) -> &Vec<Arc<dyn Geometry>> {
        &self.objects
    }

    pub fn lights(&self) -> &Vec<Box<dyn Light>> {
        &self.lights
    }

    pub fn scene_bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn has_bvh(&self) -> bool {
        self.bvh.is_some()
    }

    pub fn build_bvh(&mut self) {
        let mut prim_bounds = Vec::with_capacity(self.objects.len());
        let mut scene_bounds = AABB::default();
        for obj in &self.objects {
            let bounds = obj.bounding_box();
            scene_bounds.expand_by_aabb(&bounds);
            prim_bounds.push(bounds);
        }

        self.bvh = Some(Bvh::build(&prim_bounds, scene_bounds));
        self.scene_bounds = scene_bounds;
        debug!("built BVH over {} primitives", self.objects.len());
    }

    /// Closest hit of the ray against the whole scene. Uses the BVH when
    /// built, otherwise a linear scan. An empty scene coherently answers
    /// "no hit".
    pub fn intersect(&self, ray: &Ray3f) -> Option<Intersection> {
        if self.objects.is_empty() {
            return None;
        }

        if let Some(bvh) = &self.bvh {
            bvh.intersect(ray, |prim, ray| {
                self.objects[prim].intersect(ray).map(|i| i.with_object(prim))
            })
        } else {
            let mut closest: Option<Intersection> = None;
            for (prim, obj) in self.objects.iter().enumerate() {
                if let Some(hit) = obj.intersect(ray) {
                    if closest.as_ref().map_or(true, |c| hit.t() < c.t()) {
                        closest = Some(hit.with_object(prim));
                    }
                }
            }
            closest
        }
    }
}
