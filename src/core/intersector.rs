// Copyright @yucwang 2026

use crate::core::interaction::Intersection;
use crate::core::scene::Scene;
use crate::math::ray::{Ray3f, RayKind};
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct RayKey {
    origin: [u32; 3],
    dir: [u32; 3],
    kind: u8,
}

impl RayKey {
    fn from_ray(ray: &Ray3f) -> Self {
        let o = ray.origin();
        let d = ray.dir();
        let kind = match ray.kind() {
            RayKind::Visibility => 0,
            RayKind::Reflection => 1,
            RayKind::Refraction => 2,
            RayKind::Shadow => 3,
        };
        Self {
            origin: [o.x.to_bits(), o.y.to_bits(), o.z.to_bits()],
            dir: [d.x.to_bits(), d.y.to_bits(), d.z.to_bits()],
            kind,
        }
    }
}

/// Scene Intersection Service: closest-hit queries against one scene,
/// optionally memoized in a ray-keyed cache for debug tooling.
///
/// The cache is not synchronized. Concurrent workers each get their own
/// instance (the threaded renderer creates them cache-less), and the
/// integrator invalidates it before every top-level pixel trace.
pub struct SceneIntersector<'a> {
    scene: &'a Scene,
    cache: Option<HashMap<RayKey, Option<Intersection>>>,
}

impl<'a> SceneIntersector<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene, cache: None }
    }

    pub fn with_cache(scene: &'a Scene) -> Self {
        Self { scene, cache: Some(HashMap::new()) }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn intersect(&mut self, ray: &Ray3f) -> Option<Intersection> {
        let cache = match &mut self.cache {
            Some(cache) => cache,
            None => return self.scene.intersect(ray),
        };

        let key = RayKey::from_ray(ray);
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }
        let hit = self.scene.intersect(ray);
        cache.insert(key, hit.clone());
        hit
    }

    pub fn invalidate(&mut self) {
        if let Some(cache) = &mut self.cache {
            cache.clear();
        }
    }

    pub fn cached_rays(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.len())
    }
}
