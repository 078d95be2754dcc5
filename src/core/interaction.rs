// Copyright @yucwang 2023

use crate::core::material::Material;
use crate::math::constants::{Float, Vector2f, Vector3f};
use std::sync::Arc;

/// Nearest-hit record for one ray query. Built fresh per intersection,
/// consumed by one shading computation, never persisted.
#[derive(Clone)]
pub struct Intersection {
    t: Float,
    n: Vector3f,
    uv: Vector2f,
    material: Arc<Material>,
    object: Option<usize>,
}

impl Intersection {
    pub fn new(t: Float, n: Vector3f, uv: Vector2f, material: Arc<Material>) -> Self {
        Self { t, n, uv, material, object: None }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn n(&self) -> Vector3f {
        self.n
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Index of the owning object in the scene's primitive list.
    pub fn object(&self) -> Option<usize> {
        self.object
    }

    pub fn with_object(mut self, object: usize) -> Self {
        self.object = Some(object);
        self
    }
}
