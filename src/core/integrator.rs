// Copyright @yucwang 2026

use crate::core::intersector::SceneIntersector;
use crate::math::constants::{Vector2f, Vector3f};

pub trait Integrator: Send + Sync {
    /// Trace the pixel at normalized image-plane coordinate (u, v) and
    /// return its color, clamped per channel into [0, 1].
    fn trace(&self, intersector: &mut SceneIntersector, uv: Vector2f) -> Vector3f;
}
