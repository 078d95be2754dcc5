// Copyright @yucwang 2023

use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector3f};

/// A light source as seen from a shaded point. `shadow_attenuation` is the
/// per-channel transmittance along the path toward the light, so tinted
/// transmissive occluders cast colored shadows.
pub trait Light: crate::core::computation_node::ComputationNode + Send + Sync {
    fn direction_to(&self, p: &Vector3f) -> Vector3f;
    fn color(&self) -> Vector3f;
    fn distance_attenuation(&self, p: &Vector3f) -> Float;
    fn shadow_attenuation(&self, scene: &Scene, p: &Vector3f) -> Vector3f;
}
