// Copyright @yucwang 2021

use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

pub trait Sensor: crate::core::computation_node::ComputationNode + Send + Sync {
    /// Camera ray through the normalized image-plane coordinate
    /// (u, v) in [0, 1]^2.
    fn ray_through(&self, uv: &Vector2f) -> Ray3f;
}
