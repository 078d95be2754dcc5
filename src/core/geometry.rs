// Copyright @yucwang 2023

use crate::core::interaction::Intersection;
use crate::math::aabb::AABB;
use crate::math::ray::Ray3f;

/// Any scene primitive the acceleration structure can hold as a leaf.
/// Intersections are reported in world space with the nearest valid `t`.
pub trait Geometry: crate::core::computation_node::ComputationNode + Send + Sync {
    fn bounding_box(&self) -> AABB;
    fn intersect(&self, ray: &Ray3f) -> Option<Intersection>;
}
