// Copyright @yucwang 2026

use crate::core::interaction::Intersection;
use crate::math::aabb::AABB;
use crate::math::ray::Ray3f;

#[derive(Clone)]
struct BvhNode {
    bounds: AABB,
    left: Option<usize>,
    right: Option<usize>,
    prim: Option<usize>,
}

impl BvhNode {
    fn leaf(bounds: AABB, prim: usize) -> Self {
        Self { bounds, left: None, right: None, prim: Some(prim) }
    }

    fn interior(bounds: AABB, left: usize, right: usize) -> Self {
        Self { bounds, left: Some(left), right: Some(right), prim: None }
    }
}

/// Binary bounding-volume hierarchy over scene primitives. The tree stores
/// only primitive indices and boxes; leaf intersection is delegated to a
/// callback, so the structure stays independent of the geometry types.
///
/// Built once per scene and immutable afterwards. Nodes live in a flat
/// arena; interior nodes link children by index.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: Option<usize>,
}

impl Bvh {
    /// Build over the given primitive boxes. `scene_bounds` must enclose
    /// them all. Splits cycle the axis with depth and partition around the
    /// spatial midpoint; a one-sided partition falls back to bisecting the
    /// index list so the recursion always shrinks.
    pub fn build(prim_bounds: &[AABB], scene_bounds: AABB) -> Self {
        let mut bvh = Self { nodes: Vec::new(), root: None };
        let indices: Vec<usize> = (0..prim_bounds.len()).collect();
        bvh.root = bvh.build_node(prim_bounds, indices, scene_bounds, 0);
        bvh
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Closest valid hit of the ray against the whole tree, or `None`.
    /// `hit_fn` runs the primitive's own intersection test for a leaf.
    ///
    /// Querying an empty tree is a precondition violation; the caller is
    /// expected to guarantee at least one primitive before querying.
    pub fn intersect<F>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<Intersection>
    where
        F: FnMut(usize, &Ray3f) -> Option<Intersection>,
    {
        let root = self.root.expect("BVH queried before any primitive was added");
        self.intersect_node(root, ray, &mut hit_fn)
    }

    fn intersect_node<F>(&self, node_idx: usize, ray: &Ray3f, hit_fn: &mut F) -> Option<Intersection>
    where
        F: FnMut(usize, &Ray3f) -> Option<Intersection>,
    {
        let node = &self.nodes[node_idx];
        if !node.bounds.ray_intersect(ray) {
            return None;
        }

        if let Some(prim) = node.prim {
            return hit_fn(prim, ray);
        }

        // Probe both children and keep the nearer hit. No best-t pruning.
        let left_hit = node.left.and_then(|l| self.intersect_node(l, ray, hit_fn));
        let right_hit = node.right.and_then(|r| self.intersect_node(r, ray, hit_fn));

        match (left_hit, right_hit) {
            (Some(lh), Some(rh)) => {
                if lh.t() < rh.t() {
                    Some(lh)
                } else {
                    Some(rh)
                }
            }
            (Some(lh), None) => Some(lh),
            (None, Some(rh)) => Some(rh),
            (None, None) => None,
        }
    }

    fn build_node(&mut self,
                  prim_bounds: &[AABB],
                  input: Vec<usize>,
                  bbox: AABB,
                  axis: usize) -> Option<usize> {
        match input.len() {
            0 => return None,
            1 => {
                let prim = input[0];
                return Some(self.push(BvhNode::leaf(prim_bounds[prim], prim)));
            }
            2 => {
                let left = self.push(BvhNode::leaf(prim_bounds[input[0]], input[0]));
                let right = self.push(BvhNode::leaf(prim_bounds[input[1]], input[1]));
                return Some(self.push(BvhNode::interior(bbox, left, right)));
            }
            _ => {}
        }

        let midpoint = bbox.p_min[axis] + (bbox.p_max[axis] - bbox.p_min[axis]) / 2.0;

        let mut near: Vec<usize> = Vec::new();
        let mut far: Vec<usize> = Vec::new();
        let mut near_box = AABB::default();
        let mut far_box = AABB::default();

        // Child boxes are accumulated while bucketing, not in a second pass.
        // Straddling boxes land in the near bucket.
        for &prim in &input {
            let b = &prim_bounds[prim];
            if b.p_min[axis] > midpoint {
                far_box.expand_by_aabb(b);
                far.push(prim);
            } else {
                near_box.expand_by_aabb(b);
                near.push(prim);
            }
        }

        if near.is_empty() || far.is_empty() {
            // Degenerate spatial split (clustered or colinear geometry);
            // bisect the index list instead so termination is guaranteed.
            near.clear();
            far.clear();
            near_box = AABB::default();
            far_box = AABB::default();
            let end = input.len() / 2;
            for &prim in &input[..end] {
                near_box.expand_by_aabb(&prim_bounds[prim]);
                near.push(prim);
            }
            for &prim in &input[end..] {
                far_box.expand_by_aabb(&prim_bounds[prim]);
                far.push(prim);
            }
        }

        let next_axis = (axis + 1) % 3;
        let left = self.build_node(prim_bounds, near, near_box, next_axis);
        let right = self.build_node(prim_bounds, far, far_box, next_axis);
        // Both buckets are non-empty here, so both children exist.
        let left = left.expect("near bucket lost its primitives");
        let right = right.expect("far bucket lost its primitives");
        Some(self.push(BvhNode::interior(bbox, left, right)))
    }

    fn push(&mut self, node: BvhNode) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(node);
        idx
    }
}
