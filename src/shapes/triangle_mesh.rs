// Copyright @yucwang 2023

use crate::core::computation_node::ComputationNode;
use crate::core::geometry::Geometry;
use crate::core::interaction::Intersection;
use crate::core::material::Material;
use crate::math::aabb::AABB;
use crate::math::constants::{Vector2f, Vector3f, RAY_EPSILON};
use crate::math::ray::Ray3f;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("bad trimesh: {got} normals for {vertices} vertices")]
    BadNormalCount { got: usize, vertices: usize },
    #[error("bad trimesh: {got} texture coordinates for {vertices} vertices")]
    BadUvCount { got: usize, vertices: usize },
}

struct MeshData {
    vertices: Vec<Vector3f>,
    normals: Vec<Vector3f>,
    uvs: Vec<Vector2f>,
}

impl MeshData {
    fn has_per_vertex_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }
}

/// Builder for a triangle mesh. Vertices, normals and texture coordinates
/// must be added in matching order; faces index into them. `into_faces`
/// validates the counts and hands out one `TriangleFace` leaf per face,
/// all sharing the vertex data.
pub struct TriangleMesh {
    data: MeshData,
    material: Arc<Material>,
    faces: Vec<([usize; 3], Arc<Material>)>,
}

impl TriangleMesh {
    pub fn new(material: Arc<Material>) -> Self {
        Self {
            data: MeshData { vertices: Vec::new(), normals: Vec::new(), uvs: Vec::new() },
            material,
            faces: Vec::new(),
        }
    }

    pub fn add_vertex(&mut self, v: Vector3f) {
        self.data.vertices.push(v);
    }

    pub fn add_normal(&mut self, n: Vector3f) {
        self.data.normals.push(n);
    }

    pub fn add_uv(&mut self, uv: Vector2f) {
        self.data.uvs.push(uv);
    }

    /// Returns false if any of the vertex indices does not exist.
    pub fn add_face(&mut self, a: usize, b: usize, c: usize) -> bool {
        let material = Arc::clone(&self.material);
        self.add_face_with_material(a, b, c, material)
    }

    /// Per-face material override.
    pub fn add_face_with_material(&mut self, a: usize, b: usize, c: usize,
                                  material: Arc<Material>) -> bool {
        let vcnt = self.data.vertices.len();
        if a >= vcnt || b >= vcnt || c >= vcnt {
            return false;
        }
        self.faces.push(([a, b, c], material));
        true
    }

    /// Per-vertex normals from averaging the normals of adjacent faces.
    pub fn generate_normals(&mut self) {
        let cnt = self.data.vertices.len();
        let mut normals = vec![Vector3f::new(0.0, 0.0, 0.0); cnt];
        let mut face_counts = vec![0u32; cnt];

        for (ids, _) in &self.faces {
            let a = self.data.vertices[ids[0]];
            let b = self.data.vertices[ids[1]];
            let c = self.data.vertices[ids[2]];
            let face_normal = (b - a).cross(&(c - a)).normalize();
            for &id in ids.iter() {
                normals[id] += face_normal;
                face_counts[id] += 1;
            }
        }

        for idx in 0..cnt {
            if face_counts[idx] > 0 {
                normals[idx] /= face_counts[idx] as f32;
                if normals[idx].norm() != 0.0 {
                    normals[idx].normalize_mut();
                }
            }
        }

        self.data.normals = normals;
    }

    pub fn into_faces(self) -> Result<Vec<Arc<TriangleFace>>, MeshError> {
        let vertices = self.data.vertices.len();
        if self.data.has_per_vertex_normals() && self.data.normals.len() != vertices {
            return Err(MeshError::BadNormalCount { got: self.data.normals.len(), vertices });
        }
        if self.data.has_uvs() && self.data.uvs.len() != vertices {
            return Err(MeshError::BadUvCount { got: self.data.uvs.len(), vertices });
        }

        let data = Arc::new(self.data);
        Ok(self.faces
            .into_iter()
            .map(|(ids, material)| {
                Arc::new(TriangleFace { data: Arc::clone(&data), ids, material })
            })
            .collect())
    }
}

/// One mesh face; the leaf primitive the acceleration structure sees.
pub struct TriangleFace {
    data: Arc<MeshData>,
    ids: [usize; 3],
    material: Arc<Material>,
}

impl ComputationNode for TriangleFace {
    fn describe(&self) -> String {
        format!("TriangleFace: {{ ids: ({}, {}, {}) }}",
                self.ids[0], self.ids[1], self.ids[2])
    }
}

impl Geometry for TriangleFace {
    fn bounding_box(&self) -> AABB {
        let mut bound = AABB::new(self.data.vertices[self.ids[0]],
                                  self.data.vertices[self.ids[1]]);
        bound.expand_by_point(&self.data.vertices[self.ids[2]]);
        bound
    }

    fn intersect(&self, ray: &Ray3f) -> Option<Intersection> {
        let a = self.data.vertices[self.ids[0]];
        let b = self.data.vertices[self.ids[1]];
        let c = self.data.vertices[self.ids[2]];

        let b_sub_a = b - a;
        let c_sub_a = c - a;
        let abc_cross = b_sub_a.cross(&c_sub_a);
        if abc_cross.norm() == 0.0 {
            // Degenerate face; report a miss, not an error.
            return None;
        }
        let n = abc_cross.normalize();

        let denom = n.dot(&ray.dir());
        if denom == 0.0 {
            return None;
        }

        let plane_d = n.dot(&a);
        let t = (plane_d - n.dot(&ray.origin())) / denom;
        if t < RAY_EPSILON || t > ray.max_t {
            return None;
        }

        let q = ray.at(t);
        let ab_cross_aq = b_sub_a.cross(&(q - a)).dot(&n);
        let bc_cross_bq = (c - b).cross(&(q - b)).dot(&n);
        let ca_cross_cq = (a - c).cross(&(q - c)).dot(&n);
        if ab_cross_aq < 0.0 || bc_cross_bq < 0.0 || ca_cross_cq < 0.0 {
            return None;
        }

        let bary_denom = abc_cross.dot(&n);
        let alpha = bc_cross_bq / bary_denom;
        let beta = ca_cross_cq / bary_denom;
        let gamma = ab_cross_aq / bary_denom;

        let normal = if self.data.has_per_vertex_normals() {
            (alpha * self.data.normals[self.ids[0]]
                + beta * self.data.normals[self.ids[1]]
                + gamma * self.data.normals[self.ids[2]]).normalize()
        } else {
            n
        };

        let uv = if self.data.has_uvs() {
            alpha * self.data.uvs[self.ids[0]]
                + beta * self.data.uvs[self.ids[1]]
                + gamma * self.data.uvs[self.ids[2]]
        } else {
            Vector2f::new(0.0, 0.0)
        };

        Some(Intersection::new(t, normal, uv, Arc::clone(&self.material)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray::RayKind;

    fn unit_quad() -> TriangleMesh {
        // Quad in the z = 0 plane, normals facing +z.
        let mut mesh = TriangleMesh::new(Arc::new(Material::new()));
        mesh.add_vertex(Vector3f::new(-1.0, -1.0, 0.0));
        mesh.add_vertex(Vector3f::new(1.0, -1.0, 0.0));
        mesh.add_vertex(Vector3f::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Vector3f::new(-1.0, 1.0, 0.0));
        assert!(mesh.add_face(0, 1, 2));
        assert!(mesh.add_face(0, 2, 3));
        mesh
    }

    #[test]
    fn test_face_hit_and_flat_normal() {
        let faces = unit_quad().into_faces().expect("valid mesh");
        let ray = Ray3f::new(Vector3f::new(0.5, -0.5, 3.0),
                             Vector3f::new(0.0, 0.0, -1.0),
                             RayKind::Visibility);

        let hit = faces[0].intersect(&ray).expect("expected hit");
        assert!((hit.t() - 3.0).abs() < 1e-5);
        assert!((hit.n() - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
        // The second face does not contain this point.
        assert!(faces[1].intersect(&ray).is_none());
    }

    #[test]
    fn test_face_rejects_out_of_range_indices() {
        let mut mesh = TriangleMesh::new(Arc::new(Material::new()));
        mesh.add_vertex(Vector3f::new(0.0, 0.0, 0.0));
        assert!(!mesh.add_face(0, 1, 2));
    }

    #[test]
    fn test_degenerate_face_is_a_miss() {
        let mut mesh = TriangleMesh::new(Arc::new(Material::new()));
        mesh.add_vertex(Vector3f::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Vector3f::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Vector3f::new(2.0, 0.0, 0.0));
        assert!(mesh.add_face(0, 1, 2));
        let faces = mesh.into_faces().expect("valid mesh");

        let ray = Ray3f::new(Vector3f::new(1.0, 0.0, 3.0),
                             Vector3f::new(0.0, 0.0, -1.0),
                             RayKind::Visibility);
        assert!(faces[0].intersect(&ray).is_none());
    }

    #[test]
    fn test_generated_normals_interpolate() {
        let mut mesh = unit_quad();
        mesh.generate_normals();
        let faces = mesh.into_faces().expect("valid mesh");

        let ray = Ray3f::new(Vector3f::new(0.2, 0.1, 3.0),
                             Vector3f::new(0.0, 0.0, -1.0),
                             RayKind::Visibility);
        let hit = faces[0].intersect(&ray).expect("expected hit");
        // All face normals agree, so the interpolated normal matches.
        assert!((hit.n() - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_normal_count_validation() {
        let mut mesh = unit_quad();
        mesh.add_normal(Vector3f::new(0.0, 0.0, 1.0));
        match mesh.into_faces() {
            Err(MeshError::BadNormalCount { got, vertices }) => {
                assert_eq!(got, 1);
                assert_eq!(vertices, 4);
            }
            _ => panic!("expected a normal-count error"),
        }
    }

    #[test]
    fn test_uv_interpolation() {
        let mut mesh = unit_quad();
        mesh.add_uv(Vector2f::new(0.0, 0.0));
        mesh.add_uv(Vector2f::new(1.0, 0.0));
        mesh.add_uv(Vector2f::new(1.0, 1.0));
        mesh.add_uv(Vector2f::new(0.0, 1.0));
        let faces = mesh.into_faces().expect("valid mesh");

        // Straight at the first vertex: its uv comes back whole.
        let ray = Ray3f::new(Vector3f::new(-0.999, -0.999, 3.0),
                             Vector3f::new(0.0, 0.0, -1.0),
                             RayKind::Visibility);
        let hit = faces[0].intersect(&ray).expect("expected hit");
        assert!(hit.uv().x < 1e-2);
        assert!(hit.uv().y < 1e-2);
    }
}
