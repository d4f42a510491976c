//! Convex polyhedron compilation
//!
//! Turns a vertex array and per-face index lists into the topology the narrow
//! phase walks at runtime: face normals, vertex adjacency, unique edges and
//! unique edge directions. Everything is derived once, at asset load.

use std::collections::HashSet;

use crate::foundation::math::{is_parallel, Mat4, Mat4Ext, Vec3};
use super::PipelineError;

/// A compiled convex polyhedron in local space.
///
/// Faces must be wound counter-clockwise when seen from outside the body.
/// The winding is not checked; a clockwise face gets an inward normal.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPolyhedron {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<usize>>,
    neighbors: Vec<Vec<usize>>,
    vertex_faces: Vec<Vec<usize>>,
    edges: Vec<[usize; 2]>,
    edge_directions: Vec<Vec3>,
    face_normals: Vec<Vec3>,
}

impl CompiledPolyhedron {
    /// Compile a polyhedron from vertices and per-face vertex index lists
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>) -> Result<Self, PipelineError> {
        for (face_index, face) in faces.iter().enumerate() {
            debug_assert!(face.len() >= 3, "face {face_index} has fewer than three vertices");
            if let Some(&index) = face.iter().find(|&&index| index >= vertices.len()) {
                return Err(PipelineError::VertexIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        Ok(Self::compile(vertices, faces))
    }

    fn compile(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>) -> Self {
        let mut polyhedron = Self {
            vertices,
            faces,
            neighbors: Vec::new(),
            vertex_faces: Vec::new(),
            edges: Vec::new(),
            edge_directions: Vec::new(),
            face_normals: Vec::new(),
        };
        polyhedron.build_topology();
        polyhedron.build_geometry();

        log::debug!(
            "Compiled polyhedron: {} vertices, {} faces, {} edges, {} edge directions",
            polyhedron.vertices.len(),
            polyhedron.faces.len(),
            polyhedron.edges.len(),
            polyhedron.edge_directions.len(),
        );

        polyhedron
    }

    /// Compile a polyhedron from a flat triangle index buffer
    pub fn from_triangles(vertices: &[Vec3], indices: &[u32]) -> Result<Self, PipelineError> {
        if indices.len() % 3 != 0 {
            return Err(PipelineError::IncompleteTriangle { index_count: indices.len() });
        }

        let faces = indices
            .chunks_exact(3)
            .map(|chunk| chunk.iter().map(|&i| i as usize).collect())
            .collect();

        Self::new(vertices.to_vec(), faces)
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let vertices = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { -half_extents.x } else { half_extents.x },
                    if i & 2 == 0 { -half_extents.y } else { half_extents.y },
                    if i & 4 == 0 { -half_extents.z } else { half_extents.z },
                )
            })
            .collect();

        let faces = vec![
            vec![0, 2, 3, 1], // -z
            vec![4, 5, 7, 6], // +z
            vec![0, 1, 5, 4], // -y
            vec![2, 6, 7, 3], // +y
            vec![0, 4, 6, 2], // -x
            vec![1, 3, 7, 5], // +x
        ];

        Self::compile(vertices, faces)
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Per-face vertex index lists
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Per-vertex adjacent vertices, without duplicates
    pub fn neighbors(&self) -> &[Vec<usize>] {
        &self.neighbors
    }

    /// Per-vertex incident faces
    pub fn vertex_faces(&self) -> &[Vec<usize>] {
        &self.vertex_faces
    }

    /// Undirected edges, each listed once however many faces share it
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Unit edge directions with parallel and anti-parallel duplicates removed
    pub fn edge_directions(&self) -> &[Vec3] {
        &self.edge_directions
    }

    /// Unit face normals
    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }

    /// Bake a transform into the vertices and rebuild the derived geometry
    pub(crate) fn apply_transform(&mut self, matrix: &Mat4) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_position(vertex);
        }
        self.build_geometry();
    }

    fn build_topology(&mut self) {
        let vertex_count = self.vertices.len();
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
        let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
        let mut seen_edges: HashSet<(usize, usize)> = HashSet::new();
        let mut edges = Vec::new();

        for (face_index, face) in self.faces.iter().enumerate() {
            let count = face.len();
            for j in 0..count {
                let current = face[j];
                let next = face[(j + 1) % count];
                let previous = face[(j + count - 1) % count];

                if seen_edges.insert((current.min(next), current.max(next))) {
                    edges.push([current, next]);
                }

                for adjacent in [next, previous] {
                    if !neighbors[current].contains(&adjacent) {
                        neighbors[current].push(adjacent);
                    }
                }
                if !vertex_faces[current].contains(&face_index) {
                    vertex_faces[current].push(face_index);
                }
            }
        }

        self.neighbors = neighbors;
        self.vertex_faces = vertex_faces;
        self.edges = edges;
    }

    fn build_geometry(&mut self) {
        self.face_normals = self
            .faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];
                (v1 - v0).cross(&(v2 - v0)).normalize()
            })
            .collect();

        let mut directions: Vec<Vec3> = Vec::new();
        for &[a, b] in &self.edges {
            let direction = (self.vertices[b] - self.vertices[a]).normalize();
            if !directions.iter().any(|existing| is_parallel(existing, &direction)) {
                directions.push(direction);
            }
        }
        self.edge_directions = directions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tetrahedron() -> CompiledPolyhedron {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]];
        CompiledPolyhedron::new(vertices, faces).unwrap()
    }

    #[test]
    fn test_tetrahedron_edges_are_unique() {
        let tet = tetrahedron();
        assert_eq!(tet.edges().len(), 6);

        let mut keys: Vec<(usize, usize)> = tet
            .edges()
            .iter()
            .map(|&[a, b]| (a.min(b), a.max(b)))
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_tetrahedron_edge_directions_are_unique() {
        let tet = tetrahedron();
        let directions = tet.edge_directions();
        assert_eq!(directions.len(), 6);
        for (i, a) in directions.iter().enumerate() {
            assert_relative_eq!(a.magnitude(), 1.0, epsilon = 1e-6);
            for b in &directions[i + 1..] {
                assert!(!is_parallel(a, b));
            }
        }
    }

    #[test]
    fn test_tetrahedron_face_normals_point_outward() {
        let tet = tetrahedron();
        let normals = tet.face_normals();
        assert_relative_eq!(normals[0], -Vec3::z(), epsilon = 1e-6);
        assert_relative_eq!(normals[1], -Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(normals[2], -Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(normals[3], Vec3::new(1.0, 1.0, 1.0).normalize(), epsilon = 1e-6);
    }

    #[test]
    fn test_tetrahedron_adjacency() {
        let tet = tetrahedron();
        for (vertex, neighbors) in tet.neighbors().iter().enumerate() {
            let mut sorted = neighbors.clone();
            sorted.sort_unstable();
            let expected: Vec<usize> = (0..4).filter(|&v| v != vertex).collect();
            assert_eq!(sorted, expected);
        }
        for faces in tet.vertex_faces() {
            assert_eq!(faces.len(), 3);
        }
    }

    #[test]
    fn test_cuboid_topology() {
        let cube = CompiledPolyhedron::cuboid(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.edges().len(), 12);
        assert_eq!(cube.edge_directions().len(), 3);
        for neighbors in cube.neighbors() {
            assert_eq!(neighbors.len(), 3);
        }

        let expected = [-Vec3::z(), Vec3::z(), -Vec3::y(), Vec3::y(), -Vec3::x(), Vec3::x()];
        for (normal, expected) in cube.face_normals().iter().zip(expected.iter()) {
            assert_relative_eq!(*normal, *expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_from_triangles() {
        let vertices = tetrahedron().vertices().to_vec();
        let indices = [0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];
        let tet = CompiledPolyhedron::from_triangles(&vertices, &indices).unwrap();
        assert_eq!(tet, tetrahedron());
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let result = CompiledPolyhedron::new(vec![Vec3::zeros(); 3], vec![vec![0, 1, 3]]);
        assert_eq!(
            result,
            Err(PipelineError::VertexIndexOutOfRange { face: 0, index: 3, vertex_count: 3 })
        );
    }

    #[test]
    fn test_rejects_incomplete_triangle() {
        let result = CompiledPolyhedron::from_triangles(&[Vec3::zeros(); 3], &[0, 1]);
        assert_eq!(result, Err(PipelineError::IncompleteTriangle { index_count: 2 }));
    }

    #[test]
    fn test_transform_rebuilds_normals_and_directions() {
        let mut cube = CompiledPolyhedron::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let rotation = Mat4::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4);
        cube.apply_transform(&(Mat4::new_translation(&Vec3::new(0.0, 0.0, 4.0)) * rotation));

        let diagonal = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(cube.face_normals()[5], diagonal, epsilon = 1e-6);
        assert!(cube.edge_directions().iter().any(|d| is_parallel(d, &diagonal)));
        assert_eq!(cube.edges().len(), 12);
        assert_relative_eq!(cube.vertices()[0].z, 3.5, epsilon = 1e-6);
    }
}
