//! Runtime collision parts
//!
//! A part pairs an immutable local definition with a world copy that the
//! simulation refreshes once per step through [`Part::update_world`]. The
//! narrow phase only ever reads the world copy.

use std::fmt;
use std::sync::Arc;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::physics::pipeline::CompiledPolyhedron;
use super::primitives::{Capsule, Plane, Sphere};

/// Shape kind tag used to key narrow-phase dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Infinite plane
    Plane,
    /// Sphere
    Sphere,
    /// Capsule
    Capsule,
    /// Convex polyhedron
    Polyhedron,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plane => "plane",
            Self::Sphere => "sphere",
            Self::Capsule => "capsule",
            Self::Polyhedron => "polyhedron",
        };
        f.write_str(name)
    }
}

/// Plane part
#[derive(Debug, Clone)]
pub struct PlanePart {
    local: Plane,
    /// World-space plane
    pub world: Plane,
}

impl PlanePart {
    /// Creates a plane part; the world copy starts equal to the local plane
    pub fn new(plane: Plane) -> Self {
        Self { local: plane, world: plane }
    }

    /// Local-space plane
    pub fn local(&self) -> &Plane {
        &self.local
    }
}

/// Sphere part
#[derive(Debug, Clone)]
pub struct SpherePart {
    local: Sphere,
    /// World-space sphere
    pub world: Sphere,
}

impl SpherePart {
    /// Creates a sphere part; the world copy starts equal to the local sphere
    pub fn new(sphere: Sphere) -> Self {
        Self { local: sphere, world: sphere }
    }

    /// Local-space sphere
    pub fn local(&self) -> &Sphere {
        &self.local
    }
}

/// Capsule part
#[derive(Debug, Clone)]
pub struct CapsulePart {
    local: Capsule,
    /// World-space capsule
    pub world: Capsule,
}

impl CapsulePart {
    /// Creates a capsule part; the world copy starts equal to the local capsule
    pub fn new(capsule: Capsule) -> Self {
        Self { local: capsule, world: capsule }
    }

    /// Local-space capsule
    pub fn local(&self) -> &Capsule {
        &self.local
    }
}

/// Convex polyhedron part.
///
/// Topology (faces, adjacency) is shared with the compiled polyhedron; only
/// the world-space vertex positions and face normals are owned per part.
#[derive(Debug, Clone)]
pub struct PolyhedronPart {
    body: Arc<CompiledPolyhedron>,
    world_vertices: Vec<Vec3>,
    world_normals: Vec<Vec3>,
}

impl PolyhedronPart {
    /// Creates a polyhedron part; the world copy starts equal to the local body
    pub fn new(body: Arc<CompiledPolyhedron>) -> Self {
        let world_vertices = body.vertices().to_vec();
        let world_normals = body.face_normals().to_vec();
        Self {
            body,
            world_vertices,
            world_normals,
        }
    }

    /// Compiled local-space body
    pub fn body(&self) -> &CompiledPolyhedron {
        &self.body
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.body.faces().len()
    }

    /// Vertex indices of a face
    pub fn face(&self, index: usize) -> &[usize] {
        &self.body.faces()[index]
    }

    /// Indices of the faces that contain a vertex
    pub fn faces_with_vertex(&self, vertex: usize) -> &[usize] {
        &self.body.vertex_faces()[vertex]
    }

    /// World-space vertex positions
    pub fn world_vertices(&self) -> &[Vec3] {
        &self.world_vertices
    }

    /// World-space position of one vertex
    pub fn world_vertex(&self, index: usize) -> Vec3 {
        self.world_vertices[index]
    }

    /// World-space face normals
    pub fn world_normals(&self) -> &[Vec3] {
        &self.world_normals
    }

    /// Index of the world vertex farthest along `direction` (support mapping).
    ///
    /// Hill-climbs the vertex adjacency graph, which reaches the global
    /// maximum on a convex body.
    pub fn extreme_vertex(&self, direction: &Vec3) -> usize {
        debug_assert!(!self.world_vertices.is_empty(), "polyhedron has no vertices");
        let neighbors = self.body.neighbors();
        let mut current = 0;
        let mut best = self.world_vertices[0].dot(direction);

        loop {
            let mut improved = false;
            for &candidate in &neighbors[current] {
                let projection = self.world_vertices[candidate].dot(direction);
                if projection > best {
                    best = projection;
                    current = candidate;
                    improved = true;
                }
            }
            if !improved {
                return current;
            }
        }
    }

    fn update_world(&mut self, matrix: &Mat4) {
        for (world, local) in self.world_vertices.iter_mut().zip(self.body.vertices()) {
            *world = matrix.transform_position(local);
        }
        for (world, local) in self.world_normals.iter_mut().zip(self.body.face_normals()) {
            *world = matrix.transform_normal(local);
        }
    }
}

/// A runtime collision part, tagged by shape kind
#[derive(Debug, Clone)]
pub enum Part {
    /// Plane part
    Plane(PlanePart),
    /// Sphere part
    Sphere(SpherePart),
    /// Capsule part
    Capsule(CapsulePart),
    /// Polyhedron part
    Polyhedron(PolyhedronPart),
}

impl Part {
    /// Creates a plane part
    pub fn plane(plane: Plane) -> Self {
        Self::Plane(PlanePart::new(plane))
    }

    /// Creates a sphere part
    pub fn sphere(sphere: Sphere) -> Self {
        Self::Sphere(SpherePart::new(sphere))
    }

    /// Creates a capsule part
    pub fn capsule(capsule: Capsule) -> Self {
        Self::Capsule(CapsulePart::new(capsule))
    }

    /// Creates a polyhedron part sharing a compiled body
    pub fn polyhedron(body: Arc<CompiledPolyhedron>) -> Self {
        Self::Polyhedron(PolyhedronPart::new(body))
    }

    /// Shape kind of this part
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Plane(_) => ShapeKind::Plane,
            Self::Sphere(_) => ShapeKind::Sphere,
            Self::Capsule(_) => ShapeKind::Capsule,
            Self::Polyhedron(_) => ShapeKind::Polyhedron,
        }
    }

    /// Rebuild the world copy from the local definition and a body transform.
    /// Called once per simulation step, before any narrow-phase test.
    pub fn update_world(&mut self, matrix: &Mat4) {
        match self {
            Self::Plane(part) => part.world = part.local.transformed(matrix),
            Self::Sphere(part) => part.world = part.local.transformed(matrix),
            Self::Capsule(part) => part.world = part.local.transformed(matrix),
            Self::Polyhedron(part) => part.update_world(matrix),
        }
    }
}
