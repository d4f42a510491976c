//! Compiled-part pipeline
//!
//! Converts authoring-time geometry into runtime collision primitives once
//! per asset, and binds them into rigid body definitions.
//!
//! - [`CompiledPolyhedron`] - Convex hull topology derived from faces
//! - [`CompiledPart`] - One compiled primitive with an optional one-time bake
//! - [`RigidBodyModel`] - Mass properties plus parts and their materials

pub mod compiled_part;
pub mod compiled_polyhedron;
pub mod mass_properties;
pub mod material;
pub mod rigid_body_model;

pub use compiled_part::{CompiledPart, CompiledShape};
pub use compiled_polyhedron::CompiledPolyhedron;
pub use mass_properties::MassProperties;
pub use material::Material;
pub use rigid_body_model::{ModelError, RigidBodyModel};

use thiserror::Error;

use crate::physics::collision::ShapeKind;

/// Geometry compilation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    /// A compiled part only accepts a single transform bake
    #[error("Compiled {0} already has a baked transform")]
    AlreadyBaked(ShapeKind),

    /// A face refers to a vertex that does not exist
    #[error("Face {face} refers to vertex {index}, but only {vertex_count} vertices exist")]
    VertexIndexOutOfRange {
        /// Face index
        face: usize,
        /// Offending vertex index
        index: usize,
        /// Number of vertices supplied
        vertex_count: usize,
    },

    /// A triangle index buffer length is not a multiple of three
    #[error("Triangle index buffer has {index_count} indices, not a multiple of three")]
    IncompleteTriangle {
        /// Number of indices supplied
        index_count: usize,
    },
}
