//! # Physics Core
//!
//! Rigid-body collision core for the engine: contact generation, collision
//! primitive compilation and parallel dispatch of per-pair work.
//!
//! ## Features
//!
//! - **Narrow Phase**: Static and swept contact tests per shape pair
//! - **Compiled Parts**: Load-time baking of authored geometry into runtime primitives
//! - **Rigid Body Models**: Immutable body definitions with materials and mass properties
//! - **Task Manager**: Fixed-size worker pool with a single drain barrier
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use physics_core::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sphere = CompiledPart::sphere(Vec3::new(0.0, 0.0, 0.5), 1.0);
//!     let ground = Part::plane(Plane::new(Vec3::z(), Vec3::zeros()));
//!
//!     let mut contacts = ContactList::new();
//!     narrow_phase::overlap_test(&mut contacts, &sphere.to_composition_part(), &ground)?;
//!     assert_eq!(contacts.len(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod tasks;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PhysicsConfig},
        foundation::math::{Mat3, Mat4, Point3, Vec3},
        physics::{
            collision::{
                narrow_phase, Capsule, CollisionError, Contact, ContactList, ContactSink, Part,
                Plane, ShapeKind, Sphere,
            },
            pipeline::{
                CompiledPart, CompiledPolyhedron, MassProperties, Material, ModelError,
                PipelineError, RigidBodyModel,
            },
        },
        tasks::{TaskError, TaskFailure, TaskManager},
    };
}
