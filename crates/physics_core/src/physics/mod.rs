//! Physics module for contact generation and collision primitive compilation
//!
//! - [`collision`] - Runtime shapes, contact sinks and narrow-phase algorithms
//! - [`pipeline`] - Load-time compilation of authored geometry and rigid body models
//!
//! Broad-phase culling, constraint solving and integration live outside this crate;
//! they consume the contacts and mass properties produced here.

pub mod collision;
pub mod pipeline;

pub use collision::{
    Capsule,
    CollisionError,
    Contact,
    ContactList,
    ContactSink,
    Part,
    Plane,
    ShapeKind,
    Sphere,
};
pub use pipeline::{
    CompiledPart,
    CompiledPolyhedron,
    MassProperties,
    Material,
    RigidBodyModel,
};
