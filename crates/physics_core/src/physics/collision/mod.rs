//! Narrow-phase collision detection
//!
//! Exact pairwise contact generation for pairs a broad phase has already
//! flagged as possibly overlapping.
//!
//! # Architecture
//!
//! - **Model Space Storage**: Each [`Part`] keeps its local definition untouched
//! - **World Refresh**: [`Part::update_world`] rebuilds the world copy once per step
//! - **Pair Dispatch**: [`narrow_phase`] matches on `(ShapeKind, ShapeKind)` and
//!   runs exactly one algorithm per ordered pair
//!
//! # Module Organization
//!
//! - [`primitives`] - Plane, sphere and capsule value types
//! - [`part`] - Runtime parts with local and world copies
//! - [`contact`] - Contact triples and sinks
//! - [`narrow_phase`] - Per-pair static and swept tests
//! - [`batch`] - Parallel narrow-phase over many pairs

pub mod primitives;
pub mod part;
pub mod contact;
pub mod narrow_phase;
pub mod batch;

// Re-export commonly used types
pub use primitives::{Plane, Sphere, Capsule};
pub use part::{Part, ShapeKind, PlanePart, SpherePart, CapsulePart, PolyhedronPart};
pub use contact::{Contact, ContactList, ContactSink};
pub use narrow_phase::CollisionError;
pub use batch::{collide_pairs, PairTest};
