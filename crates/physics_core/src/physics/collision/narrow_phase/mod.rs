//! Narrow-phase contact generation
//!
//! One [`NarrowPhase`] algorithm per ordered pair of shape kinds. The free
//! functions [`overlap_test`] and [`swept_test`] dispatch on the
//! `(ShapeKind, ShapeKind)` of two [`Part`]s; the reversed ordering of every
//! supported pair runs the same algorithm through a sink that swaps the two
//! contact points and flips the normal.
//!
//! Contacts are written to the sink unordered and unfiltered.

mod capsule_plane;
mod polyhedron_plane;
mod sphere_plane;

pub use capsule_plane::CapsulePlane;
pub use polyhedron_plane::PolyhedronPlane;
pub use sphere_plane::SpherePlane;

use thiserror::Error;

use crate::foundation::math::Vec3;
use super::contact::{ContactSink, SwappedSink};
use super::part::{Part, ShapeKind};

/// Narrow-phase errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionError {
    /// No algorithm is registered for this pair of shape kinds
    #[error("No narrow-phase algorithm for {0} vs {1}")]
    UnsupportedPair(ShapeKind, ShapeKind),
}

/// A contact generation algorithm for one ordered pair of part types
pub trait NarrowPhase {
    /// First part type
    type A;
    /// Second part type
    type B;

    /// Static overlap test between two parts at their current world positions
    fn overlap_test(sink: &mut dyn ContactSink, a: &Self::A, b: &Self::B);

    /// Swept test; `delta` is the motion of `a` relative to `b` over the step
    fn swept_test(sink: &mut dyn ContactSink, a: &Self::A, b: &Self::B, delta: Vec3);
}

/// Closing component of a relative motion along a plane normal.
///
/// Only motion towards the plane counts, so the result is never positive.
pub(crate) fn closing_distance(normal: &Vec3, delta: &Vec3) -> f32 {
    normal.dot(delta).min(0.0)
}

/// True when an algorithm exists for the pair, in either order
pub fn supports(a: ShapeKind, b: ShapeKind) -> bool {
    matches!(
        (a, b),
        (ShapeKind::Sphere | ShapeKind::Capsule | ShapeKind::Polyhedron, ShapeKind::Plane)
            | (ShapeKind::Plane, ShapeKind::Sphere | ShapeKind::Capsule | ShapeKind::Polyhedron)
    )
}

/// Static overlap test between two parts
pub fn overlap_test(sink: &mut dyn ContactSink, a: &Part, b: &Part) -> Result<(), CollisionError> {
    dispatch(sink, a, b, None)
}

/// Swept test between two parts; `delta` is the motion of `a` relative to `b`
pub fn swept_test(
    sink: &mut dyn ContactSink,
    a: &Part,
    b: &Part,
    delta: Vec3,
) -> Result<(), CollisionError> {
    dispatch(sink, a, b, Some(delta))
}

fn dispatch(
    sink: &mut dyn ContactSink,
    a: &Part,
    b: &Part,
    delta: Option<Vec3>,
) -> Result<(), CollisionError> {
    match (a, b) {
        (Part::Sphere(a), Part::Plane(b)) => run::<SpherePlane>(sink, a, b, delta),
        (Part::Capsule(a), Part::Plane(b)) => run::<CapsulePlane>(sink, a, b, delta),
        (Part::Polyhedron(a), Part::Plane(b)) => run::<PolyhedronPlane>(sink, a, b, delta),

        (Part::Plane(a), Part::Sphere(b)) => run_swapped::<SpherePlane>(sink, b, a, delta),
        (Part::Plane(a), Part::Capsule(b)) => run_swapped::<CapsulePlane>(sink, b, a, delta),
        (Part::Plane(a), Part::Polyhedron(b)) => run_swapped::<PolyhedronPlane>(sink, b, a, delta),

        _ => return Err(CollisionError::UnsupportedPair(a.kind(), b.kind())),
    }
    Ok(())
}

fn run<N: NarrowPhase>(sink: &mut dyn ContactSink, a: &N::A, b: &N::B, delta: Option<Vec3>) {
    match delta {
        Some(delta) => N::swept_test(sink, a, b, delta),
        None => N::overlap_test(sink, a, b),
    }
}

fn run_swapped<N: NarrowPhase>(
    sink: &mut dyn ContactSink,
    a: &N::A,
    b: &N::B,
    delta: Option<Vec3>,
) {
    let mut swapped = SwappedSink::new(sink);
    run::<N>(&mut swapped, a, b, delta.map(|d| -d));
}
