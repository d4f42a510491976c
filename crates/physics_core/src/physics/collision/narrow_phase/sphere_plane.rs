//! Sphere vs plane

use crate::foundation::math::{Vec3, EPSILON};
use crate::physics::collision::contact::ContactSink;
use crate::physics::collision::part::{PlanePart, SpherePart};
use crate::physics::collision::primitives::{Plane, Sphere};
use super::{closing_distance, NarrowPhase};

/// Sphere vs plane contact generation
pub struct SpherePlane;

/// Emit the sphere's deepest point when it lies within `EPSILON` of the plane
/// after moving `dx` along the normal (`dx <= 0`).
///
/// Exactly touching and already penetrating spheres both produce a contact so
/// resting bodies keep a stable manifold.
pub(super) fn emit_sphere(sink: &mut dyn ContactSink, sphere: &Sphere, plane: &Plane, dx: f32) {
    if plane.distance_to(&sphere.center) - sphere.radius + dx >= EPSILON {
        return;
    }

    let point_a = sphere.center - plane.normal * sphere.radius;
    let point_b = plane.closest_point(&sphere.center);
    sink.write_point(point_a, point_b, plane.normal);
}

impl NarrowPhase for SpherePlane {
    type A = SpherePart;
    type B = PlanePart;

    fn overlap_test(sink: &mut dyn ContactSink, a: &SpherePart, b: &PlanePart) {
        emit_sphere(sink, &a.world, &b.world, 0.0);
    }

    fn swept_test(sink: &mut dyn ContactSink, a: &SpherePart, b: &PlanePart, delta: Vec3) {
        let dx = closing_distance(&b.world.normal, &delta);
        emit_sphere(sink, &a.world, &b.world, dx);
    }
}
