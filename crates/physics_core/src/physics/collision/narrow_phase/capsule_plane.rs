//! Capsule vs plane

use crate::foundation::math::Vec3;
use crate::physics::collision::contact::ContactSink;
use crate::physics::collision::part::{CapsulePart, PlanePart};
use super::sphere_plane::emit_sphere;
use super::{closing_distance, NarrowPhase};

/// Capsule vs plane contact generation.
///
/// Each endpoint is tested as a sphere with the capsule's radius, so a pair
/// yields zero, one or two contacts.
pub struct CapsulePlane;

impl NarrowPhase for CapsulePlane {
    type A = CapsulePart;
    type B = PlanePart;

    fn overlap_test(sink: &mut dyn ContactSink, a: &CapsulePart, b: &PlanePart) {
        for end in &a.world.end_spheres() {
            emit_sphere(sink, end, &b.world, 0.0);
        }
    }

    fn swept_test(sink: &mut dyn ContactSink, a: &CapsulePart, b: &PlanePart, delta: Vec3) {
        let dx = closing_distance(&b.world.normal, &delta);
        for end in &a.world.end_spheres() {
            emit_sphere(sink, end, &b.world, dx);
        }
    }
}
