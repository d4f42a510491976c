//! Polyhedron vs plane

use crate::foundation::math::{Vec3, EPSILON};
use crate::physics::collision::contact::ContactSink;
use crate::physics::collision::part::{PlanePart, PolyhedronPart};
use crate::physics::collision::primitives::Plane;
use super::{closing_distance, NarrowPhase};

/// Polyhedron vs plane contact generation.
///
/// Only the faces around the vertex deepest below the plane are scanned; each
/// distinct vertex of those faces within `EPSILON` of the plane becomes a
/// contact.
pub struct PolyhedronPlane;

/// Static test against `plane` raised by `offset` along its normal.
/// Contact points on the plane side are projected onto the unraised plane.
fn emit_polyhedron(sink: &mut dyn ContactSink, a: &PolyhedronPart, plane: &Plane, offset: f32) {
    let deepest = a.extreme_vertex(&-plane.normal);
    let raised = plane.offset_by(offset);

    let mut visited: Vec<usize> = Vec::with_capacity(8);
    for &face in a.faces_with_vertex(deepest) {
        for &vertex in a.face(face) {
            if visited.contains(&vertex) {
                continue;
            }
            visited.push(vertex);

            let point_a = a.world_vertex(vertex);
            if raised.distance_to(&point_a) < EPSILON {
                sink.write_point(point_a, plane.closest_point(&point_a), plane.normal);
            }
        }
    }
}

impl NarrowPhase for PolyhedronPlane {
    type A = PolyhedronPart;
    type B = PlanePart;

    fn overlap_test(sink: &mut dyn ContactSink, a: &PolyhedronPart, b: &PlanePart) {
        emit_polyhedron(sink, a, &b.world, 0.0);
    }

    fn swept_test(sink: &mut dyn ContactSink, a: &PolyhedronPart, b: &PlanePart, delta: Vec3) {
        let dx = closing_distance(&b.world.normal, &delta);
        emit_polyhedron(sink, a, &b.world, -dx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::foundation::math::Mat4;
    use crate::physics::collision::{ContactList, Part};
    use crate::physics::pipeline::CompiledPolyhedron;
    use approx::assert_relative_eq;

    fn ground() -> PlanePart {
        PlanePart::new(Plane::new(Vec3::z(), Vec3::zeros()))
    }

    /// Unit cube with its bottom face at `z = bottom`
    fn cube_at(bottom: f32) -> PolyhedronPart {
        let body = Arc::new(CompiledPolyhedron::cuboid(Vec3::new(0.5, 0.5, 0.5)));
        let mut part = Part::polyhedron(body);
        part.update_world(&Mat4::new_translation(&Vec3::new(0.0, 0.0, bottom + 0.5)));
        match part {
            Part::Polyhedron(poly) => poly,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_resting_cube_has_four_contacts() {
        let mut contacts = ContactList::new();
        PolyhedronPlane::overlap_test(&mut contacts, &cube_at(0.0), &ground());

        assert_eq!(contacts.len(), 4);
        for contact in &contacts {
            assert_relative_eq!(contact.point_a.z, 0.0, epsilon = 1e-6);
            assert_relative_eq!(contact.point_b.z, 0.0, epsilon = 1e-6);
            assert_relative_eq!(contact.normal, Vec3::z());
        }
        let mut corners: Vec<(i32, i32)> = contacts
            .iter()
            .map(|c| ((c.point_a.x * 2.0).round() as i32, (c.point_a.y * 2.0).round() as i32))
            .collect();
        corners.sort_unstable();
        assert_eq!(corners, vec![(-1, -1), (-1, 1), (1, -1), (1, 1)]);
    }

    #[test]
    fn test_hovering_cube_has_no_contact() {
        let mut contacts = ContactList::new();
        PolyhedronPlane::overlap_test(&mut contacts, &cube_at(0.25), &ground());
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_tilted_cube_touches_with_one_corner() {
        let body = Arc::new(CompiledPolyhedron::cuboid(Vec3::new(0.5, 0.5, 0.5)));
        let mut part = Part::polyhedron(body);
        let rotation = Mat4::from_axis_angle(&Vec3::x_axis(), 0.3)
            * Mat4::from_axis_angle(&Vec3::y_axis(), 0.4);
        part.update_world(&rotation);
        let Part::Polyhedron(poly) = part else { unreachable!() };

        let lowest = poly.world_vertices().iter().map(|v| v.z).fold(f32::MAX, f32::min);
        let plane = PlanePart::new(Plane::new(Vec3::z(), Vec3::new(0.0, 0.0, lowest)));

        let mut contacts = ContactList::new();
        PolyhedronPlane::overlap_test(&mut contacts, &poly, &plane);
        assert_eq!(contacts.len(), 1);
        assert_relative_eq!(contacts.contacts()[0].point_a.z, lowest, epsilon = 1e-6);
    }

    #[test]
    fn test_swept_offsets_plane() {
        let cube = cube_at(0.25);
        let mut contacts = ContactList::new();
        PolyhedronPlane::swept_test(&mut contacts, &cube, &ground(), Vec3::new(0.0, 0.0, -0.3));
        assert_eq!(contacts.len(), 4);
        for contact in &contacts {
            // Contact points stay on the real plane, not the raised one
            assert_relative_eq!(contact.point_b.z, 0.0, epsilon = 1e-6);
            assert_relative_eq!(contact.point_a.z, 0.25, epsilon = 1e-6);
        }

        contacts.clear();
        PolyhedronPlane::swept_test(&mut contacts, &cube, &ground(), Vec3::new(0.0, 0.0, 1.0));
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_swept_never_reports_less_than_overlap() {
        for bottom in [-0.1_f32, 0.0, 0.2] {
            let cube = cube_at(bottom);
            let mut overlap = ContactList::new();
            PolyhedronPlane::overlap_test(&mut overlap, &cube, &ground());
            for delta in [Vec3::zeros(), Vec3::new(1.0, 0.0, 2.0), Vec3::new(0.0, 3.0, 0.0)] {
                let mut swept = ContactList::new();
                PolyhedronPlane::swept_test(&mut swept, &cube, &ground(), delta);
                assert_eq!(swept, overlap);
            }
        }
    }
}
