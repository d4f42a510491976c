//! Compiled collision parts
//!
//! The load-time form of a collision shape. A compiled part may have one
//! transform baked into it before simulation starts; after that it is only
//! read, either to build runtime [`Part`]s or by a [`super::RigidBodyModel`].

use std::sync::Arc;

use crate::foundation::math::{Mat4, Vec3};
use crate::physics::collision::{Capsule, Part, Plane, ShapeKind, Sphere};
use super::{CompiledPolyhedron, PipelineError};

/// Shape data held by a compiled part
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledShape {
    /// Plane
    Plane(Plane),
    /// Sphere
    Sphere(Sphere),
    /// Capsule
    Capsule(Capsule),
    /// Convex polyhedron, shared with the runtime parts built from it
    Polyhedron(Arc<CompiledPolyhedron>),
}

/// A compiled, simulation-ready collision primitive
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPart {
    shape: CompiledShape,
    baked: bool,
}

impl CompiledPart {
    /// Wrap compiled shape data
    pub fn new(shape: CompiledShape) -> Self {
        Self { shape, baked: false }
    }

    /// Compiled plane
    pub fn plane(normal: Vec3, p: Vec3) -> Self {
        Self::new(CompiledShape::Plane(Plane::new(normal, p)))
    }

    /// Compiled sphere
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::new(CompiledShape::Sphere(Sphere::new(center, radius)))
    }

    /// Compiled capsule
    pub fn capsule(p1: Vec3, p2: Vec3, radius: f32) -> Self {
        debug_assert!((p2 - p1).magnitude_squared() > 0.0, "capsule segment has zero length");
        Self::new(CompiledShape::Capsule(Capsule::new(p1, p2, radius)))
    }

    /// Compiled polyhedron
    pub fn polyhedron(polyhedron: CompiledPolyhedron) -> Self {
        Self::new(CompiledShape::Polyhedron(Arc::new(polyhedron)))
    }

    /// Shape data
    pub fn shape(&self) -> &CompiledShape {
        &self.shape
    }

    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        match &self.shape {
            CompiledShape::Plane(_) => ShapeKind::Plane,
            CompiledShape::Sphere(_) => ShapeKind::Sphere,
            CompiledShape::Capsule(_) => ShapeKind::Capsule,
            CompiledShape::Polyhedron(_) => ShapeKind::Polyhedron,
        }
    }

    /// Whether a transform has already been baked in
    pub fn is_baked(&self) -> bool {
        self.baked
    }

    /// Build the runtime part for this shape. Polyhedron topology is shared,
    /// not copied.
    pub fn to_composition_part(&self) -> Part {
        match &self.shape {
            CompiledShape::Plane(plane) => Part::plane(*plane),
            CompiledShape::Sphere(sphere) => Part::sphere(*sphere),
            CompiledShape::Capsule(capsule) => Part::capsule(*capsule),
            CompiledShape::Polyhedron(polyhedron) => Part::polyhedron(Arc::clone(polyhedron)),
        }
    }

    /// Bake a transform into the local geometry, in place and irreversibly.
    ///
    /// Only one bake is allowed per part; it belongs to asset compilation,
    /// never to the per-step world refresh. Radii are not scaled.
    pub fn transform(&mut self, matrix: &Mat4) -> Result<(), PipelineError> {
        if self.baked {
            return Err(PipelineError::AlreadyBaked(self.kind()));
        }

        self.shape = match &self.shape {
            CompiledShape::Plane(plane) => CompiledShape::Plane(plane.transformed(matrix)),
            CompiledShape::Sphere(sphere) => CompiledShape::Sphere(sphere.transformed(matrix)),
            CompiledShape::Capsule(capsule) => CompiledShape::Capsule(capsule.transformed(matrix)),
            CompiledShape::Polyhedron(polyhedron) => {
                let mut baked = CompiledPolyhedron::clone(polyhedron);
                baked.apply_transform(matrix);
                CompiledShape::Polyhedron(Arc::new(baked))
            }
        };
        self.baked = true;

        log::debug!("Baked transform into compiled {}", self.kind());
        Ok(())
    }
}

impl From<CompiledPolyhedron> for CompiledPart {
    fn from(polyhedron: CompiledPolyhedron) -> Self {
        Self::polyhedron(polyhedron)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_composition_part_matches_kind() {
        let parts = [
            CompiledPart::plane(Vec3::z(), Vec3::zeros()),
            CompiledPart::sphere(Vec3::zeros(), 1.0),
            CompiledPart::capsule(Vec3::zeros(), Vec3::x(), 0.5),
            CompiledPart::polyhedron(CompiledPolyhedron::cuboid(Vec3::new(1.0, 1.0, 1.0))),
        ];
        for part in &parts {
            assert_eq!(part.to_composition_part().kind(), part.kind());
        }
    }

    #[test]
    fn test_to_composition_part_is_pure() {
        let part = CompiledPart::sphere(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let before = part.clone();
        let _ = part.to_composition_part();
        assert_eq!(part, before);
    }

    #[test]
    fn test_sphere_bake_moves_center() {
        let mut part = CompiledPart::sphere(Vec3::zeros(), 0.5);
        part.transform(&Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0))).unwrap();
        match part.shape() {
            CompiledShape::Sphere(sphere) => {
                assert_relative_eq!(sphere.center, Vec3::y());
                assert_eq!(sphere.radius, 0.5);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_capsule_bake_moves_both_ends() {
        let mut part = CompiledPart::capsule(Vec3::zeros(), Vec3::x(), 0.25);
        part.transform(&Mat4::new_translation(&Vec3::new(0.0, 0.0, 2.0))).unwrap();
        let CompiledShape::Capsule(capsule) = part.shape() else {
            panic!("expected capsule");
        };
        assert_relative_eq!(capsule.p1, Vec3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(capsule.p2, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_second_bake_is_rejected() {
        let mut part = CompiledPart::sphere(Vec3::zeros(), 0.5);
        let matrix = Mat4::new_translation(&Vec3::x());
        assert!(part.transform(&matrix).is_ok());
        assert_eq!(part.transform(&matrix), Err(PipelineError::AlreadyBaked(ShapeKind::Sphere)));

        // The failed bake must not touch the geometry
        let CompiledShape::Sphere(sphere) = part.shape() else {
            panic!("expected sphere");
        };
        assert_relative_eq!(sphere.center, Vec3::x());
    }

    #[test]
    fn test_polyhedron_bake_does_not_affect_existing_parts() {
        let mut compiled = CompiledPart::polyhedron(CompiledPolyhedron::cuboid(Vec3::new(0.5, 0.5, 0.5)));
        let before = compiled.to_composition_part();
        compiled.transform(&Mat4::new_translation(&Vec3::new(0.0, 0.0, 10.0))).unwrap();
        let after = compiled.to_composition_part();

        let (Part::Polyhedron(before), Part::Polyhedron(after)) = (before, after) else {
            panic!("expected polyhedron parts");
        };
        assert_relative_eq!(before.world_vertex(0).z, -0.5);
        assert_relative_eq!(after.world_vertex(0).z, 9.5);
    }
}
