//! Primitive collision shapes
//!
//! Plain value types for planes, spheres and capsules. They carry no notion of
//! local versus world space; [`super::part`] decides which copy is which.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// An infinite plane described by a unit normal and a point on the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing out of the solid half-space
    pub normal: Vec3,
    /// Any point on the plane
    pub p: Vec3,
}

impl Plane {
    /// Creates a plane, normalizing the given normal
    pub fn new(normal: Vec3, p: Vec3) -> Self {
        debug_assert!(normal.magnitude_squared() > 0.0, "plane normal must be non-zero");
        Self {
            normal: normal.normalize(),
            p,
        }
    }

    /// Plane offset along its normal (`dot(normal, p)`)
    pub fn offset(&self) -> f32 {
        self.normal.dot(&self.p)
    }

    /// Signed distance from the plane to a point, positive on the normal side
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.offset()
    }

    /// Orthogonal projection of a point onto the plane
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        point - self.normal * self.distance_to(point)
    }

    /// The same plane pushed `distance` units along its normal
    pub fn offset_by(&self, distance: f32) -> Self {
        Self {
            normal: self.normal,
            p: self.p + self.normal * distance,
        }
    }

    /// Transform the plane by a matrix
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            normal: matrix.transform_normal(&self.normal),
            p: matrix.transform_position(&self.p),
        }
    }
}

/// A sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center position
    pub center: Vec3,
    /// Radius, never negative
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "sphere radius must not be negative");
        Self { center, radius }
    }

    /// Transform the center by a matrix. The radius is left unscaled.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            center: matrix.transform_position(&self.center),
            radius: self.radius,
        }
    }
}

/// A capsule: every point within `radius` of the segment `p1..p2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// First segment endpoint
    pub p1: Vec3,
    /// Second segment endpoint
    pub p2: Vec3,
    /// Radius, never negative
    pub radius: f32,
}

impl Capsule {
    /// Creates a new capsule
    pub fn new(p1: Vec3, p2: Vec3, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "capsule radius must not be negative");
        Self { p1, p2, radius }
    }

    /// Endpoint spheres, one per segment end
    pub fn end_spheres(&self) -> [Sphere; 2] {
        [
            Sphere::new(self.p1, self.radius),
            Sphere::new(self.p2, self.radius),
        ]
    }

    /// Transform both endpoints by a matrix. The radius is left unscaled.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            p1: matrix.transform_position(&self.p1),
            p2: matrix.transform_position(&self.p2),
            radius: self.radius,
        }
    }
}
