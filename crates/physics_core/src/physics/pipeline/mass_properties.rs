//! Mass, center of mass and inertia of a rigid body

use crate::foundation::math::{Mat3, Vec3};

/// Mass properties consumed by the integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Total mass
    pub mass: f32,
    /// Center of mass in body space
    pub center_of_mass: Vec3,
    /// Inertia tensor about the center of mass, body space
    pub inertia: Mat3,
}

impl MassProperties {
    /// Creates mass properties from explicit values
    pub fn new(mass: f32, center_of_mass: Vec3, inertia: Mat3) -> Self {
        debug_assert!(mass > 0.0, "mass must be positive");
        Self { mass, center_of_mass, inertia }
    }

    /// Mass properties of an immovable body: infinite mass and inertia
    pub fn immovable() -> Self {
        Self {
            mass: f32::INFINITY,
            center_of_mass: Vec3::zeros(),
            inertia: Mat3::from_diagonal_element(f32::INFINITY),
        }
    }

    /// Solid sphere of uniform density centered on the origin
    pub fn solid_sphere(mass: f32, radius: f32) -> Self {
        let i = 0.4 * mass * radius * radius;
        Self::new(mass, Vec3::zeros(), Mat3::from_diagonal_element(i))
    }

    /// Solid box of uniform density centered on the origin
    pub fn solid_cuboid(mass: f32, half_extents: Vec3) -> Self {
        let size = half_extents * 2.0;
        let (x2, y2, z2) = (size.x * size.x, size.y * size.y, size.z * size.z);
        let k = mass / 12.0;
        let inertia = Mat3::from_diagonal(&Vec3::new(k * (y2 + z2), k * (x2 + z2), k * (x2 + y2)));
        Self::new(mass, Vec3::zeros(), inertia)
    }

    /// Inverse mass; zero for immovable bodies
    pub fn inverse_mass(&self) -> f32 {
        if self.mass.is_finite() { 1.0 / self.mass } else { 0.0 }
    }

    /// Inverse inertia tensor; zero for immovable or singular tensors
    pub fn inverse_inertia(&self) -> Mat3 {
        if !self.mass.is_finite() {
            return Mat3::zeros();
        }
        self.inertia.try_inverse().unwrap_or_else(Mat3::zeros)
    }
}
