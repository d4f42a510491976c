//! Math utilities and types
//!
//! Provides the fundamental math types used by the collision core.

pub use nalgebra::{Matrix3, Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Tolerance used by contact emission and edge-direction deduplication
pub const EPSILON: f32 = 1e-5;

/// Extension trait for Mat4 with the transforms the collision code needs
pub trait Mat4Ext {
    /// Transform a position (translation applied)
    fn transform_position(&self, position: &Vec3) -> Vec3;

    /// Transform a surface normal and renormalize it.
    ///
    /// Uses the inverse transpose of the linear part so non-uniform scale
    /// keeps normals perpendicular to their surface.
    fn transform_normal(&self, normal: &Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_position(&self, position: &Vec3) -> Vec3 {
        self.transform_point(&Point3::from(*position)).coords
    }

    fn transform_normal(&self, normal: &Vec3) -> Vec3 {
        let linear: Mat3 = self.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map_or(linear, |inverse| inverse.transpose());
        (normal_matrix * normal).normalize()
    }
}

/// Returns true when two unit directions are parallel or anti-parallel
pub fn is_parallel(a: &Vec3, b: &Vec3) -> bool {
    (a.dot(b).abs() - 1.0).abs() < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_position_applies_translation() {
        let matrix = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let moved = matrix.transform_position(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Vec3::new(2.0, 2.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_transform_normal_ignores_translation() {
        let matrix = Mat4::new_translation(&Vec3::new(5.0, 5.0, 5.0));
        let normal = matrix.transform_normal(&Vec3::z());
        assert_relative_eq!(normal, Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_transform_normal_under_non_uniform_scale() {
        // Plane x + y = 0 squashed along x: normal must tilt towards x
        let matrix = Mat4::new_nonuniform_scaling(&Vec3::new(0.5, 1.0, 1.0));
        let normal = matrix.transform_normal(&Vec3::new(1.0, 1.0, 0.0).normalize());
        let expected = Vec3::new(2.0, 1.0, 0.0).normalize();
        assert_relative_eq!(normal, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_is_parallel() {
        let x = Vec3::x();
        assert!(is_parallel(&x, &x));
        assert!(is_parallel(&x, &-x));
        assert!(!is_parallel(&x, &Vec3::y()));
    }
}
