//! Rigid body definitions
//!
//! A [`RigidBodyModel`] is the immutable, shareable description of a body:
//! its mass properties plus one material per compiled collision part.

use thiserror::Error;

use crate::physics::collision::Part;
use super::{CompiledPart, MassProperties, Material};

/// Rigid body model construction errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// The part and material arrays must pair up one to one
    #[error("The count of supplied parts ({parts}) and materials ({materials}) do not match")]
    PartMaterialMismatch {
        /// Number of compiled parts supplied
        parts: usize,
        /// Number of materials supplied
        materials: usize,
    },
}

/// Immutable rigid body definition
#[derive(Debug, Clone)]
pub struct RigidBodyModel {
    mass: MassProperties,
    parts: Vec<CompiledPart>,
    materials: Vec<Material>,
}

impl RigidBodyModel {
    /// Bind mass properties to compiled parts and their materials.
    ///
    /// `parts[i]` uses `materials[i]`; the lengths must match.
    pub fn new(
        mass: MassProperties,
        parts: Vec<CompiledPart>,
        materials: Vec<Material>,
    ) -> Result<Self, ModelError> {
        if parts.len() != materials.len() {
            return Err(ModelError::PartMaterialMismatch {
                parts: parts.len(),
                materials: materials.len(),
            });
        }

        Ok(Self { mass, parts, materials })
    }

    /// Build a model where every part uses the same material
    pub fn with_uniform_material(
        mass: MassProperties,
        parts: Vec<CompiledPart>,
        material: Material,
    ) -> Self {
        let materials = vec![material; parts.len()];
        Self { mass, parts, materials }
    }

    /// Mass properties
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass
    }

    /// Compiled parts
    pub fn parts(&self) -> &[CompiledPart] {
        &self.parts
    }

    /// Materials, parallel to [`Self::parts`]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Iterate over `(part, material)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&CompiledPart, &Material)> {
        self.parts.iter().zip(self.materials.iter())
    }

    /// Fresh runtime parts for one body instance
    pub fn to_composition_parts(&self) -> Vec<Part> {
        self.parts.iter().map(CompiledPart::to_composition_part).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn parts(count: usize) -> Vec<CompiledPart> {
        (0..count)
            .map(|i| CompiledPart::sphere(Vec3::new(i as f32, 0.0, 0.0), 0.5))
            .collect()
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let result = RigidBodyModel::new(
            MassProperties::solid_sphere(1.0, 1.0),
            parts(3),
            vec![Material::default(); 2],
        );
        assert_eq!(
            result.unwrap_err(),
            ModelError::PartMaterialMismatch { parts: 3, materials: 2 }
        );
    }

    #[test]
    fn test_matching_lengths_succeed() {
        let rubber = Material::new(0.9, 0.8);
        let model = RigidBodyModel::new(
            MassProperties::solid_sphere(1.0, 1.0),
            parts(3),
            vec![Material::default(), rubber, Material::default()],
        )
        .unwrap();

        assert_eq!(model.parts().len(), 3);
        assert_eq!(model.materials().len(), 3);
        assert_eq!(model.iter().nth(1).map(|(_, m)| *m), Some(rubber));
        assert_eq!(model.mass_properties().mass, 1.0);
    }

    #[test]
    fn test_composition_parts() {
        let model = RigidBodyModel::with_uniform_material(
            MassProperties::solid_sphere(2.0, 0.5),
            parts(2),
            Material::default(),
        );
        let runtime = model.to_composition_parts();
        assert_eq!(runtime.len(), 2);
        assert_eq!(model.materials().len(), 2);
    }
}
