//! Surface materials

use serde::{Deserialize, Serialize};

/// Surface response of one compiled part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Restitution (bounciness), 0 = inelastic, 1 = perfectly elastic
    pub restitution: f32,
}

impl Material {
    /// Creates a material
    pub fn new(friction: f32, restitution: f32) -> Self {
        debug_assert!(friction >= 0.0, "friction must not be negative");
        debug_assert!((0.0..=1.0).contains(&restitution), "restitution must be in [0, 1]");
        Self { friction, restitution }
    }

    /// Material values for a touching pair: geometric mean of the frictions,
    /// larger of the restitutions
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(0.5, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_combine() {
        let rubber = Material::new(0.9, 0.8);
        let ice = Material::new(0.1, 0.1);
        let combined = rubber.combine(&ice);
        assert_relative_eq!(combined.friction, 0.3, epsilon = 1e-6);
        assert_relative_eq!(combined.restitution, 0.8);
        assert_eq!(combined, ice.combine(&rubber));
    }
}
