//! World-space transform: position, rotation (quaternion), scale.
//!
//! Renderables store a raw `Mat4` because the optimizer only ever needs the
//! composed matrix.  `Transform` is the friendlier way to build one, and
//! [`normal_matrix`] derives what the merger applies to normals.

use glam::{Mat3, Mat4, Quat, Vec3};

/// TRS transform used to place renderables.
///
/// # Example
/// ```rust,ignore
/// use tessera_core::Transform;
/// use glam::Vec3;
///
/// let t = Transform::from_position(Vec3::new(1.0, 0.0, 0.0)).with_uniform_scale(2.0);
/// let m = t.matrix();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub rotation: Quat,
    /// Non-uniform scale factor.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, no rotation, uniform scale 1.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Construct with a world-space position, identity rotation and scale.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Decompose an affine matrix.  Shear is lost.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, s: f32) -> Self {
        self.with_scale(Vec3::splat(s))
    }

    /// Build the TRS model matrix (`T * R * S`).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl From<Transform> for Mat4 {
    fn from(t: Transform) -> Self {
        t.matrix()
    }
}

/// Matrix that carries object-space normals into world space.
///
/// This is the inverse transpose of the upper-left 3×3.  For rotations and
/// uniform scale it matches the plain 3×3 up to length, which callers remove
/// by normalising.  A singular matrix falls back to the plain 3×3.
pub fn normal_matrix(matrix: &Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(*matrix);
    if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_matrix() {
        let t = Transform::default();
        assert!(t.matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn translation_only() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn matrix_decomposition_roundtrip() {
        let t = Transform::from_position(Vec3::new(-4.0, 0.5, 9.0))
            .with_rotation(Quat::from_rotation_y(0.7))
            .with_uniform_scale(3.0);
        let back = Transform::from_matrix(t.matrix());
        assert!(back.position.abs_diff_eq(t.position, 1e-4));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-4));
        let probe = Vec3::new(1.0, 2.0, 3.0);
        assert!((back.rotation * probe).abs_diff_eq(t.rotation * probe, 1e-4));
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_non_uniform_scale() {
        let m = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
        // plane x + y = 0 with normal (1, 1, 0)/sqrt(2); tangent (1, -1, 0)
        let tangent = m.transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        let normal = (normal_matrix(&m) * Vec3::new(1.0, 1.0, 0.0)).normalize();
        assert!(tangent.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn singular_matrix_falls_back_to_linear_part() {
        let m = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(normal_matrix(&m), Mat3::from_mat4(m));
    }
}
