/// Axis-aligned bounding boxes for geometry and merged batches.
///
/// Merged buffers live in world space, so the front-end usually wants their
/// bounds for its own culling; instanced groups need the template bounds
/// transformed by each instance matrix.
use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.  An empty box has `min > max`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Box containing nothing; the identity for [`Aabb::union`].
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Creates an AABB from `min`/`max` corners.
    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`; [`Aabb::EMPTY`] for no points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns a new AABB enclosing this box after `transform`.
    ///
    /// Transforms centre + half-extents (Arvo 1990) instead of the 8 corners.
    pub fn transform(&self, transform: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let centre = (self.min + self.max) * 0.5;
        let half = (self.max - self.min) * 0.5;

        let new_centre = transform.transform_point3(centre);

        // Absolute-value of upper-left 3×3 rotates the half-extents.
        let m = transform.to_cols_array_2d();
        let new_half = Vec3::new(
            half.x * m[0][0].abs() + half.y * m[1][0].abs() + half.z * m[2][0].abs(),
            half.x * m[0][1].abs() + half.y * m[1][1].abs() + half.z * m[2][1].abs(),
            half.x * m[0][2].abs() + half.y * m[1][2].abs() + half.z * m[2][2].abs(),
        );

        Self {
            min: new_centre - new_half,
            max: new_centre + new_half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_and_empty() {
        assert!(Aabb::from_points(std::iter::empty()).is_empty());
        let b = Aabb::from_points([Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 0.5)]);
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn transform_translates_and_scales() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let m = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let t = b.transform(&m);
        assert!(t.min.abs_diff_eq(Vec3::new(8.0, -2.0, -2.0), 1e-5));
        assert!(t.max.abs_diff_eq(Vec3::new(12.0, 2.0, 2.0), 1e-5));
    }

    #[test]
    fn union_with_empty_is_identity() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(b.union(&Aabb::EMPTY), b);
    }
}
