/// A drawable entry of the scene snapshot.
///
/// ## Kinds
///
/// Objects imported from the front-end are `Individual`.  The optimizer adds
/// `Batched` and `Instanced` objects that stand in for several hidden
/// individuals; they remember which ids they replace so that draw-call and
/// vertex statistics, and the restore path, are one exhaustive `match`
/// instead of runtime type checks.
use std::sync::Arc;

use glam::Mat4;

use crate::geometry::{Aabb, Geometry};
use crate::ids::ObjectId;
use crate::material::Material;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderableKind {
    /// One geometry drawn once with `transform`.
    Individual,
    /// Geometry already baked to world space; `transform` is the identity.
    Batched { replaces: Vec<ObjectId> },
    /// One geometry drawn once per entry of `transforms`, in `replaces` order.
    Instanced {
        transforms: Arc<[Mat4]>,
        replaces: Vec<ObjectId>,
    },
}

impl Default for RenderableKind {
    fn default() -> Self {
        RenderableKind::Individual
    }
}

#[derive(Debug, Clone)]
pub struct RenderableObject {
    /// Unique, stable identifier (mirrors the scene map key for convenience).
    pub id: ObjectId,
    /// Human-readable label.
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    /// Object-to-world matrix (column-major).
    pub transform: Mat4,
    /// Whether the object currently produces a draw call.
    pub visible: bool,
    pub kind: RenderableKind,
}

impl RenderableObject {
    /// Visible `Individual` object with a fresh id.
    pub fn new(
        name: impl Into<String>,
        geometry: Geometry,
        material: Material,
        transform: Mat4,
    ) -> Self {
        Self {
            id: ObjectId::fresh(),
            name: name.into(),
            geometry,
            material,
            transform,
            visible: true,
            kind: RenderableKind::Individual,
        }
    }

    /// `true` for objects the optimizer introduced.
    pub fn is_synthetic(&self) -> bool {
        !matches!(self.kind, RenderableKind::Individual)
    }

    /// How many copies of the geometry one draw of this object emits.
    pub fn instance_count(&self) -> usize {
        match &self.kind {
            RenderableKind::Individual | RenderableKind::Batched { .. } => 1,
            RenderableKind::Instanced { transforms, .. } => transforms.len(),
        }
    }

    /// Vertices processed when this object is drawn.
    pub fn rendered_vertex_count(&self) -> usize {
        self.geometry.vertex_count() * self.instance_count()
    }

    /// Original ids this object stands in for (empty for individuals).
    pub fn replaces(&self) -> &[ObjectId] {
        match &self.kind {
            RenderableKind::Individual => &[],
            RenderableKind::Batched { replaces } | RenderableKind::Instanced { replaces, .. } => {
                replaces
            }
        }
    }

    /// World-space bounds of everything this object draws.
    pub fn world_bounds(&self) -> Aabb {
        let local = self.geometry.buffer().bounds();
        match &self.kind {
            RenderableKind::Individual | RenderableKind::Batched { .. } => {
                local.transform(&self.transform)
            }
            RenderableKind::Instanced { transforms, .. } => transforms
                .iter()
                .map(|m| local.transform(&(self.transform * *m)))
                .fold(Aabb::EMPTY, |acc, b| acc.union(&b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;
    use glam::Vec3;

    #[test]
    fn counts_per_kind() {
        let g = Geometry::new(primitives::cube(1.0));
        let mut o = RenderableObject::new("c", g, Material::new("m"), Mat4::IDENTITY);
        assert!(!o.is_synthetic());
        assert_eq!(o.rendered_vertex_count(), 24);
        assert!(o.replaces().is_empty());

        let a = ObjectId::fresh();
        let b = ObjectId::fresh();
        o.kind = RenderableKind::Instanced {
            transforms: vec![Mat4::IDENTITY; 2].into(),
            replaces: vec![a, b],
        };
        assert!(o.is_synthetic());
        assert_eq!(o.instance_count(), 2);
        assert_eq!(o.rendered_vertex_count(), 48);
        assert_eq!(o.replaces(), &[a, b]);
    }

    #[test]
    fn instanced_bounds_cover_every_instance() {
        let g = Geometry::new(primitives::cube(2.0));
        let mut o = RenderableObject::new("c", g, Material::new("m"), Mat4::IDENTITY);
        o.kind = RenderableKind::Instanced {
            transforms: vec![
                Mat4::from_translation(Vec3::new(-5.0, 0.0, 0.0)),
                Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)),
            ]
            .into(),
            replaces: vec![ObjectId::fresh(), ObjectId::fresh()],
        };
        let b = o.world_bounds();
        assert!(b.min.abs_diff_eq(Vec3::new(-6.0, -1.0, -1.0), 1e-5));
        assert!(b.max.abs_diff_eq(Vec3::new(6.0, 1.0, 1.0), 1e-5));
    }
}
