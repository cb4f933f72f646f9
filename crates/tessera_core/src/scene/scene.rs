//! Scene snapshot: the container the optimizer works on.
//!
//! `Scene` keeps its objects in a `BTreeMap` keyed by [`ObjectId`].  Ids are
//! handed out by a monotonically increasing counter, so iteration follows
//! creation order.  Grouping and instancing rely on that: "input order" is
//! always the order in which objects were added.
//!
//! # Quick start
//! ```rust,ignore
//! use tessera_core::{primitives, Geometry, Material, Scene};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let cube = Geometry::new(primitives::cube(1.0));
//! let stone = Material::new("stone");
//!
//! let id = scene.spawn("Crate", cube.clone(), stone.clone())
//!     .with_position(Vec3::new(0.0, 0.5, 0.0))
//!     .build();
//!
//! scene.set_visible(id, false);
//! scene.remove(id);
//! ```

use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec3};

use super::object::RenderableObject;
use crate::geometry::Geometry;
use crate::ids::ObjectId;
use crate::material::Material;
use crate::transform::Transform;

// ─── Spawn builder ─────────────────────────────────────────────────────────

/// Fluent builder returned by [`Scene::spawn`].
///
/// Call `.build()` to insert the object and receive its [`ObjectId`].
pub struct SpawnBuilder<'a> {
    scene: &'a mut Scene,
    object: RenderableObject,
    transform: Transform,
    matrix: Option<Mat4>,
}

impl<'a> SpawnBuilder<'a> {
    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.transform.position = pos;
        self
    }

    pub fn with_rotation(mut self, rot: Quat) -> Self {
        self.transform.rotation = rot;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_transform(mut self, t: Transform) -> Self {
        self.transform = t;
        self
    }

    /// Uses `matrix` verbatim; overrides any TRS set on the builder.
    pub fn with_matrix(mut self, matrix: Mat4) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn invisible(mut self) -> Self {
        self.object.visible = false;
        self
    }

    /// Finalise the builder, insert the object, and return its id.
    pub fn build(mut self) -> ObjectId {
        self.object.transform = self.matrix.unwrap_or_else(|| self.transform.matrix());
        self.scene.insert(self.object)
    }
}

// ─── Scene ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, RenderableObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Insertion / removal ────────────────────────────────────────────────

    /// Begin building a new object drawing `geometry` with `material`.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        geometry: Geometry,
        material: Material,
    ) -> SpawnBuilder<'_> {
        SpawnBuilder {
            object: RenderableObject::new(name, geometry, material, Mat4::IDENTITY),
            scene: self,
            transform: Transform::IDENTITY,
            matrix: None,
        }
    }

    /// Inserts an already-built object, replacing any object with the same id.
    pub fn insert(&mut self, object: RenderableObject) -> ObjectId {
        let id = object.id;
        if self.objects.insert(id, object).is_some() {
            log::debug!("scene: replaced existing {id}");
        }
        id
    }

    /// Remove the object from the scene and hand it back.
    pub fn remove(&mut self, id: ObjectId) -> Option<RenderableObject> {
        self.objects.remove(&id)
    }

    // ── Visibility ─────────────────────────────────────────────────────────

    /// Returns `false` if the id is unknown.
    pub fn set_visible(&mut self, id: ObjectId, visible: bool) -> bool {
        match self.objects.get_mut(&id) {
            Some(o) => {
                o.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.objects.get(&id).is_some_and(|o| o.visible)
    }

    // ── Raw access ─────────────────────────────────────────────────────────

    pub fn get(&self, id: ObjectId) -> Option<&RenderableObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut RenderableObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    // ── Iteration ──────────────────────────────────────────────────────────

    /// All objects in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderableObject> {
        self.objects.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RenderableObject> {
        self.objects.values_mut()
    }

    /// Objects that currently produce a draw call, in creation order.
    pub fn visible(&self) -> impl Iterator<Item = &RenderableObject> {
        self.objects.values().filter(|o| o.visible)
    }

    pub fn visible_ids(&self) -> Vec<ObjectId> {
        self.visible().map(|o| o.id).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives;

    fn handles() -> (Geometry, Material) {
        (Geometry::new(primitives::cube(1.0)), Material::new("m"))
    }

    #[test]
    fn spawn_and_remove() {
        let (g, m) = handles();
        let mut s = Scene::new();
        let id = s.spawn("A", g, m).build();
        assert!(s.contains(id));
        assert_eq!(s.len(), 1);
        assert!(s.remove(id).is_some());
        assert!(!s.contains(id));
        assert!(s.is_empty());
    }

    #[test]
    fn builder_composes_trs() {
        let (g, m) = handles();
        let mut s = Scene::new();
        let id = s
            .spawn("B", g, m)
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::splat(2.0))
            .build();
        let p = s.get(id).unwrap().transform.transform_point3(Vec3::ONE);
        assert!(p.abs_diff_eq(Vec3::new(3.0, 4.0, 5.0), 1e-5));
    }

    #[test]
    fn explicit_matrix_wins() {
        let (g, m) = handles();
        let mut s = Scene::new();
        let mat = Mat4::from_translation(Vec3::X);
        let id = s
            .spawn("C", g, m)
            .with_position(Vec3::splat(9.0))
            .with_matrix(mat)
            .build();
        assert_eq!(s.get(id).unwrap().transform, mat);
    }

    #[test]
    fn iteration_follows_creation_order() {
        let (g, m) = handles();
        let mut s = Scene::new();
        let ids: Vec<_> = (0..5)
            .map(|i| s.spawn(format!("o{i}"), g.clone(), m.clone()).build())
            .collect();
        let seen: Vec<_> = s.iter().map(|o| o.id).collect();
        assert_eq!(seen, ids);
    }

    #[test]
    fn visibility() {
        let (g, m) = handles();
        let mut s = Scene::new();
        let a = s.spawn("A", g.clone(), m.clone()).build();
        let b = s.spawn("B", g, m).invisible().build();
        assert_eq!(s.visible_ids(), vec![a]);
        assert!(s.set_visible(b, true));
        assert!(s.is_visible(b));
        assert!(!s.set_visible(ObjectId::fresh(), true));
    }
}
