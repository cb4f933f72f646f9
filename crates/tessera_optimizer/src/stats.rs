//! Draw-call and vertex accounting.

use std::fmt;

use tessera_core::{RenderableKind, Scene};

/// What the visible part of a scene costs to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub draw_calls: usize,
    /// Vertices processed per frame; an instanced object counts its geometry
    /// once per instance.
    pub vertices: usize,
}

impl DrawStats {
    pub fn of(scene: &Scene) -> Self {
        scene.visible().fold(Self::default(), |acc, object| {
            let vertices = match &object.kind {
                RenderableKind::Individual | RenderableKind::Batched { .. } => {
                    object.geometry.vertex_count()
                }
                RenderableKind::Instanced { transforms, .. } => {
                    object.geometry.vertex_count() * transforms.len()
                }
            };
            Self {
                draw_calls: acc.draw_calls + 1,
                vertices: acc.vertices + vertices,
            }
        })
    }
}

impl fmt::Display for DrawStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} draws / {} vertices", self.draw_calls, self.vertices)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizationStats {
    pub before: DrawStats,
    pub after: DrawStats,
    /// Merged meshes added to the scene.
    pub batched_meshes: usize,
    /// Originals hidden behind a merged mesh.
    pub batched_objects: usize,
    /// Instanced objects added to the scene.
    pub instance_groups: usize,
    /// Originals hidden behind an instanced object.
    pub instanced_objects: usize,
    /// Estimated bytes of GPU memory saved by the last atlas.
    pub texture_memory_saved: u64,
}

impl OptimizationStats {
    pub fn draw_calls_saved(&self) -> usize {
        self.before.draw_calls.saturating_sub(self.after.draw_calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use tessera_core::{primitives, Geometry, Material, ObjectId, RenderableObject};

    #[test]
    fn counts_visible_only() {
        let g = Geometry::new(primitives::cube(1.0));
        let m = Material::new("m");
        let mut scene = Scene::new();
        scene.spawn("a", g.clone(), m.clone()).build();
        scene.spawn("b", g.clone(), m.clone()).invisible().build();

        let mut inst = RenderableObject::new("i", g, m, Mat4::IDENTITY);
        inst.kind = RenderableKind::Instanced {
            transforms: vec![Mat4::IDENTITY; 5].into(),
            replaces: (0..5).map(|_| ObjectId::fresh()).collect(),
        };
        scene.insert(inst);

        let s = DrawStats::of(&scene);
        assert_eq!(s, DrawStats { draw_calls: 2, vertices: 24 + 5 * 24 });
    }

    #[test]
    fn empty_scene() {
        assert_eq!(DrawStats::of(&Scene::new()), DrawStats::default());
    }
}
