//! GPU instancing: a large group of identical (geometry, material) draws
//! becomes one draw of the shared geometry with a per-instance transform.

use std::sync::Arc;

use glam::Mat4;
use tessera_core::{Geometry, Material, ObjectId, RenderableKind, RenderableObject};

use crate::config::OptimizerConfig;
use crate::grouping::group_by_key;
use crate::instance_buffer::InstanceBuffer;

#[derive(Debug, Clone)]
pub struct InstancedGroup {
    /// Id the instanced object gets when inserted into the scene.
    pub id: ObjectId,
    /// Shared template; not copied.
    pub geometry: Geometry,
    pub material: Material,
    /// `transforms[i]` is the world matrix of `replaces[i]`.
    pub transforms: Arc<[Mat4]>,
    pub replaces: Vec<ObjectId>,
}

impl InstancedGroup {
    pub fn count(&self) -> usize {
        self.transforms.len()
    }

    /// Per-instance matrices packed for upload.
    pub fn instance_buffer(&self, alignment: u32) -> InstanceBuffer {
        InstanceBuffer::new(&self.transforms, alignment)
    }

    pub fn to_object(&self) -> RenderableObject {
        RenderableObject {
            id: self.id,
            name: format!("instanced:{}x{}", self.material.name(), self.count()),
            geometry: self.geometry.clone(),
            material: self.material.clone(),
            transform: Mat4::IDENTITY,
            visible: true,
            kind: RenderableKind::Instanced {
                transforms: Arc::clone(&self.transforms),
                replaces: self.replaces.clone(),
            },
        }
    }
}

pub struct InstanceGrouper {
    config: OptimizerConfig,
}

impl InstanceGrouper {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Plans one instanced draw per group of at least `min_instance_size`
    /// objects.  Template is the first member; instance order is input order.
    pub fn instance(&self, objects: &[&RenderableObject]) -> Vec<InstancedGroup> {
        group_by_key(objects)
            .into_iter()
            .filter(|(_, members)| self.config.instances(members.len()))
            .map(|(key, members)| {
                log::debug!("instance: {} copies of {:?}", members.len(), key);
                let template = members[0];
                InstancedGroup {
                    id: ObjectId::fresh(),
                    geometry: template.geometry.clone(),
                    material: template.material.clone(),
                    transforms: members.iter().map(|o| o.transform).collect(),
                    replaces: members.iter().map(|o| o.id).collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tessera_core::primitives;

    fn spawn(n: usize, g: &Geometry, m: &Material) -> Vec<RenderableObject> {
        (0..n)
            .map(|i| {
                let t = Mat4::from_translation(Vec3::new(i as f32, 0.0, 0.0));
                RenderableObject::new("o", g.clone(), m.clone(), t)
            })
            .collect()
    }

    #[test]
    fn threshold() {
        let g = Geometry::new(primitives::cube(1.0));
        let (m2, m3) = (Material::new("two"), Material::new("three"));
        let mut objs = spawn(2, &g, &m2);
        objs.extend(spawn(3, &g, &m3));
        let refs: Vec<_> = objs.iter().collect();

        let groups = InstanceGrouper::new(&OptimizerConfig::default()).instance(&refs);
        assert_eq!(groups.len(), 1);
        let grp = &groups[0];
        assert_eq!(grp.material, m3);
        assert_eq!(grp.count(), 3);
        assert_eq!(grp.replaces, vec![objs[2].id, objs[3].id, objs[4].id]);
        assert_eq!(grp.transforms[1], objs[3].transform);
    }

    #[test]
    fn template_is_shared_not_copied() {
        let g = Geometry::new(primitives::cube(1.0));
        let m = Material::new("m");
        let objs = spawn(4, &g, &m);
        let refs: Vec<_> = objs.iter().collect();
        let before = g.handle_count();

        let groups = InstanceGrouper::new(&OptimizerConfig::default()).instance(&refs);
        assert_eq!(groups[0].geometry, g);
        assert_eq!(g.handle_count(), before + 1);

        let obj = groups[0].to_object();
        assert_eq!(obj.instance_count(), 4);
        assert_eq!(obj.rendered_vertex_count(), 4 * 24);
    }

    #[test]
    fn buffer_matches_transforms() {
        let g = Geometry::new(primitives::triangle());
        let m = Material::new("m");
        let objs = spawn(3, &g, &m);
        let refs: Vec<_> = objs.iter().collect();
        let groups = InstanceGrouper::new(&OptimizerConfig::default()).instance(&refs);
        let buf = groups[0].instance_buffer(16);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.get(2), Some(objs[2].transform));

        let unaligned = groups[0].instance_buffer(0);
        assert_eq!(unaligned.stride(), 64);
        assert_eq!(unaligned.get(1), Some(objs[1].transform));
    }

    #[test]
    fn disabled() {
        let g = Geometry::new(primitives::triangle());
        let m = Material::new("m");
        let objs = spawn(5, &g, &m);
        let refs: Vec<_> = objs.iter().collect();
        let config = OptimizerConfig::default().with_instancing(false);
        assert!(InstanceGrouper::new(&config).instance(&refs).is_empty());
    }
}
