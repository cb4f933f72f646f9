//! Identity grouping shared by the batcher and the instancer.

use std::collections::HashMap;

use tessera_core::{GeometryId, MaterialId, RenderableObject};

/// Two renderables can share a draw only if they use the very same geometry
/// and the very same material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BatchKey {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

impl BatchKey {
    pub fn of(object: &RenderableObject) -> Self {
        Self {
            geometry: object.geometry.id(),
            material: object.material.id(),
        }
    }
}

/// Groups `objects` by [`BatchKey`].
///
/// Groups come out in order of first appearance and members keep their input
/// order, so the result never depends on hash iteration order.
pub fn group_by_key<'a>(
    objects: &[&'a RenderableObject],
) -> Vec<(BatchKey, Vec<&'a RenderableObject>)> {
    let mut slot: HashMap<BatchKey, usize> = HashMap::new();
    let mut groups: Vec<(BatchKey, Vec<&'a RenderableObject>)> = Vec::new();
    for &object in objects {
        let key = BatchKey::of(object);
        let index = *slot.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[index].1.push(object);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use tessera_core::{primitives, Geometry, Material};

    fn obj(g: &Geometry, m: &Material) -> RenderableObject {
        RenderableObject::new("o", g.clone(), m.clone(), Mat4::IDENTITY)
    }

    #[test]
    fn first_appearance_order() {
        let (g1, g2) = (Geometry::new(primitives::cube(1.0)), Geometry::new(primitives::cube(1.0)));
        let m = Material::new("m");
        let objs = [obj(&g2, &m), obj(&g1, &m), obj(&g2, &m), obj(&g1, &m), obj(&g2, &m)];
        let refs: Vec<_> = objs.iter().collect();

        let groups = group_by_key(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.geometry, g2.id());
        let ids: Vec<_> = groups[0].1.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![objs[0].id, objs[2].id, objs[4].id]);
        assert_eq!(groups[1].1.len(), 2);
    }

    #[test]
    fn equal_data_different_identity() {
        let g = Geometry::new(primitives::quad(1.0, 1.0));
        let (a, b) = (Material::new("same"), Material::new("same"));
        let objs = [obj(&g, &a), obj(&g, &b)];
        let refs: Vec<_> = objs.iter().collect();
        assert_eq!(group_by_key(&refs).len(), 2);
    }
}
