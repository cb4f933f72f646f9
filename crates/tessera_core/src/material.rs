//! Material identity tokens.
//!
//! The optimizer never looks inside a material; it only needs to know
//! whether two renderables use *the same* one.  Two materials built with the
//! same name are still different materials.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::ids::{MaterialId, TextureId};

#[derive(Clone)]
pub struct Material {
    id: MaterialId,
    name: Arc<str>,
    texture: Option<TextureId>,
}

impl Material {
    /// Creates a material with a fresh identity.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: MaterialId::fresh(),
            name: name.into(),
            texture: None,
        }
    }

    /// Records the texture this material samples, so a front-end can find
    /// its rectangle in a packed atlas.  Keeps the identity.
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    #[inline]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Material {}

impl Hash for Material {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Material({} {:?})", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_names_are_different_materials() {
        let a = Material::new("brick");
        let b = Material::new("brick");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn texture_link_keeps_identity() {
        let a = Material::new("wood");
        let id = a.id();
        let tex = TextureId::fresh();
        let a = a.with_texture(tex);
        assert_eq!(a.id(), id);
        assert_eq!(a.texture(), Some(tex));
    }
}
