/// Shared, identity-carrying reference to a [`GeometryBuffer`].
///
/// Handles are cheaply cloneable because the buffer is `Arc`-wrapped.
/// Creating a second handle does **not** copy vertex data, and the clone
/// keeps the [`GeometryId`] of the original, which is what the batcher and
/// the instancer group on.
use std::sync::{Arc, Weak};

use super::GeometryBuffer;
use crate::ids::GeometryId;

#[derive(Debug, Clone)]
pub struct Geometry {
    id: GeometryId,
    buffer: Arc<GeometryBuffer>,
}

impl Geometry {
    /// Takes ownership of `buffer` under a brand-new identity.
    pub fn new(buffer: GeometryBuffer) -> Self {
        Self {
            id: GeometryId::fresh(),
            buffer: Arc::new(buffer),
        }
    }

    #[inline]
    pub fn id(&self) -> GeometryId {
        self.id
    }

    #[inline]
    pub fn buffer(&self) -> &GeometryBuffer {
        &self.buffer
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.buffer.vertex_count()
    }

    /// Weak reference to the underlying buffer; lets callers observe when the
    /// last owning handle has been dropped.
    pub fn downgrade(&self) -> Weak<GeometryBuffer> {
        Arc::downgrade(&self.buffer)
    }

    /// Number of live handles (clones) sharing this buffer.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.buffer)
    }
}

impl PartialEq for Geometry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Geometry {}

impl From<GeometryBuffer> for Geometry {
    fn from(buffer: GeometryBuffer) -> Self {
        Self::new(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_not_value() {
        let data = GeometryBuffer::from_positions(vec![0.0; 9]).unwrap();
        let a = Geometry::new(data.clone());
        let b = Geometry::new(data);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn weak_reference_tracks_last_handle() {
        let g = Geometry::new(GeometryBuffer::from_positions(vec![0.0; 3]).unwrap());
        let weak = g.downgrade();
        let clone = g.clone();
        assert_eq!(g.handle_count(), 2);
        drop(g);
        assert!(weak.upgrade().is_some());
        drop(clone);
        assert!(weak.upgrade().is_none());
    }
}
