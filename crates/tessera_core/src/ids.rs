//! Opaque identity tokens.
//!
//! Geometry and materials are grouped by *identity*, never by value: two
//! buffers holding the same numbers are still different geometry unless one
//! handle was cloned from the other.  Every token below is drawn from one
//! process-wide counter, which also makes ids creation-ordered.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ─── ID generation ─────────────────────────────────────────────────────────

static ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

// ─── Token types ───────────────────────────────────────────────────────────

macro_rules! identity_token {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Allocates a token that compares unequal to every other token
            /// allocated so far.
            pub fn fresh() -> Self {
                Self(next_id())
            }

            /// Raw numeric value, stable for the lifetime of the process.
            #[inline]
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

identity_token!(
    /// Stable identifier of a [`RenderableObject`](crate::scene::RenderableObject).
    ObjectId,
    "object"
);
identity_token!(
    /// Identity of a shared [`Geometry`](crate::geometry::Geometry) handle.
    GeometryId,
    "geometry"
);
identity_token!(
    /// Identity of a [`Material`](crate::material::Material).
    MaterialId,
    "material"
);
identity_token!(
    /// Identity of a source texture fed to the atlas builder.
    TextureId,
    "texture"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tokens_are_distinct_and_ordered() {
        let a = ObjectId::fresh();
        let b = ObjectId::fresh();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn copies_keep_identity() {
        let m = MaterialId::fresh();
        let copy = m;
        assert_eq!(m, copy);
        assert_eq!(m.raw(), copy.raw());
    }

    #[test]
    fn display_carries_kind() {
        let t = TextureId::fresh();
        assert!(t.to_string().starts_with("texture#"));
    }
}
