//! `tessera_core`: the scene snapshot the optimizer reads and rewrites.
//!
//! | Module      | Responsibility                                            |
//! |-------------|-----------------------------------------------------------|
//! | `ids`       | Opaque identity tokens for objects, geometry, materials   |
//! | `transform` | TRS `Transform`, normal matrix                            |
//! | `geometry`  | `GeometryBuffer`, `Geometry` handle, `Vertex`, primitives |
//! | `material`  | `Material` identity token                                 |
//! | `scene`     | `Scene`, `RenderableObject`, `RenderableKind`             |

pub mod error;
pub mod geometry;
pub mod ids;
pub mod material;
pub mod scene;
pub mod transform;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use glam;

pub use error::GeometryError;
pub use geometry::{primitives, Aabb, Geometry, GeometryBuffer, Vertex};
pub use ids::{GeometryId, MaterialId, ObjectId, TextureId};
pub use material::Material;
pub use scene::{RenderableKind, RenderableObject, Scene, SpawnBuilder};
pub use transform::{normal_matrix, Transform};
