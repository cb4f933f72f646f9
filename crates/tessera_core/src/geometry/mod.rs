//! Geometry storage and helpers.
//!
//! | Module       | Responsibility                                          |
//! |--------------|---------------------------------------------------------|
//! | `buffer`     | Validated, immutable `GeometryBuffer`                   |
//! | `handle`     | `Geometry`: shared buffer + identity token              |
//! | `vertex`     | Interleaved `Vertex` for byte-level upload              |
//! | `aabb`       | Bounding boxes                                          |
//! | `primitives` | Cube / quad / triangle generators                       |

pub mod aabb;
pub mod buffer;
pub mod handle;
pub mod primitives;
pub mod vertex;

pub use aabb::Aabb;
pub use buffer::GeometryBuffer;
pub use handle::Geometry;
pub use vertex::Vertex;
