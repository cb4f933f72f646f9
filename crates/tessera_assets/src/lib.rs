//! Texture side of the Tessera optimizer.
//!
//! | Module    | Responsibility                                  |
//! |-----------|-------------------------------------------------|
//! | `texture` | `TextureImage`: RGBA8 pixels plus a `TextureId` |
//! | `atlas`   | Shelf packing into one square `TextureAtlas`    |

pub mod atlas;
pub mod error;
pub mod texture;

pub use atlas::{AtlasBuilder, DroppedTexture, Placement, TextureAtlas, UvRect, MAX_ATLAS_SIZE};
pub use error::TextureError;
pub use texture::TextureImage;
