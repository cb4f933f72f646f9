//! Renderable scene snapshot.

pub mod object;
#[allow(clippy::module_inception)]
pub mod scene;

pub use object::{RenderableKind, RenderableObject};
pub use scene::{Scene, SpawnBuilder};
