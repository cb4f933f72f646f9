//! `tessera_optimizer`: cuts draw calls in a scene snapshot, reversibly.
//!
//! | Module            | Responsibility                                          |
//! |-------------------|---------------------------------------------------------|
//! | `config`          | `OptimizerConfig`, TOML loading and validation          |
//! | `grouping`        | `BatchKey`, stable (geometry, material) grouping        |
//! | `merge`           | `GeometryMerger`: transform baking, buffer concatenation |
//! | `batch`           | `MeshBatcher` → `BatchedMesh`                           |
//! | `instance`        | `InstanceGrouper` → `InstancedGroup`                    |
//! | `instance_buffer` | `InstanceBuffer`: per-instance matrices as bytes        |
//! | `stats`           | `DrawStats`, `OptimizationStats`                        |
//! | `report`          | `OptimizationReport`, `OptimizationWarning`             |
//! | `controller`      | `MeshOptimizer`: optimize / restore / atlas             |
//!
//! # Quick start
//! ```rust,ignore
//! use tessera_optimizer::{MeshOptimizer, Scene};
//!
//! let mut optimizer = MeshOptimizer::new(scene);
//! let report = optimizer.optimize_all();
//! log::info!("{} -> {}", report.stats.before, report.stats.after);
//!
//! optimizer.restore_original_meshes();
//! ```

pub mod batch;
pub mod config;
pub mod controller;
pub mod error;
pub mod grouping;
pub mod instance;
pub mod instance_buffer;
pub mod merge;
pub mod report;
pub mod stats;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use tessera_assets::{AtlasBuilder, TextureAtlas, TextureImage, UvRect};
pub use tessera_core::{
    glam, primitives, Geometry, GeometryBuffer, Material, ObjectId, RenderableKind,
    RenderableObject, Scene, Transform, Vertex,
};

pub use batch::{BatchFailure, BatchOutcome, BatchedMesh, MeshBatcher};
pub use config::OptimizerConfig;
pub use controller::{MeshOptimizer, OptimizerState};
pub use error::{ConfigError, MergeError};
pub use grouping::BatchKey;
pub use instance::{InstanceGrouper, InstancedGroup};
pub use instance_buffer::{InstanceBuffer, InstanceRaw, MAX_STRIDE_ALIGNMENT};
pub use merge::GeometryMerger;
pub use report::{OptimizationReport, OptimizationWarning};
pub use stats::{DrawStats, OptimizationStats};
