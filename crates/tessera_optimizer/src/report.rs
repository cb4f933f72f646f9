//! What one optimization pass did.

use tessera_core::{ObjectId, TextureId};
use thiserror::Error;

use crate::batch::BatchedMesh;
use crate::error::MergeError;
use crate::instance::InstancedGroup;
use crate::stats::OptimizationStats;

/// Something the optimizer skipped without failing the pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizationWarning {
    #[error("{} objects left unbatched: {error}", .members.len())]
    MergeFailed {
        members: Vec<ObjectId>,
        error: MergeError,
    },
    #[error("{texture} ({width}x{height}) did not fit in the atlas")]
    TextureDropped {
        texture: TextureId,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, Default)]
pub struct OptimizationReport {
    pub stats: OptimizationStats,
    pub batches: Vec<BatchedMesh>,
    pub instances: Vec<InstancedGroup>,
    pub warnings: Vec<OptimizationWarning>,
}

impl OptimizationReport {
    /// `true` when the pass changed nothing in the scene.
    pub fn is_noop(&self) -> bool {
        self.batches.is_empty() && self.instances.is_empty()
    }
}
