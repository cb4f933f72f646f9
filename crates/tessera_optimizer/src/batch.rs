//! Static batching: many small draws of one (geometry, material) pair become
//! one draw of a merged, world-space buffer.
//!
//! The batcher only plans.  It never touches the scene; the controller hides
//! the members and inserts the merged object.

use glam::Mat4;
use tessera_core::{Geometry, Material, ObjectId, RenderableKind, RenderableObject};

use crate::config::OptimizerConfig;
use crate::error::MergeError;
use crate::grouping::{group_by_key, BatchKey};
use crate::merge::GeometryMerger;

/// A merged replacement for several originals.
#[derive(Debug, Clone)]
pub struct BatchedMesh {
    /// Id the merged object gets when inserted into the scene.
    pub id: ObjectId,
    pub geometry: Geometry,
    pub material: Material,
    /// Originals in the order their vertices appear in `geometry`.
    pub replaces: Vec<ObjectId>,
}

impl BatchedMesh {
    pub fn count(&self) -> usize {
        self.replaces.len()
    }

    /// The scene object standing in for every member.  Vertices are already in
    /// world space, so the transform is the identity.
    pub fn to_object(&self) -> RenderableObject {
        RenderableObject {
            id: self.id,
            name: format!("batch:{}x{}", self.material.name(), self.count()),
            geometry: self.geometry.clone(),
            material: self.material.clone(),
            transform: Mat4::IDENTITY,
            visible: true,
            kind: RenderableKind::Batched {
                replaces: self.replaces.clone(),
            },
        }
    }
}

/// A group that qualified for batching but could not be merged.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub key: BatchKey,
    pub members: Vec<ObjectId>,
    pub error: MergeError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub batches: Vec<BatchedMesh>,
    pub failures: Vec<BatchFailure>,
}

pub struct MeshBatcher {
    config: OptimizerConfig,
    merger: GeometryMerger,
}

impl MeshBatcher {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            config: config.clone(),
            merger: GeometryMerger::new(config.max_merged_vertices),
        }
    }

    /// Plans one merged mesh per qualifying group of `objects`.
    ///
    /// Groups that are too small, or large enough to be instanced, are left
    /// alone.
    pub fn batch(&self, objects: &[&RenderableObject]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (key, members) in group_by_key(objects) {
            if !self.config.batches(members.len()) {
                continue;
            }
            let ids: Vec<ObjectId> = members.iter().map(|o| o.id).collect();
            let sources: Vec<_> = members
                .iter()
                .map(|o| (o.geometry.buffer(), o.transform))
                .collect();

            match self.merger.merge(&sources) {
                Ok(buffer) => {
                    log::debug!(
                        "batch: merged {} objects into {} vertices ({:?})",
                        ids.len(),
                        buffer.vertex_count(),
                        key
                    );
                    outcome.batches.push(BatchedMesh {
                        id: ObjectId::fresh(),
                        geometry: Geometry::new(buffer),
                        material: members[0].material.clone(),
                        replaces: ids,
                    });
                }
                Err(error) => {
                    log::warn!("batch: {} objects left unmerged: {error}", ids.len());
                    outcome.failures.push(BatchFailure {
                        key,
                        members: ids,
                        error,
                    });
                }
            }
        }

        outcome
    }
}
