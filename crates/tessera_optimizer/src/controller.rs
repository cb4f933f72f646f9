//! `MeshOptimizer`: owns a scene and rewrites it for fewer draw calls.
//!
//! ## Pass order
//!
//! 1. Measure the visible scene (`before`).
//! 2. Group visible `Individual` objects by (geometry, material).
//! 3. Groups of `min_instance_size` or more become one instanced object.
//! 4. Remaining groups of `min_batch_size` or more are merged into one buffer.
//! 5. Hide every replaced original, insert the synthetic objects, measure
//!    again (`after`).
//!
//! ## Reversibility
//!
//! Originals are never modified beyond their visibility flag.  The optimizer
//! keeps two records:
//!
//! | Record             | Contents                                 |
//! |--------------------|------------------------------------------|
//! | `hidden_originals` | original id → id of the object replacing it |
//! | `added_synthetic`  | ids of every object the pass inserted    |
//!
//! [`MeshOptimizer::restore_original_meshes`] replays those two records and
//! nothing else, so it works the same after one pass or after many.

use std::collections::BTreeMap;

use tessera_assets::{AtlasBuilder, TextureAtlas, TextureImage};
use tessera_core::{ObjectId, RenderableKind, RenderableObject, Scene};

use crate::batch::MeshBatcher;
use crate::config::OptimizerConfig;
use crate::error::ConfigError;
use crate::instance::InstanceGrouper;
use crate::report::{OptimizationReport, OptimizationWarning};
use crate::stats::{DrawStats, OptimizationStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerState {
    /// Scene is exactly as handed in.
    Original,
    /// Synthetic objects are live and their originals hidden.
    Optimized,
}

impl Default for OptimizerState {
    fn default() -> Self {
        OptimizerState::Original
    }
}

pub struct MeshOptimizer {
    scene: Scene,
    config: OptimizerConfig,
    state: OptimizerState,
    stats: OptimizationStats,
    warnings: Vec<OptimizationWarning>,
    hidden_originals: BTreeMap<ObjectId, ObjectId>,
    added_synthetic: Vec<ObjectId>,
    /// Outlives restores; the atlas is independent of the mesh passes.
    atlas_memory_saved: u64,
}

impl MeshOptimizer {
    /// Takes ownership of `scene` with the default settings.
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            config: OptimizerConfig::default(),
            state: OptimizerState::Original,
            stats: OptimizationStats::default(),
            warnings: Vec::new(),
            hidden_originals: BTreeMap::new(),
            added_synthetic: Vec::new(),
            atlas_memory_saved: 0,
        }
    }

    pub fn with_config(scene: Scene, config: OptimizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(scene)
        })
    }

    // ── Scene access ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access for the front-end.  Objects it removes while the scene
    /// is optimized are skipped by the next restore.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Hands the scene back as it currently is; call
    /// [`restore_original_meshes`](Self::restore_original_meshes) first to
    /// get the untouched original.
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    // ── Passes ─────────────────────────────────────────────────────────────

    /// Instances and batches the visible scene.
    ///
    /// Running it on an already optimized scene restores first, so passes
    /// never stack.
    pub fn optimize_all(&mut self) -> OptimizationReport {
        if self.state == OptimizerState::Optimized {
            self.restore_original_meshes();
        }

        let before = DrawStats::of(&self.scene);

        let (instances, outcome) = {
            let candidates: Vec<&RenderableObject> = self
                .scene
                .visible()
                .filter(|o| matches!(o.kind, RenderableKind::Individual))
                .collect();
            (
                InstanceGrouper::new(&self.config).instance(&candidates),
                MeshBatcher::new(&self.config).batch(&candidates),
            )
        };

        for group in &instances {
            self.replace(&group.replaces, group.to_object());
        }
        for batch in &outcome.batches {
            self.replace(&batch.replaces, batch.to_object());
        }

        let warnings: Vec<OptimizationWarning> = outcome
            .failures
            .into_iter()
            .map(|f| OptimizationWarning::MergeFailed {
                members: f.members,
                error: f.error,
            })
            .collect();
        self.warnings.extend(warnings.iter().cloned());

        self.stats = OptimizationStats {
            before,
            after: DrawStats::of(&self.scene),
            batched_meshes: outcome.batches.len(),
            batched_objects: outcome.batches.iter().map(|b| b.count()).sum(),
            instance_groups: instances.len(),
            instanced_objects: instances.iter().map(|g| g.count()).sum(),
            texture_memory_saved: self.atlas_memory_saved,
        };
        self.state = OptimizerState::Optimized;

        log::info!(
            "optimize: {} -> {} ({} batches, {} instance groups, {} warnings)",
            self.stats.before,
            self.stats.after,
            self.stats.batched_meshes,
            self.stats.instance_groups,
            warnings.len()
        );

        OptimizationReport {
            stats: self.stats,
            batches: outcome.batches,
            instances,
            warnings,
        }
    }

    /// Undoes every pass: originals visible again, synthetic objects removed,
    /// statistics zeroed.  Does nothing on an unoptimized scene.
    pub fn restore_original_meshes(&mut self) {
        if self.state == OptimizerState::Original {
            log::debug!("restore: nothing to undo");
            return;
        }

        let shown = self.hidden_originals.len();
        for (original, _) in std::mem::take(&mut self.hidden_originals) {
            if !self.scene.set_visible(original, true) {
                log::warn!("restore: {original} was removed from the scene while hidden");
            }
        }
        for synthetic in self.added_synthetic.drain(..) {
            if self.scene.remove(synthetic).is_none() {
                log::warn!("restore: {synthetic} was already removed");
            }
        }

        self.stats = OptimizationStats::default();
        self.warnings.clear();
        self.state = OptimizerState::Original;
        log::info!("restore: {shown} originals visible again");
    }

    /// Packs `textures` into one atlas of the configured size.
    ///
    /// Dropped textures become warnings; the estimated memory saving goes
    /// into the statistics.
    pub fn build_texture_atlas(&mut self, textures: &[TextureImage]) -> TextureAtlas {
        let atlas = AtlasBuilder::new(self.config.atlas_size).pack(textures);

        self.atlas_memory_saved = atlas.estimated_memory_saved();
        self.stats.texture_memory_saved = self.atlas_memory_saved;
        self.warnings
            .extend(atlas.dropped().iter().map(|d| OptimizationWarning::TextureDropped {
                texture: d.id,
                width: d.width,
                height: d.height,
            }));

        log::info!(
            "atlas: {} textures packed, {} dropped, ~{} bytes saved",
            atlas.len(),
            atlas.dropped().len(),
            self.atlas_memory_saved
        );
        atlas
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn state(&self) -> OptimizerState {
        self.state
    }

    pub fn stats(&self) -> &OptimizationStats {
        &self.stats
    }

    /// Warnings collected since the last restore.
    pub fn warnings(&self) -> &[OptimizationWarning] {
        &self.warnings
    }

    /// Original id → id of the synthetic object drawing it.
    pub fn hidden_originals(&self) -> &BTreeMap<ObjectId, ObjectId> {
        &self.hidden_originals
    }

    /// Ids of the synthetic objects currently in the scene, in insertion order.
    pub fn synthetic_objects(&self) -> &[ObjectId] {
        &self.added_synthetic
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    // ── Internals ──────────────────────────────────────────────────────────

    fn replace(&mut self, originals: &[ObjectId], synthetic: RenderableObject) {
        let synthetic_id = synthetic.id;
        for &original in originals {
            self.scene.set_visible(original, false);
            self.hidden_originals.insert(original, synthetic_id);
        }
        self.scene.insert(synthetic);
        self.added_synthetic.push(synthetic_id);
    }
}
