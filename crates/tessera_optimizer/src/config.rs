//! Optimizer settings.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! atlas_size = 4096
//! enable_batching = false
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use tessera_assets::MAX_ATLAS_SIZE;

use crate::error::ConfigError;
use crate::instance_buffer::MAX_STRIDE_ALIGNMENT;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Edge length of the square texture atlas in pixels.
    pub atlas_size: u32,
    /// Smallest group that gets merged into one buffer.
    pub min_batch_size: usize,
    /// Smallest group that becomes one instanced draw.  Groups this large are
    /// claimed by instancing before batching sees them.
    pub min_instance_size: usize,
    pub enable_batching: bool,
    pub enable_instancing: bool,
    /// Upper bound on the vertex count of a merged buffer.
    pub max_merged_vertices: u32,
    /// Byte alignment of each per-instance matrix slot.
    pub instance_stride_alignment: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            atlas_size: 2048,
            min_batch_size: 2,
            min_instance_size: 3,
            enable_batching: true,
            enable_instancing: true,
            max_merged_vertices: u32::MAX,
            instance_stride_alignment: 16,
        }
    }
}

impl OptimizerConfig {
    pub fn with_atlas_size(mut self, size: u32) -> Self {
        self.atlas_size = size;
        self
    }

    pub fn with_min_batch_size(mut self, n: usize) -> Self {
        self.min_batch_size = n;
        self
    }

    pub fn with_min_instance_size(mut self, n: usize) -> Self {
        self.min_instance_size = n;
        self
    }

    pub fn with_batching(mut self, enabled: bool) -> Self {
        self.enable_batching = enabled;
        self
    }

    pub fn with_instancing(mut self, enabled: bool) -> Self {
        self.enable_instancing = enabled;
        self
    }

    pub fn with_max_merged_vertices(mut self, limit: u32) -> Self {
        self.max_merged_vertices = limit;
        self
    }

    pub fn with_instance_stride_alignment(mut self, alignment: u32) -> Self {
        self.instance_stride_alignment = alignment;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.atlas_size == 0 {
            return Err(ConfigError::ZeroAtlasSize);
        }
        if self.atlas_size > MAX_ATLAS_SIZE {
            return Err(ConfigError::AtlasTooLarge {
                size: self.atlas_size,
                max: MAX_ATLAS_SIZE,
            });
        }
        if self.min_batch_size < 2 {
            return Err(ConfigError::BatchSizeTooSmall(self.min_batch_size));
        }
        if self.min_instance_size < 2 {
            return Err(ConfigError::InstanceSizeTooSmall(self.min_instance_size));
        }
        if self.max_merged_vertices == 0 {
            return Err(ConfigError::ZeroMergedVertexLimit);
        }
        let alignment = self.instance_stride_alignment;
        if !alignment.is_power_of_two() || alignment > MAX_STRIDE_ALIGNMENT {
            return Err(ConfigError::StrideAlignment {
                value: alignment,
                max: MAX_STRIDE_ALIGNMENT,
            });
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(source).context("invalid optimizer config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read optimizer config {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("in {}", path.display()))
    }

    /// Whether a group of `len` objects should become an instanced draw.
    pub fn instances(&self, len: usize) -> bool {
        self.enable_instancing && len >= self.min_instance_size
    }

    /// Whether a group of `len` objects should be merged.  Groups that
    /// instancing claims are never batched.
    pub fn batches(&self, len: usize) -> bool {
        self.enable_batching && len >= self.min_batch_size && !self.instances(len)
    }
}
