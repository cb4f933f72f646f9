use tessera_core::GeometryError;
use thiserror::Error;

/// Why a group of buffers could not be merged into one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("merged mesh would have {vertices} vertices, limit is {limit}")]
    IndexOverflow { vertices: usize, limit: usize },
    #[error("nothing to merge")]
    NoSources,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Rejected optimizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("atlas_size must be non-zero")]
    ZeroAtlasSize,
    #[error("atlas_size {size} exceeds the maximum of {max}")]
    AtlasTooLarge { size: u32, max: u32 },
    #[error("min_batch_size must be at least 2, got {0}")]
    BatchSizeTooSmall(usize),
    #[error("min_instance_size must be at least 2, got {0}")]
    InstanceSizeTooSmall(usize),
    #[error("max_merged_vertices must be non-zero")]
    ZeroMergedVertexLimit,
    #[error("instance_stride_alignment must be a power of two no larger than {max}, got {value}")]
    StrideAlignment { value: u32, max: u32 },
}
