//! Shelf-packed texture atlases.
//!
//! ## Algorithm
//!
//! Textures are sorted by decreasing area (stable, so ties keep input order)
//! and placed left-to-right in rows.  A cursor `(x, y)` and the current row
//! height describe the free space:
//!
//! ```text
//! y=0   ┌──────┬────┬──┐
//!       │  A   │ B  │C │   row 0, height = A.h
//! y=A.h ├────┬─┴──┬─┴──┘
//!       │ D  │ E  │        row 1
//!       └────┴────┘
//! ```
//!
//! A texture that does not fit in the rest of the row tries a fresh row at
//! `y + row_height`.  If that row would run past the bottom edge (or the
//! texture is wider than the atlas) it is dropped and reported; the cursor
//! does not move, so smaller textures later in the list can still use the
//! remaining space.  Within a row rectangles never overlap because `x` only
//! grows, and rows never overlap because a row's height is fixed before the
//! next one starts.

use std::collections::HashMap;

use glam::Vec2;
use image::RgbaImage;
use tessera_core::TextureId;

use crate::texture::TextureImage;

// ── Rectangles ───────────────────────────────────────────────────────────────

/// Normalised rectangle inside the atlas, `[0, 1]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub u: f32,
    pub v: f32,
    pub width: f32,
    pub height: f32,
}

impl UvRect {
    /// `true` if the interiors intersect; touching edges do not count.
    pub fn overlaps(&self, other: &UvRect) -> bool {
        self.u < other.u + other.width
            && other.u < self.u + self.width
            && self.v < other.v + other.height
            && other.v < self.v + self.height
    }

    /// Maps a uv of the source texture into atlas space.
    #[inline]
    pub fn remap(&self, uv: Vec2) -> Vec2 {
        Vec2::new(self.u + uv.x * self.width, self.v + uv.y * self.height)
    }
}

/// Pixel rectangle of a placed texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    fn uv_rect(&self, atlas_size: u32) -> UvRect {
        let s = atlas_size as f32;
        UvRect {
            u: self.x as f32 / s,
            v: self.y as f32 / s,
            width: self.width as f32 / s,
            height: self.height as f32 / s,
        }
    }
}

/// A texture that did not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedTexture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

// ── Atlas ────────────────────────────────────────────────────────────────────

/// One packed square image plus the lookup table into it.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    image: RgbaImage,
    size: u32,
    /// Placed textures in packing order.
    placed: Vec<(TextureId, Placement)>,
    regions: HashMap<TextureId, UvRect>,
    dropped: Vec<DroppedTexture>,
    standalone_bytes: u64,
}

impl TextureAtlas {
    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Normalised rectangle of a placed texture.
    pub fn region(&self, id: TextureId) -> Option<UvRect> {
        self.regions.get(&id).copied()
    }

    pub fn placement(&self, id: TextureId) -> Option<Placement> {
        self.placed.iter().find(|(t, _)| *t == id).map(|(_, p)| *p)
    }

    /// `(id, rect)` for every placed texture, in packing order.
    pub fn regions(&self) -> impl Iterator<Item = (TextureId, UvRect)> + '_ {
        self.placed.iter().map(|(id, p)| (*id, p.uv_rect(self.size)))
    }

    pub fn dropped(&self) -> &[DroppedTexture] {
        &self.dropped
    }

    /// Number of placed textures.
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Bytes of the atlas image as one GPU texture.
    pub fn gpu_footprint(&self) -> u64 {
        self.size as u64 * self.size as u64 * 4
    }

    /// Estimated GPU memory saved by binding the atlas instead of every placed
    /// texture on its own.  Never negative.
    pub fn estimated_memory_saved(&self) -> u64 {
        self.standalone_bytes.saturating_sub(self.gpu_footprint())
    }
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Largest atlas edge length, the common 2D texture limit of desktop GPUs.
/// One atlas at this size is 1 GiB of RGBA8.
pub const MAX_ATLAS_SIZE: u32 = 16384;

/// Packs textures into a fixed-size square atlas.
#[derive(Debug, Clone, Copy)]
pub struct AtlasBuilder {
    size: u32,
}

impl AtlasBuilder {
    /// `size` is the atlas edge length in pixels; a power of two is
    /// recommended but not required.  Sizes outside `1..=MAX_ATLAS_SIZE`
    /// are clamped into that range.
    pub fn new(size: u32) -> Self {
        let clamped = size.clamp(1, MAX_ATLAS_SIZE);
        if clamped != size {
            log::warn!("atlas: size {size} out of range, using {clamped}");
        } else if !size.is_power_of_two() {
            log::warn!("atlas: size {size} is not a power of two");
        }
        Self { size: clamped }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Packs `textures`; whatever does not fit is listed in
    /// [`TextureAtlas::dropped`] and left out of the lookup table.
    pub fn pack(&self, textures: &[TextureImage]) -> TextureAtlas {
        let (placed, dropped) = self.layout(textures);

        let mut image = RgbaImage::new(self.size, self.size);
        let mut regions = HashMap::with_capacity(placed.len());
        let mut standalone_bytes = 0u64;
        for (texture, placement) in &placed {
            image::imageops::replace(
                &mut image,
                texture.image(),
                placement.x as i64,
                placement.y as i64,
            );
            regions.insert(texture.id(), placement.uv_rect(self.size));
            standalone_bytes += texture.gpu_footprint();
        }

        for d in &dropped {
            log::warn!(
                "atlas: {} ({}x{}) does not fit in {}x{} atlas, dropped",
                d.id,
                d.width,
                d.height,
                self.size,
                self.size
            );
        }
        log::debug!(
            "atlas: placed {} of {} textures in {}x{}",
            placed.len(),
            textures.len(),
            self.size,
            self.size
        );

        TextureAtlas {
            image,
            size: self.size,
            placed: placed.into_iter().map(|(t, p)| (t.id(), p)).collect(),
            regions,
            dropped,
            standalone_bytes,
        }
    }

    /// Shelf placement only; no pixels are touched.
    fn layout<'t>(
        &self,
        textures: &'t [TextureImage],
    ) -> (Vec<(&'t TextureImage, Placement)>, Vec<DroppedTexture>) {
        let mut order: Vec<&TextureImage> = textures.iter().collect();
        order.sort_by(|a, b| b.area().cmp(&a.area()));

        let size = self.size;
        let (mut x, mut y, mut row_height) = (0u32, 0u32, 0u32);
        let mut placed = Vec::with_capacity(order.len());
        let mut dropped = Vec::new();

        for texture in order {
            let (w, h) = (texture.width(), texture.height());

            // candidate slot: rest of the current row, else a fresh row below it
            let slot = if fits(x, w, size) && fits(y, h, size) {
                Some((x, y, row_height))
            } else {
                let next_y = y.saturating_add(row_height);
                (fits(0, w, size) && fits(next_y, h, size)).then_some((0, next_y, 0))
            };

            match slot {
                Some((sx, sy, current_row)) => {
                    placed.push((
                        texture,
                        Placement {
                            x: sx,
                            y: sy,
                            width: w,
                            height: h,
                        },
                    ));
                    x = sx + w;
                    y = sy;
                    row_height = current_row.max(h);
                }
                None => dropped.push(DroppedTexture {
                    id: texture.id(),
                    width: w,
                    height: h,
                }),
            }
        }

        (placed, dropped)
    }
}

#[inline]
fn fits(start: u32, extent: u32, limit: u32) -> bool {
    start.checked_add(extent).is_some_and(|end| end <= limit)
}
