/// CPU-side per-instance data for an instanced draw.
///
/// ## Layout
///
/// One `mat4x4<f32>` per instance, column-major, written into slots of
/// `stride` bytes.  The stride is `align_up(64, alignment)`, so with the
/// default 16-byte alignment matrices are packed back to back, while a
/// front-end that binds slots through dynamic uniform offsets can ask for
/// its device's alignment (typically 256) instead.
///
/// ```text
/// offset 0          stride       2·stride
/// ┌──────────┬─pad─┬──────────┬─pad─┬─── …
/// │ model[0] │     │ model[1] │     │
/// └──────────┴─────┴──────────┴─────┴─── …
/// ```
///
/// Padding bytes are zero.
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Bytes in one matrix.
const MAT4_SIZE: u32 = 64;

/// Largest slot alignment accepted; any device's uniform offset alignment is
/// well below this.
pub const MAX_STRIDE_ALIGNMENT: u32 = 4096;

/// One instance's model matrix as raw GPU data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl From<Mat4> for InstanceRaw {
    fn from(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBuffer {
    bytes: Vec<u8>,
    stride: u32,
    len: usize,
}

impl InstanceBuffer {
    /// Packs `transforms` into slots aligned to `alignment` bytes.
    ///
    /// `alignment` is rounded up to a power of two and clamped to
    /// `1..=MAX_STRIDE_ALIGNMENT`; zero means tightly packed.
    pub fn new(transforms: &[Mat4], alignment: u32) -> Self {
        let alignment = normalize_alignment(alignment);
        let stride = align_up(MAT4_SIZE, alignment);
        let mut bytes = vec![0u8; transforms.len() * stride as usize];
        for (slot, m) in bytes.chunks_exact_mut(stride as usize).zip(transforms) {
            let raw = InstanceRaw::from(*m);
            slot[..MAT4_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&raw));
        }
        Self {
            bytes,
            stride,
            len: transforms.len(),
        }
    }

    /// Byte offset of slot `index`.
    #[inline]
    pub fn offset(&self, index: usize) -> u32 {
        (index as u32).wrapping_mul(self.stride)
    }

    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reads slot `index` back, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Mat4> {
        if index >= self.len {
            return None;
        }
        let start = self.offset(index) as usize;
        let raw: InstanceRaw =
            bytemuck::pod_read_unaligned(&self.bytes[start..start + MAT4_SIZE as usize]);
        Some(Mat4::from_cols_array_2d(&raw.model))
    }
}

fn normalize_alignment(alignment: u32) -> u32 {
    let normalized = alignment.clamp(1, MAX_STRIDE_ALIGNMENT).next_power_of_two();
    if normalized != alignment {
        log::warn!("instance buffer: alignment {alignment} adjusted to {normalized}");
    }
    normalized
}

/// Round `value` up to the next multiple of `align` (must be a power of two).
#[inline]
fn align_up(value: u32, align: u32) -> u32 {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn align_up_rounds() {
        assert_eq!(align_up(64, 16), 64);
        assert_eq!(align_up(64, 256), 256);
        assert_eq!(align_up(65, 64), 128);
    }

    #[test]
    fn tightly_packed_by_default() {
        let ms = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))];
        let buf = InstanceBuffer::new(&ms, 16);
        assert_eq!(buf.stride(), 64);
        assert_eq!(buf.as_bytes().len(), 128);
        assert_eq!(buf.get(1), Some(ms[1]));
        assert_eq!(buf.get(2), None);
    }

    #[test]
    fn padded_slots() {
        let ms = [Mat4::from_scale(Vec3::splat(2.0)); 3];
        let buf = InstanceBuffer::new(&ms, 256);
        assert_eq!(buf.offset(2), 512);
        assert_eq!(buf.as_bytes().len(), 768);
        assert!(buf.as_bytes()[64..256].iter().all(|&b| b == 0));
        assert_eq!(buf.get(2), Some(ms[2]));
    }

    #[test]
    fn odd_alignments_are_normalized() {
        let ms = [Mat4::IDENTITY; 2];
        let zero = InstanceBuffer::new(&ms, 0);
        assert_eq!(zero.stride(), 64);
        assert_eq!(zero.get(1), Some(Mat4::IDENTITY));

        // 100 rounds to 128
        assert_eq!(InstanceBuffer::new(&ms, 100).stride(), 128);
        assert_eq!(InstanceBuffer::new(&ms, u32::MAX).stride(), MAX_STRIDE_ALIGNMENT);
    }

    #[test]
    fn column_major() {
        let m = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
        let raw = InstanceRaw::from(m);
        assert_eq!(raw.model[3], [7.0, 8.0, 9.0, 1.0]);
    }
}
