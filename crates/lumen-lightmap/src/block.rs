//! Per-block lightmap post-processing.

use lumen_geom::{Vec3, color_normalize, grayscale};

use crate::LIGHTMAP_BYTES;
use crate::config::LightmapConfig;

/// Fill for a color block with no source data.
pub const MISSING_COLOR: u8 = 255;
/// Fill for a direction block with no source data; encodes a zero vector.
pub const MISSING_DIRECTION: u8 = 127;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Color,
    /// Deluxe map texels: an encoded light direction, never color corrected.
    Direction,
}

/// Raw baked blocks as loaded from the map: `count` blocks of
/// `width * height` RGB texels, stored back to back.
#[derive(Clone, Copy, Debug)]
pub struct RawLightmaps<'a> {
    pub width: usize,
    pub height: usize,
    pub count: usize,
    /// `None` when the map carries no lightmap lump.
    pub data: Option<&'a [u8]>,
}

impl<'a> RawLightmaps<'a> {
    pub fn new(width: usize, height: usize, count: usize, data: Option<&'a [u8]>) -> Self {
        Self {
            width,
            height,
            count,
            data,
        }
    }

    /// Bytes in one block.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.width * self.height * LIGHTMAP_BYTES
    }

    /// Source texels of block `index`; `None` if the data is absent or short.
    pub fn block(&self, index: usize) -> Option<&'a [u8]> {
        let len = self.block_len();
        let start = index.checked_mul(len)?;
        self.data?.get(start..start + len)
    }
}

/// Writes one processed `w x h` block into `dest`, whose rows are
/// `dest_stride` bytes apart.
pub fn build_lightmap(
    config: &LightmapConfig,
    w: usize,
    h: usize,
    kind: BlockKind,
    data: Option<&[u8]>,
    dest: &mut [u8],
    dest_stride: usize,
) {
    let row = w * LIGHTMAP_BYTES;
    if row == 0 || h == 0 || dest_stride < row {
        return;
    }
    let rows = dest.chunks_mut(dest_stride).take(h);

    let data = match data {
        Some(d) if !(config.fullbright && kind == BlockKind::Color) => d,
        _ => {
            let fill = match kind {
                BlockKind::Color => MISSING_COLOR,
                BlockKind::Direction => MISSING_DIRECTION,
            };
            for r in rows {
                r[..row].fill(fill);
            }
            return;
        }
    };

    if kind == BlockKind::Direction || (config.overbright_bits == 0 && !config.grayscale) {
        for (r, src) in rows.zip(data.chunks(row)) {
            r[..row].copy_from_slice(src);
        }
        return;
    }

    let intensity = (1u32 << config.overbright_bits.min(31)) as f32 / 255.0;
    for (r, src) in rows.zip(data.chunks(row)) {
        for (out, texel) in r[..row]
            .chunks_exact_mut(LIGHTMAP_BYTES)
            .zip(src.chunks_exact(LIGHTMAP_BYTES))
        {
            let c = process_texel([texel[0], texel[1], texel[2]], intensity, config.grayscale);
            out.copy_from_slice(&c);
        }
    }
}

/// Overbright scale, normalize to the brightest channel, optional luma, requantize.
#[inline]
fn process_texel(texel: [u8; 3], intensity: f32, gray: bool) -> [u8; 3] {
    let scaled = Vec3::new(texel[0] as f32, texel[1] as f32, texel[2] as f32) * intensity;
    let mut c = color_normalize(scaled);
    if gray {
        c = Vec3::splat(grayscale(c).clamp(0.0, 1.0));
    }
    [(c.x * 255.0) as u8, (c.y * 255.0) as u8, (c.z * 255.0) as u8]
}
