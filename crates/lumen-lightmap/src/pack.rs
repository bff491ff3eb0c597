//! Atlas packing of processed lightmap blocks.

use crate::LIGHTMAP_BYTES;
use crate::block::{BlockKind, RawLightmaps, build_lightmap};
use crate::config::LightmapConfig;
use crate::image::{ImageUploader, LightmapImages};
use crate::rect::LightmapRect;

#[inline]
fn floor_pow2(v: usize) -> usize {
    v.checked_ilog2().map_or(0, |l| 1 << l)
}

/// Columns and rows of the atlas grid for one pass over `remaining` blocks,
/// given at most `max_x` blocks per row and `max_y` per column.
///
/// Starts from the largest power-of-two square that fits, then grows the
/// roomier axis one line at a time while full lines remain, snapping it back
/// down to a power of two.
pub fn pack_dims(remaining: usize, max_x: usize, max_y: usize) -> [usize; 2] {
    let max = max_x.min(max_y);
    let root = floor_pow2(remaining.isqrt().min(max));
    if root == 0 {
        return [0, 0];
    }
    let mut left = remaining - root * root;
    let (mut cols, mut rows) = (root, root);
    if max_y > max_x {
        while left >= root && rows < max_y {
            rows += 1;
            left -= root;
        }
        rows = floor_pow2(rows);
    } else {
        while left >= root && cols < max_x {
            cols += 1;
            left -= root;
        }
        cols = floor_pow2(cols);
    }
    [cols, rows]
}

struct Packer<'a, U: ?Sized> {
    config: &'a LightmapConfig,
    raw: RawLightmaps<'a>,
    /// Source blocks per packed block; 2 when direction blocks are skipped.
    stride: usize,
    max_x: usize,
    max_y: usize,
    scratch: Vec<u8>,
    images: LightmapImages,
    uploader: &'a mut U,
}

impl<U: ImageUploader + ?Sized> Packer<'_, U> {
    fn single(&self, remaining: usize) -> bool {
        self.max_x.min(self.max_y) == 0 || remaining == 1 || !self.config.packing
    }

    fn kind(&self, packed: usize) -> BlockKind {
        if self.config.deluxe_mapping && packed % 2 == 1 {
            BlockKind::Direction
        } else {
            BlockKind::Color
        }
    }

    fn atlas_bytes(&self, remaining: usize) -> usize {
        let (w, h) = (self.raw.width, self.raw.height);
        if self.single(remaining) {
            return w * h * LIGHTMAP_BYTES;
        }
        let [cols, rows] = pack_dims(remaining, self.max_x, self.max_y);
        cols * w * rows * h * LIGHTMAP_BYTES
    }

    /// Packs as many blocks as one texture holds, starting at packed index
    /// `start`. Returns the number of blocks consumed.
    fn pass(&mut self, start: usize, remaining: usize, rects: &mut [LightmapRect]) -> usize {
        let (w, h) = (self.raw.width, self.raw.height);
        let row = w * LIGHTMAP_BYTES;

        if self.single(remaining) {
            log::debug!("Packing 1 lightmap(s) -> {}x{}", w, h);
            self.scratch.clear();
            self.scratch.resize(row * h, 255);
            build_lightmap(
                self.config,
                w,
                h,
                self.kind(start),
                self.raw.block(start * self.stride),
                &mut self.scratch,
                row,
            );
            let texture = self.images.upload(&mut *self.uploader, &self.scratch, w, h);
            if let Some(r) = rects.get_mut(start * self.stride) {
                *r = LightmapRect::whole(texture);
            }
            return 1;
        }

        let [cols, rows] = pack_dims(remaining, self.max_x, self.max_y);
        let (atlas_w, atlas_h) = (cols * w, rows * h);
        log::debug!(
            "Packing {} lightmap(s) -> {}x{} : {}x{}",
            remaining,
            cols,
            rows,
            atlas_w,
            atlas_h
        );
        let atlas_row = atlas_w * LIGHTMAP_BYTES;
        self.scratch.clear();
        self.scratch.resize(atlas_row * atlas_h, 255);

        let tw = 1.0 / cols as f64;
        let th = 1.0 / rows as f64;
        for y in 0..rows {
            for x in 0..cols {
                let packed = start + y * cols + x;
                let at = y * h * atlas_row + x * row;
                build_lightmap(
                    self.config,
                    w,
                    h,
                    self.kind(packed),
                    self.raw.block(packed * self.stride),
                    &mut self.scratch[at..],
                    atlas_row,
                );
                if let Some(r) = rects.get_mut(packed * self.stride) {
                    r.tex_matrix = [
                        [tw as f32, (x as f64 * tw) as f32],
                        [th as f32, (y as f64 * th) as f32],
                    ];
                }
            }
        }

        let texture = self.images.upload(&mut *self.uploader, &self.scratch, atlas_w, atlas_h);
        let count = cols * rows;
        for packed in start..start + count {
            if let Some(r) = rects.get_mut(packed * self.stride) {
                r.texture = texture;
            }
        }
        count
    }
}

/// Processes every raw block, packs them into as few textures as the limits
/// allow and uploads those. `rects[i]` receives the placement of source block
/// `i`; blocks without a matching rect are still packed.
///
/// A deluxe-mapping setting the atlas size cannot honor is switched off in
/// `config`. When direction blocks are present but deluxe mapping is off,
/// only color blocks are packed and the direction rects are left untouched.
pub fn build_lightmaps<U: ImageUploader + ?Sized>(
    config: &mut LightmapConfig,
    raw: RawLightmaps<'_>,
    rects: &mut [LightmapRect],
    uploader: &mut U,
) -> LightmapImages {
    let (w, h) = (raw.width, raw.height);
    if w == 0 || h == 0 || raw.count == 0 {
        log::debug!("no lightmaps to build ({} block(s) of {}x{})", raw.count, w, h);
        return LightmapImages::new();
    }

    let size = config.atlas_size(w, h);
    if config.deluxe_mapping && (size == w || size == h) {
        log::warn!(
            "Lightmap blocks larger than {}x{} aren't supported, deluxemaps will be disabled",
            size,
            size
        );
        config.deluxe_mapping = false;
    }
    let stride = if config.deluxe_maps && !config.deluxe_mapping {
        2
    } else {
        1
    };
    let total = raw.count.div_ceil(stride);

    let mut packer = Packer {
        config,
        raw,
        stride,
        max_x: size / w,
        max_y: size / h,
        scratch: Vec::new(),
        images: LightmapImages::new(),
        uploader,
    };
    // the first pass builds the largest atlas
    let largest = packer.atlas_bytes(total);
    packer.scratch.reserve_exact(largest);

    let mut done = 0;
    while done < total {
        done += packer.pass(done, total - done, rects);
    }

    let images = packer.images;
    log::info!(
        "{} lightmap block(s) of {}x{} packed into {} texture(s)",
        total,
        w,
        h,
        images.len()
    );
    images
}

/// Keeps every lightmap texture of the current world alive.
pub fn touch_lightmap_images<U: ImageUploader + ?Sized>(images: &LightmapImages, uploader: &mut U) {
    images.touch_all(uploader);
}
