use std::fmt;
use std::ops::BitOr;

use crate::{LIGHTMAP_BYTES, MAX_LIGHTMAP_IMAGES};

/// Prefix of every uploaded lightmap name; the table index is appended.
pub const LIGHTMAP_NAME_PREFIX: &str = "*lm";

/// Texture creation flags passed to the uploader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageFlags(u32);

impl ImageFlags {
    pub const NONE: ImageFlags = ImageFlags(0);
    pub const CLAMP: ImageFlags = ImageFlags(1 << 0);
    pub const NO_PICMIP: ImageFlags = ImageFlags(1 << 1);
    pub const NO_MIPMAP: ImageFlags = ImageFlags(1 << 2);
    pub const NO_COMPRESS: ImageFlags = ImageFlags(1 << 3);

    /// Lightmaps are sampled exactly as baked.
    pub const LIGHTMAP: ImageFlags = ImageFlags(
        Self::CLAMP.0 | Self::NO_PICMIP.0 | Self::NO_MIPMAP.0 | Self::NO_COMPRESS.0,
    );

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: ImageFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ImageFlags {
    type Output = ImageFlags;
    fn bitor(self, rhs: ImageFlags) -> ImageFlags {
        ImageFlags(self.0 | rhs.0)
    }
}

/// Opaque texture reference handed back by the uploader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image#{}", self.0)
    }
}

/// Texture upload backend.
pub trait ImageUploader {
    fn upload_image(
        &mut self,
        name: &str,
        pixels: &[u8],
        width: usize,
        height: usize,
        flags: ImageFlags,
        samples: usize,
    ) -> ImageHandle;

    /// Marks a texture as still in use so a level change does not free it.
    fn touch_image(&mut self, handle: ImageHandle);
}

/// Lightmap textures uploaded for the current world, indexed by the
/// `texture` field of a `LightmapRect`.
#[derive(Clone, Debug, Default)]
pub struct LightmapImages {
    handles: Vec<ImageHandle>,
}

impl LightmapImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads one atlas and returns its table index. A full table logs a
    /// warning, skips the upload and returns 0.
    pub fn upload<U: ImageUploader + ?Sized>(
        &mut self,
        uploader: &mut U,
        pixels: &[u8],
        width: usize,
        height: usize,
    ) -> usize {
        let index = self.handles.len();
        if index == MAX_LIGHTMAP_IMAGES {
            log::warn!(
                "lightmap image table is full ({} images), reusing lightmap 0",
                MAX_LIGHTMAP_IMAGES
            );
            return 0;
        }
        let name = format!("{}{}", LIGHTMAP_NAME_PREFIX, index);
        let handle = uploader.upload_image(
            &name,
            pixels,
            width,
            height,
            ImageFlags::LIGHTMAP,
            LIGHTMAP_BYTES,
        );
        self.handles.push(handle);
        index
    }

    /// Keep-alive touch on every retained texture.
    pub fn touch_all<U: ImageUploader + ?Sized>(&self, uploader: &mut U) {
        for &h in &self.handles {
            uploader.touch_image(h);
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<ImageHandle> {
        self.handles.get(index).copied()
    }

    pub fn handles(&self) -> &[ImageHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// A texture kept in memory by `MemoryImages`.
#[derive(Clone, Debug)]
pub struct MemoryImage {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub flags: ImageFlags,
    pub samples: usize,
    pub pixels: Vec<u8>,
    pub touches: u32,
}

impl MemoryImage {
    /// Texel at (x, y), or `None` outside the image.
    pub fn texel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y * self.width + x) * self.samples;
        self.pixels.get(at..at + self.samples)
    }
}

/// Uploader that keeps every image in memory. Handles index `images()`.
#[derive(Clone, Debug, Default)]
pub struct MemoryImages {
    images: Vec<MemoryImage>,
}

impl MemoryImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: ImageHandle) -> Option<&MemoryImage> {
        self.images.get(handle.0 as usize)
    }

    pub fn images(&self) -> &[MemoryImage] {
        &self.images
    }
}

impl ImageUploader for MemoryImages {
    fn upload_image(
        &mut self,
        name: &str,
        pixels: &[u8],
        width: usize,
        height: usize,
        flags: ImageFlags,
        samples: usize,
    ) -> ImageHandle {
        let len = (width * height * samples).min(pixels.len());
        log::trace!("upload {} {}x{} ({} bytes)", name, width, height, len);
        self.images.push(MemoryImage {
            name: name.to_string(),
            width,
            height,
            flags,
            samples,
            pixels: pixels[..len].to_vec(),
            touches: 0,
        });
        ImageHandle((self.images.len() - 1) as u32)
    }

    fn touch_image(&mut self, handle: ImageHandle) {
        if let Some(img) = self.images.get_mut(handle.0 as usize) {
            img.touches += 1;
        }
    }
}
