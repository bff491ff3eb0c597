//! Lightmap post-processing, atlas packing and upload bookkeeping.
#![forbid(unsafe_code)]

pub mod block;
pub mod config;
pub mod image;
pub mod pack;
pub mod rect;

pub use block::{BlockKind, RawLightmaps, build_lightmap};
pub use config::LightmapConfig;
pub use image::{
    ImageFlags, ImageHandle, ImageUploader, LightmapImages, MemoryImage, MemoryImages,
};
pub use pack::{build_lightmaps, pack_dims, touch_lightmap_images};
pub use rect::LightmapRect;

/// Bytes per lightmap texel (RGB).
pub const LIGHTMAP_BYTES: usize = 3;
/// Lightmap textures a world may upload.
pub const MAX_LIGHTMAP_IMAGES: usize = 1024;
