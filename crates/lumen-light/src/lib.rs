//! Light-sample grid interpolation, light styles and dynamic light blending.
#![forbid(unsafe_code)]

pub mod config;
pub mod dlight;
pub mod grid;
pub mod sample;
pub mod style;

pub use config::SamplerConfig;
pub use dlight::{DynamicLight, DynamicLightMode, DynamicLights};
pub use grid::{GridError, LightGrid, LightGridSample, StyleLayer};
pub use sample::{LightSample, LightSampler, dlight_falloff, trilinear_weights};
pub use style::LightStyles;

/// Style layers per surface / grid sample.
pub const MAX_LIGHTMAPS: usize = 4;
/// Size of the animated light-style table.
pub const MAX_LIGHTSTYLES: usize = 256;
/// Dynamic lights accepted per frame.
pub const MAX_DLIGHTS: usize = 32;
