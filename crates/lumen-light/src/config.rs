use serde::Deserialize;

use crate::dlight::DynamicLightMode;

/// Knobs read by the light sampler.
#[derive(Clone, Debug, Deserialize)]
pub struct SamplerConfig {
    /// Collapse sampled ambient/diffuse to luma.
    #[serde(default)]
    pub grayscale: bool,
    /// Multiplier on sampled ambient, clamped to [0,1] at use.
    #[serde(default = "default_scale")]
    pub ambient_scale: f32,
    /// Multiplier on sampled diffuse, clamped to [0,1] at use.
    #[serde(default = "default_scale")]
    pub directed_scale: f32,
    #[serde(default)]
    pub dynamic: DynamicLightMode,
    /// Map-wide light color normalization; 255 leaves colors unchanged.
    #[serde(default = "default_map_light_color_scale")]
    pub map_light_color_scale: f32,
}

fn default_scale() -> f32 {
    1.0
}
fn default_map_light_color_scale() -> f32 {
    255.0
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            grayscale: false,
            ambient_scale: default_scale(),
            directed_scale: default_scale(),
            dynamic: DynamicLightMode::default(),
            map_light_color_scale: default_map_light_color_scale(),
        }
    }
}
