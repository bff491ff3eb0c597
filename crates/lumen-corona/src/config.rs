use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct CoronaConfig {
    /// Corona brightness, clamped to [0,1] at use.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    0.4
}

impl Default for CoronaConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
        }
    }
}
