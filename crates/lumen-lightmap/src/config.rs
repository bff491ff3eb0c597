use serde::Deserialize;

/// Settings that shape how lightmap blocks are processed and packed.
#[derive(Clone, Debug, Deserialize)]
pub struct LightmapConfig {
    /// Pack several blocks into one atlas texture.
    #[serde(default = "default_true")]
    pub packing: bool,
    /// Upper bound for one side of an atlas, in texels.
    #[serde(default = "default_max_block_size")]
    pub max_block_size: usize,
    /// Largest texture side the GPU accepts.
    #[serde(default = "default_max_texture_size")]
    pub max_texture_size: usize,
    /// Overbright shift baked into the map; 0 leaves color blocks untouched.
    #[serde(default = "default_overbright_bits")]
    pub overbright_bits: u32,
    #[serde(default)]
    pub fullbright: bool,
    /// Source data interleaves color and direction blocks.
    #[serde(default)]
    pub deluxe_maps: bool,
    /// Direction blocks are packed and uploaded alongside color blocks.
    #[serde(default)]
    pub deluxe_mapping: bool,
    /// Mirrors the lighting grayscale switch.
    #[serde(skip)]
    pub grayscale: bool,
}

fn default_true() -> bool {
    true
}
fn default_max_block_size() -> usize {
    2048
}
fn default_max_texture_size() -> usize {
    4096
}
fn default_overbright_bits() -> u32 {
    1
}

impl Default for LightmapConfig {
    fn default() -> Self {
        Self {
            packing: default_true(),
            max_block_size: default_max_block_size(),
            max_texture_size: default_max_texture_size(),
            overbright_bits: default_overbright_bits(),
            fullbright: false,
            deluxe_maps: false,
            deluxe_mapping: false,
            grayscale: false,
        }
    }
}

impl LightmapConfig {
    /// Side of the largest atlas a pack pass may produce.
    ///
    /// Without packing every block is its own texture. Otherwise the smallest
    /// power of two covering the tighter of the two size limits.
    pub fn atlas_size(&self, block_width: usize, block_height: usize) -> usize {
        if !self.packing {
            return block_width.max(block_height);
        }
        let limit = self.max_block_size.min(self.max_texture_size);
        let mut size = 1usize;
        while size < limit {
            size <<= 1;
        }
        size
    }
}
