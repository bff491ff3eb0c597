use lumen_geom::Vec3;

use crate::MAX_LIGHTSTYLES;

/// Current RGB scale of every animated light style.
///
/// The animation collaborator writes it once per frame; the sampler only reads.
#[derive(Clone, Debug)]
pub struct LightStyles {
    rgb: Vec<Vec3>,
}

impl Default for LightStyles {
    fn default() -> Self {
        Self::new()
    }
}

impl LightStyles {
    pub fn new() -> Self {
        Self {
            rgb: vec![Vec3::ONE; MAX_LIGHTSTYLES],
        }
    }

    /// Back to full white for every style; done on level load.
    pub fn reset(&mut self) {
        self.rgb.fill(Vec3::ONE);
    }

    /// Returns false when `index` is outside the style table.
    pub fn set(&mut self, index: usize, rgb: Vec3) -> bool {
        match self.rgb.get_mut(index) {
            Some(slot) => {
                *slot = rgb;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn rgb(&self, style: u8) -> Vec3 {
        self.rgb[style as usize]
    }

    pub fn len(&self) -> usize {
        self.rgb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }
}
