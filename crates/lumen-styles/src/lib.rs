//! Registry of distinct per-surface lightmap/style combinations.
#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use lumen_light::MAX_LIGHTMAPS;
use lumen_lightmap::LightmapRect;

/// Distinct combinations one world may register.
pub const MAX_SUPER_STYLES: usize = 1023;
/// Style value reserved for "no style"; unset styles compare as this.
pub const STYLE_NONE: u8 = 255;

/// Vertex attributes the shading pipeline has to supply for a style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexAttribs(u32);

impl VertexAttribs {
    pub const NONE: VertexAttribs = VertexAttribs(0);
    /// Lightmap coordinates of layer 1; layers 2 and 3 follow in the next bits.
    /// Layer 0 coordinates are always present.
    pub const LMCOORDS1: VertexAttribs = VertexAttribs(1 << 0);
    pub const LMCOORDS2: VertexAttribs = VertexAttribs(1 << 1);
    pub const LMCOORDS3: VertexAttribs = VertexAttribs(1 << 2);

    /// Coordinates bit for lightmap layer `layer >= 1`.
    #[inline]
    pub fn lmcoords(layer: usize) -> VertexAttribs {
        debug_assert!(layer >= 1 && layer < MAX_LIGHTMAPS);
        VertexAttribs(Self::LMCOORDS1.0 << (layer - 1))
    }

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: VertexAttribs) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for VertexAttribs {
    type Output = VertexAttribs;
    fn bitor(self, rhs: VertexAttribs) -> VertexAttribs {
        VertexAttribs(self.0 | rhs.0)
    }
}

impl BitOrAssign for VertexAttribs {
    fn bitor_assign(&mut self, rhs: VertexAttribs) {
        self.0 |= rhs.0;
    }
}

/// Lightmap textures and styles a surface batch is drawn with, per layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuperLightStyle {
    pub lightmaps: [Option<usize>; MAX_LIGHTMAPS],
    pub lightmap_styles: [Option<u8>; MAX_LIGHTMAPS],
    pub vertex_styles: [Option<u8>; MAX_LIGHTMAPS],
    /// Per-layer UV step of one lightmap block in the atlas (the rect's scale
    /// column), used to reach the neighbouring deluxe block. Zero for layers
    /// without a lightmap.
    pub st_offset: [[f32; 2]; MAX_LIGHTMAPS],
    pub vattribs: VertexAttribs,
}

impl SuperLightStyle {
    fn matches(
        &self,
        lightmaps: &[Option<usize>; MAX_LIGHTMAPS],
        lightmap_styles: &[Option<u8>; MAX_LIGHTMAPS],
        vertex_styles: &[Option<u8>; MAX_LIGHTMAPS],
    ) -> bool {
        self.lightmaps == *lightmaps
            && self.lightmap_styles == *lightmap_styles
            && self.vertex_styles == *vertex_styles
    }
}

fn lightmap_key(l: &[Option<usize>; MAX_LIGHTMAPS]) -> [i64; MAX_LIGHTMAPS] {
    l.map(|v| v.map_or(-1, |n| n as i64))
}

#[inline]
fn normalize_styles(s: [Option<u8>; MAX_LIGHTMAPS]) -> [Option<u8>; MAX_LIGHTMAPS] {
    s.map(|v| v.filter(|&n| n != STYLE_NONE))
}

fn style_key(s: &[Option<u8>; MAX_LIGHTMAPS]) -> [u8; MAX_LIGHTMAPS] {
    s.map(|v| v.unwrap_or(STYLE_NONE))
}

/// Total order used to batch surfaces: greater lightmap indices first, then
/// greater lightmap styles, then greater vertex styles, layer by layer.
pub fn compare(a: &SuperLightStyle, b: &SuperLightStyle) -> Ordering {
    lightmap_key(&b.lightmaps)
        .cmp(&lightmap_key(&a.lightmaps))
        .then_with(|| style_key(&b.lightmap_styles).cmp(&style_key(&a.lightmap_styles)))
        .then_with(|| style_key(&b.vertex_styles).cmp(&style_key(&a.vertex_styles)))
}

/// Index of a registered style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleHandle(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    TooManyStyles { limit: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::TooManyStyles { limit } => {
                write!(f, "too many super light styles (limit {})", limit)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Clone, Debug, Default)]
pub struct SuperLightStyles {
    styles: Vec<SuperLightStyle>,
}

impl SuperLightStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle of an identical entry, or adds a new one.
    ///
    /// `rects[j]` is the atlas placement of layer `j`'s lightmap; missing
    /// rects leave that layer's offset at zero. A style of
    /// `Some(STYLE_NONE)` is stored as `None`.
    pub fn register(
        &mut self,
        lightmaps: [Option<usize>; MAX_LIGHTMAPS],
        lightmap_styles: [Option<u8>; MAX_LIGHTMAPS],
        vertex_styles: [Option<u8>; MAX_LIGHTMAPS],
        rects: &[Option<&LightmapRect>],
    ) -> Result<StyleHandle, RegistryError> {
        let lightmap_styles = normalize_styles(lightmap_styles);
        let vertex_styles = normalize_styles(vertex_styles);
        if let Some(i) = self
            .styles
            .iter()
            .position(|s| s.matches(&lightmaps, &lightmap_styles, &vertex_styles))
        {
            return Ok(StyleHandle(i));
        }
        if self.styles.len() == MAX_SUPER_STYLES {
            return Err(RegistryError::TooManyStyles {
                limit: MAX_SUPER_STYLES,
            });
        }

        let mut sls = SuperLightStyle {
            lightmaps,
            lightmap_styles,
            vertex_styles,
            ..SuperLightStyle::default()
        };
        for j in 0..MAX_LIGHTMAPS {
            if lightmaps[j].is_some() {
                if let Some(rect) = rects.get(j).copied().flatten() {
                    sls.st_offset[j] = rect.scale();
                }
            }
            if j > 0 && lightmap_styles[j].is_some() {
                sls.vattribs |= VertexAttribs::lmcoords(j);
            }
        }
        self.styles.push(sls);
        Ok(StyleHandle(self.styles.len() - 1))
    }

    /// Sorts entries with [`compare`]. Returns `remap` where `remap[old]` is
    /// the new index of the entry formerly at `old`.
    pub fn sort(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.styles.len()).collect();
        order.sort_by(|&a, &b| compare(&self.styles[a], &self.styles[b]));

        let mut remap = vec![0; order.len()];
        for (new, &old) in order.iter().enumerate() {
            remap[old] = new;
        }
        let mut old: Vec<Option<SuperLightStyle>> = self.styles.drain(..).map(Some).collect();
        self.styles = order.iter().filter_map(|&i| old[i].take()).collect();
        log::debug!("sorted {} super light style(s)", self.styles.len());
        remap
    }

    #[inline]
    pub fn get(&self, handle: StyleHandle) -> Option<&SuperLightStyle> {
        self.styles.get(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuperLightStyle> {
        self.styles.iter()
    }

    /// Drops every entry; done on level load.
    pub fn clear(&mut self) {
        self.styles.clear();
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
