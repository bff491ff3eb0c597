use lumen_geom::Vec3;
use serde::Deserialize;

use crate::MAX_DLIGHTS;

/// Transient point light submitted by the scene for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicLight {
    pub origin: Vec3,
    /// Radius of influence; also the half-size of its corona.
    pub intensity: f32,
    /// Linear color, nominally 0..1 per channel.
    pub color: Vec3,
}

impl DynamicLight {
    pub const fn new(origin: Vec3, intensity: f32, color: Vec3) -> Self {
        Self {
            origin,
            intensity,
            color,
        }
    }
}

/// How dynamic lights participate in rendering.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DynamicLightMode {
    Off,
    /// Dynamic lights are blended into sampled lighting.
    #[default]
    On,
    /// As `On`, plus coronas are drawn at every visible light.
    Full,
}

impl DynamicLightMode {
    #[inline]
    pub fn enabled(self) -> bool {
        self != DynamicLightMode::Off
    }

    #[inline]
    pub fn draws_coronas(self) -> bool {
        self == DynamicLightMode::Full
    }
}

/// Bounded per-frame list of active dynamic lights.
#[derive(Clone, Debug, Default)]
pub struct DynamicLights {
    lights: Vec<DynamicLight>,
}

impl DynamicLights {
    pub fn new() -> Self {
        Self {
            lights: Vec::with_capacity(MAX_DLIGHTS),
        }
    }

    /// Adds a light for this frame. Lights past `MAX_DLIGHTS` are dropped.
    pub fn push(&mut self, light: DynamicLight) -> bool {
        if self.lights.len() >= MAX_DLIGHTS {
            log::debug!("dropping dynamic light at {:?}: frame limit {}", light.origin, MAX_DLIGHTS);
            return false;
        }
        self.lights.push(light);
        true
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&DynamicLight> {
        self.lights.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[DynamicLight] {
        &self.lights
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicLight> {
        self.lights.iter()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

impl FromIterator<DynamicLight> for DynamicLights {
    fn from_iter<T: IntoIterator<Item = DynamicLight>>(iter: T) -> Self {
        let mut out = DynamicLights::new();
        for l in iter {
            out.push(l);
        }
        out
    }
}
