//! Glow sprites drawn at visible dynamic lights.
#![forbid(unsafe_code)]

pub mod backend;
pub mod config;

use lumen_geom::Vec3;
use lumen_light::{DynamicLightMode, DynamicLights, MAX_DLIGHTS};

pub use backend::{
    CoronaToken, DrawList, DrawSurface, FogId, FogLookup, LineTracer, ShaderHandle, ShaderLoader,
    ShaderType, SurfaceFlags, Trace,
};
pub use config::CoronaConfig;

/// Lights closer than this along the view axis get no corona.
pub const CORONA_NEAR_CLIP: f32 = 24.0;
pub const CORONA_SHADER_NAME: &str = "***r_coronaTexture***";

/// Camera state for the current view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewParams {
    pub origin: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// Rendering a mirror; flips the horizontal axis of billboards.
    pub mirrored: bool,
}

/// Camera-facing quad for one corona.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoronaQuad {
    pub xyz: [Vec3; 4],
    pub normals: [Vec3; 4],
    pub texcoords: [[f32; 2]; 4],
    pub colors: [[u8; 4]; 4],
}

const QUAD_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

pub struct CoronaRenderer {
    shader: Option<ShaderHandle>,
    tokens: Vec<CoronaToken>,
    config: CoronaConfig,
}

impl CoronaRenderer {
    /// Loads the glow shader and prepares one surface per dynamic light slot.
    pub fn init<S: ShaderLoader + ?Sized>(shaders: &mut S, config: CoronaConfig) -> Self {
        let shader = shaders.load_shader(CORONA_SHADER_NAME, ShaderType::Corona, true);
        log::debug!("corona shader {:?}, scale {}", shader, config.scale);
        Self {
            shader: Some(shader),
            tokens: (0..MAX_DLIGHTS).map(CoronaToken).collect(),
            config,
        }
    }

    pub fn config(&self) -> &CoronaConfig {
        &self.config
    }

    pub fn shader(&self) -> Option<ShaderHandle> {
        self.shader
    }

    /// Queues a corona for every light in front of the view with a clear line
    /// to the eye. Returns how many were queued.
    pub fn draw_coronas<T, F, D>(
        &self,
        mode: DynamicLightMode,
        view: &ViewParams,
        lights: &DynamicLights,
        tracer: &T,
        fogs: &F,
        draw_list: &mut D,
    ) -> usize
    where
        T: LineTracer + ?Sized,
        F: FogLookup + ?Sized,
        D: DrawList + ?Sized,
    {
        let Some(shader) = self.shader else {
            return 0;
        };
        if !mode.draws_coronas() {
            return 0;
        }

        let mut queued = 0;
        for (light, &token) in lights.iter().zip(&self.tokens) {
            let depth = view.forward.dot(light.origin - view.origin);
            if depth <= CORONA_NEAR_CLIP {
                continue;
            }
            let trace = tracer.trace_line(light.origin, view.origin, SurfaceFlags::NONSOLID);
            if trace.fraction != 1.0 {
                continue;
            }
            draw_list.add_draw_surface(DrawSurface {
                fog: fogs.fog_for_sphere(light.origin, 1.0),
                shader,
                sort_depth: depth - light.intensity,
                token,
            });
            queued += 1;
        }
        queued
    }

    /// Builds the quad for a queued corona, or `None` if its light is gone.
    pub fn batch_corona(
        &self,
        token: CoronaToken,
        view: &ViewParams,
        lights: &DynamicLights,
    ) -> Option<CoronaQuad> {
        let light = lights.get(token.0)?;
        let r = light.intensity;
        let left = if view.mirrored { -view.right } else { view.right };
        let (o, up) = (light.origin, view.up);

        let below = o - up * r;
        let above = o + up * r;
        let xyz = [below - left * r, above - left * r, above + left * r, below + left * r];

        let colorscale = 255.0 * self.config.scale.clamp(0.0, 1.0);
        let c = light.color * colorscale;
        let channel = |v: f32| v.clamp(0.0, 255.0) as u8;
        let color = [channel(c.x), channel(c.y), channel(c.z), 255];

        Some(CoronaQuad {
            xyz,
            normals: [Vec3::ZERO; 4],
            texcoords: QUAD_TEXCOORDS,
            colors: [color; 4],
        })
    }

    /// Releases the glow shader; later passes queue nothing.
    pub fn shutdown(&mut self) {
        self.shader = None;
    }
}

#[cfg(test)]
mod tests;
