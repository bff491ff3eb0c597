//! Point light sampling: light-grid interpolation plus dynamic light blend.

use lumen_geom::{Vec3, grayscale, lat_long_to_norm};

use crate::config::SamplerConfig;
use crate::dlight::DynamicLights;
use crate::grid::LightGrid;
use crate::style::LightStyles;

/// Direction returned when the world has no light grid.
pub const DEFAULT_LIGHT_DIR: Vec3 = Vec3::new(0.1, 0.2, 0.7);

/// Share of a dynamic light's color that also lands in ambient.
const DLIGHT_AMBIENT_FRACTION: f32 = 0.05;

/// Shading inputs for one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    /// Unit direction towards the dominant incoming light.
    pub direction: Vec3,
    /// RGBA ambient, present when requested; alpha is always 1.
    pub ambient: Option<[f32; 4]>,
    /// RGBA diffuse, present when requested; alpha is always 1.
    pub diffuse: Option<[f32; 4]>,
}

/// Trilinear weights for the 8 corners of a cell, given the fractional
/// position inside it. Corner `k` is offset by `(k & 1, (k >> 1) & 1, (k >> 2) & 1)`.
#[inline]
pub fn trilinear_weights(frac: Vec3) -> [f32; 8] {
    let (fx, fy, fz) = (frac.x, frac.y, frac.z);
    let (gx, gy, gz) = (1.0 - fx, 1.0 - fy, 1.0 - fz);
    [
        gx * gy * gz,
        fx * gy * gz,
        gx * fy * gz,
        fx * fy * gz,
        gx * gy * fz,
        fx * gy * fz,
        gx * fy * fz,
        fx * fy * fz,
    ]
}

/// Linear dynamic light falloff: 1 at the light, 0 at `intensity + radius` and beyond.
#[inline]
pub fn dlight_falloff(dist: f32, intensity: f32, radius: f32) -> f32 {
    let reach = intensity + radius;
    if reach <= 0.0 || dist > reach {
        return 0.0;
    }
    1.0 - dist / reach
}

#[inline]
fn rgb(c: [u8; 3]) -> Vec3 {
    Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32)
}

/// Read-only view over everything a point sample needs for the current frame.
#[derive(Clone, Copy)]
pub struct LightSampler<'a> {
    pub grid: Option<&'a LightGrid>,
    pub styles: &'a LightStyles,
    pub dlights: &'a DynamicLights,
    pub config: &'a SamplerConfig,
}

impl<'a> LightSampler<'a> {
    pub fn new(
        grid: Option<&'a LightGrid>,
        styles: &'a LightStyles,
        dlights: &'a DynamicLights,
        config: &'a SamplerConfig,
    ) -> Self {
        Self {
            grid,
            styles,
            dlights,
            config,
        }
    }

    /// Samples lighting at `origin`. With a nonzero `dynamic_radius`, dynamic
    /// lights whose reach (intensity + radius) covers the point are blended in;
    /// `Some(0.0)` behaves like `None`.
    pub fn sample_light(
        &self,
        origin: Vec3,
        want_ambient: bool,
        want_diffuse: bool,
        dynamic_radius: Option<f32>,
    ) -> LightSample {
        let dynamic_radius = dynamic_radius.filter(|r| *r != 0.0);
        let need_diffuse = want_diffuse || dynamic_radius.is_some();
        let mut ambient = Vec3::ZERO;
        let mut diffuse = Vec3::ZERO;

        let mut dir = match self.grid {
            None => DEFAULT_LIGHT_DIR,
            Some(grid) => {
                let dir = self.accumulate_grid(
                    grid,
                    origin,
                    want_ambient.then_some(&mut ambient),
                    need_diffuse.then_some(&mut diffuse),
                );
                if self.config.grayscale {
                    if want_ambient {
                        ambient = Vec3::splat(grayscale(ambient).clamp(0.0, 255.0));
                    }
                    if need_diffuse {
                        diffuse = Vec3::splat(grayscale(diffuse).clamp(0.0, 255.0));
                    }
                }
                dir
            }
        };

        if let Some(radius) = dynamic_radius {
            if self.config.dynamic.enabled() {
                self.blend_dlights(origin, radius, &mut dir, &mut ambient, &mut diffuse);
            }
        }
        dir = dir.normalized();

        let scale = self.config.map_light_color_scale / 255.0;
        let finish = |c: Vec3, knob: f32| {
            let s = knob.clamp(0.0, 1.0) * scale;
            [c.x * s, c.y * s, c.z * s, 1.0]
        };
        LightSample {
            direction: dir,
            ambient: want_ambient.then(|| finish(ambient, self.config.ambient_scale)),
            diffuse: want_diffuse.then(|| finish(diffuse, self.config.directed_scale)),
        }
    }

    /// Interpolates the 8 lattice corners around `origin`; returns the
    /// unnormalized, style-weighted direction.
    fn accumulate_grid(
        &self,
        grid: &LightGrid,
        origin: Vec3,
        mut ambient: Option<&mut Vec3>,
        mut diffuse: Option<&mut Vec3>,
    ) -> Vec3 {
        let mins = grid.mins();
        let cell = grid.cell_size();
        let bounds = grid.bounds();
        let mut base = [0i64; 3];
        let mut frac = [0.0f32; 3];
        for i in 0..3 {
            // keep the cell index one step outside the lattice at most; NaN lands on -1
            let f = ((origin.axis(i) - mins.axis(i)) / cell.axis(i))
                .max(-1.0)
                .min(bounds[i] as f32);
            let fl = f.floor();
            base[i] = fl as i64;
            frac[i] = f - fl;
        }
        let weights = trilinear_weights(Vec3::from_array(frac));

        let mut dir = Vec3::ZERO;
        for (k, &w) in weights.iter().enumerate() {
            let s = grid.sample_at(
                base[0] + (k & 1) as i64,
                base[1] + ((k >> 1) & 1) as i64,
                base[2] + ((k >> 2) & 1) as i64,
            );
            let tdir = lat_long_to_norm(s.direction) * w;
            for layer in s.present_layers() {
                let style = self.styles.rgb(layer.style);
                dir += tdir.mul_elem(style);
                if let Some(a) = ambient.as_deref_mut() {
                    *a += rgb(layer.ambient).mul_elem(style) * w;
                }
                if let Some(d) = diffuse.as_deref_mut() {
                    *d += rgb(layer.diffuse).mul_elem(style) * w;
                }
            }
        }
        dir
    }

    fn blend_dlights(
        &self,
        origin: Vec3,
        radius: f32,
        dir: &mut Vec3,
        ambient: &mut Vec3,
        diffuse: &mut Vec3,
    ) {
        let mut any = false;
        for dl in self.dlights.iter() {
            let delta = dl.origin - origin;
            let dist = delta.length();
            if dist > dl.intensity + radius {
                continue;
            }
            if !any {
                *dir = dir.normalized();
                any = true;
            }
            let add = dlight_falloff(dist, dl.intensity, radius);
            let c = dl.color * add;
            *diffuse += c;
            *ambient += c * DLIGHT_AMBIENT_FRACTION;
            // a light sitting exactly on the point has no direction to offer
            if dist > 0.0 {
                *dir += delta * (add * 0.5 / dist);
            }
        }
    }
}
