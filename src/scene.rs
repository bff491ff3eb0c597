//! Synthetic scene data standing in for a loaded map.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use lumen_geom::Vec3;
use lumen_light::{
    DynamicLight, DynamicLights, GridError, LightGrid, LightGridSample, LightStyles, StyleLayer,
};
use lumen_lightmap::LIGHTMAP_BYTES;

/// Direction-block texel for a surface-normal light direction.
const FLAT_DIRECTION: [u8; 3] = [127, 127, 255];

fn noise(seed: i32, frequency: f32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(frequency));
    noise
}

#[inline]
fn unit(n: f32) -> f32 {
    (n * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// `count` warm-tinted noise lightmap blocks of `w x h` texels. With `deluxe`
/// every color block is followed by a direction block.
pub fn demo_lightmaps(count: usize, w: usize, h: usize, seed: i32, deluxe: bool) -> Vec<u8> {
    let n = noise(seed, 0.05);
    let per_block = if deluxe { 2 } else { 1 };
    let mut out = Vec::with_capacity(count * per_block * w * h * LIGHTMAP_BYTES);
    for b in 0..count {
        for y in 0..h {
            for x in 0..w {
                let v = unit(n.get_noise_2d((b * w + x) as f32, y as f32)) * 255.0;
                out.extend_from_slice(&[v as u8, (v * 0.85) as u8, (v * 0.6) as u8]);
            }
        }
        if deluxe {
            for _ in 0..w * h {
                out.extend_from_slice(&FLAT_DIRECTION);
            }
        }
    }
    out
}

/// Noise-lit light grid covering `bounds` lattice points from the origin.
/// Every fourth point carries a second layer on style 1.
pub fn demo_grid(seed: i32, bounds: [usize; 3], cell: f32) -> Result<LightGrid, GridError> {
    let n = noise(seed, 0.2);
    let mut lattice = Vec::with_capacity(bounds[0] * bounds[1] * bounds[2]);
    for z in 0..bounds[2] {
        for y in 0..bounds[1] {
            for x in 0..bounds[0] {
                let v = unit(n.get_noise_3d(x as f32, y as f32, z as f32));
                let a = (v * 96.0) as u8;
                let d = (v * 224.0) as u8;
                let mut s = LightGridSample::single(
                    [a, a, a.saturating_add(16)],
                    [d, d, d / 2],
                    [(v * 64.0) as u8, ((x * 37 + y * 11) % 256) as u8],
                );
                if (x + y + z) % 4 == 0 {
                    s.layers[1] = Some(StyleLayer {
                        style: 1,
                        ambient: [a / 2, 0, 0],
                        diffuse: [d / 2, d / 4, 0],
                    });
                }
                lattice.push(s);
            }
        }
    }
    LightGrid::from_lattice(Vec3::ZERO, Vec3::splat(cell), bounds, lattice)
}

/// Style table with style 1 dimmed as if mid-flicker.
pub fn demo_styles() -> LightStyles {
    let mut styles = LightStyles::new();
    styles.set(1, Vec3::new(0.8, 0.55, 0.3));
    styles
}

/// `count` lights spaced along +Y, alternating warm and cool.
pub fn demo_lights(count: usize) -> DynamicLights {
    (0..count)
        .map(|i| {
            let color = if i % 2 == 0 {
                Vec3::new(1.0, 0.7, 0.3)
            } else {
                Vec3::new(0.3, 0.6, 1.0)
            };
            let x = if i % 2 == 0 { -48.0 } else { 48.0 };
            DynamicLight::new(Vec3::new(x, 16.0 + 40.0 * i as f32, 32.0), 120.0, color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lightmap_blocks_have_expected_layout() {
        let plain = demo_lightmaps(3, 4, 2, 7, false);
        assert_eq!(plain.len(), 3 * 4 * 2 * LIGHTMAP_BYTES);
        let deluxe = demo_lightmaps(3, 4, 2, 7, true);
        assert_eq!(deluxe.len(), 2 * plain.len());
        // second block of the interleaved data is a direction block
        let dir = &deluxe[4 * 2 * LIGHTMAP_BYTES..2 * 4 * 2 * LIGHTMAP_BYTES];
        assert!(dir.chunks_exact(3).all(|t| t == FLAT_DIRECTION));
        // color data is identical with and without direction blocks
        assert_eq!(&deluxe[..4 * 2 * LIGHTMAP_BYTES], &plain[..4 * 2 * LIGHTMAP_BYTES]);
    }

    #[test]
    fn grid_covers_bounds() {
        let grid = demo_grid(3, [4, 3, 2], 64.0).unwrap();
        assert_eq!(grid.num_points(), 24);
        assert!(grid.num_distinct() <= 24);
        assert!(grid.sample_at(0, 0, 0).layers[1].is_some());
    }

    #[test]
    fn lights_stay_under_the_frame_limit() {
        let lights = demo_lights(100);
        assert_eq!(lights.len(), lumen_light::MAX_DLIGHTS);
    }
}
