//! Subcommand runners.

use std::error::Error;

use clap::Args;
use lumen_corona::{CoronaRenderer, DrawSurface, ViewParams};
use lumen_geom::Vec3;
use lumen_light::{DynamicLightMode, DynamicLights, LightSampler};
use lumen_lightmap::{
    LightmapImages, LightmapRect, MemoryImages, RawLightmaps, build_lightmaps,
    touch_lightmap_images,
};
use lumen_styles::{StyleHandle, SuperLightStyles};

use crate::config::LumenConfig;
use crate::headless::{GroundFog, ShaderTable, Wall, WallTracer};
use crate::scene;

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Number of color lightmap blocks to generate
    #[arg(long, default_value_t = 9)]
    pub blocks: usize,
    /// Block width and height in texels
    #[arg(long, default_value_t = 128)]
    pub size: usize,
    #[arg(long, default_value_t = 1337)]
    pub seed: i32,
    /// Upload every block as its own texture
    #[arg(long)]
    pub no_packing: bool,
    /// Interleave a direction block after every color block
    #[arg(long)]
    pub deluxe: bool,
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Point to sample (X Y Z)
    #[arg(num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true, default_values_t = [96.0, 96.0, 64.0])]
    pub point: Vec<f32>,
    /// Blend in dynamic lights reaching this far past their intensity
    #[arg(long)]
    pub radius: Option<f32>,
    /// Number of dynamic lights in the scene
    #[arg(long, default_value_t = 4)]
    pub lights: usize,
    /// Sample without a baked light grid
    #[arg(long)]
    pub no_grid: bool,
    #[arg(long, default_value_t = 1337)]
    pub seed: i32,
}

#[derive(Args, Debug)]
pub struct CoronaArgs {
    #[arg(long, default_value_t = 8)]
    pub lights: usize,
    /// Solid wall at this distance ahead of the camera (repeatable)
    #[arg(long)]
    pub wall: Vec<f32>,
    /// Non-solid wall at this distance ahead of the camera (repeatable)
    #[arg(long)]
    pub glass: Vec<f32>,
    /// Fog everything below this height
    #[arg(long, allow_hyphen_values = true)]
    pub fog_level: Option<f32>,
    /// Render as seen in a mirror
    #[arg(long)]
    pub mirrored: bool,
    /// Force dynamic light mode "full" regardless of config
    #[arg(long)]
    pub full: bool,
}

#[derive(Args, Debug)]
pub struct StylesArgs {
    /// Number of synthetic surfaces to register
    #[arg(long, default_value_t = 16)]
    pub surfaces: usize,
    #[arg(long, default_value_t = 6)]
    pub blocks: usize,
    #[arg(long, default_value_t = 64)]
    pub size: usize,
    #[arg(long, default_value_t = 1337)]
    pub seed: i32,
}

struct PackedScene {
    uploader: MemoryImages,
    images: LightmapImages,
    rects: Vec<LightmapRect>,
}

fn pack_scene(
    config: &mut LumenConfig,
    blocks: usize,
    size: usize,
    seed: i32,
    deluxe: bool,
) -> PackedScene {
    if deluxe {
        config.lightmaps.deluxe_maps = true;
    }
    let count = if config.lightmaps.deluxe_maps { blocks * 2 } else { blocks };
    let data = scene::demo_lightmaps(blocks, size, size, seed, config.lightmaps.deluxe_maps);
    let raw = RawLightmaps::new(size, size, count, Some(&data));
    let mut rects = vec![LightmapRect::default(); count];
    let mut uploader = MemoryImages::new();
    let images = build_lightmaps(&mut config.lightmaps, raw, &mut rects, &mut uploader);
    PackedScene {
        uploader,
        images,
        rects,
    }
}

pub fn pack(config: &mut LumenConfig, args: &PackArgs) -> Result<(), Box<dyn Error>> {
    if args.no_packing {
        config.lightmaps.packing = false;
    }
    let scene = pack_scene(config, args.blocks, args.size, args.seed, args.deluxe);

    println!("{} texture(s)", scene.images.len());
    for (i, handle) in scene.images.handles().iter().enumerate() {
        if let Some(img) = scene.uploader.get(*handle) {
            println!("  [{}] {} {}x{}", i, img.name, img.width, img.height);
        }
    }
    let stride = if config.lightmaps.deluxe_maps && !config.lightmaps.deluxe_mapping {
        2
    } else {
        1
    };
    for (i, rect) in scene.rects.iter().enumerate().step_by(stride) {
        let [s, t] = rect.scale();
        let [u, v] = rect.offset();
        println!(
            "  block {:>3} -> texture {} scale ({:.4}, {:.4}) offset ({:.4}, {:.4})",
            i, rect.texture, s, t, u, v
        );
    }

    let mut uploader = scene.uploader;
    touch_lightmap_images(&scene.images, &mut uploader);
    Ok(())
}

pub fn sample(config: &LumenConfig, args: &SampleArgs) -> Result<(), Box<dyn Error>> {
    let grid = if args.no_grid {
        None
    } else {
        Some(scene::demo_grid(args.seed, [8, 8, 4], 64.0)?)
    };
    let styles = scene::demo_styles();
    let lights = scene::demo_lights(args.lights);
    let point = match args.point.as_slice() {
        [x, y, z] => Vec3::new(*x, *y, *z),
        other => return Err(format!("expected 3 coordinates, got {}", other.len()).into()),
    };

    let sampler = LightSampler::new(grid.as_ref(), &styles, &lights, &config.lighting);
    let out = sampler.sample_light(point, true, true, args.radius);
    let d = out.direction;
    println!("point     ({:.2}, {:.2}, {:.2})", point.x, point.y, point.z);
    println!("direction ({:.4}, {:.4}, {:.4})", d.x, d.y, d.z);
    if let Some([r, g, b, _]) = out.ambient {
        println!("ambient   ({:.4}, {:.4}, {:.4})", r, g, b);
    }
    if let Some([r, g, b, _]) = out.diffuse {
        println!("diffuse   ({:.4}, {:.4}, {:.4})", r, g, b);
    }
    Ok(())
}

fn demo_view(mirrored: bool) -> ViewParams {
    ViewParams {
        origin: Vec3::new(0.0, -64.0, 32.0),
        forward: Vec3::new(0.0, 1.0, 0.0),
        right: Vec3::new(1.0, 0.0, 0.0),
        up: Vec3::new(0.0, 0.0, 1.0),
        mirrored,
    }
}

pub fn coronas(config: &mut LumenConfig, args: &CoronaArgs) -> Result<(), Box<dyn Error>> {
    if args.full {
        config.lighting.dynamic = DynamicLightMode::Full;
    }
    if !config.lighting.dynamic.draws_coronas() {
        log::warn!(
            "dynamic light mode is {:?}; coronas are only drawn in \"full\" mode",
            config.lighting.dynamic
        );
    }

    let view = demo_view(args.mirrored);
    let lights: DynamicLights = scene::demo_lights(args.lights);
    let tracer = WallTracer {
        walls: args
            .wall
            .iter()
            .map(|d| Wall::solid(view.origin.y + d))
            .chain(args.glass.iter().map(|d| Wall::glass(view.origin.y + d)))
            .collect(),
    };
    let fog = GroundFog {
        level: args.fog_level,
    };

    let mut shaders = ShaderTable::default();
    let mut renderer = CoronaRenderer::init(&mut shaders, config.corona.clone());
    let mut queued: Vec<DrawSurface> = Vec::new();
    let n = renderer.draw_coronas(
        config.lighting.dynamic,
        &view,
        &lights,
        &tracer,
        &fog,
        &mut queued,
    );
    println!("{} of {} corona(s) queued", n, lights.len());

    for surf in &queued {
        let Some(quad) = renderer.batch_corona(surf.token, &view, &lights) else {
            continue;
        };
        let [r, g, b, _] = quad.colors[0];
        println!(
            "  light {:>2} depth {:>8.2} fog {:?} color ({}, {}, {})",
            surf.token.0, surf.sort_depth, surf.fog, r, g, b
        );
        for v in &quad.xyz {
            println!("      ({:>8.2}, {:>8.2}, {:>8.2})", v.x, v.y, v.z);
        }
    }
    renderer.shutdown();
    Ok(())
}

pub fn styles(config: &mut LumenConfig, args: &StylesArgs) -> Result<(), Box<dyn Error>> {
    let scene = pack_scene(config, args.blocks.max(1), args.size, args.seed, false);
    let stride = if config.lightmaps.deluxe_maps && !config.lightmaps.deluxe_mapping {
        2
    } else {
        1
    };
    let color_rects: Vec<&LightmapRect> = scene.rects.iter().step_by(stride).collect();
    if color_rects.is_empty() {
        return Err("no lightmaps were packed".into());
    }

    let mut registry = SuperLightStyles::new();
    let mut handles: Vec<StyleHandle> = Vec::with_capacity(args.surfaces);
    for s in 0..args.surfaces {
        let rect = color_rects[s % color_rects.len()];
        let mut lightmaps = [None; 4];
        let mut lightmap_styles = [None; 4];
        let mut vertex_styles = [None; 4];
        lightmaps[0] = Some(rect.texture);
        lightmap_styles[0] = Some(0);
        vertex_styles[0] = Some(0);
        if s % 3 == 0 {
            let style = 1 + (s % 2) as u8;
            lightmaps[1] = Some(rect.texture);
            lightmap_styles[1] = Some(style);
            vertex_styles[1] = Some(style);
        }
        handles.push(registry.register(
            lightmaps,
            lightmap_styles,
            vertex_styles,
            &[Some(rect), Some(rect)],
        )?);
    }

    let remap = registry.sort();
    for h in &mut handles {
        *h = StyleHandle(remap[h.0]);
    }
    println!("{} surface(s) -> {} super style(s)", args.surfaces, registry.len());
    for (i, sls) in registry.iter().enumerate() {
        let users = handles.iter().filter(|h| h.0 == i).count();
        println!(
            "  [{:>3}] lightmaps {:?} styles {:?} vattribs {:#05b} step0 ({:.3}, {:.3}) used by {}",
            i,
            sls.lightmaps,
            sls.lightmap_styles,
            sls.vattribs.bits(),
            sls.st_offset[0][0],
            sls.st_offset[0][1],
            users
        );
    }
    Ok(())
}
