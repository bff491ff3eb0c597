use super::*;
use lumen_light::DynamicLight;

#[derive(Default)]
struct Shaders {
    loaded: Vec<(String, ShaderType, bool)>,
}

impl ShaderLoader for Shaders {
    fn load_shader(&mut self, name: &str, kind: ShaderType, force_default: bool) -> ShaderHandle {
        self.loaded.push((name.to_string(), kind, force_default));
        ShaderHandle(7)
    }
}

/// Blocks any trace that starts at one of the listed points.
struct Occluders(Vec<Vec3>);

impl LineTracer for Occluders {
    fn trace_line(&self, start: Vec3, end: Vec3, skip: SurfaceFlags) -> Trace {
        assert!(skip.intersects(SurfaceFlags::NONSOLID));
        if self.0.contains(&start) {
            Trace {
                fraction: 0.5,
                end: start + (end - start) * 0.5,
            }
        } else {
            Trace { fraction: 1.0, end }
        }
    }
}

struct FogAbove(f32);

impl FogLookup for FogAbove {
    fn fog_for_sphere(&self, origin: Vec3, radius: f32) -> Option<FogId> {
        assert_eq!(radius, 1.0);
        (origin.z > self.0).then_some(FogId(1))
    }
}

fn view() -> ViewParams {
    ViewParams {
        origin: Vec3::ZERO,
        forward: Vec3::new(1.0, 0.0, 0.0),
        right: Vec3::new(0.0, -1.0, 0.0),
        up: Vec3::new(0.0, 0.0, 1.0),
        mirrored: false,
    }
}

fn renderer() -> CoronaRenderer {
    CoronaRenderer::init(&mut Shaders::default(), CoronaConfig { scale: 1.0 })
}

fn light_at(x: f32) -> DynamicLight {
    DynamicLight::new(Vec3::new(x, 0.0, 0.0), 10.0, Vec3::new(1.0, 0.5, 0.25))
}

#[test]
fn init_loads_glow_shader() {
    let mut shaders = Shaders::default();
    let r = CoronaRenderer::init(&mut shaders, CoronaConfig::default());
    assert_eq!(
        shaders.loaded,
        [(CORONA_SHADER_NAME.to_string(), ShaderType::Corona, true)]
    );
    assert_eq!(r.shader(), Some(ShaderHandle(7)));
    assert_eq!(r.config().scale, 0.4);
}

#[test]
fn near_clip_excludes_24_and_keeps_25() {
    let r = renderer();
    let lights: DynamicLights = [light_at(24.0), light_at(25.0)].into_iter().collect();
    let mut out: Vec<DrawSurface> = Vec::new();
    let n = r.draw_coronas(
        DynamicLightMode::Full,
        &view(),
        &lights,
        &Occluders(vec![]),
        &FogAbove(100.0),
        &mut out,
    );
    assert_eq!(n, 1);
    assert_eq!(
        out,
        [DrawSurface {
            fog: None,
            shader: ShaderHandle(7),
            sort_depth: 15.0,
            token: CoronaToken(1),
        }]
    );
}

#[test]
fn occluded_lights_are_skipped() {
    let r = renderer();
    let lights: DynamicLights = [light_at(25.0), light_at(40.0)].into_iter().collect();
    let mut out: Vec<DrawSurface> = Vec::new();
    let tracer = Occluders(vec![Vec3::new(25.0, 0.0, 0.0)]);
    r.draw_coronas(DynamicLightMode::Full, &view(), &lights, &tracer, &FogAbove(100.0), &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].token, CoronaToken(1));
}

#[test]
fn lights_behind_the_view_are_skipped() {
    let r = renderer();
    let lights: DynamicLights = [light_at(-100.0)].into_iter().collect();
    let mut out: Vec<DrawSurface> = Vec::new();
    r.draw_coronas(DynamicLightMode::Full, &view(), &lights, &Occluders(vec![]), &FogAbove(0.0), &mut out);
    assert!(out.is_empty());
}

#[test]
fn coronas_need_full_dynamic_lighting() {
    let r = renderer();
    let lights: DynamicLights = [light_at(100.0)].into_iter().collect();
    for mode in [DynamicLightMode::Off, DynamicLightMode::On] {
        let mut out: Vec<DrawSurface> = Vec::new();
        let n = r.draw_coronas(mode, &view(), &lights, &Occluders(vec![]), &FogAbove(0.0), &mut out);
        assert_eq!(n, 0);
        assert!(out.is_empty());
    }
}

#[test]
fn fog_is_looked_up_at_the_light() {
    let r = renderer();
    let mut high = light_at(100.0);
    high.origin.z = 50.0;
    let lights: DynamicLights = [light_at(100.0), high].into_iter().collect();
    let mut out: Vec<DrawSurface> = Vec::new();
    r.draw_coronas(DynamicLightMode::Full, &view(), &lights, &Occluders(vec![]), &FogAbove(10.0), &mut out);
    assert_eq!(out[0].fog, None);
    assert_eq!(out[1].fog, Some(FogId(1)));
}

#[test]
fn shutdown_stops_drawing() {
    let mut r = renderer();
    r.shutdown();
    assert_eq!(r.shader(), None);
    let lights: DynamicLights = [light_at(100.0)].into_iter().collect();
    let mut out: Vec<DrawSurface> = Vec::new();
    r.draw_coronas(DynamicLightMode::Full, &view(), &lights, &Occluders(vec![]), &FogAbove(0.0), &mut out);
    assert!(out.is_empty());
}

#[test]
fn quad_faces_the_camera() {
    let r = renderer();
    let lights: DynamicLights = [light_at(100.0)].into_iter().collect();
    let q = r.batch_corona(CoronaToken(0), &view(), &lights).unwrap();
    // left is view right = -Y, so "- left" is +Y
    assert_eq!(
        q.xyz,
        [
            Vec3::new(100.0, 10.0, -10.0),
            Vec3::new(100.0, 10.0, 10.0),
            Vec3::new(100.0, -10.0, 10.0),
            Vec3::new(100.0, -10.0, -10.0),
        ]
    );
    assert_eq!(q.texcoords, [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
    assert_eq!(q.normals, [Vec3::ZERO; 4]);
    assert_eq!(q.colors, [[255, 127, 63, 255]; 4]);
}

#[test]
fn mirrored_view_flips_horizontal_axis() {
    let r = renderer();
    let lights: DynamicLights = [light_at(100.0)].into_iter().collect();
    let plain = r.batch_corona(CoronaToken(0), &view(), &lights).unwrap();
    let mirrored = ViewParams {
        mirrored: true,
        ..view()
    };
    let flipped = r.batch_corona(CoronaToken(0), &mirrored, &lights).unwrap();
    assert_eq!(flipped.xyz[0], plain.xyz[3]);
    assert_eq!(flipped.xyz[1], plain.xyz[2]);
}

#[test]
fn corona_color_is_scaled_and_clamped() {
    let mut shaders = Shaders::default();
    let dim = CoronaRenderer::init(&mut shaders, CoronaConfig { scale: 0.5 });
    let hot = DynamicLight::new(Vec3::new(100.0, 0.0, 0.0), 5.0, Vec3::new(4.0, -1.0, 1.0));
    let lights: DynamicLights = [hot].into_iter().collect();
    let q = dim.batch_corona(CoronaToken(0), &view(), &lights).unwrap();
    assert_eq!(q.colors[0], [255, 0, 127, 255]);

    let over = CoronaRenderer::init(&mut shaders, CoronaConfig { scale: 3.0 });
    let q = over.batch_corona(CoronaToken(0), &view(), &lights).unwrap();
    assert_eq!(q.colors[2], [255, 0, 255, 255]);
}

#[test]
fn stale_token_has_no_quad() {
    let r = renderer();
    let lights = DynamicLights::new();
    assert_eq!(r.batch_corona(CoronaToken(3), &view(), &lights), None);
}

#[test]
fn corona_config_from_toml() {
    let cfg: CoronaConfig = toml::from_str("scale = 0.75").unwrap();
    assert_eq!(cfg.scale, 0.75);
    let cfg: CoronaConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.scale, 0.4);
}
