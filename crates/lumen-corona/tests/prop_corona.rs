use lumen_geom::Vec3;
use lumen_light::{DynamicLight, DynamicLightMode, DynamicLights};
use lumen_corona::{
    CoronaConfig, CoronaRenderer, CoronaToken, DrawSurface, FogId, FogLookup, LineTracer,
    ShaderHandle, ShaderLoader, ShaderType, SurfaceFlags, Trace, ViewParams,
};
use proptest::prelude::*;

struct OneShader;
impl ShaderLoader for OneShader {
    fn load_shader(&mut self, _: &str, _: ShaderType, _: bool) -> ShaderHandle {
        ShaderHandle(1)
    }
}

struct Open;
impl LineTracer for Open {
    fn trace_line(&self, _: Vec3, end: Vec3, _: SurfaceFlags) -> Trace {
        Trace { fraction: 1.0, end }
    }
}

struct NoFog;
impl FogLookup for NoFog {
    fn fog_for_sphere(&self, _: Vec3, _: f32) -> Option<FogId> {
        None
    }
}

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn coord() -> impl Strategy<Value = f32> {
    -500.0f32..500.0
}

fn view() -> ViewParams {
    ViewParams {
        origin: Vec3::new(0.0, 0.0, 0.0),
        forward: Vec3::new(0.0, 1.0, 0.0),
        right: Vec3::new(1.0, 0.0, 0.0),
        up: Vec3::new(0.0, 0.0, 1.0),
        mirrored: false,
    }
}

proptest! {
    // A corona is queued exactly when the light is past the near clip distance
    #[test]
    fn queued_iff_past_near_clip(x in coord(), y in coord(), z in coord(), intensity in 1.0f32..300.0) {
        let r = CoronaRenderer::init(&mut OneShader, CoronaConfig::default());
        let lights: DynamicLights = [DynamicLight::new(Vec3::new(x, y, z), intensity, Vec3::ONE)].into_iter().collect();
        let mut out: Vec<DrawSurface> = Vec::new();
        let n = r.draw_coronas(DynamicLightMode::Full, &view(), &lights, &Open, &NoFog, &mut out);
        prop_assert_eq!(n == 1, y > 24.0);
        if let Some(s) = out.first() {
            prop_assert!(approx(s.sort_depth, y - intensity, 1e-3));
        }
    }

    // The quad is a 2r square centered on the light
    #[test]
    fn quad_centered_on_light(x in coord(), y in coord(), z in coord(), intensity in 1.0f32..300.0, mirrored in any::<bool>()) {
        let r = CoronaRenderer::init(&mut OneShader, CoronaConfig::default());
        let origin = Vec3::new(x, y, z);
        let lights: DynamicLights = [DynamicLight::new(origin, intensity, Vec3::ONE)].into_iter().collect();
        let v = ViewParams { mirrored, ..view() };
        let q = r.batch_corona(CoronaToken(0), &v, &lights).unwrap();
        let center = (q.xyz[0] + q.xyz[1] + q.xyz[2] + q.xyz[3]) * 0.25;
        prop_assert!((center - origin).length() < 1e-2);
        prop_assert!(approx(q.xyz[0].distance(q.xyz[1]), 2.0 * intensity, 1e-2));
        prop_assert!(approx(q.xyz[1].distance(q.xyz[2]), 2.0 * intensity, 1e-2));
    }
}
