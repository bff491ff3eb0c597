//! Renderer services the corona pass calls into.

use lumen_geom::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderType {
    /// Additive camera-facing glow.
    Corona,
}

pub trait ShaderLoader {
    /// `force_default` builds the shader from its built-in definition even
    /// when a script of the same name exists.
    fn load_shader(&mut self, name: &str, kind: ShaderType, force_default: bool) -> ShaderHandle;
}

/// Surface flags understood by the tracer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceFlags(u32);

impl SurfaceFlags {
    pub const NONE: SurfaceFlags = SurfaceFlags(0);
    /// Surfaces that do not block movement (glass, grates, water).
    pub const NONSOLID: SurfaceFlags = SurfaceFlags(1 << 14);

    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn intersects(self, other: SurfaceFlags) -> bool {
        self.0 & other.0 != 0
    }
}

/// Result of a line trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trace {
    /// Share of the segment travelled before a hit; 1.0 means unobstructed.
    pub fraction: f32,
    pub end: Vec3,
}

pub trait LineTracer {
    /// Traces `start -> end`, ignoring surfaces that carry any of `skip`.
    fn trace_line(&self, start: Vec3, end: Vec3, skip: SurfaceFlags) -> Trace;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FogId(pub u32);

pub trait FogLookup {
    fn fog_for_sphere(&self, origin: Vec3, radius: f32) -> Option<FogId>;
}

/// Index of the dynamic light a corona surface draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoronaToken(pub usize);

/// One entry queued for the backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawSurface {
    pub fog: Option<FogId>,
    pub shader: ShaderHandle,
    pub sort_depth: f32,
    pub token: CoronaToken,
}

pub trait DrawList {
    fn add_draw_surface(&mut self, surface: DrawSurface);
}

impl DrawList for Vec<DrawSurface> {
    fn add_draw_surface(&mut self, surface: DrawSurface) {
        self.push(surface);
    }
}
