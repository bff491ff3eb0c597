//! Stand-in renderer services so the corona pass can run without a GPU.

use lumen_corona::{
    FogId, FogLookup, LineTracer, ShaderHandle, ShaderLoader, ShaderType, SurfaceFlags, Trace,
};
use lumen_geom::Vec3;

/// Infinite wall on the plane `y = distance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub distance: f32,
    pub flags: SurfaceFlags,
}

impl Wall {
    pub fn solid(distance: f32) -> Self {
        Self {
            distance,
            flags: SurfaceFlags::NONE,
        }
    }

    pub fn glass(distance: f32) -> Self {
        Self {
            distance,
            flags: SurfaceFlags::NONSOLID,
        }
    }
}

/// Traces against a set of axis-aligned walls.
#[derive(Clone, Debug, Default)]
pub struct WallTracer {
    pub walls: Vec<Wall>,
}

impl LineTracer for WallTracer {
    fn trace_line(&self, start: Vec3, end: Vec3, skip: SurfaceFlags) -> Trace {
        let dy = end.y - start.y;
        let mut fraction = 1.0f32;
        for wall in &self.walls {
            if wall.flags.intersects(skip) || dy == 0.0 {
                continue;
            }
            let t = (wall.distance - start.y) / dy;
            if (0.0..1.0).contains(&t) && t < fraction {
                fraction = t;
            }
        }
        Trace {
            fraction,
            end: start + (end - start) * fraction,
        }
    }
}

/// Everything below `level` sits in fog volume 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroundFog {
    pub level: Option<f32>,
}

impl FogLookup for GroundFog {
    fn fog_for_sphere(&self, origin: Vec3, radius: f32) -> Option<FogId> {
        let level = self.level?;
        (origin.z - radius < level).then_some(FogId(0))
    }
}

/// Hands out sequential shader handles and remembers what was asked for.
#[derive(Clone, Debug, Default)]
pub struct ShaderTable {
    pub names: Vec<String>,
}

impl ShaderLoader for ShaderTable {
    fn load_shader(&mut self, name: &str, kind: ShaderType, force_default: bool) -> ShaderHandle {
        log::debug!("shader {} ({:?}, force default {})", name, kind, force_default);
        self.names.push(name.to_string());
        ShaderHandle((self.names.len() - 1) as u32)
    }
}
