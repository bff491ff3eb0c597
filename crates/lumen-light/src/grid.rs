use std::collections::HashMap;
use std::fmt;

use lumen_geom::Vec3;

use crate::MAX_LIGHTMAPS;

/// One animated light layer of a grid sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StyleLayer {
    pub style: u8,
    pub ambient: [u8; 3],
    pub diffuse: [u8; 3],
}

/// Baked lighting at one lattice point of the light grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightGridSample {
    /// Layers in priority order; the first `None` ends the list.
    pub layers: [Option<StyleLayer>; MAX_LIGHTMAPS],
    /// Dominant incoming direction, lat/long quantized.
    pub direction: [u8; 2],
}

impl LightGridSample {
    /// Sample with a single layer on style 0.
    pub fn single(ambient: [u8; 3], diffuse: [u8; 3], direction: [u8; 2]) -> Self {
        let mut layers = [None; MAX_LIGHTMAPS];
        layers[0] = Some(StyleLayer {
            style: 0,
            ambient,
            diffuse,
        });
        Self { layers, direction }
    }

    #[inline]
    pub fn present_layers(&self) -> impl Iterator<Item = StyleLayer> + '_ {
        self.layers.iter().map_while(|l| *l)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    EmptyBounds([usize; 3]),
    BadCellSize(Vec3),
    IndexLength { expected: usize, got: usize },
    IndexOutOfRange { at: usize, value: u32, samples: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::EmptyBounds(b) => write!(f, "light grid has empty bounds {:?}", b),
            GridError::BadCellSize(s) => write!(f, "light grid cell size must be positive, got {:?}", s),
            GridError::IndexLength { expected, got } => {
                write!(f, "light grid index has {} entries, expected {}", got, expected)
            }
            GridError::IndexOutOfRange { at, value, samples } => write!(
                f,
                "light grid index {} points at sample {} of {}",
                at, value, samples
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Volumetric lattice of baked light samples.
///
/// Lattice points are stored x-fastest: `index = z * plane + y * row + x`
/// with `row = bounds[0]` and `plane = bounds[0] * bounds[1]`. Each lattice
/// point refers into a table of distinct samples.
#[derive(Clone, Debug)]
pub struct LightGrid {
    mins: Vec3,
    cell_size: Vec3,
    bounds: [usize; 3],
    samples: Vec<LightGridSample>,
    index: Vec<u32>,
}

impl LightGrid {
    pub fn new(
        mins: Vec3,
        cell_size: Vec3,
        bounds: [usize; 3],
        samples: Vec<LightGridSample>,
        index: Vec<u32>,
    ) -> Result<Self, GridError> {
        if bounds.contains(&0) {
            return Err(GridError::EmptyBounds(bounds));
        }
        if !(cell_size.x > 0.0 && cell_size.y > 0.0 && cell_size.z > 0.0) {
            return Err(GridError::BadCellSize(cell_size));
        }
        let expected = bounds[0] * bounds[1] * bounds[2];
        if index.len() != expected {
            return Err(GridError::IndexLength {
                expected,
                got: index.len(),
            });
        }
        if let Some((at, &value)) = index
            .iter()
            .enumerate()
            .find(|(_, v)| **v as usize >= samples.len())
        {
            return Err(GridError::IndexOutOfRange {
                at,
                value,
                samples: samples.len(),
            });
        }
        log::debug!(
            "light grid {}x{}x{} at {:?}, cell {:?}: {} distinct sample(s)",
            bounds[0],
            bounds[1],
            bounds[2],
            mins,
            cell_size,
            samples.len()
        );
        Ok(Self {
            mins,
            cell_size,
            bounds,
            samples,
            index,
        })
    }

    /// Builds a grid from one sample per lattice point, sharing identical samples.
    pub fn from_lattice(
        mins: Vec3,
        cell_size: Vec3,
        bounds: [usize; 3],
        lattice: Vec<LightGridSample>,
    ) -> Result<Self, GridError> {
        let mut distinct: Vec<LightGridSample> = Vec::new();
        let mut seen: HashMap<LightGridSample, u32> = HashMap::new();
        let index = lattice
            .into_iter()
            .map(|s| {
                *seen.entry(s).or_insert_with(|| {
                    distinct.push(s);
                    (distinct.len() - 1) as u32
                })
            })
            .collect();
        Self::new(mins, cell_size, bounds, distinct, index)
    }

    #[inline]
    pub fn mins(&self) -> Vec3 {
        self.mins
    }

    #[inline]
    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    #[inline]
    pub fn bounds(&self) -> [usize; 3] {
        self.bounds
    }

    #[inline]
    pub fn row_stride(&self) -> usize {
        self.bounds[0]
    }

    #[inline]
    pub fn plane_stride(&self) -> usize {
        self.bounds[0] * self.bounds[1]
    }

    pub fn num_points(&self) -> usize {
        self.index.len()
    }

    pub fn num_distinct(&self) -> usize {
        self.samples.len()
    }

    /// Sample at a lattice coordinate; each axis is clamped into the grid.
    #[inline]
    pub fn sample_at(&self, x: i64, y: i64, z: i64) -> &LightGridSample {
        let cx = x.clamp(0, self.bounds[0] as i64 - 1) as usize;
        let cy = y.clamp(0, self.bounds[1] as i64 - 1) as usize;
        let cz = z.clamp(0, self.bounds[2] as i64 - 1) as usize;
        let i = cz * self.plane_stride() + cy * self.row_stride() + cx;
        &self.samples[self.index[i] as usize]
    }

    /// World position of a lattice point.
    #[inline]
    pub fn point_origin(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.mins + Vec3::new(x as f32, y as f32, z as f32).mul_elem(self.cell_size)
    }
}
