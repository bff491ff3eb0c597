/// Where a source block landed: atlas texture index plus the transform from
/// the block's own UVs into atlas UVs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightmapRect {
    pub texture: usize,
    /// Row 0 is (s-scale, s-offset), row 1 is (t-scale, t-offset).
    pub tex_matrix: [[f32; 2]; 2],
}

impl LightmapRect {
    /// A block that fills its whole texture.
    pub const fn whole(texture: usize) -> Self {
        Self {
            texture,
            tex_matrix: [[1.0, 0.0], [1.0, 0.0]],
        }
    }

    #[inline]
    pub fn scale(&self) -> [f32; 2] {
        [self.tex_matrix[0][0], self.tex_matrix[1][0]]
    }

    #[inline]
    pub fn offset(&self) -> [f32; 2] {
        [self.tex_matrix[0][1], self.tex_matrix[1][1]]
    }

    /// Maps a block-local UV into the atlas.
    #[inline]
    pub fn apply(&self, uv: [f32; 2]) -> [f32; 2] {
        [
            uv[0] * self.tex_matrix[0][0] + self.tex_matrix[0][1],
            uv[1] * self.tex_matrix[1][0] + self.tex_matrix[1][1],
        ]
    }

    /// Cells of the atlas grid this rect belongs to, as (columns, rows).
    pub fn grid(&self) -> [usize; 2] {
        let [s, t] = self.scale();
        let cells = |v: f32| if v > 0.0 { (1.0 / v).round() as usize } else { 0 };
        [cells(s), cells(t)]
    }

    /// Top-left texel of the block inside its atlas.
    pub fn texel_origin(&self, block_width: usize, block_height: usize) -> [usize; 2] {
        let [cols, rows] = self.grid();
        let [ox, oy] = self.offset();
        [
            (ox * cols as f32).round() as usize * block_width,
            (oy * rows as f32).round() as usize * block_height,
        ]
    }
}
