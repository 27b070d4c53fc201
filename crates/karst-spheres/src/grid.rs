use karst_geom::{Aabb, Vec3};

/// Sentinel for an unoccupied cell.
pub const EMPTY_CELL: u32 = u32::MAX;

/// Uniform spatial hash over the packing volume. One occupant per cell:
/// the cell diagonal equals `2 * min_radius`, so two accepted sphere
/// centers can never land in the same cell.
#[derive(Clone, Debug)]
pub struct SphereGrid {
    origin: Vec3,
    cell_size: f32,
    nx: i32,
    ny: i32,
    nz: i32,
    cells: Vec<u32>,
}

impl SphereGrid {
    pub fn new(bounds: Aabb, min_radius: f32) -> Self {
        let cell_size = 2.0 * min_radius / 3.0f32.sqrt();
        let size = bounds.size();
        let nx = (size.x / cell_size).ceil().max(1.0) as i32;
        let ny = (size.y / cell_size).ceil().max(1.0) as i32;
        let nz = (size.z / cell_size).ceil().max(1.0) as i32;
        Self {
            origin: bounds.min,
            cell_size,
            nx,
            ny,
            nz,
            cells: vec![EMPTY_CELL; (nx * ny * nz) as usize],
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn dims(&self) -> (i32, i32, i32) {
        (self.nx, self.ny, self.nz)
    }

    #[inline]
    fn idx(&self, x: i32, y: i32, z: i32) -> usize {
        ((z * self.ny + y) * self.nx + x) as usize
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> u32 {
        self.cells[self.idx(x, y, z)]
    }

    pub fn insert(&mut self, pos: Vec3, index: u32) {
        let (x, y, z) = self.clamped_cell(pos);
        let i = self.idx(x, y, z);
        self.cells[i] = index;
    }

    /// Fractional cell coordinates of a world position.
    #[inline]
    pub fn float_cell(&self, pos: Vec3) -> Vec3 {
        (pos - self.origin) / self.cell_size
    }

    /// Cell containing a world position, clamped into the grid.
    #[inline]
    pub fn clamped_cell(&self, pos: Vec3) -> (i32, i32, i32) {
        let f = self.float_cell(pos);
        (
            (f.x as i32).clamp(0, self.nx - 1),
            (f.y as i32).clamp(0, self.ny - 1),
            (f.z as i32).clamp(0, self.nz - 1),
        )
    }

    /// Clamped cell cube reaching `reach_cells` (fractional) from `pos`.
    pub fn cell_cube(&self, pos: Vec3, reach_cells: f32) -> CellCube {
        let f = self.float_cell(pos);
        CellCube {
            x0: ((f.x - reach_cells) as i32).max(0),
            x1: ((f.x + reach_cells) as i32).min(self.nx - 1),
            y0: ((f.y - reach_cells) as i32).max(0),
            y1: ((f.y + reach_cells) as i32).min(self.ny - 1),
            z0: ((f.z - reach_cells) as i32).max(0),
            z1: ((f.z + reach_cells) as i32).min(self.nz - 1),
        }
    }

    /// Clamped cell cube spanning `search_cells` whole cells around the
    /// cell containing `pos`.
    pub fn cell_cube_around(&self, pos: Vec3, search_cells: i32) -> CellCube {
        let (cx, cy, cz) = self.clamped_cell(pos);
        CellCube {
            x0: (cx - search_cells).max(0),
            x1: (cx + search_cells).min(self.nx - 1),
            y0: (cy - search_cells).max(0),
            y1: (cy + search_cells).min(self.ny - 1),
            z0: (cz - search_cells).max(0),
            z1: (cz + search_cells).min(self.nz - 1),
        }
    }
}

/// Inclusive cell index ranges; empty when any axis has `hi < lo`.
#[derive(Clone, Copy, Debug)]
pub struct CellCube {
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
    pub z0: i32,
    pub z1: i32,
}

impl CellCube {
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, i32)> {
        let c = *self;
        (c.z0..=c.z1).flat_map(move |z| {
            (c.y0..=c.y1).flat_map(move |y| (c.x0..=c.x1).map(move |x| (x, y, z)))
        })
    }

    pub fn cell_count(&self) -> usize {
        let span = |lo: i32, hi: i32| (hi - lo + 1).max(0) as usize;
        span(self.x0, self.x1) * span(self.y0, self.y1) * span(self.z0, self.z1)
    }
}
