//! Variable-radius Poisson sphere packing over a uniform spatial hash.
#![forbid(unsafe_code)]

mod grid;
mod query;
pub mod sample;

pub use grid::{CellCube, EMPTY_CELL, SphereGrid};
pub use query::NearCandidate;

use karst_geom::{Aabb, Vec3};
use rand::Rng;

/// Directed link to a nearby sphere, with the straight-line distance
/// precomputed at graph-construction time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub target: u32,
    pub dist: f32,
}

/// One packed sphere. The index is stable from creation and doubles as
/// the sphere's slot in grid cells and edge targets.
#[derive(Clone, Debug)]
pub struct Sphere {
    pub index: u32,
    pub pos: Vec3,
    pub radius: f32,
    pub edges: Vec<Edge>,
}

/// The packed volume: spheres plus the hash grid that found them.
#[derive(Clone, Debug)]
pub struct SphereField {
    pub bounds: Aabb,
    pub grid: SphereGrid,
    pub spheres: Vec<Sphere>,
}

impl SphereField {
    /// Fills `bounds` with non-intersecting spheres by variable-radius
    /// dart throwing.
    ///
    /// The active list is seeded with a spawner at the bounds center;
    /// the spawner itself never enters the output or the grid. Each
    /// round picks a random active entry and tries up to
    /// `rejection_limit` candidates at distance
    /// `[r_s + r_c, spacing_limit * (r_s + r_c)]` in a uniform random
    /// direction; the first candidate inside the bounds that touches no
    /// accepted sphere is kept. An entry whose every attempt fails is
    /// retired. Terminates when the active list empties.
    pub fn pack(
        bounds: Aabb,
        min_radius: f32,
        max_radius: f32,
        spacing_limit: f32,
        rejection_limit: u32,
        rng: &mut impl Rng,
    ) -> Self {
        let mut field = Self {
            bounds,
            grid: SphereGrid::new(bounds, min_radius),
            spheres: Vec::new(),
        };

        let seed_radius = rng.gen_range(min_radius..=max_radius);
        let mut active: Vec<(Vec3, f32)> = vec![(bounds.center(), seed_radius)];

        while !active.is_empty() {
            let pick = rng.gen_range(0..active.len());
            let (spawn_pos, spawn_radius) = active[pick];
            let mut accepted = false;

            for _ in 0..rejection_limit {
                let radius = rng.gen_range(min_radius..=max_radius);
                let gap = spawn_radius + radius;
                let dist = rng.gen_range(gap..=spacing_limit * gap);
                let pos = spawn_pos + sample::unit_vector(rng) * dist;
                if !field.candidate_fits(pos, radius, max_radius) {
                    continue;
                }

                let index = field.spheres.len() as u32;
                field.grid.insert(pos, index);
                field.spheres.push(Sphere {
                    index,
                    pos,
                    radius,
                    edges: Vec::new(),
                });
                active.push((pos, radius));
                accepted = true;
                break;
            }

            if !accepted {
                active.swap_remove(pick);
            }
        }

        field
    }

    /// Builds a field from explicit `(position, radius)` pairs without
    /// running the packer. Positions must lie inside `bounds`. Intended
    /// for handcrafted fixtures and hosts that re-ingest a known layout.
    pub fn from_spheres(
        bounds: Aabb,
        min_radius: f32,
        spheres: impl IntoIterator<Item = (Vec3, f32)>,
    ) -> Self {
        let mut field = Self {
            bounds,
            grid: SphereGrid::new(bounds, min_radius),
            spheres: Vec::new(),
        };
        for (pos, radius) in spheres {
            debug_assert!(bounds.contains(pos));
            let index = field.spheres.len() as u32;
            field.grid.insert(pos, index);
            field.spheres.push(Sphere {
                index,
                pos,
                radius,
                edges: Vec::new(),
            });
        }
        field
    }

    fn candidate_fits(&self, pos: Vec3, radius: f32, max_radius: f32) -> bool {
        if !self.bounds.contains(pos) {
            return false;
        }
        // Any sphere the candidate could touch sits within this reach.
        let reach = (radius + max_radius) / self.grid.cell_size();
        for (x, y, z) in self.grid.cell_cube(pos, reach).iter() {
            let id = self.grid.get(x, y, z);
            if id == EMPTY_CELL {
                continue;
            }
            let other = &self.spheres[id as usize];
            let gap = radius + other.radius;
            if pos.distance_sq(other.pos) < gap * gap {
                return false;
            }
        }
        true
    }
}
